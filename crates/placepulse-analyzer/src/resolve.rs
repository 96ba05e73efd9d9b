//! Place resolution: search query to a single canonical place identifier.

use placepulse_serp::{PlaceSearchResponse, SerpClient, SerpError};

use crate::error::AnalysisError;
use crate::normalize::PlaceQuery;

/// Pulls a candidate identifier out of one response shape.
type Extractor = fn(&PlaceSearchResponse) -> Option<&str>;

/// Identifier sources, highest priority first. The first present value wins.
const EXTRACTORS: [(&str, Extractor); 3] = [
    ("place_results.place_id", direct_place_id),
    ("local_results[0].place_id", first_local_place_id),
    ("local_results[0].data_id", first_local_data_id),
];

/// A resolved place: identifier plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlace {
    pub place_id: String,
    pub place_name: String,
}

/// Resolves `query` to a place with one `google_maps` search.
///
/// # Errors
///
/// - [`AnalysisError::UpstreamUnavailable`] when the service cannot be
///   reached or rejects the call (see [`SerpError::is_transport`]).
/// - [`AnalysisError::PlaceNotFound`] when the service answers but no
///   identifier can be extracted.
pub async fn resolve_place(
    client: &SerpClient,
    query: &PlaceQuery,
) -> Result<ResolvedPlace, AnalysisError> {
    let response = client
        .search_places(query.as_str())
        .await
        .map_err(|e| search_failure(e, query))?;

    let Some((source, place_id)) = extract_place_id(&response) else {
        tracing::info!(query = %query, "search returned no usable place identifier");
        return Err(AnalysisError::PlaceNotFound {
            query: query.to_string(),
        });
    };

    let place_name = place_title(&response).unwrap_or(query.as_str()).to_owned();
    tracing::debug!(query = %query, place_id, source, "resolved place");

    Ok(ResolvedPlace {
        place_id: place_id.to_owned(),
        place_name,
    })
}

/// Tries each extractor in priority order, returning the winning field's
/// name and value. Blank values count as absent.
#[must_use]
pub fn extract_place_id(response: &PlaceSearchResponse) -> Option<(&'static str, &str)> {
    EXTRACTORS
        .iter()
        .find_map(|(source, extract)| extract(response).map(|id| (*source, id)))
}

fn direct_place_id(response: &PlaceSearchResponse) -> Option<&str> {
    non_blank(response.place_results.as_ref()?.place_id.as_deref())
}

fn first_local_place_id(response: &PlaceSearchResponse) -> Option<&str> {
    non_blank(response.local_results.first()?.place_id.as_deref())
}

fn first_local_data_id(response: &PlaceSearchResponse) -> Option<&str> {
    non_blank(response.local_results.first()?.data_id.as_deref())
}

fn place_title(response: &PlaceSearchResponse) -> Option<&str> {
    let direct = response
        .place_results
        .as_ref()
        .and_then(|p| non_blank(p.title.as_deref()));
    direct.or_else(|| non_blank(response.local_results.first()?.title.as_deref()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn search_failure(err: SerpError, query: &PlaceQuery) -> AnalysisError {
    if err.is_transport() {
        tracing::warn!(query = %query, error = %err, "place search failed");
        AnalysisError::UpstreamUnavailable(err)
    } else {
        tracing::info!(query = %query, error = %err, "place search found nothing");
        AnalysisError::PlaceNotFound {
            query: query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placepulse_serp::{LocalResult, PlaceResult};

    fn local(place_id: Option<&str>, data_id: Option<&str>) -> LocalResult {
        LocalResult {
            place_id: place_id.map(str::to_owned),
            data_id: data_id.map(str::to_owned),
            title: Some("Local".to_owned()),
        }
    }

    #[test]
    fn direct_place_id_wins_over_list() {
        let response = PlaceSearchResponse {
            place_results: Some(PlaceResult {
                place_id: Some("ChIJdirect".to_owned()),
                ..PlaceResult::default()
            }),
            local_results: vec![local(Some("ChIJlist"), Some("0x1:0x2"))],
        };
        assert_eq!(
            extract_place_id(&response),
            Some(("place_results.place_id", "ChIJdirect"))
        );
    }

    #[test]
    fn first_list_entry_place_id_is_second_choice() {
        let response = PlaceSearchResponse {
            place_results: None,
            local_results: vec![local(Some("ChIJfirst"), None), local(Some("ChIJsecond"), None)],
        };
        assert_eq!(
            extract_place_id(&response),
            Some(("local_results[0].place_id", "ChIJfirst"))
        );
    }

    #[test]
    fn feature_id_is_last_resort() {
        let response = PlaceSearchResponse {
            place_results: Some(PlaceResult::default()),
            local_results: vec![local(None, Some("0x390cfd5b:0x3a1b"))],
        };
        assert_eq!(
            extract_place_id(&response),
            Some(("local_results[0].data_id", "0x390cfd5b:0x3a1b"))
        );
    }

    #[test]
    fn blank_identifiers_are_skipped() {
        let response = PlaceSearchResponse {
            place_results: Some(PlaceResult {
                place_id: Some("  ".to_owned()),
                ..PlaceResult::default()
            }),
            local_results: vec![local(Some("ChIJlist"), None)],
        };
        assert_eq!(extract_place_id(&response).map(|(_, id)| id), Some("ChIJlist"));
    }

    #[test]
    fn no_identifier_anywhere() {
        let response = PlaceSearchResponse {
            place_results: None,
            local_results: vec![local(None, None)],
        };
        assert!(extract_place_id(&response).is_none());
        assert!(extract_place_id(&PlaceSearchResponse::default()).is_none());
    }

    #[test]
    fn title_prefers_direct_result() {
        let response = PlaceSearchResponse {
            place_results: Some(PlaceResult {
                title: Some("Direct".to_owned()),
                ..PlaceResult::default()
            }),
            local_results: vec![local(Some("x"), None)],
        };
        assert_eq!(place_title(&response), Some("Direct"));
    }

    #[test]
    fn title_falls_back_to_first_list_entry() {
        let response = PlaceSearchResponse {
            place_results: None,
            local_results: vec![local(Some("x"), None)],
        };
        assert_eq!(place_title(&response), Some("Local"));
    }
}
