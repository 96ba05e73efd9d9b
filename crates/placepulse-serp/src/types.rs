//! `SerpApi` response types.
//!
//! Only the fields placepulse reads are modelled; everything else in the
//! (large) response bodies is ignored by serde.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// engine=google_maps
// ---------------------------------------------------------------------------

/// Response from a `google_maps` search.
///
/// A query that matches one place unambiguously yields `place_results`;
/// a broader query yields a `local_results` list instead.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceSearchResponse {
    #[serde(default)]
    pub place_results: Option<PlaceResult>,
    #[serde(default)]
    pub local_results: Vec<LocalResult>,
}

/// The single-place answer to a search.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// One entry of a multi-result search.
#[derive(Debug, Default, Deserialize)]
pub struct LocalResult {
    #[serde(default)]
    pub place_id: Option<String>,
    /// Google feature id (`0x…:0x…`), derived from the place's map tile.
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// engine=google_maps_reviews
// ---------------------------------------------------------------------------

/// Response from a `google_maps_reviews` call.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

/// A review as returned by the service. Only `snippet` is analysed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub user: Option<ReviewUser>,
}

impl RawReview {
    /// Convenience constructor for a review carrying only text.
    #[must_use]
    pub fn with_snippet(snippet: impl Into<String>) -> Self {
        Self {
            snippet: Some(snippet.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUser {
    #[serde(default)]
    pub name: Option<String>,
}
