//! Place reference normalization: raw user input to a search query.

use std::fmt;

use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::error::AnalysisError;

const PLACE_MARKER: &str = "/place/";

/// A non-empty search string derived from a place reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a place reference into a [`PlaceQuery`].
///
/// An `http`/`https` URL must carry a `/place/<name>/` path segment; the
/// percent-decoded name with `+` read as a space becomes the query. Any
/// other input is used verbatim after trimming.
///
/// # Errors
///
/// - [`AnalysisError::InvalidInput`] if `input` is blank.
/// - [`AnalysisError::UnresolvableUrl`] if `input` is a URL without a place
///   name segment.
pub fn normalize_reference(input: &str) -> Result<PlaceQuery, AnalysisError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidInput);
    }

    match parse_web_url(trimmed) {
        Some(url) => place_name_from_url(&url)
            .map(PlaceQuery)
            .ok_or_else(|| AnalysisError::UnresolvableUrl {
                url: trimmed.to_owned(),
            }),
        None => Ok(PlaceQuery(trimmed.to_owned())),
    }
}

// "Cafe: MG Road" parses as a URL with scheme "cafe"; only web URLs count.
fn parse_web_url(input: &str) -> Option<Url> {
    Url::parse(input)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn place_name_from_url(url: &Url) -> Option<String> {
    let path = percent_decode_str(url.path()).decode_utf8_lossy();
    let (_, rest) = path.split_once(PLACE_MARKER)?;
    let segment = rest.split('/').next().unwrap_or_default();
    let name = segment.replace('+', " ");
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}
