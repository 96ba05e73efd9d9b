use placepulse_db::DbError;
use placepulse_serp::SerpError;
use thiserror::Error;

/// Failures surfaced by [`AnalysisPipeline`](crate::AnalysisPipeline).
///
/// Display strings are stable and safe to show to end users; the wrapped
/// sources carry the diagnostic detail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input must be a non-empty place name or map URL")]
    InvalidInput,

    #[error("the URL does not contain a place name")]
    UnresolvableUrl { url: String },

    #[error("no place matched the given input")]
    PlaceNotFound { query: String },

    #[error("the place service is currently unavailable")]
    UpstreamUnavailable(#[source] SerpError),

    #[error("the analysis could not be stored or retrieved")]
    PersistenceFailure(#[from] DbError),
}

impl AnalysisError {
    /// Machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput => "invalid_input",
            AnalysisError::UnresolvableUrl { .. } => "unresolvable_url",
            AnalysisError::PlaceNotFound { .. } => "place_not_found",
            AnalysisError::UpstreamUnavailable(_) => "upstream_unavailable",
            AnalysisError::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// `true` when the caller's input is at fault rather than a dependency.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidInput
                | AnalysisError::UnresolvableUrl { .. }
                | AnalysisError::PlaceNotFound { .. }
        )
    }
}
