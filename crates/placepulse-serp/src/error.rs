use thiserror::Error;

/// Errors returned by the `SerpApi` client.
#[derive(Debug, Error)]
pub enum SerpError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {engine}")]
    UnexpectedStatus { status: u16, engine: &'static str },

    /// The service answered 2xx but reported an error in the body
    /// (e.g. "Google hasn't returned any results for this query.").
    #[error("SerpApi error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl SerpError {
    /// Returns `true` when the failure lies with reaching the service rather
    /// than with the query having no usable answer.
    ///
    /// Transport-level: network/timeout failures, 5xx, rejected credentials
    /// (401/403), quota exhaustion (429), unparseable bodies, bad base URL.
    /// Not transport-level: other 4xx responses and in-body API errors.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            SerpError::Http(_) | SerpError::Deserialize { .. } | SerpError::InvalidBaseUrl { .. } => {
                true
            }
            SerpError::UnexpectedStatus { status, .. } => {
                *status >= 500 || matches!(*status, 401 | 403 | 429)
            }
            SerpError::Api(_) => false,
        }
    }
}
