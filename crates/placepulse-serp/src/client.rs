//! HTTP client for the `SerpApi` search endpoint.
//!
//! One endpoint serves both engines placepulse needs: `google_maps` for
//! resolving a free-text query to a place, and `google_maps_reviews` for
//! listing a place's reviews under a given sort order. Each call is a single
//! attempt bounded by the client's transport timeout.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::SerpError;
use crate::types::{PlaceSearchResponse, RawReview, ReviewsResponse};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_COUNTRY: &str = "in";

const SEARCH_ENGINE: &str = "google_maps";
const REVIEWS_ENGINE: &str = "google_maps_reviews";

/// Review listing order accepted by the `google_maps_reviews` engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewSort {
    NewestFirst,
    RatingLow,
    RatingHigh,
}

impl ReviewSort {
    /// The fixed set of orders fetched for every analysis.
    pub const ALL: [ReviewSort; 3] = [
        ReviewSort::NewestFirst,
        ReviewSort::RatingLow,
        ReviewSort::RatingHigh,
    ];

    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            ReviewSort::NewestFirst => "newestFirst",
            ReviewSort::RatingLow => "ratingLow",
            ReviewSort::RatingHigh => "ratingHigh",
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Client for `SerpApi`.
///
/// Use [`SerpClient::new`] for production or [`SerpClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct SerpClient {
    client: Client,
    api_key: String,
    base_url: Url,
    locale: String,
    country: String,
}

impl fmt::Debug for SerpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("locale", &self.locale)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

impl SerpClient {
    /// Creates a client pointed at the production `SerpApi` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SerpError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL (for testing with wiremock).
    ///
    /// `base_url` is the full endpoint, path included.
    ///
    /// # Errors
    ///
    /// Returns [`SerpError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SerpError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SerpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("placepulse/0.1 (review-sentiment)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| SerpError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            locale: DEFAULT_LOCALE.to_owned(),
            country: DEFAULT_COUNTRY.to_owned(),
        })
    }

    /// Overrides the `hl` (interface language) and `gl` (country) parameters.
    #[must_use]
    pub fn with_locale(mut self, locale: &str, country: &str) -> Self {
        locale.clone_into(&mut self.locale);
        country.clone_into(&mut self.country);
        self
    }

    /// Runs a `google_maps` search for `query`.
    ///
    /// # Errors
    ///
    /// - [`SerpError::Http`] on network failure or timeout.
    /// - [`SerpError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SerpError::Api`] when the body carries an `"error"` field, which
    ///   is how the service reports "no results".
    /// - [`SerpError::Deserialize`] if the body does not match the expected shape.
    pub async fn search_places(&self, query: &str) -> Result<PlaceSearchResponse, SerpError> {
        let url = self.build_url(
            SEARCH_ENGINE,
            &[
                ("type", "search"),
                ("q", query),
                ("hl", self.locale.as_str()),
                ("gl", self.country.as_str()),
            ],
        );
        self.request(&url, SEARCH_ENGINE, &format!("search(q={query})"))
            .await
    }

    /// Fetches one page of reviews for `place_id` in the given order.
    ///
    /// Identifiers in Google's feature-id form (`0x…:0x…`) are sent as
    /// `data_id`; anything else as `place_id`.
    ///
    /// # Errors
    ///
    /// Same as [`SerpClient::search_places`].
    pub async fn fetch_reviews(
        &self,
        place_id: &str,
        sort: ReviewSort,
    ) -> Result<Vec<RawReview>, SerpError> {
        let url = self.build_url(
            REVIEWS_ENGINE,
            &[
                (identifier_param(place_id), place_id),
                ("hl", self.locale.as_str()),
                ("sort_by", sort.as_param()),
            ],
        );
        let response: ReviewsResponse = self
            .request(&url, REVIEWS_ENGINE, &format!("reviews(id={place_id}, sort_by={sort})"))
            .await?;
        Ok(response.reviews)
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, engine: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", engine);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("api_key", &self.api_key);
        }
        url
    }

    /// Sends a GET, checks the status and the in-body `"error"` field, and
    /// deserializes the body into `T`.
    async fn request<T: DeserializeOwned>(
        &self,
        url: &Url,
        engine: &'static str,
        context: &str,
    ) -> Result<T, SerpError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!(engine, status = status.as_u16(), "SerpApi response");
        if !status.is_success() {
            return Err(SerpError::UnexpectedStatus {
                status: status.as_u16(),
                engine,
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SerpError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;
        Self::check_api_error(&value)?;

        serde_json::from_value(value).map_err(|e| SerpError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    fn check_api_error(body: &serde_json::Value) -> Result<(), SerpError> {
        match body.get("error").and_then(serde_json::Value::as_str) {
            Some(message) => Err(SerpError::Api(message.to_owned())),
            None => Ok(()),
        }
    }
}

/// Chooses the query parameter name for a place identifier.
fn identifier_param(place_id: &str) -> &'static str {
    if is_feature_id(place_id) {
        "data_id"
    } else {
        "place_id"
    }
}

fn is_feature_id(id: &str) -> bool {
    id.split_once(':')
        .is_some_and(|(hi, lo)| hi.starts_with("0x") && lo.starts_with("0x"))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
