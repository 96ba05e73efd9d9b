//! Client for the external place-search and place-reviews service (`SerpApi`).

pub mod client;
pub mod error;
pub mod types;

pub use client::{ReviewSort, SerpClient};
pub use error::SerpError;
pub use types::{LocalResult, PlaceResult, PlaceSearchResponse, RawReview, ReviewUser};
