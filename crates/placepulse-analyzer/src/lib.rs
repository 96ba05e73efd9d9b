//! The resolution, retrieval, and aggregation pipeline.
//!
//! [`AnalysisPipeline::analyze`] turns a place reference (a name or a map
//! URL) into a persisted [`AnalysisRecord`](placepulse_core::AnalysisRecord):
//!
//! 1. normalize the reference into a search query ([`normalize`]);
//! 2. resolve the query to a place identifier ([`resolve`]);
//! 3. return the stored analysis for that identifier, if any ([`store`]);
//! 4. otherwise fetch reviews under every sort order concurrently ([`fetch`]),
//!    merge them by text ([`dedup`]), score them, and store the result.

pub mod dedup;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod store;

pub use dedup::dedup_reviews;
pub use error::AnalysisError;
pub use fetch::fetch_reviews_all_orders;
pub use normalize::{normalize_reference, PlaceQuery};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use resolve::{extract_place_id, resolve_place, ResolvedPlace};
pub use store::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};
