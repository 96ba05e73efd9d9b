//! Cache-or-compute orchestration.

use placepulse_core::{AnalysisRecord, NewAnalysis};
use placepulse_db::Inserted;
use placepulse_sentiment::{aggregate, LexiconScorer, SentimentAggregate, SentimentScorer};
use placepulse_serp::SerpClient;

use crate::dedup::dedup_reviews;
use crate::error::AnalysisError;
use crate::fetch::fetch_reviews_all_orders;
use crate::normalize::normalize_reference;
use crate::resolve::resolve_place;
use crate::store::AnalysisStore;

/// Result of [`AnalysisPipeline::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// An analysis for the place was already stored; no reviews were fetched
    /// by this call, or a concurrent call stored its result first.
    Cached(AnalysisRecord),
    /// This call computed and stored the analysis.
    Computed(AnalysisRecord),
}

impl AnalysisOutcome {
    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self, AnalysisOutcome::Cached(_))
    }

    #[must_use]
    pub fn record(&self) -> &AnalysisRecord {
        match self {
            AnalysisOutcome::Cached(record) | AnalysisOutcome::Computed(record) => record,
        }
    }

    #[must_use]
    pub fn into_record(self) -> AnalysisRecord {
        match self {
            AnalysisOutcome::Cached(record) | AnalysisOutcome::Computed(record) => record,
        }
    }
}

/// Runs normalize, resolve, cache check, fetch, dedup, aggregate, and persist
/// for one place reference.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Debug)]
pub struct AnalysisPipeline<S, C = LexiconScorer> {
    serp: SerpClient,
    store: S,
    scorer: C,
}

impl<S: AnalysisStore> AnalysisPipeline<S, LexiconScorer> {
    #[must_use]
    pub fn new(serp: SerpClient, store: S) -> Self {
        Self::with_scorer(serp, store, LexiconScorer)
    }
}

impl<S: AnalysisStore, C: SentimentScorer> AnalysisPipeline<S, C> {
    #[must_use]
    pub fn with_scorer(serp: SerpClient, store: S, scorer: C) -> Self {
        Self {
            serp,
            store,
            scorer,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Analyzes the place named by `input`, returning the stored record.
    ///
    /// The place is always resolved, since the identifier is the cache key.
    /// On a cache hit no review calls are made. Nothing is stored unless
    /// every stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnalysisError`] raised by any stage. Review fetch
    /// failures are absorbed, so a place whose review calls all fail is
    /// stored with no reviews.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let query = normalize_reference(input)?;
        let place = resolve_place(&self.serp, &query).await?;

        if let Some(record) = self.store.find_by_place_id(&place.place_id).await? {
            tracing::info!(place_id = %place.place_id, id = %record.id, "analysis cache hit");
            return Ok(AnalysisOutcome::Cached(record));
        }

        let raw = fetch_reviews_all_orders(&self.serp, &place.place_id).await;
        let texts = dedup_reviews(raw);
        let SentimentAggregate { summary, reviews } = aggregate(&self.scorer, texts);

        let candidate = NewAnalysis {
            input: input.trim().to_owned(),
            place_name: place.place_name,
            place_id: place.place_id,
            summary,
            reviews,
        };

        match self.store.insert_if_absent(candidate).await? {
            Inserted::New(record) => {
                tracing::info!(
                    place_id = %record.place_id,
                    id = %record.id,
                    count = record.summary.total_count,
                    label = %record.summary.overall_label,
                    "stored new analysis"
                );
                Ok(AnalysisOutcome::Computed(record))
            }
            Inserted::Existing(record) => {
                tracing::info!(
                    place_id = %record.place_id,
                    id = %record.id,
                    "concurrent request stored this place first; returning stored analysis"
                );
                Ok(AnalysisOutcome::Cached(record))
            }
        }
    }

    /// Lists stored analyses, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::PersistenceFailure`] if the store fails.
    pub async fn list_analyses(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        Ok(self.store.list_recent(limit).await?)
    }
}
