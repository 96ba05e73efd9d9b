//! Analysis cache: lookup by place identifier and write-once persistence.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use placepulse_core::{AnalysisRecord, NewAnalysis};
use placepulse_db::{DbError, Inserted};
use sqlx::PgPool;
use uuid::Uuid;

/// Storage for analysis records, keyed by place identifier.
///
/// Implementations must make [`insert_if_absent`](Self::insert_if_absent)
/// atomic per place: of several concurrent inserts for one identifier,
/// exactly one is stored and every caller receives that stored record.
pub trait AnalysisStore: Send + Sync {
    /// Returns the stored analysis for `place_id`, if any.
    fn find_by_place_id(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<Option<AnalysisRecord>, DbError>> + Send;

    /// Stores `analysis` unless one already exists for its place.
    fn insert_if_absent(
        &self,
        analysis: NewAnalysis,
    ) -> impl Future<Output = Result<Inserted, DbError>> + Send;

    /// Lists stored analyses, most recent first.
    fn list_recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<AnalysisRecord>, DbError>> + Send;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`AnalysisStore`] backed by the `place_analyses` table.
#[derive(Debug, Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AnalysisStore for PgAnalysisStore {
    async fn find_by_place_id(&self, place_id: &str) -> Result<Option<AnalysisRecord>, DbError> {
        placepulse_db::get_analysis_by_place_id(&self.pool, place_id).await
    }

    async fn insert_if_absent(&self, analysis: NewAnalysis) -> Result<Inserted, DbError> {
        placepulse_db::insert_analysis_if_absent(&self.pool, &analysis).await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, DbError> {
        placepulse_db::list_analyses(&self.pool, limit).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local [`AnalysisStore`]. Records live in insertion order.
#[derive(Debug, Default)]
pub struct MemoryAnalysisStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl MemoryAnalysisStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AnalysisRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnalysisStore for MemoryAnalysisStore {
    async fn find_by_place_id(&self, place_id: &str) -> Result<Option<AnalysisRecord>, DbError> {
        Ok(self
            .lock()
            .iter()
            .find(|r| r.place_id == place_id)
            .cloned())
    }

    async fn insert_if_absent(&self, analysis: NewAnalysis) -> Result<Inserted, DbError> {
        let mut records = self.lock();
        if let Some(existing) = records.iter().find(|r| r.place_id == analysis.place_id) {
            return Ok(Inserted::Existing(existing.clone()));
        }
        let record = analysis.into_record(Uuid::new_v4(), Utc::now());
        records.push(record.clone());
        Ok(Inserted::New(record))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, DbError> {
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self.lock().iter().rev().take(take).cloned().collect())
    }
}
