//! Database operations for the `place_analyses` table.

use chrono::{DateTime, Utc};
use placepulse_core::{
    AnalysisRecord, AnalysisSummary, ClassifiedReview, NewAnalysis, OverallLabel, UnknownLabel,
};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const COLUMNS: &str = "id, public_id, input, place_name, place_id, positive_count, \
                       negative_count, neutral_count, total_count, overall_score_sum, \
                       overall_label, reviews, created_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `place_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub public_id: Uuid,
    pub input: String,
    pub place_name: String,
    pub place_id: String,
    pub positive_count: i32,
    pub negative_count: i32,
    pub neutral_count: i32,
    pub total_count: i32,
    pub overall_score_sum: i64,
    pub overall_label: String,
    pub reviews: Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = DbError;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        let context = format!("place_analyses.id={}", row.id);
        let decode = |reason: String| DbError::Decode {
            context: context.clone(),
            reason,
        };
        let count = |value: i32| u32::try_from(value).map_err(|e| decode(e.to_string()));

        let overall_label = row
            .overall_label
            .parse::<OverallLabel>()
            .map_err(|e: UnknownLabel| decode(e.to_string()))?;
        let reviews: Vec<ClassifiedReview> =
            serde_json::from_value(row.reviews).map_err(|e| decode(e.to_string()))?;

        Ok(AnalysisRecord {
            id: row.public_id,
            input: row.input,
            place_name: row.place_name,
            place_id: row.place_id,
            summary: AnalysisSummary {
                positive_count: count(row.positive_count)?,
                negative_count: count(row.negative_count)?,
                neutral_count: count(row.neutral_count)?,
                total_count: count(row.total_count)?,
                overall_score_sum: row.overall_score_sum,
                overall_label,
            },
            reviews,
            created_at: row.created_at,
        })
    }
}

/// Outcome of [`insert_analysis_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted {
    /// The candidate was stored.
    New(AnalysisRecord),
    /// Another writer stored an analysis for the same place first; this is it.
    Existing(AnalysisRecord),
}

impl Inserted {
    #[must_use]
    pub fn into_record(self) -> AnalysisRecord {
        match self {
            Inserted::New(record) | Inserted::Existing(record) => record,
        }
    }
}

/// Serializes classified reviews into the `reviews` JSONB column value.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if serialization fails.
pub fn encode_reviews(place_id: &str, reviews: &[ClassifiedReview]) -> Result<Value, DbError> {
    serde_json::to_value(reviews).map_err(|e| DbError::Encode {
        context: format!("reviews for place_id={place_id}"),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the stored analysis for `place_id`, or `None` if there is none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] if
/// the stored row is inconsistent.
pub async fn get_analysis_by_place_id(
    pool: &PgPool,
    place_id: &str,
) -> Result<Option<AnalysisRecord>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(&format!(
        "SELECT {COLUMNS} FROM place_analyses WHERE place_id = $1"
    ))
    .bind(place_id)
    .fetch_optional(pool)
    .await?;

    row.map(AnalysisRecord::try_from).transpose()
}

/// Stores `analysis` unless a row for the same `place_id` already exists.
///
/// Uses `ON CONFLICT (place_id) DO NOTHING`, so under concurrent first
/// requests exactly one candidate is stored and every caller gets that row.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if the reviews cannot be serialized,
/// [`DbError::Sqlx`] if a query fails, [`DbError::Decode`] if the stored row
/// is inconsistent, or [`DbError::NotFound`] if the conflicting row vanished
/// between the insert and the read-back.
pub async fn insert_analysis_if_absent(
    pool: &PgPool,
    analysis: &NewAnalysis,
) -> Result<Inserted, DbError> {
    let summary = &analysis.summary;
    let reviews = encode_reviews(&analysis.place_id, &analysis.reviews)?;

    let inserted = sqlx::query_as::<_, AnalysisRow>(&format!(
        "INSERT INTO place_analyses \
             (public_id, input, place_name, place_id, positive_count, negative_count, \
              neutral_count, total_count, overall_score_sum, overall_label, reviews) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (place_id) DO NOTHING \
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&analysis.input)
    .bind(&analysis.place_name)
    .bind(&analysis.place_id)
    .bind(to_i32(summary.positive_count))
    .bind(to_i32(summary.negative_count))
    .bind(to_i32(summary.neutral_count))
    .bind(to_i32(summary.total_count))
    .bind(summary.overall_score_sum)
    .bind(summary.overall_label.as_str())
    .bind(reviews)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(row) => Ok(Inserted::New(row.try_into()?)),
        None => get_analysis_by_place_id(pool, &analysis.place_id)
            .await?
            .map(Inserted::Existing)
            .ok_or(DbError::NotFound),
    }
}

/// Lists stored analyses, most recent first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] if a
/// stored row is inconsistent.
pub async fn list_analyses(pool: &PgPool, limit: i64) -> Result<Vec<AnalysisRecord>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
        "SELECT {COLUMNS} FROM place_analyses \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AnalysisRecord::try_from).collect()
}

fn to_i32(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
