//! Analysis record types shared by the pipeline, the datastore, and the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Returned when a stored label string is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sentiment label: {0}")]
pub struct UnknownLabel(pub String);

/// Per-review sentiment class. A strict sign test on the review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classifies a single review score: `> 0` positive, `< 0` negative.
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Self::Positive,
            s if s < 0 => Self::Negative,
            _ => Self::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate verdict for a place, derived from the mean review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallLabel {
    Positive,
    Negative,
    Neutral,
    NoReviews,
}

impl OverallLabel {
    /// Mean score above this is positive; below its negation is negative.
    pub const THRESHOLD: f64 = 0.5;

    /// Classifies an aggregate from the raw score sum and review count.
    ///
    /// Uses a wider neutral band (`[-0.5, 0.5]` on the mean) than
    /// [`SentimentLabel::from_score`] does for a single review.
    #[must_use]
    pub fn from_totals(score_sum: i64, total: u32) -> Self {
        if total == 0 {
            return Self::NoReviews;
        }
        #[allow(clippy::cast_precision_loss)]
        let average = score_sum as f64 / f64::from(total);
        if average > Self::THRESHOLD {
            Self::Positive
        } else if average < -Self::THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::NoReviews => "no_reviews",
        }
    }
}

impl fmt::Display for OverallLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverallLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            "no_reviews" => Ok(Self::NoReviews),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// One unique review text with its score and label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedReview {
    pub text: String,
    pub sentiment_score: i32,
    pub sentiment_label: SentimentLabel,
}

impl ClassifiedReview {
    #[must_use]
    pub fn new(text: String, sentiment_score: i32) -> Self {
        Self {
            text,
            sentiment_score,
            sentiment_label: SentimentLabel::from_score(sentiment_score),
        }
    }
}

/// Counts by class plus the raw score sum for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    pub total_count: u32,
    pub overall_score_sum: i64,
    pub overall_label: OverallLabel,
}

impl AnalysisSummary {
    /// Summary for a place with no reviews.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            total_count: 0,
            overall_score_sum: 0,
            overall_label: OverallLabel::NoReviews,
        }
    }
}

/// A persisted analysis, keyed by `place_id` for cache lookups.
///
/// Write-once: a later request for the same place returns the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub input: String,
    pub place_name: String,
    pub place_id: String,
    pub summary: AnalysisSummary,
    pub reviews: Vec<ClassifiedReview>,
    pub created_at: DateTime<Utc>,
}

/// A freshly computed analysis that has not been stored yet.
///
/// The store assigns `id` and `created_at` when it persists one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalysis {
    pub input: String,
    pub place_name: String,
    pub place_id: String,
    pub summary: AnalysisSummary,
    pub reviews: Vec<ClassifiedReview>,
}

impl NewAnalysis {
    /// Builds the stored form with the given identity and timestamp.
    #[must_use]
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> AnalysisRecord {
        AnalysisRecord {
            id,
            input: self.input,
            place_name: self.place_name,
            place_id: self.place_id,
            summary: self.summary,
            reviews: self.reviews,
            created_at,
        }
    }
}
