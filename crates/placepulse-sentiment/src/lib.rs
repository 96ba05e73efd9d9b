//! Review sentiment scoring and aggregation.
//!
//! [`LexiconScorer`] assigns each text an integer polarity score from a
//! word list in the AFINN style (`-5..=5` per word, summed, with single-word
//! negation). [`aggregate`] classifies a batch of review texts and produces
//! the per-place [`AnalysisSummary`](placepulse_core::AnalysisSummary).

pub mod aggregate;
pub mod scorer;

pub use aggregate::{aggregate, SentimentAggregate};
pub use scorer::{lexicon_score, LexiconScorer, SentimentScorer};
