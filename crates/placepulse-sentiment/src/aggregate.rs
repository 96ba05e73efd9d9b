//! Per-review classification and per-place summary.

use placepulse_core::{AnalysisSummary, ClassifiedReview, OverallLabel, SentimentLabel};

use crate::scorer::SentimentScorer;

/// Output of [`aggregate`]: the summary plus every classified review, in
/// input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentAggregate {
    pub summary: AnalysisSummary,
    pub reviews: Vec<ClassifiedReview>,
}

/// Scores and classifies each text, then tallies the summary.
///
/// Per-review labels use a strict sign test; the overall label uses the
/// mean score with a `±0.5` neutral band (see [`OverallLabel::from_totals`]).
/// An empty input yields `no_reviews`.
pub fn aggregate<S, I>(scorer: &S, texts: I) -> SentimentAggregate
where
    S: SentimentScorer + ?Sized,
    I: IntoIterator<Item = String>,
{
    let mut positive_count = 0_u32;
    let mut negative_count = 0_u32;
    let mut neutral_count = 0_u32;
    let mut overall_score_sum = 0_i64;

    let reviews: Vec<ClassifiedReview> = texts
        .into_iter()
        .map(|text| {
            let score = scorer.score(&text);
            let review = ClassifiedReview::new(text, score);
            match review.sentiment_label {
                SentimentLabel::Positive => positive_count += 1,
                SentimentLabel::Negative => negative_count += 1,
                SentimentLabel::Neutral => neutral_count += 1,
            }
            overall_score_sum += i64::from(score);
            review
        })
        .collect();

    let total_count = u32::try_from(reviews.len()).unwrap_or(u32::MAX);
    let overall_label = OverallLabel::from_totals(overall_score_sum, total_count);

    tracing::debug!(
        total = total_count,
        positive = positive_count,
        negative = negative_count,
        neutral = neutral_count,
        score_sum = overall_score_sum,
        label = %overall_label,
        "aggregated review sentiment"
    );

    SentimentAggregate {
        summary: AnalysisSummary {
            positive_count,
            negative_count,
            neutral_count,
            total_count,
            overall_score_sum,
            overall_label,
        },
        reviews,
    }
}
