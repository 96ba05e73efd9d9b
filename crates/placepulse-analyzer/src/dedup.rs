//! Merge of overlapping review result sets.

use std::collections::HashSet;

use placepulse_serp::RawReview;

/// Returns the unique review texts in first-seen order.
///
/// The service gives reviews no stable identifier, so exact text equality is
/// the key. Reviews without text (missing or blank snippet) are dropped.
pub fn dedup_reviews<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = RawReview>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut input_count = 0_usize;

    for review in raw {
        input_count += 1;
        let Some(text) = review.snippet.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        if seen.insert(text.clone()) {
            unique.push(text);
        }
    }

    tracing::debug!(input = input_count, unique = unique.len(), "deduplicated reviews");
    unique
}
