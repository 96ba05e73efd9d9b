//! Concurrent multi-sort review retrieval.

use futures::future::join_all;
use placepulse_serp::{RawReview, ReviewSort, SerpClient};

/// Fetches reviews for `place_id` under every [`ReviewSort`] concurrently
/// and concatenates the successful result sets in sort order.
///
/// All calls run to completion. A failing or timed-out call is logged and
/// contributes an empty result set; the others are not cancelled. When every
/// call fails the result is empty and the place is analysed as having no
/// reviews.
pub async fn fetch_reviews_all_orders(client: &SerpClient, place_id: &str) -> Vec<RawReview> {
    let calls = ReviewSort::ALL.map(|sort| async move {
        let result = client.fetch_reviews(place_id, sort).await;
        (sort, result)
    });

    let mut reviews = Vec::new();
    let mut failed = 0_usize;

    for (sort, result) in join_all(calls).await {
        match result {
            Ok(batch) => {
                tracing::debug!(place_id, sort_by = %sort, count = batch.len(), "fetched reviews");
                reviews.extend(batch);
            }
            Err(e) => {
                tracing::warn!(
                    place_id,
                    sort_by = %sort,
                    error = %e,
                    "review fetch failed; continuing without this sort order"
                );
                failed += 1;
            }
        }
    }

    if failed == ReviewSort::ALL.len() {
        tracing::warn!(place_id, "every review fetch failed; analysing with no reviews");
    }

    reviews
}
