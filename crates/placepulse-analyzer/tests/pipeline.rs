//! End-to-end pipeline tests against a wiremock `SerpApi` and the in-memory store.

use std::time::{Duration, Instant};

use placepulse_analyzer::{
    fetch_reviews_all_orders, AnalysisError, AnalysisPipeline, MemoryAnalysisStore,
};
use placepulse_core::{OverallLabel, SentimentLabel};
use placepulse_serp::SerpClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_client(server: &MockServer) -> SerpClient {
    SerpClient::with_base_url("test-key", 5, &format!("{}/search.json", server.uri()))
        .expect("client construction should not fail")
}

fn pipeline(server: &MockServer) -> AnalysisPipeline<MemoryAnalysisStore> {
    AnalysisPipeline::new(test_client(server), MemoryAnalysisStore::new())
}

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_place(server: &MockServer, place_id: &str, title: &str) {
    mount_search(
        server,
        serde_json::json!({
            "place_results": { "place_id": place_id, "title": title }
        }),
    )
    .await;
}

async fn mount_reviews(server: &MockServer, sort_by: &str, snippets: &[&str]) {
    let reviews: Vec<serde_json::Value> = snippets
        .iter()
        .map(|s| serde_json::json!({ "snippet": s, "rating": 4.0 }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps_reviews"))
        .and(query_param("sort_by", sort_by))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "reviews": reviews })),
        )
        .mount(server)
        .await;
}

async fn mount_reviews_status(server: &MockServer, sort_by: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps_reviews"))
        .and(query_param("sort_by", sort_by))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn reviews_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| {
            r.url
                .query_pairs()
                .any(|(k, v)| k == "engine" && v == "google_maps_reviews")
        })
        .count()
}

// ---------------------------------------------------------------------------
// Section 1: Full compute path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn computes_and_stores_analysis_across_sort_orders() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJblue", "Blue Tokai Coffee Roasters").await;
    mount_reviews(&server, "newestFirst", &["Great coffee", "Rude staff"]).await;
    mount_reviews(&server, "ratingLow", &["Rude staff", "Terrible wait"]).await;
    mount_reviews(&server, "ratingHigh", &["Great coffee", "Amazing pastries"]).await;

    let pipeline = pipeline(&server);
    let outcome = pipeline
        .analyze("  Blue Tokai Coffee ")
        .await
        .expect("analysis should succeed");

    assert!(!outcome.is_cached());
    let record = outcome.record();
    assert_eq!(record.input, "Blue Tokai Coffee");
    assert_eq!(record.place_id, "ChIJblue");
    assert_eq!(record.place_name, "Blue Tokai Coffee Roasters");
    assert_eq!(record.summary.total_count, 4);
    assert_eq!(record.summary.positive_count, 2);
    assert_eq!(record.summary.negative_count, 2);
    assert_eq!(record.reviews.len(), 4);
    assert_eq!(reviews_calls(&server).await, 3);
    assert_eq!(pipeline.store().len(), 1);
}

#[tokio::test]
async fn scores_follow_the_injected_scorer() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJscored", "Scored").await;
    mount_reviews(&server, "newestFirst", &["three", "minus one"]).await;
    mount_reviews(&server, "ratingLow", &["zero"]).await;
    mount_reviews(&server, "ratingHigh", &["two", "three"]).await;

    let scorer = |text: &str| match text {
        "three" => 3,
        "minus one" => -1,
        "two" => 2,
        _ => 0,
    };
    let pipeline =
        AnalysisPipeline::with_scorer(test_client(&server), MemoryAnalysisStore::new(), scorer);

    let record = pipeline
        .analyze("Scored")
        .await
        .expect("analysis should succeed")
        .into_record();

    assert_eq!(record.summary.positive_count, 2);
    assert_eq!(record.summary.negative_count, 1);
    assert_eq!(record.summary.neutral_count, 1);
    assert_eq!(record.summary.total_count, 4);
    assert_eq!(record.summary.overall_score_sum, 4);
    assert_eq!(record.summary.overall_label, OverallLabel::Positive);

    let zero = record
        .reviews
        .iter()
        .find(|r| r.text == "zero")
        .expect("zero review present");
    assert_eq!(zero.sentiment_label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn place_without_reviews_is_stored_as_no_reviews() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJquiet", "Quiet Place").await;
    for sort in ["newestFirst", "ratingLow", "ratingHigh"] {
        mount_reviews(&server, sort, &[]).await;
    }

    let pipeline = pipeline(&server);
    let record = pipeline
        .analyze("Quiet Place")
        .await
        .expect("analysis should succeed")
        .into_record();

    assert_eq!(record.summary.total_count, 0);
    assert_eq!(record.summary.overall_label, OverallLabel::NoReviews);
    assert!(record.reviews.is_empty());
}

#[tokio::test]
async fn feature_id_resolution_fetches_reviews_by_data_id() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        serde_json::json!({
            "local_results": [ { "title": "Corner Dhaba", "data_id": "0x390d:0x5b1c" } ]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps_reviews"))
        .and(query_param("data_id", "0x390d:0x5b1c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reviews": [ { "snippet": "Delicious parathas" } ]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let record = pipeline(&server)
        .analyze("Corner Dhaba")
        .await
        .expect("analysis should succeed")
        .into_record();

    assert_eq!(record.place_id, "0x390d:0x5b1c");
    assert_eq!(record.place_name, "Corner Dhaba");
    assert_eq!(record.summary.total_count, 1);
}

// ---------------------------------------------------------------------------
// Section 2: Cache behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_request_for_same_place_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJcache", "Indian Accent").await;
    mount_reviews(&server, "newestFirst", &["Amazing tasting menu"]).await;
    mount_reviews(&server, "ratingLow", &["Slow service"]).await;
    mount_reviews(&server, "ratingHigh", &["Amazing tasting menu"]).await;

    let pipeline = pipeline(&server);
    let first = pipeline
        .analyze("Indian Accent")
        .await
        .expect("first analysis should succeed");
    assert_eq!(reviews_calls(&server).await, 3);

    let second = pipeline
        .analyze("https://www.google.com/maps/place/Indian+Accent/@28.59,77.24,17z")
        .await
        .expect("second analysis should succeed");

    assert!(second.is_cached());
    assert_eq!(reviews_calls(&server).await, 3, "cache hit must not fetch reviews");
    assert_eq!(
        serde_json::to_vec(first.record()).expect("serialize"),
        serde_json::to_vec(second.record()).expect("serialize"),
    );
    assert_eq!(pipeline.store().len(), 1);
}

#[tokio::test]
async fn concurrent_requests_for_same_place_store_one_record() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJrace", "Race Cafe").await;
    for sort in ["newestFirst", "ratingLow", "ratingHigh"] {
        mount_reviews(&server, sort, &["Great coffee"]).await;
    }

    let pipeline = pipeline(&server);
    let (left, right) = tokio::join!(pipeline.analyze("Race Cafe"), pipeline.analyze("Race Cafe"));
    let left = left.expect("left analysis should succeed");
    let right = right.expect("right analysis should succeed");

    assert_eq!(pipeline.store().len(), 1);
    assert_eq!(left.record(), right.record());
    assert!(left.is_cached() || right.is_cached());
}

#[tokio::test]
async fn list_returns_most_recent_first() {
    let server = MockServer::start().await;
    for sort in ["newestFirst", "ratingLow", "ratingHigh"] {
        mount_reviews(&server, sort, &["Friendly staff"]).await;
    }
    for (query, place_id) in [("First Place", "ChIJ1"), ("Second Place", "ChIJ2")] {
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google_maps"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "place_results": { "place_id": place_id, "title": query }
            })))
            .mount(&server)
            .await;
    }

    let pipeline = pipeline(&server);
    pipeline.analyze("First Place").await.expect("first");
    pipeline.analyze("Second Place").await.expect("second");

    let listed = pipeline.list_analyses(10).await.expect("list");
    let ids: Vec<&str> = listed.iter().map(|r| r.place_id.as_str()).collect();
    assert_eq!(ids, vec!["ChIJ2", "ChIJ1"]);
}

// ---------------------------------------------------------------------------
// Section 3: Failure modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_input_fails_without_any_calls() {
    let server = MockServer::start().await;

    let err = pipeline(&server).analyze("   ").await.unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidInput));
    assert!(server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn url_without_place_segment_is_unresolvable() {
    let server = MockServer::start().await;

    let err = pipeline(&server)
        .analyze("https://www.google.com/maps/dir/Delhi/Agra")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "unresolvable_url");
    assert!(err.is_client_error());
}

#[tokio::test]
async fn missing_identifier_is_place_not_found_and_skips_reviews() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        serde_json::json!({ "local_results": [ { "title": "No ids here" } ] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(query_param("engine", "google_maps_reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "reviews": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = pipeline(&server);
    let err = pipeline.analyze("Nowhere Cafe").await.unwrap_err();

    assert!(matches!(err, AnalysisError::PlaceNotFound { .. }));
    assert!(pipeline.store().is_empty());
}

#[tokio::test]
async fn in_body_search_error_is_place_not_found() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        serde_json::json!({ "error": "Google hasn't returned any results for this query." }),
    )
    .await;

    let err = pipeline(&server).analyze("zzzz qqqq").await.unwrap_err();

    assert_eq!(err.code(), "place_not_found");
}

#[tokio::test]
async fn search_server_error_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("engine", "google_maps"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = pipeline(&server).analyze("Blue Tokai").await.unwrap_err();

    assert!(matches!(err, AnalysisError::UpstreamUnavailable(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn one_failing_sort_order_still_yields_reviews() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJpartial", "Partial Cafe").await;
    mount_reviews(&server, "newestFirst", &["Great coffee"]).await;
    mount_reviews_status(&server, "ratingLow", 500).await;
    mount_reviews(&server, "ratingHigh", &["Delicious cake", "Great coffee"]).await;

    let record = pipeline(&server)
        .analyze("Partial Cafe")
        .await
        .expect("partial coverage should not fail the analysis")
        .into_record();

    assert_eq!(record.summary.total_count, 2);
    assert_eq!(reviews_calls(&server).await, 3);
}

#[tokio::test]
async fn all_sort_orders_failing_is_stored_as_no_reviews() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJdown", "Down Cafe").await;
    for sort in ["newestFirst", "ratingLow", "ratingHigh"] {
        mount_reviews_status(&server, sort, 503).await;
    }

    let pipeline = pipeline(&server);
    let record = pipeline
        .analyze("Down Cafe")
        .await
        .expect("review failures should not fail the analysis")
        .into_record();

    assert_eq!(record.summary.total_count, 0);
    assert_eq!(record.summary.overall_label, OverallLabel::NoReviews);
    assert_eq!(reviews_calls(&server).await, 3);
    assert_eq!(pipeline.store().len(), 1);
}

#[tokio::test]
async fn in_body_review_errors_on_every_sort_order_are_stored_as_no_reviews() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJquiet", "Quiet Corner").await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps_reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Google hasn't returned any results for this query."
        })))
        .expect(3)
        .mount(&server)
        .await;

    let pipeline = pipeline(&server);
    let outcome = pipeline
        .analyze("Quiet Corner")
        .await
        .expect("in-body review errors should not fail the analysis");

    assert!(!outcome.is_cached());
    assert_eq!(outcome.record().place_id, "ChIJquiet");
    assert_eq!(outcome.record().summary.overall_label, OverallLabel::NoReviews);
    assert!(outcome.record().reviews.is_empty());
    assert_eq!(pipeline.store().len(), 1);
}

#[tokio::test]
async fn timed_out_sort_order_contributes_nothing() {
    let server = MockServer::start().await;
    mount_place(&server, "ChIJslow", "Slow Cafe").await;
    mount_reviews(&server, "newestFirst", &["Great coffee"]).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_maps_reviews"))
        .and(query_param("sort_by", "ratingLow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "reviews": [ { "snippet": "Never arrives" } ] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_reviews(&server, "ratingHigh", &["Delicious cake"]).await;

    let client = SerpClient::with_base_url("test-key", 1, &format!("{}/search.json", server.uri()))
        .expect("client construction should not fail");
    let pipeline = AnalysisPipeline::new(client, MemoryAnalysisStore::new());
    let record = pipeline
        .analyze("Slow Cafe")
        .await
        .expect("a timed-out call should not fail the analysis")
        .into_record();

    let texts: Vec<&str> = record.reviews.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Great coffee", "Delicious cake"]);
    assert_eq!(record.summary.total_count, 2);
}

#[tokio::test]
async fn sort_orders_are_fetched_concurrently() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(800);
    for sort in ["newestFirst", "ratingLow", "ratingHigh"] {
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google_maps_reviews"))
            .and(query_param("sort_by", sort))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "reviews": [ { "snippet": sort } ] }))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
    }

    let client = test_client(&server);
    let started = Instant::now();
    let reviews = fetch_reviews_all_orders(&client, "ChIJparallel").await;
    let elapsed = started.elapsed();

    assert_eq!(reviews.len(), 3);
    assert!(
        elapsed < delay * 2,
        "three delayed calls took {elapsed:?}; expected close to one delay of {delay:?}"
    );
}
