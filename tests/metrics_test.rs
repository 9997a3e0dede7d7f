//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::future::Future;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skyfeed::{FeedAggregator, KeyValueStore, ManualClock, MemoryStore, Skyfeed, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Whether a counter with `name` carries label `label=value`.
fn has_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> bool {
    snapshot.iter().any(|(key, _, _, _)| {
        key.key().name() == name
            && key
                .key()
                .labels()
                .any(|l| l.key() == label && l.value() == value)
    })
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
fn record<F: Future>(fut: F) -> (F::Output, SnapshotVec) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let output = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    });
    (output, snapshotter.snapshot().into_vec())
}

async fn aggregator(server: &MockServer, store: Arc<dyn KeyValueStore>) -> FeedAggregator {
    Skyfeed::builder()
        .api_key("test_key")
        .base_url(server.uri())
        .store(store)
        .clock(Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
        )))
        .build()
        .unwrap()
}

fn apod_body() -> serde_json::Value {
    json!({
        "date": "2026-10-17",
        "title": "Orion in Red and Blue",
        "explanation": "Nebulae.",
        "url": "https://apod.nasa.gov/apod/image/orion.jpg",
        "media_type": "image"
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn miss_then_hit_records_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apod_body()))
        .mount(&server)
        .await;
    let feeds = aggregator(&server, Arc::new(MemoryStore::new())).await;

    let (results, snapshot) = record(async {
        let first = feeds.apod().await;
        let second = feeds.apod().await;
        (first, second)
    });
    assert!(results.0.is_ok() && results.1.is_ok());

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert!(has_label(&snapshot, telemetry::REQUESTS_TOTAL, "feed", "apod"));
    assert!(has_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok"));
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn quota_failure_records_rate_limit_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    let feeds = aggregator(&server, Arc::new(MemoryStore::new())).await;

    let (result, snapshot) = record(feeds.apod());
    assert!(result.unwrap_err().is_rate_limited());

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert!(has_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"));
    assert_eq!(counter_total(&snapshot, telemetry::RATE_LIMITED_TOTAL), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn refused_cache_write_is_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apod_body()))
        .mount(&server)
        .await;
    let feeds = aggregator(&server, Arc::new(MemoryStore::with_max_bytes(32))).await;

    let (result, snapshot) = record(feeds.apod());
    assert!(result.is_ok(), "a full store must not fail the accessor");
    assert_eq!(
        counter_total(&snapshot, telemetry::CACHE_WRITE_FAILURES_TOTAL),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let server = MockServer::start().await;
    let feeds = aggregator(&server, Arc::new(MemoryStore::new())).await;
    let _crew = feeds.crew().await;
}
