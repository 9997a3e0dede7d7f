//! Telemetry metric name constants.
//!
//! Centralised metric names for skyfeed operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skyfeed_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `feed`: feed name (e.g. "apod", "neo", "donki_flr")
//! - `status`: outcome: "ok" or "error"

/// Total upstream HTTP requests issued by the feed gateway.
///
/// Labels: `feed`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "skyfeed_requests_total";

/// Upstream request duration in seconds.
///
/// Labels: `feed`.
pub const REQUEST_DURATION_SECONDS: &str = "skyfeed_request_duration_seconds";

/// Total fresh cache hits served without a fetch.
///
/// Labels: `feed`.
pub const CACHE_HITS_TOTAL: &str = "skyfeed_cache_hits_total";

/// Total cache misses (absent, stale, or corrupt entries).
///
/// Labels: `feed`.
pub const CACHE_MISSES_TOTAL: &str = "skyfeed_cache_misses_total";

/// Cache writes dropped because the durable store refused them.
pub const CACHE_WRITE_FAILURES_TOTAL: &str = "skyfeed_cache_write_failures_total";

/// Quota failures observed by the rate-limit detector.
///
/// Labels: `feed`.
pub const RATE_LIMITED_TOTAL: &str = "skyfeed_rate_limited_total";
