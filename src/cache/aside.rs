use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{CacheStore, FeedKey};
use crate::Result;
use crate::telemetry;

/// Cache-aside lookup.
///
/// 1. A fresh entry under `key` is returned without calling `fetch`.
/// 2. Otherwise `fetch` runs once; on success its result is stored for
///    `ttl` and returned.
/// 3. On failure the error is returned as-is. A stale entry is never
///    served in place of a failed fetch.
///
/// Concurrent calls for the same uncached key are not coalesced: each runs
/// its own fetch and the last write wins.
pub async fn cached<T, F, Fut>(
    cache: &CacheStore,
    feed: &str,
    key: &FeedKey,
    ttl: Duration,
    fetch: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let Some(hit) = cache.get::<T>(key) {
        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "feed" => feed.to_owned()).increment(1);
        debug!(feed, key = %key, "cache hit");
        return Ok(hit);
    }

    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "feed" => feed.to_owned()).increment(1);
    debug!(feed, key = %key, "cache miss, fetching");

    let fresh = fetch().await?;
    cache.set(key, &fresh, ttl);
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::SkyfeedError;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    fn setup() -> (CacheStore, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap());
        let cache = CacheStore::new(Arc::new(MemoryStore::new()), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[tokio::test]
    async fn ten_minute_ttl_refetches_only_after_expiry() {
        let (cache, clock) = setup();
        let key = FeedKey::new("apod");
        let ttl = Duration::from_secs(600);
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, SkyfeedError>("payload".to_string())
        };

        cached(&cache, "apod", &key, ttl, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(chrono::Duration::minutes(9));
        cached(&cache, "apod", &key, ttl, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(chrono::Duration::minutes(2));
        cached(&cache, "apod", &key, ttl, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_propagates_and_is_not_cached() {
        let (cache, _) = setup();
        let key = FeedKey::new("neo");

        let result: Result<String> = cached(&cache, "neo", &key, Duration::from_secs(60), || async {
            Err(SkyfeedError::Transport("connection reset".into()))
        })
        .await;
        assert!(matches!(result, Err(SkyfeedError::Transport(_))));
        assert_eq!(cache.get::<String>(&key), None);
    }

    #[tokio::test]
    async fn stale_entry_is_not_served_when_fetch_fails() {
        let (cache, clock) = setup();
        let key = FeedKey::new("neo");
        let ttl = Duration::from_secs(60);

        cached(&cache, "neo", &key, ttl, || async { Ok("old".to_string()) })
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(5));

        let result: Result<String> = cached(&cache, "neo", &key, ttl, || async {
            Err(SkyfeedError::RateLimited {
                status: 429,
                code: None,
                retry_after: None,
            })
        })
        .await;
        assert!(result.unwrap_err().is_rate_limited());
    }
}
