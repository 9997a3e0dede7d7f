//! TTL cache over a durable key-value store.
//!
//! - [`CacheStore`]: wraps a [`KeyValueStore`] with time-to-live
//!   semantics. Entries are JSON `{data, storedAt, ttl}` documents under a
//!   fixed key prefix. Stale, corrupt, and absent entries all read as a
//!   miss, and failed writes are dropped: caching is an optimisation, never
//!   a correctness requirement.
//!
//! - [`cached`]: the cache-aside orchestrator. Serves a fresh entry or
//!   runs the fetch, stores its result, and returns it. Fetch failures are
//!   propagated; stale data is never substituted.
//!
//! - [`FeedKey`]: deterministic cache key built from a feed name and its
//!   disambiguating parameters.

mod aside;
mod key;

pub use aside::cached;
pub use key::FeedKey;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::store::KeyValueStore;
use crate::telemetry;

/// Prefix applied to every cache key in the durable store.
pub const KEY_PREFIX: &str = "skyfeed_cache:";

/// A cached payload with its storage time and time-to-live.
///
/// Serialized as `{"data": ..., "storedAt": <epoch ms>, "ttl": <ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub data: T,
    /// Milliseconds since the Unix epoch.
    pub stored_at: i64,
    /// Time-to-live in milliseconds. Always > 0.
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    /// An entry is fresh iff `now - storedAt < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now.timestamp_millis().saturating_sub(self.stored_at);
        i128::from(age) < i128::from(self.ttl)
    }
}

/// TTL cache backed by a [`KeyValueStore`].
pub struct CacheStore {
    backend: Option<Arc<dyn KeyValueStore>>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Cache persisting through `backend`, timed by `clock`.
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: Some(backend),
            clock,
        }
    }

    /// A cache that never stores anything: every lookup misses.
    pub fn disabled(clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: None,
            clock,
        }
    }

    /// Whether this cache has a backing store.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Current time according to the cache's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Look up a fresh entry.
    ///
    /// Returns `None` when the entry is absent, stale, unreadable, or does
    /// not deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &FeedKey) -> Option<T> {
        let backend = self.backend.as_ref()?;
        let storage_key = storage_key(key);

        let raw = match backend.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key = %key, error = %e, "discarding corrupt cache entry");
                return None;
            }
        };

        if entry.is_fresh(self.clock.now()) {
            Some(entry.data)
        } else {
            debug!(key = %key, "cache entry stale");
            None
        }
    }

    /// Store `data` under `key` for `ttl`.
    ///
    /// Never fails: serialization or storage errors are logged and the
    /// write is dropped. A zero `ttl` is dropped as well.
    pub fn set<T: Serialize>(&self, key: &FeedKey, data: &T, ttl: Duration) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        if ttl_ms == 0 {
            debug!(key = %key, "ignoring cache write with zero ttl");
            return;
        }

        let entry = CacheEntry {
            data,
            stored_at: self.clock.now().timestamp_millis(),
            ttl: ttl_ms,
        };
        let result = serde_json::to_string(&entry)
            .map_err(crate::SkyfeedError::from)
            .and_then(|json| backend.set(&storage_key(key), &json));

        if let Err(e) = result {
            metrics::counter!(telemetry::CACHE_WRITE_FAILURES_TOTAL).increment(1);
            warn!(key = %key, error = %e, "dropping cache write");
        }
    }

    /// Remove the entry under `key`, forcing the next lookup to miss.
    pub fn invalidate(&self, key: &FeedKey) {
        if let Some(backend) = self.backend.as_ref()
            && let Err(e) = backend.remove(&storage_key(key))
        {
            warn!(key = %key, error = %e, "cache invalidation failed");
        }
    }
}

fn storage_key(key: &FeedKey) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn setup() -> (CacheStore, ManualClock, Arc<MemoryStore>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap());
        let store = Arc::new(MemoryStore::new());
        let cache = CacheStore::new(store.clone(), Arc::new(clock.clone()));
        (cache, clock, store)
    }

    #[test]
    fn get_after_set_returns_value_until_ttl() {
        let (cache, clock, _) = setup();
        let key = FeedKey::new("apod");
        cache.set(&key, &vec![1, 2, 3], Duration::from_secs(60));

        clock.advance(chrono::Duration::seconds(59));
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));

        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(cache.get::<Vec<i32>>(&key), None);
    }

    #[test]
    fn entries_are_namespaced() {
        let (cache, _, store) = setup();
        cache.set(&FeedKey::new("apod"), &"x", Duration::from_secs(60));
        assert!(store.get("skyfeed_cache:apod").unwrap().is_some());
        assert!(store.get("apod").unwrap().is_none());
    }

    #[test]
    fn corrupt_entry_reads_as_miss() {
        let (cache, _, store) = setup();
        store.set("skyfeed_cache:apod", "{not json").unwrap();
        assert_eq!(cache.get::<String>(&FeedKey::new("apod")), None);
    }

    #[test]
    fn wrong_shape_reads_as_miss() {
        let (cache, _, _) = setup();
        let key = FeedKey::new("apod");
        cache.set(&key, &"a string", Duration::from_secs(60));
        assert_eq!(cache.get::<Vec<u8>>(&key), None);
    }

    #[test]
    fn failed_write_is_dropped_silently() {
        let clock = ManualClock::new(Utc::now());
        let cache = CacheStore::new(Arc::new(MemoryStore::with_max_bytes(8)), Arc::new(clock));
        let key = FeedKey::new("apod");
        cache.set(&key, &"far too large for the quota", Duration::from_secs(60));
        assert_eq!(cache.get::<String>(&key), None);
    }

    #[test]
    fn zero_ttl_is_not_stored() {
        let (cache, _, store) = setup();
        cache.set(&FeedKey::new("apod"), &1, Duration::ZERO);
        assert!(store.is_empty());
    }

    #[test]
    fn disabled_cache_always_misses() {
        let cache = CacheStore::disabled(Arc::new(ManualClock::new(Utc::now())));
        let key = FeedKey::new("apod");
        cache.set(&key, &1, Duration::from_secs(60));
        assert_eq!(cache.get::<i32>(&key), None);
        assert!(!cache.is_enabled());
    }

    #[test]
    fn invalidate_forces_miss() {
        let (cache, _, _) = setup();
        let key = FeedKey::new("apod");
        cache.set(&key, &1, Duration::from_secs(60));
        cache.invalidate(&key);
        assert_eq!(cache.get::<i32>(&key), None);
    }

    #[test]
    fn entry_wire_format_is_camel_case() {
        let entry = CacheEntry {
            data: 5,
            stored_at: 1000,
            ttl: 60_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": 5, "storedAt": 1000, "ttl": 60000})
        );
    }
}
