//! Tests for durable storage and the cache built on it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use skyfeed::{CacheStore, FeedKey, FileStore, KeyValueStore, ManualClock, SkyfeedError};

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = FileStore::new(&path);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.remove("a").unwrap();
    assert!(path.exists());

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("a").unwrap(), None);
    assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ truncated").unwrap();

    let store = FileStore::new(&path);
    assert_eq!(store.get("anything").unwrap(), None);

    store.set("k", "v").unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, serde_json::json!({"k": "v"}));
}

#[test]
fn file_store_quota_keeps_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::with_max_bytes(dir.path().join("store.json"), 16);

    store.set("key", "small").unwrap();
    let err = store.set("key", "this value is far too large").unwrap_err();
    assert!(matches!(err, SkyfeedError::Storage(_)));
    assert_eq!(store.get("key").unwrap().as_deref(), Some("small"));

    // The on-disk copy agrees.
    let reopened = FileStore::new(store.path());
    assert_eq!(reopened.get("key").unwrap().as_deref(), Some("small"));
}

#[test]
fn cache_entries_persist_across_process_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap());
    let key = FeedKey::new("crew");

    {
        let cache = CacheStore::new(Arc::new(FileStore::new(&path)), Arc::new(clock.clone()));
        cache.set(&key, &vec!["Kononenko", "Chub"], Duration::from_secs(7200));
    }

    clock.advance(chrono::Duration::hours(1));
    let cache = CacheStore::new(Arc::new(FileStore::new(&path)), Arc::new(clock.clone()));
    assert_eq!(
        cache.get::<Vec<String>>(&key),
        Some(vec!["Kononenko".to_string(), "Chub".to_string()])
    );

    clock.advance(chrono::Duration::hours(1));
    assert_eq!(cache.get::<Vec<String>>(&key), None);
}

#[test]
fn stored_entry_uses_documented_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().join("store.json")));
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap());
    let cache = CacheStore::new(store.clone(), Arc::new(clock));

    let key = FeedKey::new("neo").with_date(chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    cache.set(&key, &42, Duration::from_secs(1800));

    let raw = store.get("skyfeed_cache:neo:2026-10-17").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"data": 42, "storedAt": 1_792_238_400_000_i64, "ttl": 1_800_000})
    );
}
