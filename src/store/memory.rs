use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{DEFAULT_MAX_BYTES, KeyValueStore, entry_size};
use crate::{Result, SkyfeedError};

/// In-memory store bounded by total key + value bytes.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    max_bytes: usize,
}

impl MemoryStore {
    /// Create an empty store with the default 5 MiB quota.
    pub fn new() -> Self {
        Self::with_max_bytes(DEFAULT_MAX_BYTES)
    }

    /// Create an empty store with a custom quota.
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Bytes currently used.
    pub fn used_bytes(&self) -> usize {
        self.lock().iter().map(|(k, v)| entry_size(k, v)).sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        let used: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| entry_size(k, v))
            .sum();
        if used + entry_size(key, value) > self.max_bytes {
            return Err(SkyfeedError::Storage(format!(
                "quota exceeded: {} bytes would exceed limit of {}",
                used + entry_size(key, value),
                self.max_bytes
            )));
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
