//! Durable key-value storage.
//!
//! The cache and the observer-location record both persist through a
//! [`KeyValueStore`]: a string-keyed, string-valued store with bounded
//! capacity. Implementations may fail (quota exceeded, unreadable
//! backing file); callers above this layer decide whether a failure
//! matters. The cache never lets one escape.
//!
//! - [`MemoryStore`]: process-local, byte-bounded. Used in tests and
//!   whenever persistence is not wanted.
//! - [`FileStore`]: a single JSON document on disk, written atomically.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

/// Default capacity for bounded stores (5 MiB).
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Best-effort persistent string store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (or overwrite) a value.
    ///
    /// Returns [`SkyfeedError::Storage`](crate::SkyfeedError::Storage) when
    /// the write would exceed the store's capacity; the previous value (if
    /// any) is left untouched in that case.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Bytes a single entry occupies for quota accounting.
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
