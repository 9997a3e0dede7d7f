use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use super::{DEFAULT_MAX_BYTES, KeyValueStore, entry_size};
use crate::{Result, SkyfeedError};

/// Store persisted as one JSON object on disk.
///
/// The file is read lazily on first access and rewritten in full on every
/// mutation (tmp file + rename). A missing or unreadable file is treated as
/// an empty store; the next successful write replaces it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    max_bytes: usize,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open (lazily) the store at `path` with the default 5 MiB quota.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_max_bytes(path, DEFAULT_MAX_BYTES)
    }

    /// Open (lazily) the store at `path` with a custom quota.
    pub fn with_max_bytes(path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            entries: Mutex::new(None),
        }
    }

    /// Default location: `~/.cache/skyfeed/store.json`.
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("skyfeed")
            .join("store.json")
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Option<BTreeMap<String, String>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the loaded map, loading it from disk first if needed.
    fn with_entries<R>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> R) -> R {
        let mut guard = self.lock();
        let entries = guard.get_or_insert_with(|| load_entries(&self.path));
        f(entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.with_entries(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path.clone();
        let max_bytes = self.max_bytes;
        self.with_entries(|entries| {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = used + entry_size(key, value);
            if needed > max_bytes {
                return Err(SkyfeedError::Storage(format!(
                    "quota exceeded: {needed} bytes would exceed limit of {max_bytes}"
                )));
            }

            let previous = entries.insert(key.to_string(), value.to_string());
            if let Err(e) = save_entries(&path, entries) {
                // Keep memory consistent with what is on disk.
                match previous {
                    Some(old) => entries.insert(key.to_string(), old),
                    None => entries.remove(key),
                };
                return Err(e);
            }
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path.clone();
        self.with_entries(|entries| {
            if entries.remove(key).is_some() {
                save_entries(&path, entries)?;
            }
            Ok(())
        })
    }
}

/// Load the store document. Missing or corrupt files yield an empty map.
fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read store file");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt store file, starting empty");
            BTreeMap::new()
        }
    }
}

/// Write the store document (atomic write via tmp + rename).
fn save_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SkyfeedError::Storage(format!(
                "failed to create store dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string(entries)?;
    std::fs::write(&tmp_path, &json).map_err(|e| {
        SkyfeedError::Storage(format!(
            "failed to write store file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        SkyfeedError::Storage(format!(
            "failed to rename store file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}
