//! Key-value persistence for planner state.
//!
//! `PersistentStore` loads a typed value by key, falling back to a default
//! when the key is missing or the stored text does not parse, and writes the
//! value back as JSON. Persistence is best-effort: `save` returns a `Result`
//! so callers can log a failure, but nothing in the planner depends on a
//! save having succeeded.

#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A string key-value substrate.
pub trait Storage {
    /// Read the raw value for `key`, or `None` when it has never been written.
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove_item(&mut self, key: &str) -> io::Result<()>;
}

/// Storage backed by a directory, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open a storage directory, creating it if needed.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    /// File that holds the value for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Atomic write: temp file in the same directory, then rename over the target.
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key);
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process storage with an optional byte quota.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes once the stored bytes would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self { items: HashMap::new(), quota: Some(bytes) }
    }

    fn used_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("storage quota exceeded ({needed} > {limit} bytes)"),
                ));
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> io::Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Typed load/save over a `Storage` substrate.
#[derive(Debug)]
pub struct PersistentStore<S: Storage> {
    storage: S,
}

impl<S: Storage> PersistentStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the value stored under `key`.
    ///
    /// Never fails: a missing key, a read error or text that does not
    /// deserialize into `T` all yield `default`.
    #[tracing::instrument(skip(self, default))]
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no stored value, using default");
                return default;
            }
            Err(e) => {
                warn!(key, error = %e, "error reading storage, starting fresh");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "error parsing stored value, starting fresh");
                default
            }
        }
    }

    /// Serialize `value` and write it under `key`.
    ///
    /// Callers treat failures as best-effort: log and carry on.
    #[tracing::instrument(skip(self, value))]
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to serialize {key}"))?;
        self.storage
            .set_item(key, &data)
            .map_err(|e| anyhow!("failed to write {key}: {e}"))?;
        debug!(key, bytes = data.len(), "saved");
        Ok(())
    }

    pub fn clear(&mut self, key: &str) -> anyhow::Result<()> {
        self.storage
            .remove_item(key)
            .with_context(|| format!("failed to remove {key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_key_returns_default() {
        let store = PersistentStore::new(MemoryStorage::new());
        let v: Vec<u32> = store.load("nothing", vec![7]);
        assert_eq!(v, vec![7]);
    }

    #[test]
    fn test_load_corrupt_value_returns_default() {
        let mut storage = MemoryStorage::new();
        storage.set_item("k", "{not json").unwrap();
        let store = PersistentStore::new(storage);
        let v: Vec<u32> = store.load("k", Vec::new());
        assert!(v.is_empty());
    }

    #[test]
    fn test_quota_failure_is_reported_not_panicked() {
        let mut store = PersistentStore::new(MemoryStorage::with_quota(8));
        let big = vec!["a fairly long string"; 4];
        assert!(store.save("k", &big).is_err());
        let v: Vec<String> = store.load("k", Vec::new());
        assert!(v.is_empty());
    }

    #[test]
    fn test_file_storage_round_trip_across_instances() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = PersistentStore::new(FileStorage::open(dir.path()).unwrap());
            store.save("numbers", &vec![1, 2, 3]).unwrap();
        }
        let store = PersistentStore::new(FileStorage::open(dir.path()).unwrap());
        let v: Vec<i32> = store.load("numbers", Vec::new());
        assert_eq!(v, vec![1, 2, 3]);
        assert!(dir.path().join("numbers.json").exists());
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item("k", "1").unwrap();
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
