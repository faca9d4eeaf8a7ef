//! Key-value persistence for cart state.
//!
//! The cart is written through a small string-keyed store, the same shape as
//! browser local storage: one JSON document per key, read once at startup and
//! replaced wholesale after every change.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used in tests and ephemeral runs
//! - [`FileStore`] - one `<key>.json` file per key under a directory
//!
//! Both enforce an optional byte quota on stored values. A write over quota
//! fails with [`StorageError::QuotaExceeded`] and leaves the previous value
//! in place.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default per-value quota, matching the usual browser local storage limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value is larger than the store allows.
    #[error("quota exceeded for {key}: {size} bytes (limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// Filesystem operation failed.
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Value could not be encoded or decoded as JSON.
    #[error("serialization error for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backing store cannot be used any more.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed storage for serialized values.
///
/// Implementations must be safe to share between request handlers.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Succeeds if it was absent.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON view over a shared [`KeyValueStore`].
///
/// Cheap to clone; all clones write to the same backend.
#[derive(Clone)]
pub struct CartStorage {
    store: Arc<dyn KeyValueStore>,
}

impl CartStorage {
    /// Wrap a backend.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// In-memory storage with the default quota.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Load `key`, falling back to `default` when absent or unreadable.
    ///
    /// Read and decode failures are reported, never returned: a corrupt or
    /// unavailable store behaves like an empty one.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                crate::error::report_storage_failure(&err, key);
                default
            }
        }
    }

    /// Load `key`, surfacing errors.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the stored JSON does
    /// not decode as `T`.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            })
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding fails or the backend rejects the
    /// write (quota, I/O).
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    /// Delete whatever is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key)
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage").finish_non_exhaustive()
    }
}

// =============================================================================
// Memory backend
// =============================================================================

/// Process-local store backed by a `HashMap`.
#[derive(Debug)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: usize,
}

impl MemoryStore {
    /// Empty store with a custom quota in bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        check_quota(key, value, self.quota)?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Directory-backed store: each key maps to `<dir>/<key>.json`.
///
/// The directory is created on first write. Writes land in a temporary file
/// that is renamed over the target, so a crash mid-write never leaves a
/// truncated document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: usize,
}

impl FileStore {
    /// Store rooted at `dir` with the default quota.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_quota(dir, DEFAULT_QUOTA_BYTES)
    }

    /// Store rooted at `dir` with a custom quota in bytes.
    pub fn with_quota(dir: impl Into<PathBuf>, quota: usize) -> Self {
        Self {
            dir: dir.into(),
            quota,
        }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        check_quota(key, value, self.quota)?;

        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::trace!(key, bytes = value.len(), path = %path.display(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Keys double as file names, so they are restricted to a safe alphabet.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn check_quota(key: &str, value: &str, limit: usize) -> Result<(), StorageError> {
    if value.len() > limit {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("shopcart-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("shopping-cart").is_ok());
        assert!(validate_key("cart_2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::default();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "[1]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_quota_keeps_previous_value() {
        let store = MemoryStore::with_quota(4);
        store.set("k", "[1]").unwrap();

        let err = store.set("k", "[1,2,3]").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { size: 7, limit: 4, .. }
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir();
        let store = FileStore::new(&dir);
        assert_eq!(store.get("shopping-cart").unwrap(), None);

        store.set("shopping-cart", "[]").unwrap();
        assert_eq!(store.get("shopping-cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("shopping-cart.json").exists());

        store.remove("shopping-cart").unwrap();
        assert_eq!(store.get("shopping-cart").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let store = FileStore::new(temp_dir());
        assert!(matches!(
            store.set("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_cart_storage_load_falls_back_on_corrupt_json() {
        let storage = CartStorage::in_memory();
        storage.store.set("shopping-cart", "{not json").unwrap();

        let loaded: Vec<u32> = storage.load("shopping-cart", vec![9]);
        assert_eq!(loaded, vec![9]);
        assert!(matches!(
            storage.try_load::<Vec<u32>>("shopping-cart"),
            Err(StorageError::Serialization { .. })
        ));
    }

    #[test]
    fn test_cart_storage_save_then_load() {
        let storage = CartStorage::in_memory();
        storage.save("numbers", &[1, 2, 3]).unwrap();

        let loaded: Vec<u32> = storage.load("numbers", Vec::new());
        assert_eq!(loaded, vec![1, 2, 3]);

        storage.clear("numbers").unwrap();
        let loaded: Vec<u32> = storage.load("numbers", Vec::new());
        assert!(loaded.is_empty());
    }
}
