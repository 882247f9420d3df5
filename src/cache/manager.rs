//! Cache manager for persisting API responses
//!
//! Provides a `CacheManager` that wraps values with a write timestamp, stores
//! them through a `KvStore`, and hides them again once they are older than
//! the TTL.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{FileStore, KvStore};

/// Time-to-live for every cache entry, in milliseconds (10 minutes)
pub const CACHE_TTL_MILLIS: i64 = 600_000;

/// Failures inside the cache boundary. Logged, never returned to callers.
#[derive(Debug, Error)]
enum CacheError {
    #[error("storage access failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("entry could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Wrapper struct for cached data as stored in the backend
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached, in epoch milliseconds
    timestamp: i64,
}

impl<T> CacheEntry<T> {
    /// Entries stay fresh up to and including the TTL boundary. An age that
    /// does not fit in an i64 counts as expired.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match now.timestamp_millis().checked_sub(self.timestamp) {
            Some(age) => age > CACHE_TTL_MILLIS,
            None => true,
        }
    }
}

/// Manages reading and writing cached data
///
/// All methods are infallible from the caller's point of view. The cache is
/// an accelerator only: a broken store degrades to "always fetch".
#[derive(Debug, Clone)]
pub struct CacheManager<S = FileStore> {
    store: S,
}

impl CacheManager<FileStore> {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Uses `~/.cache/tmplfind/` on Linux, or equivalent XDG path on other platforms.
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "tmplfind")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self::with_store(FileStore::new(cache_dir))
    }
}

impl<S: KvStore> CacheManager<S> {
    /// Creates a CacheManager on top of any key-value backend
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes `data` under `key`, stamped with the current time
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_at(key, data, Utc::now());
    }

    /// Writes `data` under `key`, stamped with `now`
    pub fn set_at<T: Serialize>(&self, key: &str, data: &T, now: DateTime<Utc>) {
        if let Err(e) = self.try_set(key, data, now) {
            warn!(key, error = %e, "Error saving to cache");
        }
    }

    /// Reads the value under `key` if present and not expired
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Reads the value under `key` as seen at time `now`
    ///
    /// An expired entry is deleted before `None` is returned. An entry that
    /// cannot be decoded is logged, deleted, and also reported as `None`.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                let error = CacheError::from(e);
                warn!(key, %error, "Error reading from cache");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                let error = CacheError::from(e);
                warn!(key, %error, "Dropping corrupt cache entry");
                self.remove(key);
                return None;
            }
        };

        if entry.is_expired(now) {
            debug!(key, "cache entry expired");
            self.remove(key);
            return None;
        }

        debug!(key, "cache hit");
        Some(entry.data)
    }

    /// Deletes the entry under `key`, if any
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "Error removing from cache");
        }
    }

    /// Deletes every entry in this cache's namespace
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Error clearing cache");
        }
    }

    fn try_set<T: Serialize>(&self, key: &str, data: &T, now: DateTime<Utc>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data,
            timestamp: now.timestamp_millis(),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(key, &json)?;
        Ok(())
    }
}
