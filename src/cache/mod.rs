//! Cache module for storing API responses locally
//!
//! This module provides a cache manager that persists API responses through a
//! small key-value store with a fixed 10 minute TTL. Every cache operation is
//! best-effort: failures are logged and degrade to a miss or a dropped write,
//! so the cache never causes a fetch to fail.

mod manager;
mod store;

pub use manager::{CacheManager, CACHE_TTL_MILLIS};
pub use store::{FileStore, KvStore, MemoryStore};
