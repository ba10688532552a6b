//! Local persistence for fetched data.
//!
//! This module provides the local half of the fetch-with-fallback layer:
//! - `CacheService` stores one opaque JSON value per string key
//! - `LocalDataRepository` is a typed, soft-failing view of a single key
//! - SQLite storage for on-disk persistence, plus in-memory and no-op variants

mod local;
mod storage;
mod traits;

pub use local::{LocalDataRepository, LocalStore};
pub use storage::{CacheEntry, MemoryCacheService, NoopCacheService, SqliteCacheService};
pub use traits::{CacheService, Cacheable};
