//! Typed local repository over a cache service.

use std::marker::PhantomData;

use super::traits::{CacheService, Cacheable};

/// Local source for a single kind of data.
///
/// Reads and writes are synchronous and never fail: a local cache is an
/// optimization, so a broken one behaves like an empty one.
pub trait LocalStore: Send + Sync {
  type Data: Cacheable;

  /// Persist `data`, discarding any storage error.
  fn save(&self, data: &Self::Data);

  /// Last saved value, or `None` when missing or unreadable.
  fn fetch(&self) -> Option<Self::Data>;
}

/// Stores one value of type `T` under a fixed cache key.
pub struct LocalDataRepository<T, C> {
  key: String,
  cache: C,
  _data: PhantomData<fn() -> T>,
}

impl<T, C> LocalDataRepository<T, C> {
  pub fn new(key: impl Into<String>, cache: C) -> Self {
    Self {
      key: key.into(),
      cache,
      _data: PhantomData,
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }
}

impl<T, C> LocalStore for LocalDataRepository<T, C>
where
  T: Cacheable,
  C: CacheService,
{
  type Data = T;

  fn save(&self, data: &T) {
    let _ = self.cache.save(data, &self.key);
  }

  fn fetch(&self) -> Option<T> {
    self.cache.fetch(&self.key).ok().flatten()
  }
}
