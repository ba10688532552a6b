//! Core traits for the caching system.

use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

/// Trait for values that can be kept in the local cache.
///
/// Collection payloads report emptiness so that an empty cached collection
/// does not count as usable data. Everything else keeps the default and is
/// usable as soon as it is present, whatever its field values.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Whether this value is a collection with no elements.
  fn is_empty_collection(&self) -> bool {
    false
  }
}

impl<T> Cacheable for Vec<T>
where
  T: Clone + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl<T> Cacheable for VecDeque<T>
where
  T: Clone + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl<T> Cacheable for HashSet<T>
where
  T: Clone + Eq + Hash + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl<T> Cacheable for BTreeSet<T>
where
  T: Clone + Ord + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl<K, V> Cacheable for HashMap<K, V>
where
  K: Clone + Eq + Hash + Send + Sync + Serialize + DeserializeOwned,
  V: Clone + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl<K, V> Cacheable for BTreeMap<K, V>
where
  K: Clone + Ord + Send + Sync + Serialize + DeserializeOwned,
  V: Clone + Send + Sync + Serialize + DeserializeOwned,
{
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

impl Cacheable for String {
  fn is_empty_collection(&self) -> bool {
    self.is_empty()
  }
}

macro_rules! scalar_cacheable {
  ($($ty:ty),*) => {
    $(impl Cacheable for $ty {})*
  };
}

scalar_cacheable!(
  bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Key/value store holding one serialized value per string key.
///
/// Backends only deal in raw bytes; the typed `save`/`fetch` helpers encode
/// values as JSON on top of them.
pub trait CacheService: Send + Sync {
  /// Store raw bytes under `key`, replacing any previous value.
  fn save_data(&self, key: &str, data: Vec<u8>) -> Result<()>;

  /// Get the raw bytes stored under `key`.
  fn fetch_data(&self, key: &str) -> Result<Option<Vec<u8>>>;

  /// Remove the value stored under `key`. Missing keys are not an error.
  fn remove(&self, key: &str) -> Result<()>;

  /// Remove every stored value.
  fn clear(&self) -> Result<()>;

  /// Serialize `value` and store it under `key`.
  fn save<T: Serialize>(&self, value: &T, key: &str) -> Result<()>
  where
    Self: Sized,
  {
    let data = serde_json::to_vec(value)
      .map_err(|e| eyre!("Failed to serialize value for key '{}': {}", key, e))?;
    self.save_data(key, data)
  }

  /// Fetch and deserialize the value stored under `key`.
  fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
  where
    Self: Sized,
  {
    match self.fetch_data(key)? {
      Some(data) => serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| eyre!("Failed to deserialize value for key '{}': {}", key, e)),
      None => Ok(None),
    }
  }
}

impl<C: CacheService + ?Sized> CacheService for Arc<C> {
  fn save_data(&self, key: &str, data: Vec<u8>) -> Result<()> {
    (**self).save_data(key, data)
  }

  fn fetch_data(&self, key: &str) -> Result<Option<Vec<u8>>> {
    (**self).fetch_data(key)
  }

  fn remove(&self, key: &str) -> Result<()> {
    (**self).remove(key)
  }

  fn clear(&self) -> Result<()> {
    (**self).clear()
  }
}
