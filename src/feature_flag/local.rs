//! Locally stored feature flags, used for QA overrides.

use color_eyre::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::CacheService;

const KEY_PREFIX: &str = "featureFlag.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureFlagKey {
  /// Holds a [`RemoteFlagOverride`]
  ToggleRemoteFlag,
}

impl FeatureFlagKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ToggleRemoteFlag => "toggleRemoteFlag",
    }
  }
}

/// Overrides every remote feature flag at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFlagOverride {
  #[default]
  UseApiValue,
  ForceDisable,
  ForceEnable,
}

/// Typed get/set of local flags over a cache service.
#[derive(Clone)]
pub struct FeatureFlagsUseCase {
  cache: Arc<dyn CacheService>,
}

impl FeatureFlagsUseCase {
  pub fn new(cache: Arc<dyn CacheService>) -> Self {
    Self { cache }
  }

  /// Value stored for `key`, or `None` when missing or unreadable.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    self.cache.fetch(&storage_key(key)).ok().flatten()
  }

  pub fn set<T: Serialize>(&self, value: &T, key: &str) -> Result<()> {
    self.cache.save(value, &storage_key(key))
  }

  pub fn get_flag<T: DeserializeOwned>(&self, key: FeatureFlagKey) -> Option<T> {
    self.get(key.as_str())
  }

  pub fn set_flag<T: Serialize>(&self, value: &T, key: FeatureFlagKey) -> Result<()> {
    self.set(value, key.as_str())
  }

  pub fn remote_flag_override(&self) -> RemoteFlagOverride {
    self
      .get_flag(FeatureFlagKey::ToggleRemoteFlag)
      .unwrap_or_default()
  }

  pub fn set_remote_flag_override(&self, value: RemoteFlagOverride) -> Result<()> {
    self.set_flag(&value, FeatureFlagKey::ToggleRemoteFlag)
  }
}

fn storage_key(key: &str) -> String {
  format!("{}{}", KEY_PREFIX, key)
}
