//! Remote feature flags read through the SDK.

use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::with_timeout;
use crate::sdk::{with_async_value, ClientSdk};

use super::local::{FeatureFlagsUseCase, RemoteFlagOverride};

/// Upper bound for a single remote flag read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Source of raw remote flag values.
pub trait RemoteFeatureFlagRepository: Send + Sync {
  fn get(&self, key: &str) -> impl Future<Output = Result<i64>> + Send;
}

/// Reads flag values from the SDK on the blocking pool.
pub struct SdkRemoteFeatureFlagRepository {
  sdk: Arc<dyn ClientSdk>,
}

impl SdkRemoteFeatureFlagRepository {
  pub fn new(sdk: Arc<dyn ClientSdk>) -> Self {
    Self { sdk }
  }
}

impl RemoteFeatureFlagRepository for SdkRemoteFeatureFlagRepository {
  async fn get(&self, key: &str) -> Result<i64> {
    let sdk = Arc::clone(&self.sdk);
    let key = key.to_string();
    with_async_value(None, move |delegate| {
      tokio::task::spawn_blocking(move || delegate(Ok(sdk.remote_feature_flag_value(&key))));
    })
    .await
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFeatureFlagState {
  Disabled,
  Enabled { value: i64 },
}

impl RemoteFeatureFlagState {
  /// Non-positive values disable the flag.
  pub fn from_value(value: i64) -> Self {
    if value > 0 {
      Self::Enabled { value }
    } else {
      Self::Disabled
    }
  }

  pub fn is_enabled(&self) -> bool {
    matches!(self, Self::Enabled { .. })
  }
}

/// Resolves remote flags, failing closed.
pub struct RemoteFeatureFlagUseCase<R> {
  repo: R,
  timeout: Duration,
  overrides: Option<FeatureFlagsUseCase>,
}

impl<R: RemoteFeatureFlagRepository> RemoteFeatureFlagUseCase<R> {
  pub fn new(repo: R) -> Self {
    Self {
      repo,
      timeout: DEFAULT_TIMEOUT,
      overrides: None,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Honor the QA override stored in local feature flags.
  pub fn with_overrides(mut self, overrides: FeatureFlagsUseCase) -> Self {
    self.overrides = Some(overrides);
    self
  }

  /// State of the flag `key`. Errors and timeouts read as `Disabled`.
  pub async fn get(&self, key: &str) -> RemoteFeatureFlagState {
    let forced = self
      .overrides
      .as_ref()
      .map(FeatureFlagsUseCase::remote_flag_override)
      .unwrap_or_default();

    match forced {
      RemoteFlagOverride::ForceDisable => return RemoteFeatureFlagState::Disabled,
      RemoteFlagOverride::ForceEnable => return RemoteFeatureFlagState::Enabled { value: 1 },
      RemoteFlagOverride::UseApiValue => {}
    }

    match with_timeout(self.timeout, self.repo.get(key)).await {
      Ok(value) => RemoteFeatureFlagState::from_value(value),
      Err(_) => RemoteFeatureFlagState::Disabled,
    }
  }
}
