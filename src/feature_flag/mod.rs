//! Remote feature flags and their local QA overrides.

mod local;
mod remote;

pub use local::{FeatureFlagKey, FeatureFlagsUseCase, RemoteFlagOverride};
pub use remote::{
  RemoteFeatureFlagRepository, RemoteFeatureFlagState, RemoteFeatureFlagUseCase,
  SdkRemoteFeatureFlagRepository, DEFAULT_TIMEOUT,
};
