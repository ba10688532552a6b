//! Composition root wiring caches, repositories and use cases together.

use color_eyre::Result;
use std::sync::Arc;
use tracing::info;

use crate::account::{
  AccountDetailsEntity, AccountEntity, FetchAccountPlanUseCase, FetchAccountUseCase,
  RemoteAccountDetailsRepository, RemoteAccountRepository, ACCOUNT_CACHE_KEY,
  ACCOUNT_DETAILS_CACHE_KEY,
};
use crate::cache::{CacheService, LocalDataRepository, NoopCacheService, SqliteCacheService};
use crate::config::{CacheConfig, Config};
use crate::feature_flag::{
  FeatureFlagsUseCase, RemoteFeatureFlagUseCase, SdkRemoteFeatureFlagRepository,
};
use crate::fetch::RepositoryFetcher;
use crate::sdk::ClientSdk;

pub type SharedCache = Arc<dyn CacheService>;

pub type AccountFetcher =
  RepositoryFetcher<LocalDataRepository<AccountEntity, SharedCache>, RemoteAccountRepository>;

pub type AccountDetailsFetcher = RepositoryFetcher<
  LocalDataRepository<AccountDetailsEntity, SharedCache>,
  RemoteAccountDetailsRepository,
>;

/// Open the cache service described by `config`.
pub fn open_cache(config: &CacheConfig) -> Result<SharedCache> {
  if !config.enabled {
    info!("cache disabled");
    return Ok(Arc::new(NoopCacheService));
  }

  let cache = match &config.path {
    Some(path) => SqliteCacheService::open_at(path)?,
    None => SqliteCacheService::open()?,
  };
  Ok(Arc::new(cache))
}

/// Shared services, built once per process.
///
/// Use cases are cheap to build; each call returns a fresh instance over the
/// same cache and SDK handle.
pub struct Dependencies {
  config: Config,
  sdk: Arc<dyn ClientSdk>,
  cache: SharedCache,
}

impl Dependencies {
  pub fn new(config: Config, sdk: Arc<dyn ClientSdk>) -> Result<Self> {
    let cache = open_cache(&config.cache)?;
    Ok(Self::with_cache(config, sdk, cache))
  }

  pub fn with_cache(config: Config, sdk: Arc<dyn ClientSdk>, cache: SharedCache) -> Self {
    Self { config, sdk, cache }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn cache(&self) -> &SharedCache {
    &self.cache
  }

  pub fn fetch_account_use_case(&self) -> FetchAccountUseCase<AccountFetcher> {
    let fetcher = RepositoryFetcher::new(
      RemoteAccountRepository::new(Arc::clone(&self.sdk)),
      LocalDataRepository::new(ACCOUNT_CACHE_KEY, Arc::clone(&self.cache)),
    );
    FetchAccountUseCase::new(fetcher).with_timeout(self.config.fetch.timeout())
  }

  pub fn fetch_account_plan_use_case(&self) -> FetchAccountPlanUseCase<AccountDetailsFetcher> {
    let fetcher = RepositoryFetcher::new(
      RemoteAccountDetailsRepository::new(Arc::clone(&self.sdk)),
      LocalDataRepository::new(ACCOUNT_DETAILS_CACHE_KEY, Arc::clone(&self.cache)),
    );
    FetchAccountPlanUseCase::new(fetcher)
  }

  pub fn feature_flags_use_case(&self) -> FeatureFlagsUseCase {
    FeatureFlagsUseCase::new(Arc::clone(&self.cache))
  }

  pub fn remote_feature_flag_use_case(
    &self,
  ) -> RemoteFeatureFlagUseCase<SdkRemoteFeatureFlagRepository> {
    RemoteFeatureFlagUseCase::new(SdkRemoteFeatureFlagRepository::new(Arc::clone(&self.sdk)))
      .with_timeout(self.config.feature_flags.timeout())
      .with_overrides(self.feature_flags_use_case())
  }

  /// Forget the cached account and plan details, e.g. on logout.
  pub fn clear_account_cache(&self) -> Result<()> {
    let account = self.cache.remove(ACCOUNT_CACHE_KEY);
    let details = self.cache.remove(ACCOUNT_DETAILS_CACHE_KEY);
    account.and(details)?;
    info!("cleared account cache");
    Ok(())
  }
}
