use color_eyre::Result;
use std::time::Duration;

use crate::fetch::RepositoryFetching;

use super::entities::{AccountDetailsEntity, AccountEntity, AccountPlanType};

/// Reads the logged-in account.
pub struct FetchAccountUseCase<F> {
  fetcher: F,
  timeout: Option<Duration>,
}

impl<F> FetchAccountUseCase<F>
where
  F: RepositoryFetching<Data = AccountEntity>,
{
  pub fn new(fetcher: F) -> Self {
    Self {
      fetcher,
      timeout: None,
    }
  }

  /// Bound every remote attempt made by this use case.
  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  /// Cached account when available, otherwise fetched remotely.
  pub async fn fetch_account(&self) -> Result<AccountEntity> {
    self
      .fetcher
      .fetch_local_with_remote_fallback(self.timeout)
      .await
  }

  /// Fresh account from the remote source, falling back to the cache.
  pub async fn fetch_refreshed_account(&self) -> Result<AccountEntity> {
    self
      .fetcher
      .fetch_remote_with_local_fallback(self.timeout)
      .await
  }

  pub fn cached_account(&self) -> Option<AccountEntity> {
    self.fetcher.fetch_local()
  }
}

/// Reads the plan details of the account.
pub struct FetchAccountPlanUseCase<F> {
  fetcher: F,
}

impl<F> FetchAccountPlanUseCase<F>
where
  F: RepositoryFetching<Data = AccountDetailsEntity>,
{
  pub fn new(fetcher: F) -> Self {
    Self { fetcher }
  }

  pub async fn fetch_account_details(
    &self,
    timeout: Option<Duration>,
  ) -> Result<AccountDetailsEntity> {
    self.fetcher.fetch_remote_with_local_fallback(timeout).await
  }

  /// Type of the plan defining the account level, `Free` without plans.
  pub async fn fetch_plan_type(&self, timeout: Option<Duration>) -> Result<AccountPlanType> {
    let details = self.fetch_account_details(timeout).await?;
    Ok(
      details
        .account_plan()
        .map(|plan| plan.plan_type)
        .unwrap_or(AccountPlanType::Free),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::account::entities::AccountPlanEntity;
  use crate::account::repositories::{RemoteAccountDetailsRepository, RemoteAccountRepository};
  use crate::account::ACCOUNT_CACHE_KEY;
  use crate::cache::{CacheService, LocalDataRepository, MemoryCacheService};
  use crate::fetch::{RemoteDataRepositoryError, RepositoryFetcher};
  use crate::sdk::{SdkAccountDetails, SdkAccountType, SdkError, SdkErrorCode, SdkPlan, SdkUser, UserAttribute};
  use crate::testing::{ErrorInTest, FakeSdk, FetcherAction, MockFetcher};
  use std::sync::Arc;

  fn account() -> AccountEntity {
    AccountEntity {
      handle: 42,
      base64_handle: "Kg".into(),
      first_name: "Grace".into(),
      last_name: "Hopper".into(),
      email: "grace@example.com".into(),
    }
  }

  fn details(plan_type: AccountPlanType) -> AccountDetailsEntity {
    AccountDetailsEntity {
      plans: vec![AccountPlanEntity {
        key: None,
        plan_type,
        is_pro_plan: true,
        expiry: 0,
        features: Vec::new(),
        is_trial: false,
      }],
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn test_fetch_account_is_local_first() {
    let fetcher = MockFetcher::succeeding(account());
    let use_case = FetchAccountUseCase::new(fetcher.clone());

    let result = use_case.fetch_account().await.unwrap();

    assert_eq!(result, account());
    assert_eq!(
      fetcher.actions(),
      vec![FetcherAction::LocalWithRemoteFallback(None)]
    );
  }

  #[tokio::test]
  async fn test_fetch_refreshed_account_is_remote_first_with_timeout() {
    let fetcher = MockFetcher::succeeding(account());
    let timeout = Duration::from_secs(5);
    let use_case = FetchAccountUseCase::new(fetcher.clone()).with_timeout(Some(timeout));

    use_case.fetch_refreshed_account().await.unwrap();

    assert_eq!(
      fetcher.actions(),
      vec![FetcherAction::RemoteWithLocalFallback(Some(timeout))]
    );
  }

  #[tokio::test]
  async fn test_fetch_account_error_is_passed_through() {
    let use_case = FetchAccountUseCase::new(MockFetcher::<AccountEntity>::failing(ErrorInTest));

    let error = use_case.fetch_account().await.unwrap_err();

    assert_eq!(error.downcast_ref::<ErrorInTest>(), Some(&ErrorInTest));
  }

  #[test]
  fn test_cached_account_reads_local() {
    let fetcher = MockFetcher::succeeding(account());
    let use_case = FetchAccountUseCase::new(fetcher.clone());

    assert_eq!(use_case.cached_account(), Some(account()));
    assert_eq!(fetcher.actions(), vec![FetcherAction::Local]);
  }

  #[tokio::test]
  async fn test_fetch_plan_type_uses_remote_with_local_fallback() {
    let fetcher = MockFetcher::succeeding(details(AccountPlanType::Business));
    let timeout = Duration::from_millis(750);
    let use_case = FetchAccountPlanUseCase::new(fetcher.clone());

    let plan_type = use_case.fetch_plan_type(Some(timeout)).await.unwrap();

    assert_eq!(plan_type, AccountPlanType::Business);
    assert_eq!(
      fetcher.actions(),
      vec![FetcherAction::RemoteWithLocalFallback(Some(timeout))]
    );
  }

  #[tokio::test]
  async fn test_fetch_plan_type_without_plans_is_free() {
    let use_case =
      FetchAccountPlanUseCase::new(MockFetcher::succeeding(AccountDetailsEntity::default()));

    assert_eq!(
      use_case.fetch_plan_type(None).await.unwrap(),
      AccountPlanType::Free
    );
  }

  // ==========================================================================
  // Through the real fetcher
  // ==========================================================================

  fn logged_in_sdk() -> FakeSdk {
    let mut sdk = FakeSdk {
      email: Some("grace@example.com".into()),
      user: Some(SdkUser {
        handle: 42,
        email: Some("grace@example.com".into()),
      }),
      ..Default::default()
    };
    sdk.base64_handles.insert(42, "Kg".into());
    sdk
      .attributes
      .insert(UserAttribute::FirstName, Ok(Some("Grace".into())));
    sdk
      .attributes
      .insert(UserAttribute::LastName, Ok(Some("Hopper".into())));
    sdk
  }

  #[tokio::test]
  async fn test_empty_cache_fetches_account_once_and_caches_it() {
    let sdk = Arc::new(logged_in_sdk());
    let cache = Arc::new(MemoryCacheService::new());
    let fetcher = RepositoryFetcher::new(
      RemoteAccountRepository::new(sdk.clone()),
      LocalDataRepository::new("accountEntity", cache.clone()),
    );
    let use_case = FetchAccountUseCase::new(fetcher);

    let first = use_case.fetch_account().await.unwrap();
    let second = use_case.fetch_account().await.unwrap();

    assert_eq!(first, account());
    assert_eq!(second, account());
    let user_data_calls = sdk
      .calls()
      .iter()
      .filter(|call| *call == "get_user_data")
      .count();
    assert_eq!(user_data_calls, 1);
    let cached: Option<AccountEntity> = cache.fetch("accountEntity").unwrap();
    assert_eq!(cached, Some(account()));
  }

  #[tokio::test]
  async fn test_refreshed_account_replaces_cached_account() {
    let cache = Arc::new(MemoryCacheService::new());
    let stale = AccountEntity {
      first_name: "Old".into(),
      ..account()
    };
    cache.save(&stale, ACCOUNT_CACHE_KEY).unwrap();
    let fetcher = RepositoryFetcher::new(
      RemoteAccountRepository::new(Arc::new(logged_in_sdk())),
      LocalDataRepository::new(ACCOUNT_CACHE_KEY, cache.clone()),
    );
    let use_case = FetchAccountUseCase::new(fetcher);

    let refreshed = use_case.fetch_refreshed_account().await.unwrap();

    assert_eq!(refreshed, account());
    let cached: Option<AccountEntity> = cache.fetch(ACCOUNT_CACHE_KEY).unwrap();
    assert_eq!(cached, Some(account()));
    assert_eq!(use_case.cached_account(), Some(account()));
  }

  #[tokio::test]
  async fn test_cached_details_survive_remote_failure() {
    let sdk = Arc::new(FakeSdk {
      account_details: Some(Err(SdkError::new(SdkErrorCode::Again, "try again"))),
      ..Default::default()
    });
    let cache = Arc::new(MemoryCacheService::new());
    cache
      .save(&details(AccountPlanType::ProIII), "accountDetails")
      .unwrap();
    let fetcher = RepositoryFetcher::new(
      RemoteAccountDetailsRepository::new(sdk),
      LocalDataRepository::new("accountDetails", cache),
    );
    let use_case = FetchAccountPlanUseCase::new(fetcher);

    let result = use_case.fetch_account_details(None).await.unwrap();

    assert_eq!(result, details(AccountPlanType::ProIII));
  }

  #[tokio::test]
  async fn test_missing_details_without_cache_is_data_not_found() {
    let sdk = Arc::new(FakeSdk {
      account_details: Some(Ok(None)),
      ..Default::default()
    });
    let fetcher = RepositoryFetcher::new(
      RemoteAccountDetailsRepository::new(sdk),
      LocalDataRepository::new("accountDetails", Arc::new(MemoryCacheService::new())),
    );
    let use_case = FetchAccountPlanUseCase::new(fetcher);

    let error = use_case.fetch_plan_type(None).await.unwrap_err();

    assert_eq!(
      error.downcast_ref::<RemoteDataRepositoryError>(),
      Some(&RemoteDataRepositoryError::DataNotFound)
    );
  }

  #[tokio::test]
  async fn test_plan_type_from_sdk_payload() {
    let sdk = Arc::new(FakeSdk {
      account_details: Some(Ok(Some(SdkAccountDetails {
        plans: vec![SdkPlan {
          subscription_id: None,
          account_type: SdkAccountType::Starter,
          is_pro_plan: true,
          expiration_time: 0,
          features: Vec::new(),
          is_trial: true,
        }],
        ..Default::default()
      }))),
      ..Default::default()
    });
    let fetcher = RepositoryFetcher::new(
      RemoteAccountDetailsRepository::new(sdk),
      LocalDataRepository::new("accountDetails", Arc::new(MemoryCacheService::new())),
    );
    let use_case = FetchAccountPlanUseCase::new(fetcher);

    assert_eq!(
      use_case.fetch_plan_type(None).await.unwrap(),
      AccountPlanType::Starter
    );
  }
}
