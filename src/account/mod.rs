//! Logged-in account and its plan details.

mod entities;
mod repositories;
mod use_cases;

pub use entities::{
  AccountDetailsEntity, AccountEntity, AccountFeatureEntity, AccountPlanEntity, AccountPlanType,
  AccountSubscriptionEntity, PaymentMethod,
};
pub use repositories::{
  AccountRepositoryError, RemoteAccountDetailsRepository, RemoteAccountRepository,
};
pub use use_cases::{FetchAccountPlanUseCase, FetchAccountUseCase};

/// Cache key of the logged-in account.
pub const ACCOUNT_CACHE_KEY: &str = "accountEntity";
/// Cache key of the account plan details.
pub const ACCOUNT_DETAILS_CACHE_KEY: &str = "accountDetails";
