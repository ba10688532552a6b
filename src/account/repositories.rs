//! Remote account repositories backed by the client SDK.

use color_eyre::Result;
use std::sync::Arc;
use thiserror::Error;

use crate::fetch::{RemoteDataRepository, RemoteDataRepositoryError};
use crate::sdk::{
  with_async_value, ClientSdk, RequestDelegate, SdkAccountDetails, SdkAccountType, SdkError,
  SdkErrorCode, UserAttribute,
};

use super::entities::{
  AccountDetailsEntity, AccountEntity, AccountFeatureEntity, AccountPlanEntity, AccountPlanType,
  AccountSubscriptionEntity, PaymentMethod,
};

const PAYMENT_METHOD_ITUNES: i32 = 2;
const PAYMENT_METHOD_GOOGLE_WALLET: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountRepositoryError {
  #[error("email not found")]
  EmailNotFound,
  #[error("user not found")]
  UserNotFound,
  #[error("base64 handle not found")]
  Base64HandleNotFound,
}

/// Fetches the logged-in account.
pub struct RemoteAccountRepository {
  sdk: Arc<dyn ClientSdk>,
}

impl RemoteAccountRepository {
  pub fn new(sdk: Arc<dyn ClientSdk>) -> Self {
    Self { sdk }
  }

  async fn fetch_user_data(&self) -> Result<()> {
    with_async_value(None, |delegate| self.sdk.get_user_data(delegate)).await
  }

  /// Read a text attribute. A missing attribute reads as an empty string.
  async fn user_attribute(&self, attribute: UserAttribute) -> Result<String> {
    with_async_value(None, |delegate: RequestDelegate<String>| {
      self.sdk.get_user_attribute(
        attribute,
        Box::new(move |result: Result<Option<String>, SdkError>| {
          delegate(match result {
            Ok(text) => Ok(text.unwrap_or_default()),
            Err(error) if error.code == SdkErrorCode::NoEntry => Ok(String::new()),
            Err(error) => Err(error),
          })
        }),
      )
    })
    .await
  }
}

impl RemoteDataRepository for RemoteAccountRepository {
  type Data = AccountEntity;

  async fn fetch(&self) -> Result<AccountEntity> {
    self.fetch_user_data().await?;

    let email = self
      .sdk
      .my_email()
      .ok_or(AccountRepositoryError::EmailNotFound)?;
    let user = self
      .sdk
      .my_user()
      .ok_or(AccountRepositoryError::UserNotFound)?;
    let base64_handle = self
      .sdk
      .base64_handle(user.handle)
      .ok_or(AccountRepositoryError::Base64HandleNotFound)?;

    let first_name = self.user_attribute(UserAttribute::FirstName).await?;
    let last_name = self.user_attribute(UserAttribute::LastName).await?;

    Ok(AccountEntity {
      handle: user.handle,
      base64_handle,
      first_name,
      last_name,
      email,
    })
  }
}

/// Fetches plan, feature and subscription details of the account.
pub struct RemoteAccountDetailsRepository {
  sdk: Arc<dyn ClientSdk>,
}

impl RemoteAccountDetailsRepository {
  pub fn new(sdk: Arc<dyn ClientSdk>) -> Self {
    Self { sdk }
  }
}

impl RemoteDataRepository for RemoteAccountDetailsRepository {
  type Data = AccountDetailsEntity;

  async fn fetch(&self) -> Result<AccountDetailsEntity> {
    let details = with_async_value(None, |delegate| self.sdk.get_account_details(delegate))
      .await?
      .ok_or(RemoteDataRepositoryError::DataNotFound)?;

    Ok(details.into())
  }
}

impl From<SdkAccountType> for AccountPlanType {
  fn from(account_type: SdkAccountType) -> Self {
    match account_type {
      SdkAccountType::Free | SdkAccountType::Unknown => Self::Free,
      SdkAccountType::ProI => Self::ProI,
      SdkAccountType::ProII => Self::ProII,
      SdkAccountType::ProIII => Self::ProIII,
      SdkAccountType::Lite => Self::Lite,
      SdkAccountType::Starter => Self::Starter,
      SdkAccountType::Basic => Self::Basic,
      SdkAccountType::Essential => Self::Essential,
      SdkAccountType::Business => Self::Business,
      SdkAccountType::ProFlexi => Self::ProFlexi,
      SdkAccountType::Feature => Self::Feature,
    }
  }
}

fn payment_method(id: i32) -> PaymentMethod {
  match id {
    PAYMENT_METHOD_ITUNES => PaymentMethod::AppleAppStore,
    PAYMENT_METHOD_GOOGLE_WALLET => PaymentMethod::GooglePlayStore,
    _ => PaymentMethod::WebClient,
  }
}

impl From<SdkAccountDetails> for AccountDetailsEntity {
  fn from(details: SdkAccountDetails) -> Self {
    Self {
      plans: details
        .plans
        .into_iter()
        .map(|plan| AccountPlanEntity {
          key: plan.subscription_id,
          plan_type: plan.account_type.into(),
          is_pro_plan: plan.is_pro_plan,
          expiry: plan.expiration_time,
          features: plan.features,
          is_trial: plan.is_trial,
        })
        .collect(),
      features: details
        .features
        .into_iter()
        .map(|feature| AccountFeatureEntity {
          feature_id: feature.feature_id,
          expiry: feature.expiry,
        })
        .collect(),
      subscriptions: details
        .subscriptions
        .into_iter()
        .map(|subscription| AccountSubscriptionEntity {
          key: subscription.subscription_id.unwrap_or_default(),
          plan_type: subscription.account_type.into(),
          features: subscription.features,
          payment_method: payment_method(subscription.payment_method_id),
          renew_time: subscription.renew_time,
          is_trial: subscription.is_trial,
        })
        .collect(),
    }
  }
}
