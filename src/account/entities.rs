//! Account domain types.

use serde::{Deserialize, Serialize};

use crate::cache::Cacheable;

/// The logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntity {
  pub handle: u64,
  pub base64_handle: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
}

impl AccountEntity {
  /// First and last name joined, skipping empty parts.
  pub fn full_name(&self) -> String {
    [self.first_name.as_str(), self.last_name.as_str()]
      .iter()
      .filter(|part| !part.is_empty())
      .copied()
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl Cacheable for AccountEntity {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountPlanType {
  Free,
  ProI,
  ProII,
  ProIII,
  Lite,
  Starter,
  Basic,
  Essential,
  Business,
  ProFlexi,
  Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  AppleAppStore,
  GooglePlayStore,
  WebClient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPlanEntity {
  pub key: Option<String>,
  #[serde(rename = "type")]
  pub plan_type: AccountPlanType,
  pub is_pro_plan: bool,
  /// Unix seconds
  pub expiry: i64,
  pub features: Vec<String>,
  pub is_trial: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountFeatureEntity {
  pub feature_id: String,
  /// Unix seconds
  pub expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSubscriptionEntity {
  pub key: String,
  #[serde(rename = "type")]
  pub plan_type: AccountPlanType,
  pub features: Vec<String>,
  pub payment_method: PaymentMethod,
  /// Unix seconds
  pub renew_time: i64,
  pub is_trial: bool,
}

/// Plans, active features and subscriptions of the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDetailsEntity {
  pub plans: Vec<AccountPlanEntity>,
  pub features: Vec<AccountFeatureEntity>,
  pub subscriptions: Vec<AccountSubscriptionEntity>,
}

impl AccountDetailsEntity {
  /// The plan that defines the account level: the first pro plan, or the
  /// first plan when none is flagged as pro.
  pub fn account_plan(&self) -> Option<&AccountPlanEntity> {
    self
      .plans
      .iter()
      .find(|plan| plan.is_pro_plan)
      .or_else(|| self.plans.first())
  }
}

impl Cacheable for AccountDetailsEntity {}
