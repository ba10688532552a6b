//! Types exchanged with the client SDK.

use thiserror::Error;

/// Result codes reported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkErrorCode {
  Internal,
  Args,
  Again,
  RateLimit,
  Failed,
  TooMany,
  Range,
  Expired,
  NoEntry,
  Circular,
  Access,
  Exists,
  Incomplete,
  Key,
  Sid,
  Blocked,
  OverQuota,
  TempUnavailable,
  Other(i32),
}

impl SdkErrorCode {
  /// Map a raw SDK error number to a code.
  pub fn from_raw(raw: i32) -> Self {
    match raw {
      -1 => Self::Internal,
      -2 => Self::Args,
      -3 => Self::Again,
      -4 => Self::RateLimit,
      -5 => Self::Failed,
      -6 => Self::TooMany,
      -7 => Self::Range,
      -8 => Self::Expired,
      -9 => Self::NoEntry,
      -10 => Self::Circular,
      -11 => Self::Access,
      -12 => Self::Exists,
      -13 => Self::Incomplete,
      -14 => Self::Key,
      -15 => Self::Sid,
      -16 => Self::Blocked,
      -17 => Self::OverQuota,
      -18 => Self::TempUnavailable,
      other => Self::Other(other),
    }
  }
}

/// A failed SDK request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SDK request failed ({code:?}): {message}")]
pub struct SdkError {
  pub code: SdkErrorCode,
  pub message: String,
}

impl SdkError {
  pub fn new(code: SdkErrorCode, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  pub fn from_raw(raw: i32, message: impl Into<String>) -> Self {
    Self::new(SdkErrorCode::from_raw(raw), message)
  }
}

/// User attributes readable as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAttribute {
  FirstName,
  LastName,
}

/// The logged-in user as seen by the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkUser {
  pub handle: u64,
  pub email: Option<String>,
}

/// Account levels reported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkAccountType {
  Unknown,
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

#[derive(Debug, Clone, PartialEq)]
pub struct SdkPlan {
  pub subscription_id: Option<String>,
  pub account_type: SdkAccountType,
  pub is_pro_plan: bool,
  /// Unix seconds
  pub expiration_time: i64,
  pub features: Vec<String>,
  pub is_trial: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SdkFeature {
  pub feature_id: String,
  /// Unix seconds
  pub expiry: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SdkSubscription {
  pub subscription_id: Option<String>,
  pub account_type: SdkAccountType,
  pub features: Vec<String>,
  pub payment_method_id: i32,
  /// Unix seconds
  pub renew_time: i64,
  pub is_trial: bool,
}

/// Raw account details payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SdkAccountDetails {
  pub plans: Vec<SdkPlan>,
  pub features: Vec<SdkFeature>,
  pub subscriptions: Vec<SdkSubscription>,
}
