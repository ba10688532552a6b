//! Boundary to the native client SDK.
//!
//! The SDK is a black box with a request/delegate callback model: every
//! request takes a one-shot delegate that is invoked exactly once with the
//! outcome. `with_async_value` turns that into an `async` call.

mod bridge;
mod types;

pub use bridge::with_async_value;
pub use types::{
  SdkAccountDetails, SdkAccountType, SdkError, SdkErrorCode, SdkFeature, SdkPlan, SdkSubscription,
  SdkUser, UserAttribute,
};

/// Completion callback for a single SDK request.
pub type RequestDelegate<T> = Box<dyn FnOnce(Result<T, SdkError>) + Send + 'static>;

/// Callback-based client SDK consumed by the remote repositories.
pub trait ClientSdk: Send + Sync {
  /// Refresh the logged-in user's data.
  fn get_user_data(&self, delegate: RequestDelegate<()>);

  /// Fetch a text attribute of the logged-in user.
  fn get_user_attribute(&self, attribute: UserAttribute, delegate: RequestDelegate<Option<String>>);

  /// Fetch plan, feature and subscription details of the account.
  fn get_account_details(&self, delegate: RequestDelegate<Option<SdkAccountDetails>>);

  /// Email of the logged-in user, once user data is loaded.
  fn my_email(&self) -> Option<String>;

  /// The logged-in user, once user data is loaded.
  fn my_user(&self) -> Option<SdkUser>;

  /// Base64 encoding of a user handle.
  fn base64_handle(&self, handle: u64) -> Option<String>;

  /// Value of a remote feature flag. Blocking; unknown flags yield a
  /// non-positive value.
  fn remote_feature_flag_value(&self, flag: &str) -> i64;
}
