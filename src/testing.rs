//! Recording test doubles shared by unit tests.

use color_eyre::{eyre::Report, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::cache::{Cacheable, LocalStore};
use crate::fetch::{with_timeout, RemoteDataRepository, RepositoryFetching};
use crate::sdk::{
  ClientSdk, RequestDelegate, SdkAccountDetails, SdkError, SdkUser, UserAttribute,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("error in test")]
pub struct ErrorInTest;

// ============================================================================
// Local repository
// ============================================================================

/// Local store keeping its value in memory and recording every save.
#[derive(Clone)]
pub struct MockLocalRepository<T> {
  value: Arc<Mutex<Option<T>>>,
  saved: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for MockLocalRepository<T> {
  fn default() -> Self {
    Self {
      value: Arc::new(Mutex::new(None)),
      saved: Arc::new(Mutex::new(Vec::new())),
    }
  }
}

impl<T: Clone> MockLocalRepository<T> {
  pub fn with_data(data: T) -> Self {
    let repo = Self::default();
    *repo.value.lock().unwrap() = Some(data);
    repo
  }

  pub fn saved(&self) -> Vec<T> {
    self.saved.lock().unwrap().clone()
  }
}

impl<T: Cacheable> LocalStore for MockLocalRepository<T> {
  type Data = T;

  fn save(&self, data: &T) {
    self.saved.lock().unwrap().push(data.clone());
    *self.value.lock().unwrap() = Some(data.clone());
  }

  fn fetch(&self) -> Option<T> {
    self.value.lock().unwrap().clone()
  }
}

// ============================================================================
// Remote repository
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
  Fetch,
  FetchWithTimeout(Duration),
}

#[derive(Clone)]
enum Response<T> {
  Succeed(T),
  Fail(Arc<dyn Fn() -> Report + Send + Sync>),
  Hang,
}

/// Remote repository answering from a canned response.
#[derive(Clone)]
pub struct MockRemoteRepository<T> {
  response: Response<T>,
  actions: Arc<Mutex<Vec<RemoteAction>>>,
}

impl<T> Default for MockRemoteRepository<T> {
  fn default() -> Self {
    Self::failing(ErrorInTest)
  }
}

impl<T> MockRemoteRepository<T> {
  pub fn succeeding(data: T) -> Self {
    Self::with_response(Response::Succeed(data))
  }

  pub fn failing<E>(error: E) -> Self
  where
    E: std::error::Error + Clone + Send + Sync + 'static,
  {
    Self::with_response(Response::Fail(Arc::new(move || Report::new(error.clone()))))
  }

  /// Never completes.
  pub fn hanging() -> Self {
    Self::with_response(Response::Hang)
  }

  fn with_response(response: Response<T>) -> Self {
    Self {
      response,
      actions: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn actions(&self) -> Vec<RemoteAction> {
    self.actions.lock().unwrap().clone()
  }
}

impl<T: Clone + Send + Sync> MockRemoteRepository<T> {
  async fn respond(&self) -> Result<T> {
    match &self.response {
      Response::Succeed(data) => Ok(data.clone()),
      Response::Fail(make_error) => Err(make_error()),
      Response::Hang => std::future::pending().await,
    }
  }
}

impl<T: Clone + Send + Sync> RemoteDataRepository for MockRemoteRepository<T> {
  type Data = T;

  async fn fetch(&self) -> Result<T> {
    self.actions.lock().unwrap().push(RemoteAction::Fetch);
    self.respond().await
  }

  async fn fetch_with_timeout(&self, timeout: Duration) -> Result<T> {
    self
      .actions
      .lock()
      .unwrap()
      .push(RemoteAction::FetchWithTimeout(timeout));
    with_timeout(timeout, self.respond()).await
  }
}

// ============================================================================
// Fetcher
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherAction {
  LocalWithRemoteFallback(Option<Duration>),
  RemoteWithLocalFallback(Option<Duration>),
  Remote(Option<Duration>),
  Local,
}

/// Fetcher returning the same canned outcome for every strategy.
#[derive(Clone)]
pub struct MockFetcher<T> {
  remote: MockRemoteRepository<T>,
  local: Option<T>,
  actions: Arc<Mutex<Vec<FetcherAction>>>,
}

impl<T: Clone> MockFetcher<T> {
  pub fn succeeding(data: T) -> Self {
    Self::new(MockRemoteRepository::succeeding(data.clone()), Some(data))
  }

  pub fn failing<E>(error: E) -> Self
  where
    E: std::error::Error + Clone + Send + Sync + 'static,
  {
    Self::new(MockRemoteRepository::failing(error), None)
  }

  fn new(remote: MockRemoteRepository<T>, local: Option<T>) -> Self {
    Self {
      remote,
      local,
      actions: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn actions(&self) -> Vec<FetcherAction> {
    self.actions.lock().unwrap().clone()
  }

  fn record(&self, action: FetcherAction) {
    self.actions.lock().unwrap().push(action);
  }
}

impl<T: Clone + Send + Sync> RepositoryFetching for MockFetcher<T> {
  type Data = T;

  async fn fetch_local_with_remote_fallback(&self, timeout: Option<Duration>) -> Result<T> {
    self.record(FetcherAction::LocalWithRemoteFallback(timeout));
    self.remote.respond().await
  }

  async fn fetch_remote_with_local_fallback(&self, timeout: Option<Duration>) -> Result<T> {
    self.record(FetcherAction::RemoteWithLocalFallback(timeout));
    self.remote.respond().await
  }

  async fn fetch_remote(&self, timeout: Option<Duration>) -> Result<T> {
    self.record(FetcherAction::Remote(timeout));
    self.remote.respond().await
  }

  fn fetch_local(&self) -> Option<T> {
    self.record(FetcherAction::Local);
    self.local.clone()
  }
}

// ============================================================================
// Client SDK
// ============================================================================

/// In-memory SDK. Requests complete synchronously from canned state.
#[derive(Default)]
pub struct FakeSdk {
  pub user_data_error: Option<SdkError>,
  pub email: Option<String>,
  pub user: Option<SdkUser>,
  pub base64_handles: HashMap<u64, String>,
  pub attributes: HashMap<UserAttribute, Result<Option<String>, SdkError>>,
  pub account_details: Option<Result<Option<SdkAccountDetails>, SdkError>>,
  pub feature_flags: HashMap<String, i64>,
  /// Delay before answering feature flag reads
  pub feature_flag_delay: Option<Duration>,
  pub calls: Mutex<Vec<String>>,
  /// Account detail requests left unanswered
  pub pending_details: Mutex<Vec<RequestDelegate<Option<SdkAccountDetails>>>>,
}

impl FakeSdk {
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: impl Into<String>) {
    self.calls.lock().unwrap().push(call.into());
  }
}

impl ClientSdk for FakeSdk {
  fn get_user_data(&self, delegate: RequestDelegate<()>) {
    self.record("get_user_data");
    match &self.user_data_error {
      Some(error) => delegate(Err(error.clone())),
      None => delegate(Ok(())),
    }
  }

  fn get_user_attribute(&self, attribute: UserAttribute, delegate: RequestDelegate<Option<String>>) {
    self.record(format!("get_user_attribute:{:?}", attribute));
    let result = self
      .attributes
      .get(&attribute)
      .cloned()
      .unwrap_or(Ok(None));
    delegate(result);
  }

  fn get_account_details(&self, delegate: RequestDelegate<Option<SdkAccountDetails>>) {
    self.record("get_account_details");
    match &self.account_details {
      Some(result) => delegate(result.clone()),
      // Request never completes
      None => self.pending_details.lock().unwrap().push(delegate),
    }
  }

  fn my_email(&self) -> Option<String> {
    self.email.clone()
  }

  fn my_user(&self) -> Option<SdkUser> {
    self.user.clone()
  }

  fn base64_handle(&self, handle: u64) -> Option<String> {
    self.base64_handles.get(&handle).cloned()
  }

  fn remote_feature_flag_value(&self, flag: &str) -> i64 {
    self.record(format!("remote_feature_flag_value:{}", flag));
    if let Some(delay) = self.feature_flag_delay {
      std::thread::sleep(delay);
    }
    self.feature_flags.get(flag).copied().unwrap_or(-1)
  }
}
