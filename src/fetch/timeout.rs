//! Deadline-bounded async operations.

use color_eyre::{eyre::Report, Result};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The operation did not complete before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation timed out after {timeout:?}")]
pub struct TimedOutError {
  pub timeout: Duration,
}

/// Distinguishes deadline failures from the operation's own errors.
pub trait TimeoutErrorExt {
  fn is_timeout_error(&self) -> bool;
}

impl TimeoutErrorExt for Report {
  fn is_timeout_error(&self) -> bool {
    self.downcast_ref::<TimedOutError>().is_some()
  }
}

/// Race `operation` against a `timeout` timer.
///
/// If the timer fires first the operation future is dropped, cancelling it,
/// and a [`TimedOutError`] is returned. Otherwise the operation's own result
/// is returned unchanged.
pub async fn with_timeout<T, F>(timeout: Duration, operation: F) -> Result<T>
where
  F: Future<Output = Result<T>>,
{
  match tokio::time::timeout(timeout, operation).await {
    Ok(result) => result,
    Err(_) => Err(TimedOutError { timeout }.into()),
  }
}

/// Like [`with_timeout`], waiting indefinitely when `timeout` is `None`.
pub async fn with_optional_timeout<T, F>(timeout: Option<Duration>, operation: F) -> Result<T>
where
  F: Future<Output = Result<T>>,
{
  match timeout {
    Some(timeout) => with_timeout(timeout, operation).await,
    None => operation.await,
  }
}
