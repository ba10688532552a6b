//! Bridge from SDK delegates to async calls.

use color_eyre::Result;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::fetch::with_optional_timeout;

use super::types::{SdkError, SdkErrorCode};
use super::RequestDelegate;

/// Start an SDK request and wait for its delegate to fire.
///
/// `operation` receives a delegate that forwards the outcome through a
/// one-shot channel; only the first completion is observed. If `timeout`
/// expires first the receiver is dropped and any late completion is
/// discarded. A delegate dropped without being called is reported as an
/// internal SDK error instead of hanging the caller.
pub async fn with_async_value<T, F>(timeout: Option<Duration>, operation: F) -> Result<T>
where
  T: Send + 'static,
  F: FnOnce(RequestDelegate<T>) + Send,
{
  let (tx, rx) = oneshot::channel::<Result<T, SdkError>>();
  operation(Box::new(move |result: Result<T, SdkError>| {
    // Receiver is gone when the caller timed out or was cancelled
    let _ = tx.send(result);
  }));

  with_optional_timeout(timeout, await_completion(rx)).await
}

async fn await_completion<T>(rx: oneshot::Receiver<Result<T, SdkError>>) -> Result<T> {
  match rx.await {
    Ok(result) => Ok(result?),
    Err(_) => Err(
      SdkError::new(
        SdkErrorCode::Internal,
        "request delegate dropped without completing",
      )
      .into(),
    ),
  }
}
