//! Remote half of the fetch layer.

use color_eyre::Result;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::timeout::with_timeout;

/// Generic failure for remote sources that answered without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoteDataRepositoryError {
  #[error("remote data not found")]
  DataNotFound,
}

/// Remote source of truth for a single kind of data.
///
/// Each call to `fetch` performs exactly one round trip. Failures surface as
/// the implementor's typed errors inside the report so callers can downcast
/// and match on them.
pub trait RemoteDataRepository: Send + Sync {
  type Data: Send;

  /// Fetch the current value from the remote source.
  fn fetch(&self) -> impl Future<Output = Result<Self::Data>> + Send;

  /// Fetch, failing with [`TimedOutError`](super::TimedOutError) if no result
  /// arrives within `timeout`. The pending fetch is dropped on expiry.
  fn fetch_with_timeout(
    &self,
    timeout: Duration,
  ) -> impl Future<Output = Result<Self::Data>> + Send {
    with_timeout(timeout, self.fetch())
  }
}
