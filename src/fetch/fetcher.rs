//! Repository fetcher that reconciles a local store with a remote source.

use color_eyre::Result;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{Cacheable, LocalStore};

use super::remote::RemoteDataRepository;

/// Order of attempts for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
  /// Cached value if usable, network otherwise
  LocalWithRemoteFallback,
  /// Network first, cached value if the network fails
  RemoteWithLocalFallback,
  /// Network only, refreshing the cache on success
  RemoteOnly,
  /// Cache only, never touching the network
  LocalOnly,
}

/// Returned by [`FetchStrategy::LocalOnly`] when nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no cached value available")]
pub struct NoLocalDataError;

/// Fetch contract consumed by use cases.
///
/// `timeout` bounds the single remote attempt of a call; `None` waits for the
/// remote source indefinitely.
pub trait RepositoryFetching: Send + Sync {
  type Data: Send;

  /// Return the cached value when present and usable, otherwise fetch
  /// remotely. Empty cached collections count as missing.
  fn fetch_local_with_remote_fallback(
    &self,
    timeout: Option<Duration>,
  ) -> impl Future<Output = Result<Self::Data>> + Send;

  /// Fetch remotely, falling back to the cached value on failure. With no
  /// cached value the remote error is returned unchanged.
  fn fetch_remote_with_local_fallback(
    &self,
    timeout: Option<Duration>,
  ) -> impl Future<Output = Result<Self::Data>> + Send;

  /// Fetch remotely and store the result locally before returning it.
  fn fetch_remote(
    &self,
    timeout: Option<Duration>,
  ) -> impl Future<Output = Result<Self::Data>> + Send;

  /// Cached value, if any. Never touches the network.
  fn fetch_local(&self) -> Option<Self::Data>;

  /// Dispatch to the operation matching `strategy`.
  fn fetch(
    &self,
    strategy: FetchStrategy,
    timeout: Option<Duration>,
  ) -> impl Future<Output = Result<Self::Data>> + Send {
    async move {
      match strategy {
        FetchStrategy::LocalWithRemoteFallback => {
          self.fetch_local_with_remote_fallback(timeout).await
        }
        FetchStrategy::RemoteWithLocalFallback => {
          self.fetch_remote_with_local_fallback(timeout).await
        }
        FetchStrategy::RemoteOnly => self.fetch_remote(timeout).await,
        FetchStrategy::LocalOnly => self.fetch_local().ok_or_else(|| NoLocalDataError.into()),
      }
    }
  }
}

/// Composes a local store and a remote repository with the same payload.
pub struct RepositoryFetcher<L, R> {
  local: L,
  remote: R,
}

impl<L, R> RepositoryFetcher<L, R> {
  pub fn new(remote: R, local: L) -> Self {
    Self { local, remote }
  }
}

impl<L, R> RepositoryFetching for RepositoryFetcher<L, R>
where
  L: LocalStore,
  R: RemoteDataRepository<Data = L::Data>,
{
  type Data = L::Data;

  async fn fetch_local_with_remote_fallback(&self, timeout: Option<Duration>) -> Result<L::Data> {
    match self.fetch_local() {
      Some(local) if !local.is_empty_collection() => Ok(local),
      _ => self.fetch_remote(timeout).await,
    }
  }

  async fn fetch_remote_with_local_fallback(&self, timeout: Option<Duration>) -> Result<L::Data> {
    match self.fetch_remote(timeout).await {
      Ok(data) => Ok(data),
      Err(error) => self.fetch_local().ok_or(error),
    }
  }

  async fn fetch_remote(&self, timeout: Option<Duration>) -> Result<L::Data> {
    let data = match timeout {
      Some(timeout) => self.remote.fetch_with_timeout(timeout).await?,
      None => self.remote.fetch().await?,
    };
    self.local.save(&data);
    Ok(data)
  }

  fn fetch_local(&self) -> Option<L::Data> {
    self.local.fetch()
  }
}
