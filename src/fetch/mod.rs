//! Fetch-with-fallback layer.
//!
//! Composes a local store and a remote repository of the same payload type
//! and exposes four strategies for reconciling them:
//! - local with remote fallback (cache first, network on a miss)
//! - remote with local fallback (network first, last-known-good on failure)
//! - remote only (network, refreshing the cache on success)
//! - local only (cache, never touching the network)

mod fetcher;
mod remote;
mod timeout;

pub use fetcher::{FetchStrategy, NoLocalDataError, RepositoryFetcher, RepositoryFetching};
pub use remote::{RemoteDataRepository, RemoteDataRepositoryError};
pub use timeout::{with_optional_timeout, with_timeout, TimedOutError, TimeoutErrorExt};
