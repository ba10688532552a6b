//! Shared account, cache and feature-flag layer.
//!
//! Data flows upward: a [`cache::CacheService`] backs typed
//! [`cache::LocalDataRepository`] values, remote repositories wrap the
//! [`sdk::ClientSdk`], and a [`fetch::RepositoryFetcher`] reconciles the two
//! behind a single [`fetch::RepositoryFetching`] contract consumed by the use
//! cases.

pub mod account;
pub mod cache;
pub mod config;
pub mod context;
pub mod feature_flag;
pub mod fetch;
pub mod logging;
pub mod sdk;

#[cfg(test)]
pub(crate) mod testing;
