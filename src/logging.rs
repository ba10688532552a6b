//! Tracing bootstrap.

use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const DEFAULT_FILTER: &str = "warn,mega_shared=info";
const LOG_ENV: &str = "MEGA_SHARED_LOG";
const LOG_FILE_PREFIX: &str = "mega-shared.log";

/// Initialize the global tracing subscriber.
///
/// Filter precedence:
/// 1) `RUST_LOG`
/// 2) `MEGA_SHARED_LOG`
/// 3) `logging.filter` from the config file
/// 4) internal default filter
///
/// With `logging.directory` set, output goes to a daily rolling file instead
/// of stderr. The returned guard flushes that file and must be held until
/// exit.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
  let env_filter = filter_from_env(config.filter.as_deref());

  match &config.directory {
    Some(directory) => {
      let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_env_filter(env_filter)
        .try_init();
      Some(guard)
    }
    None => {
      let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .try_init();
      None
    }
  }
}

fn filter_from_env(configured: Option<&str>) -> EnvFilter {
  if let Ok(filter) = EnvFilter::try_from_default_env() {
    return filter;
  }

  first_valid_filter([env::var(LOG_ENV).ok(), configured.map(str::to_string)])
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn first_valid_filter(candidates: impl IntoIterator<Item = Option<String>>) -> Option<EnvFilter> {
  candidates
    .into_iter()
    .flatten()
    .filter(|value| !value.trim().is_empty())
    .find_map(|value| EnvFilter::try_new(value).ok())
}
