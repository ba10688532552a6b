use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;

use mega_shared::cache::{CacheService, SqliteCacheService};
use mega_shared::config::{CacheConfig, Config};
use mega_shared::logging;

#[derive(Parser, Debug)]
#[command(name = "mega-shared")]
#[command(about = "Inspect and maintain the shared local cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/mega-shared/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List cached keys with their size and write time
  Keys,
  /// Print the value cached under a key
  Show { key: String },
  /// Remove the value cached under a key
  Remove { key: String },
  /// Remove every cached value
  Clear,
}

fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = logging::init(&config.logging);

  let path = cache_path(&config.cache)?;
  let cache = SqliteCacheService::open_at(&path)?;
  info!(path = %path.display(), "opened cache");

  match args.command {
    Command::Keys => {
      for entry in cache.entries()? {
        println!(
          "{}\t{}\t{}",
          entry.key,
          entry.size,
          entry.cached_at.format("%Y-%m-%d %H:%M:%S")
        );
      }
    }
    Command::Show { key } => {
      let data = cache
        .fetch_data(&key)?
        .ok_or_else(|| eyre!("Nothing cached under '{}'", key))?;
      let value: serde_json::Value = serde_json::from_slice(&data)
        .map_err(|e| eyre!("Value under '{}' is not valid JSON: {}", key, e))?;
      println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Command::Remove { key } => {
      cache.remove(&key)?;
      info!(key = %key, "removed cache entry");
    }
    Command::Clear => {
      cache.clear()?;
      info!("cleared cache");
    }
  }

  Ok(())
}

/// Database file to inspect. Refuses when caching is disabled, so that no
/// database is created that the library would never read.
fn cache_path(config: &CacheConfig) -> Result<PathBuf> {
  if !config.enabled {
    return Err(eyre!(
      "Caching is disabled (cache.enabled: false); there is no cache to inspect"
    ));
  }

  match &config.path {
    Some(path) => Ok(path.clone()),
    None => SqliteCacheService::default_path(),
  }
}
