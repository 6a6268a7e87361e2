mod app;
mod cache;
mod config;
mod event;
mod history;
mod layout;
mod logging;
mod select;
mod ui;

use chrono::Local;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::cache::DEFAULT_TTL;
use crate::config::{parse_duration, Config};
use crate::history::DateKey;
use crate::select::Strategy;

#[derive(Parser, Debug)]
#[command(name = "glimpse")]
#[command(about = "Historical events that happened on this day, in your terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/glimpse/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Always fetch from the network and leave the cache untouched
  #[arg(long)]
  bypass_cache: bool,

  /// Shuffle the selection and its display order (true/false)
  #[arg(long)]
  shuffle: Option<bool>,

  /// Selection strategy: era-based, random or oldest-first
  #[arg(long)]
  strategy: Option<String>,

  /// How long cached data stays fresh, e.g. 30m or 24h
  #[arg(long)]
  cache_ttl: Option<String>,

  /// Show another day instead of today, as MM-DD
  #[arg(long)]
  date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  // Leave the alternate screen before the panic report is printed
  let panic_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    app::restore_terminal();
    panic_hook(info);
  }));

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;

  // The UI owns the terminal, so logging only ever goes to a file
  let _log_guard = match logging::init(&config.log_dir_or_default()) {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("Logging disabled: {}", e);
      None
    }
  };

  let config = apply_args(config, &args);

  let date = match &args.date {
    Some(date) => date.parse::<DateKey>()?,
    None => DateKey::from_date(Local::now()),
  };

  info!(
    %date,
    strategy = config.display.strategy.name(),
    shuffle = config.display.shuffle,
    bypass_cache = config.cache.bypass,
    "Starting"
  );

  // Initialize and run the app
  let mut app = app::App::new(config, date)?;
  app.run().await?;

  Ok(())
}

/// Command line flags take precedence over the config file
fn apply_args(mut config: Config, args: &Args) -> Config {
  if args.bypass_cache {
    config.cache.bypass = true;
  }
  if let Some(shuffle) = args.shuffle {
    config.display.shuffle = shuffle;
  }
  if let Some(strategy) = &args.strategy {
    config.display.strategy = Strategy::from(strategy.as_str());
  }
  if let Some(ttl) = &args.cache_ttl {
    config.cache.ttl = parse_duration(ttl).unwrap_or_else(|e| {
      warn!(%ttl, error = %e, "Invalid cache TTL, using 24h");
      DEFAULT_TTL
    });
  }
  config
}
