use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{FileStorage, DEFAULT_TTL};
use crate::history::client::{DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_BASE_URL};
use crate::select::Strategy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub feed: FeedConfig,
  pub cache: CacheConfig,
  pub display: DisplayConfig,
  /// Directory for log files (default: $XDG_DATA_HOME/glimpse/logs)
  pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
  /// Feed root; `/<MM>/<DD>` is appended per request
  pub base_url: String,
  /// Budget for the whole fetch, retries included
  #[serde(deserialize_with = "deserialize_duration")]
  pub fetch_timeout: Duration,
  /// Budget for a single request
  #[serde(deserialize_with = "deserialize_duration")]
  pub attempt_timeout: Duration,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      fetch_timeout: Duration::from_secs(15),
      attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Cache directory (default: $XDG_CACHE_HOME/glimpse)
  pub dir: Option<PathBuf>,
  #[serde(deserialize_with = "deserialize_duration")]
  pub ttl: Duration,
  /// Always fetch, and leave the cache untouched
  pub bypass: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      dir: None,
      ttl: DEFAULT_TTL,
      bypass: false,
    }
  }
}

impl CacheConfig {
  pub fn dir_or_default(&self) -> PathBuf {
    self.dir.clone().unwrap_or_else(FileStorage::default_dir)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
  /// era-based, random or oldest-first; anything else means era-based
  pub strategy: Strategy,
  pub shuffle: bool,
  /// Exit after this long without a key press
  #[serde(deserialize_with = "deserialize_duration")]
  pub idle_timeout: Duration,
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      strategy: Strategy::EraBased,
      shuffle: true,
      idle_timeout: Duration::from_secs(120),
    }
  }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Parse durations such as `90s`, `30m`, `1h30m` or `2d`.
pub fn parse_duration(input: &str) -> Result<Duration> {
  let s = input.trim();
  if s.is_empty() {
    return Err(eyre!("Empty duration"));
  }

  let mut total = Duration::ZERO;
  let mut digits = String::new();

  for c in s.chars() {
    if c.is_ascii_digit() {
      digits.push(c);
      continue;
    }

    let unit_secs = match c {
      's' => 1,
      'm' => 60,
      'h' => 60 * 60,
      'd' => 24 * 60 * 60,
      _ => return Err(eyre!("Invalid duration '{}': unknown unit '{}'", input, c)),
    };
    let value: u64 = digits
      .parse()
      .map_err(|_| eyre!("Invalid duration '{}': missing number before '{}'", input, c))?;
    let secs = value
      .checked_mul(unit_secs)
      .ok_or_else(|| eyre!("Invalid duration '{}': too large", input))?;
    total += Duration::from_secs(secs);
    digits.clear();
  }

  if !digits.is_empty() {
    return Err(eyre!("Invalid duration '{}': missing unit", input));
  }

  Ok(total)
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./glimpse.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/glimpse/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("glimpse.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("glimpse").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file is a valid, all-defaults config
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  /// Get the log directory.
  pub fn log_dir_or_default(&self) -> PathBuf {
    self.log_dir.clone().unwrap_or_else(|| {
      dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
        .map(|p| p.join("glimpse").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".cache").join("glimpse").join("logs"))
    })
  }
}
