//! Cache storage trait and flat-directory implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::traits::CacheLookup;
use crate::history::types::DateKey;

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Look up the body stored for `key`, classifying it against `ttl`.
  ///
  /// Read failures are reported as `Missing`, never as errors.
  fn get(&self, key: DateKey, ttl: Duration) -> CacheLookup;

  /// Replace the body stored for `key`.
  fn put(&self, key: DateKey, body: &[u8]) -> Result<()>;
}

/// Storage implementation that doesn't cache anything.
#[cfg(test)]
pub struct NoopStorage;

#[cfg(test)]
impl CacheStorage for NoopStorage {
  fn get(&self, _key: DateKey, _ttl: Duration) -> CacheLookup {
    CacheLookup::Missing
  }

  fn put(&self, _key: DateKey, _body: &[u8]) -> Result<()> {
    Ok(()) // Discard
  }
}

/// One file per day in a single directory, freshness taken from the file's
/// modification time.
pub struct FileStorage {
  dir: PathBuf,
}

impl FileStorage {
  /// Open storage rooted at `dir`, creating it if needed.
  ///
  /// A directory that cannot be created is not an error here; the first
  /// `put` will report it.
  pub fn open(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    if let Err(e) = std::fs::create_dir_all(&dir) {
      warn!(dir = %dir.display(), error = %e, "Failed to create cache directory");
    }
    Self { dir }
  }

  /// Get the default cache directory.
  pub fn default_dir() -> PathBuf {
    dirs::cache_dir()
      .map(|p| p.join("glimpse"))
      .unwrap_or_else(|| PathBuf::from(".cache").join("glimpse"))
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path_for(&self, key: DateKey) -> PathBuf {
    self.dir.join(key.file_name())
  }

  fn read_entry(path: &Path) -> std::io::Result<(Vec<u8>, SystemTime)> {
    let modified = std::fs::metadata(path)?.modified()?;
    let body = std::fs::read(path)?;
    Ok((body, modified))
  }
}

impl CacheStorage for FileStorage {
  fn get(&self, key: DateKey, ttl: Duration) -> CacheLookup {
    let path = self.path_for(key);

    let (body, modified) = match Self::read_entry(&path) {
      Ok(entry) => entry,
      Err(e) => {
        debug!(path = %path.display(), error = %e, "Cache miss");
        return CacheLookup::Missing;
      }
    };

    // A modification time in the future counts as just written
    let age = SystemTime::now()
      .duration_since(modified)
      .unwrap_or(Duration::ZERO);
    let cached_at = DateTime::<Utc>::from(modified);

    if age <= ttl {
      CacheLookup::Fresh { body, cached_at }
    } else {
      debug!(path = %path.display(), age_secs = age.as_secs(), "Cache entry is stale");
      CacheLookup::Stale { body, cached_at }
    }
  }

  fn put(&self, key: DateKey, body: &[u8]) -> Result<()> {
    let path = self.path_for(key);

    std::fs::create_dir_all(&self.dir)
      .map_err(|e| eyre!("Failed to create cache directory {}: {}", self.dir.display(), e))?;

    // The temp file lives in the same directory so the rename stays on one
    // filesystem. It is removed on drop if anything below fails.
    let mut tmp = tempfile::Builder::new()
      .prefix("tmp-")
      .suffix(".json")
      .tempfile_in(&self.dir)
      .map_err(|e| eyre!("Failed to create temp file in {}: {}", self.dir.display(), e))?;

    tmp
      .write_all(body)
      .map_err(|e| eyre!("Failed to write cache entry: {}", e))?;
    tmp
      .as_file()
      .sync_all()
      .map_err(|e| eyre!("Failed to flush cache entry: {}", e))?;

    tmp
      .persist(&path)
      .map_err(|e| eyre!("Failed to move cache entry into {}: {}", path.display(), e.error))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const DAY: Duration = Duration::from_secs(24 * 60 * 60);

  fn key() -> DateKey {
    DateKey::new(7, 20).unwrap()
  }

  fn backdate(path: &Path, by: Duration) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
  }

  #[test]
  fn test_get_after_put_is_fresh() {
    let tmp = TempDir::new().unwrap();
    let storage = FileStorage::open(tmp.path());
    let body = br#"{"events":[{"year":1969,"text":"Moon landing"}]}"#;

    storage.put(key(), body).unwrap();

    match storage.get(key(), DAY) {
      CacheLookup::Fresh { body: cached, .. } => assert_eq!(cached, body.to_vec()),
      other => panic!("expected fresh entry, got {:?}", other),
    }
  }

  #[test]
  fn test_get_missing_entry() {
    let tmp = TempDir::new().unwrap();
    let storage = FileStorage::open(tmp.path());

    assert_eq!(storage.get(key(), DAY), CacheLookup::Missing);
  }

  #[test]
  fn test_entry_older_than_ttl_is_stale() {
    let tmp = TempDir::new().unwrap();
    let storage = FileStorage::open(tmp.path());
    storage.put(key(), b"{}").unwrap();

    backdate(&storage.path_for(key()), Duration::from_secs(2 * 60 * 60));

    let lookup = storage.get(key(), Duration::from_secs(60 * 60));
    assert!(lookup.is_found());
    assert!(!lookup.is_fresh());
    assert!(storage.get(key(), DAY).is_fresh());
  }

  #[test]
  fn test_put_overwrites_without_leaving_temp_files() {
    let tmp = TempDir::new().unwrap();
    let storage = FileStorage::open(tmp.path());

    storage.put(key(), b"first").unwrap();
    storage.put(key(), b"second").unwrap();

    let names: Vec<String> = std::fs::read_dir(tmp.path())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, vec!["onthisday_07_20.json".to_string()]);
    assert_eq!(
      std::fs::read(storage.path_for(key())).unwrap(),
      b"second".to_vec()
    );
  }

  #[test]
  fn test_open_creates_nested_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("a").join("b");

    let storage = FileStorage::open(&dir);

    assert!(dir.is_dir());
    assert_eq!(storage.dir(), dir.as_path());
  }

  #[test]
  fn test_unusable_directory_fails_on_put_not_open() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let storage = FileStorage::open(&blocker);

    assert!(storage.put(key(), b"{}").is_err());
    assert_eq!(storage.get(key(), DAY), CacheLookup::Missing);
  }

  #[test]
  fn test_unreadable_entry_is_missing() {
    let tmp = TempDir::new().unwrap();
    let storage = FileStorage::open(tmp.path());
    std::fs::create_dir(storage.path_for(key())).unwrap();

    assert_eq!(storage.get(key(), DAY), CacheLookup::Missing);
  }

  #[test]
  fn test_noop_storage_never_hits() {
    let storage = NoopStorage;
    storage.put(key(), b"{}").unwrap();
    assert_eq!(storage.get(key(), DAY), CacheLookup::Missing);
  }
}
