//! Cache layer applying the TTL policy on top of a storage backend.

use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};

use super::storage::CacheStorage;
use super::traits::CacheLookup;
use crate::history::types::DateKey;

/// Default time a cached feed body stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache layer that decides which cached bodies may be served.
///
/// Stale entries are treated exactly like missing ones. Writes are best
/// effort: a failed write is logged and otherwise ignored.
pub struct CacheLayer<S: CacheStorage> {
  storage: S,
  /// How long before cached data is considered stale
  ttl: Duration,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage,
      ttl: DEFAULT_TTL,
    }
  }

  /// Set the time-to-live for cached data.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  #[cfg(test)]
  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// Look up the full cache state for `key`.
  pub fn lookup(&self, key: DateKey) -> CacheLookup {
    let lookup = self.storage.get(key, self.ttl);
    match &lookup {
      CacheLookup::Missing => debug!(%key, "Cache miss"),
      CacheLookup::Stale { body, cached_at } => {
        debug!(%key, %cached_at, bytes = body.len(), "Cache entry expired")
      }
      CacheLookup::Fresh { .. } => {}
    }
    lookup
  }

  /// Store a body, logging instead of failing.
  pub fn store(&self, key: DateKey, body: &[u8]) {
    match self.storage.put(key, body) {
      Ok(()) => debug!(%key, sha256 = %body_digest(body), "Cached feed body"),
      Err(e) => warn!(%key, error = %e, "Failed to write cache entry"),
    }
  }
}

/// Hex SHA-256 of a feed body, used to compare payloads in the logs.
pub fn body_digest(body: &[u8]) -> String {
  hex::encode(Sha256::digest(body))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::{FileStorage, NoopStorage};
  use std::time::SystemTime;
  use tempfile::TempDir;

  fn key() -> DateKey {
    DateKey::new(1, 1).unwrap()
  }

  #[test]
  fn test_store_then_lookup_with_ttl() {
    let tmp = TempDir::new().unwrap();
    let cache = CacheLayer::new(FileStorage::open(tmp.path())).with_ttl(Duration::from_secs(60));

    cache.store(key(), b"{\"events\":[]}");
    assert!(cache.lookup(key()).is_fresh());

    let path = cache.storage().path_for(key());
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file
      .set_modified(SystemTime::now() - Duration::from_secs(120))
      .unwrap();

    let lookup = cache.lookup(key());
    assert!(lookup.is_found());
    assert_eq!(lookup.into_fresh(), None);
  }

  #[test]
  fn test_store_failure_is_swallowed() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let cache = CacheLayer::new(FileStorage::open(&blocker));
    cache.store(key(), b"{}");

    assert!(!cache.lookup(key()).is_found());
  }

  #[test]
  fn test_noop_backend() {
    let cache = CacheLayer::new(NoopStorage);
    cache.store(key(), b"{}");
    assert!(!cache.lookup(key()).is_found());
  }

  #[test]
  fn test_body_digest() {
    assert_eq!(
      body_digest(b""),
      "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
  }
}
