//! Core types for the feed cache.

use chrono::{DateTime, Utc};

/// Outcome of looking up a cached feed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
  /// No entry, or the entry could not be read
  Missing,
  /// Entry exists but is older than the TTL
  Stale {
    body: Vec<u8>,
    cached_at: DateTime<Utc>,
  },
  /// Entry exists and is within the TTL
  Fresh {
    body: Vec<u8>,
    cached_at: DateTime<Utc>,
  },
}

impl CacheLookup {
  #[cfg(test)]
  pub fn is_found(&self) -> bool {
    !matches!(self, CacheLookup::Missing)
  }

  #[cfg(test)]
  pub fn is_fresh(&self) -> bool {
    matches!(self, CacheLookup::Fresh { .. })
  }

  /// The body and its timestamp, only when fresh.
  ///
  /// Stale entries are never served.
  pub fn into_fresh(self) -> Option<(Vec<u8>, DateTime<Utc>)> {
    match self {
      CacheLookup::Fresh { body, cached_at } => Some((body, cached_at)),
      _ => None,
    }
  }
}

/// Result from a fetch, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from a fresh cached body.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where fetched data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  /// Fresh cached body, no request made
  Cache,
}
