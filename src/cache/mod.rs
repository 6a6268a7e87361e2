//! On-disk cache for raw feed bodies.
//!
//! This module provides a small, feed-agnostic cache that:
//! - Stores one verbatim response body per calendar day
//! - Derives freshness from the file modification time and a caller TTL
//! - Writes atomically (temp file, fsync, rename) so readers never see a
//!   partial body

mod layer;
mod storage;
mod traits;

pub use layer::{body_digest, CacheLayer, DEFAULT_TTL};
pub use storage::{CacheStorage, FileStorage};
#[cfg(test)]
pub use storage::NoopStorage;
pub use traits::{CacheResult, CacheSource};
