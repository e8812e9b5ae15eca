//! # Storage Layer
//!
//! The store is a tree of [`Bucket`]s. Each bucket holds child buckets and
//! key/value entries, all named by arbitrary byte strings.
//!
//! Everything above this module reaches the tree through the [`DataStore`]
//! trait and its two transaction kinds:
//!
//! - [`DataStore::view`] hands a closure a read-only snapshot of the root.
//! - [`DataStore::update`] hands a closure a private, mutable copy of the
//!   root. The copy replaces the stored tree only if the closure returns
//!   `Ok`, so a failed operation leaves nothing half-written.
//!
//! Bucket references handed to a closure cannot escape it, which keeps every
//! path resolution inside its transaction.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one JSON document per database, names and values
//!   hex-encoded. Writers hold an exclusive lock on `<db>.lock` and replace
//!   the document atomically (write to a temp file, then rename).
//! - [`memory::InMemoryStore`]: no persistence, for tests.
//!
//! ## Storage Format
//!
//! ```text
//! {
//!   "buckets": { "666f6f": { "keys": { "6b6579": "76616c7565" } } },
//!   "keys":    { ... }
//! }
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod bucket;
pub mod fs;
pub mod memory;

pub use bucket::{Bucket, BucketStats, BucketStructure};

/// Database-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbStats {
    pub path: String,
    /// Size of the stored document in bytes.
    pub file_size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub root: BucketStats,
}

/// Transactional access to a bucket tree.
pub trait DataStore {
    /// Runs `f` against a consistent snapshot of the root bucket.
    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Bucket) -> Result<T>;

    /// Runs `f` against a mutable copy of the root bucket and commits the
    /// copy when `f` succeeds.
    fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Bucket) -> Result<T>;

    fn db_stats(&self) -> Result<DbStats>;
}
