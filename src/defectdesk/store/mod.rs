//! # Key-Value Blob Store
//!
//! The reception catalog is a single JSON blob stored under one fixed key. This
//! module provides the storage seam for it: the [`KvStore`] trait and two
//! implementations.
//!
//! - [`fs::FsKvStore`]: production store, one `<key>.json` file per key,
//!   written atomically (temp file + rename).
//! - [`memory::MemKvStore`]: in-memory store for tests, with write-error
//!   simulation.
//!
//! The store knows nothing about receptions; [`crate::catalog::CatalogStore`]
//! owns the schema.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Durable string blobs addressed by key.
pub trait KvStore {
    /// Returns `None` when nothing has been stored under `key` yet.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`.
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
