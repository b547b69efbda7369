//! Key-value storage for the persisted cart.
//!
//! The store only ever touches a single key, but backends are written as a
//! general string key-value slot so the same trait can back other client
//! state later.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - Process-local map, used in tests and previews
//! - [`FileStorage`] - One file per key under a data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// An asynchronous string key-value store.
///
/// All methods take `&self`; implementations use interior mutability.
#[async_trait]
pub trait KeyValueStorage: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
