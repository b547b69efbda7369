//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStorage, StorageError};

/// Process-local key-value storage.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous() {
        let storage = MemoryStorage::new();
        storage.set("k", "first".to_string()).await.unwrap();
        storage.set("k", "second".to_string()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let storage = MemoryStorage::with_entry("k", "v");
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }
}
