//! File-backed storage backend.
//!
//! Each key maps to `<data_dir>/<percent-encoded key>.json`. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{KeyValueStorage, StorageError};

/// Key-value storage persisted as files in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`.
    ///
    /// The directory is created on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!(path = %path.display(), "Wrote storage entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for_encodes_key() {
        let storage = FileStorage::new("/data");
        let path = storage.path_for("GoMarketPlace:cart");
        assert_eq!(path, PathBuf::from("/data/GoMarketPlace%3Acart.json"));
    }

    #[test]
    fn test_path_for_keeps_keys_inside_dir() {
        let storage = FileStorage::new("/data");
        let path = storage.path_for("../escape");
        assert_eq!(path.parent(), Some(Path::new("/data")));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get("GoMarketPlace:cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_dir_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.set("k", "[1,2,3]".to_string()).await.unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("[1,2,3]"));
        assert!(!storage.path_for("k").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("k", "v".to_string()).await.unwrap();
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();

        assert!(!storage.path_for("k").exists());
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        // A directory where the file should be cannot be read as a string.
        std::fs::create_dir_all(storage.path_for("k")).unwrap();

        let err = storage.get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { ref key, .. } if key == "k"));
    }
}
