//! Integration tests for GoMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store behaviour against in-memory storage
//! - `cart_persistence` - Snapshot timing, reloads and file-backed storage
//!
//! This library holds the fixtures shared by those tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use gomarket_cart::{
    CartStore, KeyValueStorage, MemoryStorage, Notifier, SnapshotTiming, StorageError,
    StoreOptions,
};
use gomarket_core::{NewProduct, Price, ProductId};

/// Build a catalog product with a predictable title, image and price.
#[must_use]
pub fn product(id: &str) -> NewProduct {
    NewProduct {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://img.example/{id}.png"),
        price: Price::from_cents(1000),
    }
}

/// A notifier that remembers every notification it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Notifications shown so far, oldest first.
    #[must_use]
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((title.to_string(), message.to_string()));
    }
}

/// Storage that reads normally but rejects every write.
#[derive(Debug, Default)]
pub struct ReadOnlyStorage {
    inner: MemoryStorage,
}

impl ReadOnlyStorage {
    /// Wrap a pre-populated memory storage.
    #[must_use]
    pub const fn new(inner: MemoryStorage) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl KeyValueStorage for ReadOnlyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage is read-only".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("storage is read-only".to_string()))
    }
}

/// A loaded store over fresh memory storage, returned with its storage and
/// notifier for inspection.
///
/// # Panics
///
/// Panics if the empty storage cannot be loaded, which would be a bug in the
/// memory backend.
pub async fn memory_store(
    timing: SnapshotTiming,
) -> (CartStore, Arc<MemoryStorage>, Arc<RecordingNotifier>) {
    let storage = Arc::new(MemoryStorage::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let store = CartStore::new(
        storage.clone(),
        notifier.clone(),
        StoreOptions {
            timing,
            ..StoreOptions::default()
        },
    );
    if let Err(e) = store.load().await {
        panic!("loading empty memory storage failed: {e}");
    }
    (store, storage, notifier)
}
