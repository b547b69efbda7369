//! The cart store.
//!
//! [`CartStore`] owns the in-memory cart, mirrors it to storage, and publishes
//! every change on a `watch` channel.
//!
//! # Lifecycle
//!
//! 1. `CartStore::new` creates a store in the [`LoadState::Loading`] state
//! 2. `load` (or `spawn_load`) reads the persisted snapshot and moves the
//!    store to [`LoadState::Ready`], or to [`LoadState::Failed`] if storage
//!    could not be read
//! 3. Mutations are accepted only once the store is ready
//!
//! The snapshot is read once. Calling `load` on a ready store does nothing; a
//! failed load may be retried.
//!
//! Each mutation holds the cart lock across the storage write, so snapshots
//! land in storage in the same order the mutations were applied.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use gomarket_core::{Cart, Mutation, NewProduct, ProductId};

use crate::config::SnapshotTiming;
use crate::error::{CartError, Result};
use crate::notify::{Notifier, PRODUCT_ADDED_MESSAGE, PRODUCT_ADDED_TITLE};
use crate::snapshot::{self, CART_KEY};
use crate::storage::KeyValueStorage;

/// Whether the persisted cart has been loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The initial load has not completed.
    Loading,
    /// The cart reflects storage and accepts mutations.
    Ready,
    /// The last load attempt failed. The cart is empty and rejects mutations
    /// until a retry succeeds.
    Failed,
}

/// What subscribers see after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Load state of the store.
    pub state: LoadState,
    /// Current cart contents.
    pub cart: Cart,
}

/// Per-store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Storage key holding the snapshot.
    pub key: String,
    /// Which cart state mutations persist.
    pub timing: SnapshotTiming,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: CART_KEY.to_string(),
            timing: SnapshotTiming::default(),
        }
    }
}

/// Shopping-cart store shared across the UI.
///
/// This struct is cheaply cloneable via `Arc`; every clone refers to the same
/// cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    notifier: Arc<dyn Notifier>,
    options: StoreOptions,
    cart: Mutex<Cart>,
    published: watch::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.inner.storage)
            .field("options", &self.inner.options)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store that has not loaded yet.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
        options: StoreOptions,
    ) -> Self {
        let (published, _) = watch::channel(CartSnapshot {
            state: LoadState::Loading,
            cart: Cart::new(),
        });

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                notifier,
                options,
                cart: Mutex::new(Cart::new()),
                published,
            }),
        }
    }

    /// Create a store and load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is invalid.
    pub async fn open(
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
        options: StoreOptions,
    ) -> Result<Self> {
        let store = Self::new(storage, notifier, options);
        store.load().await?;
        Ok(store)
    }

    /// Read the persisted snapshot into memory and mark the store ready.
    ///
    /// A missing key yields an empty cart. Once the store is ready, further
    /// calls return immediately without touching storage or the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is invalid.
    /// The store moves to [`LoadState::Failed`] in that case.
    #[instrument(skip(self), fields(key = %self.inner.options.key))]
    pub async fn load(&self) -> Result<()> {
        let mut cart = self.inner.cart.lock().await;

        if self.is_ready() {
            debug!("Cart already loaded");
            return Ok(());
        }

        match self.read_snapshot().await {
            Ok(loaded) => {
                *cart = loaded;
                self.publish(&cart, LoadState::Ready);
                info!(
                    products = cart.len(),
                    items = cart.item_count(),
                    "Cart loaded"
                );
                Ok(())
            }
            Err(e) => {
                self.publish(&cart, LoadState::Failed);
                Err(e)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<Cart> {
        match self.inner.storage.get(&self.inner.options.key).await? {
            Some(json) => Ok(snapshot::decode(&json)?),
            None => Ok(Cart::new()),
        }
    }

    /// Load the persisted cart on a background task.
    ///
    /// Failures are logged at `error` level and returned through the handle.
    pub fn spawn_load(&self) -> JoinHandle<Result<()>> {
        let store = self.clone();
        tokio::spawn(async move {
            let result = store.load().await;
            if let Err(e) = &result {
                error!(error = %e, "Failed to load cart");
            }
            result
        })
    }

    /// Wait until the initial load has finished, successfully or not.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LoadFailed`] if the load failed. The cause is
    /// returned by `load` itself.
    pub async fn ready(&self) -> Result<()> {
        let mut rx = self.subscribe();
        // The sender lives in `self.inner`, so the channel cannot close here.
        let state = match rx
            .wait_for(|snapshot| snapshot.state != LoadState::Loading)
            .await
        {
            Ok(snapshot) => snapshot.state,
            Err(_) => LoadState::Failed,
        };

        match state {
            LoadState::Ready => Ok(()),
            LoadState::Loading | LoadState::Failed => Err(CartError::LoadFailed),
        }
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.inner.published.borrow().state
    }

    /// Whether the initial load has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// Current cart contents.
    #[must_use]
    pub fn products(&self) -> Cart {
        self.inner.published.borrow().cart.clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver sees a new value after the load and after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.published.subscribe()
    }

    /// Storage key this store persists to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.options.key
    }

    /// Which cart state mutations persist.
    #[must_use]
    pub fn timing(&self) -> SnapshotTiming {
        self.inner.options.timing
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gains a unit and moves to the end. After
    /// the cart is persisted, the shopper is shown a confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotReady`] before the load completes,
    /// [`CartError::LoadFailed`] after a failed load, or a storage error if
    /// the snapshot could not be written. On a storage error the
    /// in-memory cart keeps the change and no confirmation is shown.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: NewProduct) -> Result<Mutation> {
        let mutation = self.mutate(|cart| cart.add(product)).await?;
        self.inner
            .notifier
            .notify(PRODUCT_ADDED_TITLE, PRODUCT_ADDED_MESSAGE);
        Ok(mutation)
    }

    /// Add one unit of a product already in the cart.
    ///
    /// An unknown ID leaves the cart untouched; the snapshot is still written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotReady`] before the load completes, or a storage
    /// error if the snapshot could not be written.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: &ProductId) -> Result<Mutation> {
        self.mutate(|cart| cart.increment(id)).await
    }

    /// Remove one unit of a product, dropping it from the cart at zero.
    ///
    /// An unknown ID leaves the cart untouched; the snapshot is still written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotReady`] before the load completes, or a storage
    /// error if the snapshot could not be written.
    #[instrument(skip(self))]
    pub async fn decrement(&self, id: &ProductId) -> Result<Mutation> {
        self.mutate(|cart| cart.decrement(id)).await
    }

    /// Empty the cart and delete the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotReady`] before the load completes, or a storage
    /// error if the snapshot could not be removed.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.ensure_ready()?;

        let mut cart = self.inner.cart.lock().await;
        cart.clear();
        self.publish(&cart, LoadState::Ready);
        self.inner.storage.remove(&self.inner.options.key).await?;

        info!("Cart cleared");
        Ok(())
    }

    /// Apply a mutation, publish the result and persist a snapshot.
    async fn mutate<F>(&self, apply: F) -> Result<Mutation>
    where
        F: FnOnce(&mut Cart) -> Mutation,
    {
        self.ensure_ready()?;

        let mut cart = self.inner.cart.lock().await;

        let previous = match self.inner.options.timing {
            SnapshotTiming::PreMutation => Some(snapshot::encode(&cart)?),
            SnapshotTiming::PostMutation => None,
        };

        let mutation = apply(&mut cart);
        self.publish(&cart, LoadState::Ready);

        let json = match previous {
            Some(json) => json,
            None => snapshot::encode(&cart)?,
        };
        self.inner
            .storage
            .set(&self.inner.options.key, json)
            .await?;

        debug!(
            ?mutation,
            products = cart.len(),
            items = cart.item_count(),
            "Cart persisted"
        );
        Ok(mutation)
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            LoadState::Ready => Ok(()),
            LoadState::Loading => Err(CartError::NotReady),
            LoadState::Failed => Err(CartError::LoadFailed),
        }
    }

    fn publish(&self, cart: &Cart, state: LoadState) {
        self.inner.published.send_replace(CartSnapshot {
            state,
            cart: cart.clone(),
        });
    }
}
