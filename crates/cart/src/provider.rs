//! Ambient access to the cart store.
//!
//! Most code should take a [`CartStore`] as a parameter. For code deep in a
//! call tree that cannot, [`CartProvider`] installs a store for the duration of
//! a future and [`use_cart`] retrieves it.
//!
//! ```rust,ignore
//! CartProvider::new(store)
//!     .scope(async {
//!         let cart = use_cart();
//!         cart.increment(&id).await
//!     })
//!     .await?;
//! ```

use std::future::Future;

use crate::error::{CartError, Result};
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Makes a store available to [`use_cart`] within a scope.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    /// Create a provider for `store`.
    #[must_use]
    pub const fn new(store: CartStore) -> Self {
        Self { store }
    }

    /// Run `future` with the store installed.
    pub async fn scope<F>(self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.store, future).await
    }

    /// Run a synchronous closure with the store installed.
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(self.store, f)
    }
}

/// Get the store installed by the enclosing [`CartProvider`].
///
/// # Errors
///
/// Returns [`CartError::NoProvider`] outside a provider scope.
pub fn try_use_cart() -> Result<CartStore> {
    CURRENT_CART
        .try_with(CartStore::clone)
        .map_err(|_| CartError::NoProvider)
}

/// Get the store installed by the enclosing [`CartProvider`].
///
/// # Panics
///
/// Panics outside a provider scope. Reaching for the cart without a provider
/// is a wiring bug, not a runtime condition to recover from.
#[must_use]
pub fn use_cart() -> CartStore {
    match try_use_cart() {
        Ok(store) => store,
        Err(e) => panic!("{e}"),
    }
}
