//! GoMarket Cart - Persistent shopping-cart store.
//!
//! This crate owns the cart a shopper builds on the device. It keeps the
//! cart in memory, mirrors every change to a key-value slot in local storage,
//! and lets UI code observe changes instead of polling.
//!
//! # Architecture
//!
//! - [`CartStore`] - Cheaply cloneable handle holding the cart behind a lock
//! - [`storage`] - `KeyValueStorage` trait with in-memory and file backends
//! - [`snapshot`] - JSON codec for the persisted cart
//! - [`notify`] - Confirmation notifications shown after adding a product
//! - [`provider`] - Task-local accessor for code that cannot take the store
//!   as a parameter
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gomarket_cart::{CartStore, LogNotifier, MemoryStorage, StoreOptions};
//!
//! let store = CartStore::open(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(LogNotifier),
//!     StoreOptions::default(),
//! )
//! .await?;
//!
//! store.add_to_cart(product).await?;
//! store.increment(&product_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notify;
pub mod provider;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, SnapshotTiming};
pub use error::CartError;
pub use notify::{LogNotifier, Notifier, SilentNotifier};
pub use provider::{CartProvider, try_use_cart, use_cart};
pub use snapshot::SnapshotError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartSnapshot, CartStore, LoadState, StoreOptions};
