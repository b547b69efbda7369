//! GoMarket Core - Shared cart domain types.
//!
//! This crate provides the types shared by every GoMarket component:
//! - `cart` - The cart store (storage, notifications, provider)
//! - `cli` - Command-line front end for inspecting and editing the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no storage
//! access, no async runtime. The cart mutation rules live here so they can be
//! tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities, plus
//!   the cart line item and cart collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
