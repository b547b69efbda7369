//! Core types for GoMarket.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use cart::{Cart, CartBuildError, Mutation};
pub use id::ProductId;
pub use price::Price;
pub use product::{CartProduct, NewProduct};
pub use quantity::{Quantity, QuantityError};
