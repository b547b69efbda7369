//! The cart collection and its mutation rules.
//!
//! These rules are pure: the store in `gomarket-cart` applies them under its
//! lock and takes care of persistence and notification.

use serde::{Deserialize, Serialize};

use super::{CartProduct, NewProduct, ProductId};

/// Errors that can occur when building a [`Cart`] from raw line items.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartBuildError {
    /// Two line items share the same product ID.
    #[error("duplicate product in cart: {0}")]
    DuplicateProduct(ProductId),
}

/// What a mutation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A new line item was appended with quantity 1.
    Added,
    /// An existing line item gained a unit and moved to the end.
    Readded,
    /// An existing line item gained a unit in place.
    Incremented,
    /// An existing line item lost a unit in place.
    Decremented,
    /// The last unit of a line item was removed, and the item with it.
    Removed,
    /// No line item matched; the cart is untouched.
    Unchanged,
}

impl Mutation {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered collection of line items, at most one per product ID.
///
/// Order reflects insertion history. Re-adding a product that is already in
/// the cart moves it to the end; `increment` and `decrement` keep positions.
///
/// Serializes as a plain JSON array of [`CartProduct`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartProduct>", into = "Vec<CartProduct>")]
pub struct Cart {
    products: Vec<CartProduct>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a cart from line items, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CartBuildError::DuplicateProduct`] if two items share an ID.
    pub fn from_products(products: Vec<CartProduct>) -> Result<Self, CartBuildError> {
        for (i, item) in products.iter().enumerate() {
            if products.iter().skip(i + 1).any(|other| other.id == item.id) {
                return Err(CartBuildError::DuplicateProduct(item.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Line items in cart order.
    #[must_use]
    pub fn products(&self) -> &[CartProduct] {
        &self.products
    }

    /// Look up a line item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartProduct> {
        self.products.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total units across all line items (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.products
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of a product.
    ///
    /// An unseen product is appended with quantity 1. A product already in the
    /// cart keeps its stored title, image and price, gains a unit, and moves to
    /// the end of the cart.
    pub fn add(&mut self, product: NewProduct) -> Mutation {
        match self.position(&product.id) {
            Some(index) => {
                let mut item = self.products.remove(index);
                item.quantity = item.quantity.incremented();
                self.products.push(item);
                Mutation::Readded
            }
            None => {
                self.products.push(CartProduct::from(product));
                Mutation::Added
            }
        }
    }

    /// Add one unit of a product already in the cart, keeping its position.
    pub fn increment(&mut self, id: &ProductId) -> Mutation {
        match self.products.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.incremented();
                Mutation::Incremented
            }
            None => Mutation::Unchanged,
        }
    }

    /// Remove one unit of a product, dropping the line item at zero.
    pub fn decrement(&mut self, id: &ProductId) -> Mutation {
        let Some(index) = self.position(id) else {
            return Mutation::Unchanged;
        };
        let Some(item) = self.products.get_mut(index) else {
            return Mutation::Unchanged;
        };
        match item.quantity.decremented() {
            Some(quantity) => {
                item.quantity = quantity;
                Mutation::Decremented
            }
            None => {
                self.products.remove(index);
                Mutation::Removed
            }
        }
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.products.clear();
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|item| &item.id == id)
    }
}

impl TryFrom<Vec<CartProduct>> for Cart {
    type Error = CartBuildError;

    fn try_from(products: Vec<CartProduct>) -> Result<Self, Self::Error> {
        Self::from_products(products)
    }
}

impl From<Cart> for Vec<CartProduct> {
    fn from(cart: Cart) -> Self {
        cart.products
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartProduct;
    type IntoIter = std::slice::Iter<'a, CartProduct>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
