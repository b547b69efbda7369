//! Cart line item types.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A catalog product being added to the cart.
///
/// This is a line item without a quantity; the cart decides the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Catalog product ID, unique within the cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

/// One distinct product in the cart.
///
/// Field names match the persisted JSON snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Catalog product ID, unique within the cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units in the cart, always at least one.
    pub quantity: Quantity,
}

impl CartProduct {
    /// Create a line item with the given quantity.
    #[must_use]
    pub fn with_quantity(product: NewProduct, quantity: Quantity) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }
}

impl From<NewProduct> for CartProduct {
    fn from(product: NewProduct) -> Self {
        Self::with_quantity(product, Quantity::ONE)
    }
}
