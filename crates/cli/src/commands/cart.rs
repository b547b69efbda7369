//! Cart commands.
//!
//! Each command opens the file-backed store, applies one operation and logs
//! the resulting cart.
//!
//! # Environment Variables
//!
//! - `GOMARKET_DATA_DIR` - Directory holding the stored cart
//! - `GOMARKET_SNAPSHOT_TIMING` - `post` or `pre`

use gomarket_cart::{CartError, CartStore};
use gomarket_core::{Cart, Mutation, NewProduct, Price, ProductId};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The price argument is not a decimal number.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// A product ID argument is empty.
    #[error("Product ID cannot be empty")]
    EmptyId,

    /// The cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Build a product from command-line arguments.
///
/// # Errors
///
/// Returns an error if the ID is empty or the price is not a non-negative
/// decimal.
pub fn parse_product(
    id: String,
    title: String,
    image_url: String,
    price: &str,
) -> Result<NewProduct, CommandError> {
    let id = parse_id(id)?;
    let price = price
        .trim()
        .parse::<Price>()
        .map_err(|e| CommandError::InvalidPrice(format!("{price}: {e}")))?;
    if price.amount().is_sign_negative() {
        return Err(CommandError::InvalidPrice(format!("{price}: must not be negative")));
    }

    Ok(NewProduct {
        id,
        title,
        image_url,
        price,
    })
}

fn parse_id(id: String) -> Result<ProductId, CommandError> {
    if id.trim().is_empty() {
        return Err(CommandError::EmptyId);
    }
    Ok(ProductId::new(id))
}

/// Log the cart contents.
pub fn list(store: &CartStore) {
    log_cart(&store.products());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub async fn add(store: &CartStore, product: NewProduct) -> Result<(), CommandError> {
    let id = product.id.clone();
    let mutation = store.add_to_cart(product).await?;
    info!(product_id = %id, ?mutation, "Added to cart");
    log_cart(&store.products());
    Ok(())
}

/// Add one unit of a product already in the cart.
///
/// # Errors
///
/// Returns an error if the ID is empty or the cart cannot be persisted.
pub async fn increment(store: &CartStore, id: String) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let mutation = store.increment(&id).await?;
    report(&id, mutation);
    log_cart(&store.products());
    Ok(())
}

/// Remove one unit of a product.
///
/// # Errors
///
/// Returns an error if the ID is empty or the cart cannot be persisted.
pub async fn decrement(store: &CartStore, id: String) -> Result<(), CommandError> {
    let id = parse_id(id)?;
    let mutation = store.decrement(&id).await?;
    report(&id, mutation);
    log_cart(&store.products());
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the stored snapshot cannot be removed.
pub async fn clear(store: &CartStore) -> Result<(), CommandError> {
    store.clear().await?;
    info!(key = store.key(), "Cart emptied");
    Ok(())
}

fn report(id: &ProductId, mutation: Mutation) {
    if mutation.changed() {
        info!(product_id = %id, ?mutation, "Cart updated");
    } else {
        warn!(product_id = %id, "Product not in cart");
    }
}

fn log_cart(cart: &Cart) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!(products = cart.len(), items = cart.item_count(), "Cart contents");
    for item in cart {
        info!(
            "  {} x{} - {} @ {} ({})",
            item.id, item.quantity, item.title, item.price, item.image_url
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_valid() {
        let product = parse_product(
            "42".to_string(),
            "Sneaker".to_string(),
            "https://img.example/42.png".to_string(),
            "199.90",
        )
        .unwrap();
        assert_eq!(product.id.as_str(), "42");
        assert_eq!(product.price, Price::from_cents(19990));
    }

    #[test]
    fn test_parse_product_invalid_price() {
        let result = parse_product("1".to_string(), "T".to_string(), "u".to_string(), "ten");
        assert!(matches!(result, Err(CommandError::InvalidPrice(_))));
    }

    #[test]
    fn test_parse_product_negative_price() {
        let result = parse_product("1".to_string(), "T".to_string(), "u".to_string(), "-1");
        assert!(matches!(result, Err(CommandError::InvalidPrice(_))));
    }

    #[test]
    fn test_parse_product_empty_id() {
        let result = parse_product("  ".to_string(), "T".to_string(), "u".to_string(), "1");
        assert!(matches!(result, Err(CommandError::EmptyId)));
    }
}
