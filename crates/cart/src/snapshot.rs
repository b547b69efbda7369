//! Persisted cart snapshot format.
//!
//! A snapshot is the cart serialized as a JSON array of line items:
//!
//! ```json
//! [{"id":"a","title":"Shoe","image_url":"https://...","price":42.0,"quantity":2}]
//! ```
//!
//! There is no version field. A snapshot that fails to decode is reported as
//! an error rather than silently discarded.

use gomarket_core::Cart;
use thiserror::Error;

/// Storage key the mobile client has always used for the cart.
pub const CART_KEY: &str = "GoMarketPlace:cart";

/// Errors that can occur when encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Stored JSON is malformed or violates a cart invariant.
    #[error("Invalid cart snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    /// Cart could not be serialized.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Serialize a cart to its snapshot form.
///
/// # Errors
///
/// Returns [`SnapshotError::Encode`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, SnapshotError> {
    serde_json::to_string(cart).map_err(SnapshotError::Encode)
}

/// Parse a snapshot back into a cart.
///
/// # Errors
///
/// Returns [`SnapshotError::Decode`] if the JSON is malformed, a quantity is
/// zero, or two line items share an ID.
pub fn decode(json: &str) -> Result<Cart, SnapshotError> {
    serde_json::from_str(json).map_err(SnapshotError::Decode)
}
