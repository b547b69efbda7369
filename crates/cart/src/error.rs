//! Cart store errors.

use thiserror::Error;

use crate::snapshot::SnapshotError;
use crate::storage::StorageError;

/// Errors returned by [`CartStore`](crate::CartStore) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted cart could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A mutation was attempted before the initial load finished.
    #[error("Cart is still loading")]
    NotReady,

    /// A mutation was attempted, or readiness awaited, after the initial load
    /// failed.
    #[error("Cart failed to load")]
    LoadFailed,

    /// The ambient accessor was used outside a `CartProvider`.
    #[error("use_cart must be used within a CartProvider")]
    NoProvider,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        assert_eq!(CartError::NotReady.to_string(), "Cart is still loading");
        assert_eq!(CartError::LoadFailed.to_string(), "Cart failed to load");
        assert_eq!(
            CartError::NoProvider.to_string(),
            "use_cart must be used within a CartProvider"
        );

        let err = CartError::from(StorageError::Backend("disk full".to_string()));
        assert_eq!(err.to_string(), "Storage error: Storage backend error: disk full");
    }
}
