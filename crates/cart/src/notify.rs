//! User-visible cart notifications.
//!
//! The store raises a confirmation after a product is added. Presentation is
//! up to the host: a mobile shell shows a dialog, the CLI logs it.

use tracing::info;

/// Title shown after a product is added to the cart.
pub const PRODUCT_ADDED_TITLE: &str = "Produto adicionado";

/// Message shown after a product is added to the cart.
pub const PRODUCT_ADDED_MESSAGE: &str = "Produto adicionado com sucesso ao carrinho de compras.";

/// Surfaces a short confirmation to the shopper.
pub trait Notifier: Send + Sync {
    /// Show a notification with a title and a message.
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(title, message, "Cart notification");
    }
}

/// Notifier that discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}
