//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GOMARKET_DATA_DIR` - Directory for file-backed storage (default: `.gomarket`)
//! - `GOMARKET_CART_KEY` - Storage key for the cart (default: `GoMarketPlace:cart`)
//! - `GOMARKET_SNAPSHOT_TIMING` - `post` (default) persists the cart after each
//!   change; `pre` persists the cart as it was before the change
//! - `GOMARKET_NOTIFY` - Show add-to-cart confirmations (default: `true`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::notify::{LogNotifier, Notifier, SilentNotifier};
use crate::snapshot::CART_KEY;
use crate::storage::FileStorage;
use crate::store::{CartStore, StoreOptions};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which cart state a mutation writes to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotTiming {
    /// Persist the cart after the change is applied.
    #[default]
    PostMutation,
    /// Persist the cart as it was before the change, so storage trails memory
    /// by one mutation. Matches carts written by older app releases.
    PreMutation,
}

impl FromStr for SnapshotTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" | "post-mutation" => Ok(Self::PostMutation),
            "pre" | "pre-mutation" => Ok(Self::PreMutation),
            other => Err(format!("expected `post` or `pre`, got `{other}`")),
        }
    }
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory for file-backed storage
    pub data_dir: PathBuf,
    /// Storage key holding the cart snapshot
    pub cart_key: String,
    /// Which cart state mutations persist
    pub snapshot_timing: SnapshotTiming,
    /// Whether add-to-cart confirmations are shown
    pub notifications: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".gomarket"),
            cart_key: CART_KEY.to_string(),
            snapshot_timing: SnapshotTiming::default(),
            notifications: true,
            sentry_dsn: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("GOMARKET_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let cart_key = get_or_default(&lookup, "GOMARKET_CART_KEY", CART_KEY);
        if cart_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "GOMARKET_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let snapshot_timing = get_or_default(&lookup, "GOMARKET_SNAPSHOT_TIMING", "post")
            .parse::<SnapshotTiming>()
            .map_err(|e| ConfigError::InvalidEnvVar("GOMARKET_SNAPSHOT_TIMING".to_string(), e))?;
        let notifications = parse_bool(&get_or_default(&lookup, "GOMARKET_NOTIFY", "true"))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "GOMARKET_NOTIFY".to_string(),
                    "expected a boolean".to_string(),
                )
            })?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());

        Ok(Self {
            data_dir,
            cart_key,
            snapshot_timing,
            notifications,
            sentry_dsn,
        })
    }

    /// Store options derived from this configuration.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.cart_key.clone(),
            timing: self.snapshot_timing,
        }
    }

    /// Notifier selected by this configuration.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        if self.notifications {
            Arc::new(LogNotifier)
        } else {
            Arc::new(SilentNotifier)
        }
    }

    /// Open a file-backed store and load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or decoded.
    pub async fn open_store(&self) -> crate::error::Result<CartStore> {
        let storage = Arc::new(FileStorage::new(&self.data_dir));
        CartStore::open(storage, self.notifier(), self.store_options()).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a permissive boolean flag.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".gomarket"));
        assert_eq!(config.cart_key, "GoMarketPlace:cart");
        assert_eq!(config.snapshot_timing, SnapshotTiming::PostMutation);
        assert!(config.notifications);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("GOMARKET_DATA_DIR", "/tmp/cart"),
            ("GOMARKET_CART_KEY", "Other:cart"),
            ("GOMARKET_SNAPSHOT_TIMING", "pre"),
            ("GOMARKET_NOTIFY", "off"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.cart_key, "Other:cart");
        assert_eq!(config.snapshot_timing, SnapshotTiming::PreMutation);
        assert!(!config.notifications);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_timing() {
        let result = CartConfig::from_lookup(lookup_from(&[("GOMARKET_SNAPSHOT_TIMING", "later")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "GOMARKET_SNAPSHOT_TIMING"));
    }

    #[test]
    fn test_invalid_notify_flag() {
        let result = CartConfig::from_lookup(lookup_from(&[("GOMARKET_NOTIFY", "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_empty_cart_key_rejected() {
        let result = CartConfig::from_lookup(lookup_from(&[("GOMARKET_CART_KEY", "")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_none() {
        let config = CartConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_snapshot_timing_parse() {
        assert_eq!("POST".parse::<SnapshotTiming>(), Ok(SnapshotTiming::PostMutation));
        assert_eq!(
            "pre-mutation".parse::<SnapshotTiming>(),
            Ok(SnapshotTiming::PreMutation)
        );
        assert!("sometimes".parse::<SnapshotTiming>().is_err());
    }

    #[test]
    fn test_store_options_follow_config() {
        let config = CartConfig {
            cart_key: "k".to_string(),
            snapshot_timing: SnapshotTiming::PreMutation,
            ..CartConfig::default()
        };
        let options = config.store_options();
        assert_eq!(options.key, "k");
        assert_eq!(options.timing, SnapshotTiming::PreMutation);
    }
}
