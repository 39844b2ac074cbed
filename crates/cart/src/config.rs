//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Storage key holding the serialized cart
//!   (default: `@GoMarketplace:products`)
//! - `CART_STORAGE_PATH` - File used by [`FileStorage`](crate::FileStorage)
//!   (default: `cart-storage.json`)
//! - `CART_CURRENCY` - Currency used when displaying prices (default: USD)

use std::path::PathBuf;

use marketplace_core::CurrencyCode;
use thiserror::Error;

/// Storage key the cart list is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

/// File the file-backed storage writes to when nothing else is configured.
pub const DEFAULT_STORAGE_PATH: &str = "cart-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Invalid {0}: {1}")]
    InvalidValue(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key under which the whole cart list is stored
    pub storage_key: String,
    /// Backing file for file storage
    pub storage_path: PathBuf,
    /// Currency used to format prices
    pub currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            currency: CurrencyCode::default(),
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

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage_key = get_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key)
            .map_err(|reason| ConfigError::InvalidEnvVar("CART_STORAGE_KEY".to_string(), reason))?;

        let storage_path = PathBuf::from(get_or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let currency = get_or_default("CART_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self {
            storage_key,
            storage_path,
            currency,
        })
    }

    /// Override the storage key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the key is blank.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        validate_storage_key(&key)
            .map_err(|reason| ConfigError::InvalidValue("storage key".to_string(), reason))?;
        self.storage_key = key;
        Ok(self)
    }

    /// Override the storage file path.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

fn validate_storage_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@GoMarketplace:products");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_STORAGE_KEY", "@Shop:cart"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("CART_CURRENCY", "eur"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "@Shop:cart");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_rejects_blank_key() {
        let err = CartConfig::from_lookup(lookup(&[("CART_STORAGE_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_STORAGE_KEY"));
    }

    #[test]
    fn test_rejects_unknown_currency() {
        let err = CartConfig::from_lookup(lookup(&[("CART_CURRENCY", "DOGE")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_CURRENCY"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CartConfig::default()
            .with_storage_key("custom")
            .unwrap()
            .with_storage_path("elsewhere.json");

        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.storage_path, PathBuf::from("elsewhere.json"));
    }

    #[test]
    fn test_blank_override_is_invalid_value() {
        let err = CartConfig::default().with_storage_key(" ").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "storage key"));
        assert_eq!(err.to_string(), "Invalid storage key: must not be empty");
    }
}
