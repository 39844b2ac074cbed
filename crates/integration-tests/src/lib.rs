//! Integration tests for the marketplace cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Store state against what lands in storage
//! - `provider_lifecycle` - Mount/unmount and access outside the provider
//!
//! This crate also holds the fixtures the tests share.

use std::path::PathBuf;

use marketplace_cart::{CartConfig, FileStorage, KeyValueStorage};
use marketplace_core::{CartItem, NewCartItem, Price};
use tempfile::TempDir;

/// A cart storage file in a fresh temporary directory.
///
/// The directory is deleted when the fixture is dropped.
pub struct TempCartFile {
    dir: TempDir,
}

impl TempCartFile {
    /// Create a new empty fixture.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path of the storage file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("cart-storage.json")
    }

    /// A new storage handle over the file, as a restarted app would open it.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.path())
    }

    /// Default configuration pointing at this file.
    #[must_use]
    pub fn config(&self) -> CartConfig {
        CartConfig::default().with_storage_path(self.path())
    }
}

impl Default for TempCartFile {
    fn default() -> Self {
        Self::new()
    }
}

/// A catalog product priced in whole cents.
#[must_use]
pub fn product(id: &str, cents: i32) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example.com/{id}.png"),
        Price::from_cents(cents),
    )
}

/// Read and decode the cart list persisted under `key`.
///
/// # Panics
///
/// Panics if storage fails or the value is not a cart list.
#[allow(clippy::expect_used)]
pub async fn persisted_items<S: KeyValueStorage>(storage: &S, key: &str) -> Option<Vec<CartItem>> {
    storage
        .get_item(key)
        .await
        .expect("read storage")
        .map(|raw| serde_json::from_str(&raw).expect("decode persisted cart"))
}
