//! Key-value storage the cart is persisted to.
//!
//! [`KeyValueStorage`] is the device-local string store the cart list is
//! written to under a single key. Two backends ship with the crate:
//!
//! - [`MemoryStorage`] - process-local map, used by tests
//! - [`FileStorage`] - one JSON file holding every key, used by the CLI

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Async string key-value store.
///
/// A missing key reads as `None`. Writing a key replaces its previous value.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

