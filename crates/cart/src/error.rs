//! Error types for the cart crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a [`KeyValueStorage`](crate::KeyValueStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the key-value table failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file exists but is not a key-value table.
    #[error("corrupt storage file {}: {reason}", path.display())]
    Corrupt {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Errors raised by [`CartStore`](crate::CartStore) and
/// [`CartProvider`](crate::CartProvider).
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was accessed while no provider was mounted.
    #[error("cart accessed outside of a mounted CartProvider")]
    OutsideProvider,

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The value stored under the cart key is not a cart.
    #[error("persisted cart under {key:?} is malformed: {source}")]
    Deserialize {
        /// Storage key that held the value.
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the cart for storage failed.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
