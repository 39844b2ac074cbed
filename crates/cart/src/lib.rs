//! Marketplace Cart - Persisted shopping cart.
//!
//! Holds the cart's line list in memory and mirrors it to device-local
//! key-value storage after every change.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the [`Cart`](marketplace_core::Cart) and writes it,
//!   as one JSON array, under a single storage key
//! - [`CartProvider`] scopes access to the store to a mounted lifetime
//! - [`KeyValueStorage`] abstracts the storage backend ([`MemoryStorage`],
//!   [`FileStorage`])
//! - [`CartConfig`] reads the storage key, file path, and display currency
//!   from the environment
//!
//! # Example
//!
//! ```rust
//! use marketplace_cart::{CartConfig, CartProvider, MemoryStorage};
//! use marketplace_core::{NewCartItem, Price, ProductId};
//!
//! # async fn example() -> marketplace_cart::Result<()> {
//! let mut provider = CartProvider::new();
//! provider.mount(MemoryStorage::new(), &CartConfig::default()).await?;
//!
//! let cart = provider.use_cart_mut()?;
//! cart.add_to_cart(NewCartItem::new("a", "Shirt", "https://img/a.png", Price::from_cents(1250)))
//!     .await?;
//! cart.decrement(&ProductId::new("a")).await?;
//! assert!(cart.products().is_empty());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::{CartError, Result, StorageError};
pub use provider::CartProvider;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::CartStore;
