//! Scoped access to the cart.
//!
//! A [`CartProvider`] is owned by the application shell and handed to UI
//! call sites by reference. Between [`CartProvider::mount`] and
//! [`CartProvider::unmount`] it holds a loaded [`CartStore`]; outside that
//! window [`CartProvider::use_cart`] reports [`CartError::OutsideProvider`].

use tracing::{debug, instrument};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::KeyValueStorage;
use crate::store::CartStore;

/// Owner of the cart for the lifetime of a mounted UI tree.
#[derive(Debug)]
pub struct CartProvider<S> {
    store: Option<CartStore<S>>,
}

impl<S> Default for CartProvider<S> {
    fn default() -> Self {
        Self { store: None }
    }
}

impl<S: KeyValueStorage> CartProvider<S> {
    /// Create an unmounted provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { store: None }
    }

    /// Open the cart stored under the configured key and start serving it.
    ///
    /// Mounting again replaces the current store.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted cart cannot be loaded; the provider
    /// is left unmounted in that case.
    #[instrument(skip(self, storage, config), fields(key = %config.storage_key))]
    pub async fn mount(&mut self, storage: S, config: &CartConfig) -> Result<&mut CartStore<S>> {
        self.store = None;
        let store = CartStore::open(storage, config.storage_key.clone()).await?;
        debug!("Cart provider mounted");
        Ok(self.store.insert(store))
    }

    /// Stop serving the cart and hand back the store, if one was mounted.
    pub fn unmount(&mut self) -> Option<CartStore<S>> {
        let store = self.store.take();
        if store.is_some() {
            debug!("Cart provider unmounted");
        }
        store
    }

    /// Whether a cart is currently mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.store.is_some()
    }

    /// Borrow the mounted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutsideProvider`] if nothing is mounted.
    pub fn use_cart(&self) -> Result<&CartStore<S>> {
        self.store.as_ref().ok_or(CartError::OutsideProvider)
    }

    /// Mutably borrow the mounted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutsideProvider`] if nothing is mounted.
    pub fn use_cart_mut(&mut self) -> Result<&mut CartStore<S>> {
        self.store.as_mut().ok_or(CartError::OutsideProvider)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{NewCartItem, Price, ProductId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn shirt() -> NewCartItem {
        NewCartItem::new("shirt", "Shirt", "https://img/shirt.png", Price::from_cents(2500))
    }

    #[test]
    fn test_use_cart_outside_provider() {
        let mut provider = CartProvider::<MemoryStorage>::new();

        assert!(!provider.is_mounted());
        assert!(matches!(provider.use_cart(), Err(CartError::OutsideProvider)));
        assert!(matches!(provider.use_cart_mut(), Err(CartError::OutsideProvider)));
    }

    #[tokio::test]
    async fn test_mount_loads_and_unmount_ends_access() {
        let storage = MemoryStorage::new();
        let config = CartConfig::default();

        let mut provider = CartProvider::new();
        provider.mount(storage.clone(), &config).await.unwrap();
        provider
            .use_cart_mut()
            .unwrap()
            .add_to_cart(shirt())
            .await
            .unwrap();
        assert_eq!(provider.use_cart().unwrap().total_quantity(), 1);

        let store = provider.unmount().unwrap();
        assert_eq!(store.products().len(), 1);
        assert!(matches!(provider.use_cart(), Err(CartError::OutsideProvider)));
        assert!(provider.unmount().is_none());

        // A second mount over the same storage sees the persisted cart.
        provider.mount(storage, &config).await.unwrap();
        let cart = provider.use_cart().unwrap();
        assert_eq!(cart.get(&ProductId::new("shirt")).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_failed_mount_leaves_provider_unmounted() {
        let config = CartConfig::default();
        let storage = MemoryStorage::with_item(config.storage_key.clone(), "not a cart");

        let mut provider = CartProvider::new();
        let err = provider.mount(storage, &config).await.unwrap_err();

        assert!(matches!(err, CartError::Deserialize { .. }));
        assert!(!provider.is_mounted());
    }
}
