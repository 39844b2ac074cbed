//! The persisted cart store.
//!
//! [`CartStore`] owns the in-memory [`Cart`] and mirrors it to a
//! [`KeyValueStorage`] under a single key. Every mutation that changes the
//! cart writes the post-update list, so storage always matches what
//! [`CartStore::products`] returns once the call has completed. Calls that
//! match nothing do not write.

use marketplace_core::{Cart, CartChange, CartItem, NewCartItem, Price, ProductId};
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::storage::KeyValueStorage;

/// Cart line list backed by key-value storage.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create an empty store over `storage` without reading it.
    ///
    /// Call [`CartStore::load`] to pick up a previously persisted cart, or
    /// use [`CartStore::open`] to do both.
    #[must_use]
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cart: Cart::new(),
        }
    }

    /// Create a store and load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or holds a malformed cart.
    pub async fn open(storage: S, key: impl Into<String>) -> Result<Self> {
        let mut store = Self::new(storage, key);
        store.load().await?;
        Ok(store)
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// An absent or blank value leaves the cart as it is. Returns the number
    /// of lines now in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the read fails and
    /// [`CartError::Deserialize`] if the stored value is not a cart list.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&mut self) -> Result<usize> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            debug!("No persisted cart");
            return Ok(self.cart.len());
        };
        if raw.trim().is_empty() {
            debug!("Persisted cart is blank");
            return Ok(self.cart.len());
        }

        let items: Vec<CartItem> =
            serde_json::from_str(&raw).map_err(|source| CartError::Deserialize {
                key: self.key.clone(),
                source,
            })?;
        let (cart, repaired) = Cart::normalized(items);
        if repaired > 0 {
            warn!(repaired, "Persisted cart had duplicate or empty lines");
        }
        self.cart = cart;

        info!(lines = self.cart.len(), "Cart loaded");
        Ok(self.cart.len())
    }

    /// Add one unit of a product, appending it if it is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self, item), fields(key = %self.key, product_id = %item.id))]
    pub async fn add_to_cart(&mut self, item: NewCartItem) -> Result<CartChange> {
        let change = self.cart.add(item);
        self.commit(change).await
    }

    /// Raise a line's quantity by one. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn increment(&mut self, id: &ProductId) -> Result<CartChange> {
        let change = self.cart.increment(id);
        self.commit(change).await
    }

    /// Lower a line's quantity by one, removing it when it would reach zero.
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn decrement(&mut self, id: &ProductId) -> Result<CartChange> {
        let change = self.cart.decrement(id);
        self.commit(change).await
    }

    /// Remove a line whatever its quantity. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn remove(&mut self, id: &ProductId) -> Result<CartChange> {
        let change = self.cart.remove(id);
        self.commit(change).await
    }

    /// Empty the cart and delete its storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.storage.remove_item(&self.key).await?;
        debug!("Cart cleared");
        Ok(())
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn products(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// The in-memory cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Look up a single line.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.cart.get(id)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    /// Storage key the cart is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store and returns its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    async fn commit(&self, change: CartChange) -> Result<CartChange> {
        if !change.is_changed() {
            debug!("No matching line; nothing to persist");
            return Ok(change);
        }
        self.persist().await?;
        debug!(?change, lines = self.cart.len(), "Cart updated");
        Ok(change)
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.cart)?;
        self.storage.set_item(&self.key, &json).await?;
        Ok(())
    }
}
