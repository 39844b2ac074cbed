//! Cart line list and merge rules.
//!
//! [`Cart`] owns the ordered list of [`CartItem`]s and is the only place
//! that changes quantities. It keeps two invariants:
//!
//! - at most one line per [`ProductId`]
//! - every line has `quantity >= 1` (a line that would reach zero is removed)
//!
//! Lines keep their insertion order; new products are appended.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CartItem, NewCartItem, Price, ProductId};

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line now has this quantity.
    Updated { quantity: u32 },
    /// The line was removed.
    Removed,
    /// Nothing matched; the cart is untouched.
    Unchanged,
}

impl CartChange {
    /// Whether the mutation modified the cart.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The ordered list of cart lines.
///
/// Serializes as a plain JSON array of lines. Deserializing repairs lists
/// that break the invariants (see [`Cart::normalized`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw lines, repairing invariant violations.
    ///
    /// Lines with quantity 0 are dropped. Repeated ids are merged into the
    /// first occurrence, summing quantities and keeping the first line's
    /// other fields. Returns the cart and the number of input lines that
    /// were dropped or merged.
    #[must_use]
    pub fn normalized(items: Vec<CartItem>) -> (Self, usize) {
        let input_len = items.len();
        let mut cart = Self::new();

        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }

        let repaired = input_len - cart.items.len();
        (cart, repaired)
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// the stored line is otherwise left as is. Otherwise the product is
    /// appended with quantity 1.
    pub fn add(&mut self, item: NewCartItem) -> CartChange {
        if let Some(existing) = self.get_mut(&item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return CartChange::Updated {
                quantity: existing.quantity,
            };
        }
        self.items.push(CartItem::from(item));
        CartChange::Added
    }

    /// Raise the quantity of an existing line by one.
    pub fn increment(&mut self, id: &ProductId) -> CartChange {
        match self.get_mut(id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(1);
                CartChange::Updated {
                    quantity: existing.quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Lower the quantity of an existing line by one, removing it at zero.
    pub fn decrement(&mut self, id: &ProductId) -> CartChange {
        let Some(index) = self.position(id) else {
            return CartChange::Unchanged;
        };
        match self.items.get_mut(index) {
            Some(existing) if existing.quantity > 1 => {
                existing.quantity -= 1;
                CartChange::Updated {
                    quantity: existing.quantity,
                }
            }
            Some(_) => {
                self.items.remove(index);
                CartChange::Removed
            }
            None => CartChange::Unchanged,
        }
    }

    /// Remove a line regardless of its quantity.
    pub fn remove(&mut self, id: &ProductId) -> CartChange {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                CartChange::Removed
            }
            None => CartChange::Unchanged,
        }
    }

    /// Remove every line. Returns `true` if the cart had any.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the cart and returns its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<CartItem>::deserialize(deserializer)?;
        Ok(Self::normalized(items).0)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
