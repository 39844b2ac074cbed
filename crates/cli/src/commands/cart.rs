//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart-cli show
//!
//! # Add a product (adds one more unit if it is already in the cart)
//! cart-cli add --id sku-1 --title "Shirt" --image-url https://img/shirt.png --price 12.50
//!
//! # Change quantities
//! cart-cli increment sku-1
//! cart-cli decrement sku-1
//! cart-cli remove sku-1
//! cart-cli clear
//! ```

use std::fmt::Write as _;

use marketplace_cart::{CartError, CartStore, KeyValueStorage};
use marketplace_core::{CartChange, CurrencyCode, NewCartItem, Price, ProductId};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart store failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The price is below zero.
    #[error("Price must not be negative: {0}")]
    NegativePrice(Price),
}

/// Render the cart as a plain-text table.
pub fn show<S: KeyValueStorage>(store: &CartStore<S>, currency: CurrencyCode) -> String {
    if store.products().is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for item in store.products() {
        let _ = writeln!(
            out,
            "{:<16} {:<24} {:>4} x {:>10} = {:>10}",
            item.id.as_str(),
            item.title,
            item.quantity,
            item.price.display(currency),
            item.line_total().display(currency),
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        store.total_quantity(),
        store.subtotal().display(currency)
    );
    out
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the price is negative or the cart cannot be saved.
pub async fn add<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    item: NewCartItem,
) -> Result<String, CommandError> {
    if item.price < Price::ZERO {
        return Err(CommandError::NegativePrice(item.price));
    }

    let id = item.id.clone();
    let change = store.add_to_cart(item).await?;
    info!(product_id = %id, ?change, "Added to cart");
    Ok(describe(&id, change))
}

/// Raise a product's quantity by one.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn increment<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    id: &ProductId,
) -> Result<String, CommandError> {
    let change = store.increment(id).await?;
    Ok(describe(id, change))
}

/// Lower a product's quantity by one.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn decrement<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    id: &ProductId,
) -> Result<String, CommandError> {
    let change = store.decrement(id).await?;
    Ok(describe(id, change))
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn remove<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    id: &ProductId,
) -> Result<String, CommandError> {
    let change = store.remove(id).await?;
    Ok(describe(id, change))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the storage key cannot be removed.
pub async fn clear<S: KeyValueStorage>(store: &mut CartStore<S>) -> Result<String, CommandError> {
    store.clear().await?;
    info!("Cart cleared");
    Ok("Cart cleared".to_string())
}

fn describe(id: &ProductId, change: CartChange) -> String {
    match change {
        CartChange::Added => format!("{id}: added"),
        CartChange::Updated { quantity } => format!("{id}: quantity {quantity}"),
        CartChange::Removed => format!("{id}: removed"),
        CartChange::Unchanged => format!("{id}: not in cart"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_cart::MemoryStorage;

    use super::*;

    fn item(id: &str, price: &str) -> NewCartItem {
        NewCartItem::new(id, "Shirt", "https://img/shirt.png", price.parse().unwrap())
    }

    async fn store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new(), "test").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_then_show() {
        let mut store = store().await;

        assert_eq!(add(&mut store, item("sku-1", "12.50")).await.unwrap(), "sku-1: added");
        assert_eq!(
            add(&mut store, item("sku-1", "12.50")).await.unwrap(),
            "sku-1: quantity 2"
        );

        let table = show(&store, CurrencyCode::USD);
        assert!(table.contains("sku-1"));
        assert!(table.contains("$25.00"));
        assert!(table.ends_with("2 item(s), subtotal $25.00"));
    }

    #[tokio::test]
    async fn test_show_empty() {
        let store = store().await;
        assert_eq!(show(&store, CurrencyCode::USD), "Cart is empty");
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let mut store = store().await;

        let err = add(&mut store, item("sku-1", "-1")).await.unwrap_err();
        assert!(matches!(err, CommandError::NegativePrice(_)));
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_commands() {
        let mut store = store().await;
        let id = ProductId::new("sku-1");
        add(&mut store, item("sku-1", "1")).await.unwrap();

        assert_eq!(increment(&mut store, &id).await.unwrap(), "sku-1: quantity 2");
        assert_eq!(decrement(&mut store, &id).await.unwrap(), "sku-1: quantity 1");
        assert_eq!(decrement(&mut store, &id).await.unwrap(), "sku-1: removed");
        assert_eq!(remove(&mut store, &id).await.unwrap(), "sku-1: not in cart");
        assert_eq!(clear(&mut store).await.unwrap(), "Cart cleared");
    }
}
