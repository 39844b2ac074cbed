//! Core types for the marketplace cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod item;
pub mod price;

pub use id::{ProductId, ProductIdError};
pub use item::{CartItem, NewCartItem};
pub use price::{CurrencyCode, Price, PriceError, UnknownCurrency};
