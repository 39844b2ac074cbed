//! Marketplace Core - Shared cart types.
//!
//! This crate provides the types and merge rules used by every marketplace
//! component:
//! - `marketplace-cart` - Persisted cart store and provider
//! - `marketplace-cli` - Command-line cart tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, prices, and cart lines
//! - [`cart`] - The [`Cart`] line list and its add/increment/decrement rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartChange};
pub use types::*;
