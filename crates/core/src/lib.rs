//! Clementine Core - Shared domain types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `storefront` - Cart, catalog, wishlist, and checkout logic
//! - `integration-tests` - Cross-module scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no remote calls, no caching.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, and the product/cart/order/like/settings
//!   domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
