//! Clementine Storefront - session state and remote-catalog logic.
//!
//! This crate is the storefront's non-visual core. It owns the client-side
//! shopping cart, the paginated catalog feed, the like/wishlist reconciler,
//! and checkout/order placement. Rendering, routing, and the admin screens
//! live in the embedding application; the remote backend and the browser's
//! persistent storage are reached only through the [`data::DataService`] and
//! [`storage::KeyValueStore`] traits.
//!
//! # Modules
//!
//! - [`storage`] - Persistent key-value bridge trait and in-memory store
//! - [`cart`] - The shared cart store (add/update/remove/clear, totals,
//!   subscriptions, persistence)
//! - [`catalog`] - Paginated, filter-keyed product feed with page caching
//! - [`likes`] - Guest/authenticated like reconciliation
//! - [`checkout`] - Order snapshot creation and the messaging hand-off
//! - [`settings`] - Cached store configuration singleton
//! - [`recent`] - Bounded recently-viewed product list
//!
//! # Threading model
//!
//! Consumers drive everything from a single UI thread. Cart and storage
//! operations are synchronous; only remote I/O suspends. Internal locking
//! exists so the types are `Send + Sync`, not because operations interleave.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod data;
pub mod error;
pub mod likes;
pub mod recent;
pub mod settings;
pub mod storage;

pub use error::{Result, StorefrontError};
