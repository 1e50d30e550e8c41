//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod like;
pub mod order;
pub mod price;
pub mod product;
pub mod settings;
pub mod status;

pub use cart::{CART_SNAPSHOT_VERSION, CartLineItem, CartSnapshot};
pub use id::*;
pub use like::{ActorId, GUEST_LIKES_VERSION, GuestLikeSet, LikeRecord};
pub use order::{CustomerDetails, Order, OrderLine};
pub use price::{Price, format_amount};
pub use product::Product;
pub use settings::StoreSettings;
pub use status::OrderStatus;
