//! Remote data service interface.
//!
//! The storefront delegates all persistence to an external managed backend.
//! This trait is the whole of that boundary: generic request/response
//! operations over the products, likes, orders, and settings collections.
//! Implementations (HTTP, SDK, in-memory fakes) live outside this crate.

use clementine_core::{ActorId, LikeRecord, Order, Product, ProductId, StoreSettings};
use thiserror::Error;

use crate::catalog::FilterKey;

/// Errors surfaced by the remote backend.
///
/// All variants are transient from the storefront's point of view: callers
/// surface them as retryable notices and never crash the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataServiceError {
    /// Request never reached the backend or the response was lost.
    #[error("network error: {0}")]
    Network(String),
    /// Backend received the request and refused it.
    #[error("request rejected: {0}")]
    Rejected(String),
    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Products for this cursor, in backend order. At most the requested
    /// limit.
    pub products: Vec<Product>,
    /// Total records matching the filter, across all pages.
    pub total: u64,
}

/// The remote backend boundary.
///
/// Methods are async and may suspend; nothing in this crate mutates local
/// state across one of these suspension points.
#[allow(async_fn_in_trait)]
pub trait DataService: Send + Sync {
    /// List catalog products matching `filter`, starting at the zero-based
    /// page `cursor`, returning at most `limit` products.
    async fn list_products(
        &self,
        filter: &FilterKey,
        cursor: u32,
        limit: u32,
    ) -> Result<ProductPage, DataServiceError>;

    /// Fetch a single product by id, `None` when it no longer exists.
    async fn get_product(&self, id: &ProductId)
    -> Result<Option<Product>, DataServiceError>;

    /// Record a like. Inserting an already-present (product, actor) pair is
    /// a no-op on the backend.
    async fn insert_like(&self, record: &LikeRecord) -> Result<(), DataServiceError>;

    /// Delete the like for (product, actor) if present.
    async fn delete_like(
        &self,
        product_id: &ProductId,
        actor: &ActorId,
    ) -> Result<(), DataServiceError>;

    /// All product ids the actor has liked.
    async fn list_likes(&self, actor: &ActorId) -> Result<Vec<ProductId>, DataServiceError>;

    /// Write a new order record. The order is immutable once written.
    async fn create_order(&self, order: &Order) -> Result<(), DataServiceError>;

    /// Decrement a product's on-hand quantity after order placement.
    /// Best-effort: not transactional with `create_order`, and failures
    /// never roll the order back.
    async fn decrement_inventory(
        &self,
        product_id: &ProductId,
        by: u32,
    ) -> Result<(), DataServiceError>;

    /// Read the store configuration singleton.
    async fn store_settings(&self) -> Result<StoreSettings, DataServiceError>;
}
