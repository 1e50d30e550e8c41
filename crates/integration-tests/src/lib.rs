//! Integration tests for the Clementine storefront core.
//!
//! The tests drive the storefront services against [`FakeBackend`], an
//! in-memory implementation of the remote data service, and the in-memory
//! key-value store. No network or browser host is involved.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart store invariants and persistence
//! - `catalog_pagination` - Feed growth, caching, filter switches
//! - `like_reconciliation` - Guest/user toggling and mirroring
//! - `checkout_flow` - Order placement, validation, hand-off

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use chrono::Utc;
use clementine_core::{
    ActorId, CategoryId, LikeRecord, Order, Product, ProductId, StoreSettings,
};
use clementine_storefront::catalog::{CategoryFilter, FilterKey};
use clementine_storefront::data::{DataService, DataServiceError, ProductPage};
use rust_decimal::Decimal;

/// Build a catalog product fixture.
#[must_use]
pub fn product(id: &str, name: &str, price_cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: None,
        price: Decimal::new(price_cents, 2),
        media_url: None,
        available: true,
        stock,
        likes: 0,
        category: None,
        featured: false,
        created_at: Utc::now(),
    }
}

/// Build a product fixture in a category.
#[must_use]
pub fn product_in_category(id: &str, name: &str, category: &str) -> Product {
    let mut p = product(id, name, 1000, 10);
    p.category = Some(CategoryId::new(category));
    p
}

/// In-memory stand-in for the remote managed backend.
///
/// Supports per-operation failure injection and counts catalog fetches so
/// tests can assert on cache behavior.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
    /// Catalog list calls that actually reached the backend.
    pub list_calls: AtomicU32,
    /// Settings reads that actually reached the backend.
    pub settings_calls: AtomicU32,
    pub fail_list_products: AtomicBool,
    pub fail_create_order: AtomicBool,
    pub fail_decrement: AtomicBool,
    pub fail_likes: AtomicBool,
    pub fail_settings: AtomicBool,
}

#[derive(Default)]
struct BackendState {
    products: Vec<Product>,
    likes: HashSet<(ProductId, ActorId)>,
    orders: Vec<Order>,
    settings: StoreSettings,
}

impl FakeBackend {
    /// Backend seeded with the given catalog.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let backend = Self::default();
        backend
            .state
            .lock()
            .expect("backend lock poisoned")
            .products = products;
        backend
    }

    /// Replace the store settings record.
    pub fn set_settings(&self, settings: StoreSettings) {
        self.state.lock().expect("backend lock poisoned").settings = settings;
    }

    /// Orders written so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state
            .lock()
            .expect("backend lock poisoned")
            .orders
            .clone()
    }

    /// Current stock for a product, if it exists.
    #[must_use]
    pub fn stock_of(&self, id: &ProductId) -> Option<u32> {
        self.state
            .lock()
            .expect("backend lock poisoned")
            .products
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.stock)
    }

    /// All (product, actor) like pairs currently stored.
    #[must_use]
    pub fn like_pairs(&self) -> HashSet<(ProductId, ActorId)> {
        self.state
            .lock()
            .expect("backend lock poisoned")
            .likes
            .clone()
    }

    fn matches(product: &Product, filter: &FilterKey) -> bool {
        let search_ok = filter.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&filter.search.to_lowercase());
        let category_ok = match &filter.category {
            CategoryFilter::All => true,
            CategoryFilter::Category(id) => product.category.as_ref() == Some(id),
        };
        search_ok && category_ok
    }
}

impl DataService for FakeBackend {
    async fn list_products(
        &self,
        filter: &FilterKey,
        cursor: u32,
        limit: u32,
    ) -> Result<ProductPage, DataServiceError> {
        if self.fail_list_products.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().expect("backend lock poisoned");
        let matching: Vec<Product> = state
            .products
            .iter()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let products = matching
            .into_iter()
            .skip((cursor * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok(ProductPage { products, total })
    }

    async fn get_product(
        &self,
        id: &ProductId,
    ) -> Result<Option<Product>, DataServiceError> {
        let state = self.state.lock().expect("backend lock poisoned");
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert_like(&self, record: &LikeRecord) -> Result<(), DataServiceError> {
        if self.fail_likes.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        let mut state = self.state.lock().expect("backend lock poisoned");
        state
            .likes
            .insert((record.product_id.clone(), record.actor.clone()));
        Ok(())
    }

    async fn delete_like(
        &self,
        product_id: &ProductId,
        actor: &ActorId,
    ) -> Result<(), DataServiceError> {
        if self.fail_likes.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        let mut state = self.state.lock().expect("backend lock poisoned");
        state.likes.remove(&(product_id.clone(), actor.clone()));
        Ok(())
    }

    async fn list_likes(&self, actor: &ActorId) -> Result<Vec<ProductId>, DataServiceError> {
        if self.fail_likes.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        let state = self.state.lock().expect("backend lock poisoned");
        Ok(state
            .likes
            .iter()
            .filter(|(_, a)| a == actor)
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn create_order(&self, order: &Order) -> Result<(), DataServiceError> {
        if self.fail_create_order.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        let mut state = self.state.lock().expect("backend lock poisoned");
        state.orders.push(order.clone());
        Ok(())
    }

    async fn decrement_inventory(
        &self,
        product_id: &ProductId,
        by: u32,
    ) -> Result<(), DataServiceError> {
        if self.fail_decrement.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        let mut state = self.state.lock().expect("backend lock poisoned");
        let product = state
            .products
            .iter_mut()
            .find(|p| &p.id == product_id)
            .ok_or_else(|| DataServiceError::NotFound(product_id.to_string()))?;
        product.stock = product.stock.saturating_sub(by);
        Ok(())
    }

    async fn store_settings(&self) -> Result<StoreSettings, DataServiceError> {
        if self.fail_settings.load(Ordering::SeqCst) {
            return Err(DataServiceError::Network("injected failure".to_string()));
        }
        self.settings_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().expect("backend lock poisoned");
        Ok(state.settings.clone())
    }
}
