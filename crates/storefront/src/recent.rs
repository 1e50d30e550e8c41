//! Bounded recently-viewed product list.
//!
//! Most-recent-first, de-duplicated by product id, capped at
//! [`MAX_RECENT_ENTRIES`]. Persisted through the key-value bridge; corrupt
//! data degrades to an empty list.

use std::sync::Arc;

use clementine_core::ProductId;
use tracing::warn;

use crate::storage::{KeyValueStore, keys};

/// Maximum entries kept in the recently-viewed list.
pub const MAX_RECENT_ENTRIES: usize = 10;

/// Tracks the products the visitor viewed most recently.
#[derive(Clone)]
pub struct RecentlyViewed {
    storage: Arc<dyn KeyValueStore>,
}

impl RecentlyViewed {
    /// Create a tracker over the key-value bridge.
    #[must_use]
    pub const fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Record a product view: moves `product_id` to the front, dropping any
    /// earlier occurrence, and trims to the cap.
    pub fn record_view(&self, product_id: &ProductId) {
        let mut ids = self.list();
        ids.retain(|id| id != product_id);
        ids.insert(0, product_id.clone());
        ids.truncate(MAX_RECENT_ENTRIES);
        match serde_json::to_string(&ids) {
            Ok(json) => self.storage.set(keys::RECENTLY_VIEWED, &json),
            Err(error) => warn!(%error, "failed to serialize recently-viewed list"),
        }
    }

    /// Recently viewed product ids, most recent first.
    #[must_use]
    pub fn list(&self) -> Vec<ProductId> {
        self.storage
            .get(keys::RECENTLY_VIEWED)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
}
