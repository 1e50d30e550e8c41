//! Cart line items and the versioned persisted snapshot.
//!
//! The cart itself lives in `clementine-storefront`; this module defines the
//! data it holds and the schema it persists. Persisted blobs carry an
//! explicit version so a future schema change can migrate or discard old
//! data instead of failing deserialization mid-boot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId};
use super::product::Product;

/// Current schema version for persisted cart snapshots.
pub const CART_SNAPSHOT_VERSION: u32 = 1;

/// One (product, quantity) entry in the cart.
///
/// The line-item id is generated locally and is distinct from the product
/// id; a given product appears in at most one line. The embedded product is
/// a snapshot frozen at add-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: LineItemId,
    pub product: Product,
    /// Always positive; a quantity dropping to zero removes the line.
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a new line for a product.
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            id: LineItemId::generate(),
            product,
            quantity,
        }
    }

    /// Product id this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Line total: unit price at add-time times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The full serialized cart, written to persistent storage on every
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub items: Vec<CartLineItem>,
}

impl CartSnapshot {
    /// Snapshot of the given line items at the current schema version.
    #[must_use]
    pub fn new(items: Vec<CartLineItem>) -> Self {
        Self {
            version: CART_SNAPSHOT_VERSION,
            items,
        }
    }

    /// Deserialize a persisted snapshot, degrading to `None` on any shape
    /// or version mismatch. Callers treat `None` as an empty cart.
    #[must_use]
    pub fn from_json(json: &str) -> Option<Self> {
        let snapshot: Self = serde_json::from_str(json).ok()?;
        (snapshot.version == CART_SNAPSHOT_VERSION).then_some(snapshot)
    }

    /// Serialize for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::new(price_cents, 2),
            media_url: None,
            available: true,
            stock: 10,
            likes: 0,
            category: None,
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_total() {
        let line = CartLineItem::new(product("p1", 1250), 3);
        assert_eq!(line.line_total(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_snapshot_round_trip_preserves_structure() {
        let items = vec![
            CartLineItem::new(product("p1", 100), 1),
            CartLineItem::new(product("p2", 200), 2),
            CartLineItem::new(product("p3", 300), 3),
        ];
        let snapshot = CartSnapshot::new(items.clone());
        let json = snapshot.to_json().expect("serialize");
        let restored = CartSnapshot::from_json(&json).expect("deserialize");
        assert_eq!(restored.items, items);
    }

    #[test]
    fn test_corrupt_snapshot_degrades_to_none() {
        assert!(CartSnapshot::from_json("not json").is_none());
        assert!(CartSnapshot::from_json("{\"items\":[]}").is_none());
        assert!(CartSnapshot::from_json("{\"version\":99,\"items\":[]}").is_none());
    }
}
