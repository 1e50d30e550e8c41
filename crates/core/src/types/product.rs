//! Product catalog entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A catalog product.
///
/// Immutable from the client's perspective except for the derived "liked"
/// relationship and the best-effort inventory decrement after an order is
/// placed. The cart embeds a snapshot of this record at add-time, so price
/// changes after that point do not affect an existing cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in the store currency. Non-negative.
    pub price: Decimal,
    /// Primary media URL (image or video), when any was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Whether the product is currently offered for sale.
    pub available: bool,
    /// On-hand quantity. Checked opportunistically at checkout, never
    /// reserved.
    pub stock: u32,
    /// Denormalized like counter maintained by the backend.
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can currently be sold.
    ///
    /// This is an opportunistic check against the last-seen stock level, not
    /// a reservation.
    #[must_use]
    pub const fn can_fulfill(&self, quantity: u32) -> bool {
        self.available && quantity <= self.stock
    }
}
