//! Orders: immutable snapshots created at checkout submission.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::id::{OrderId, ProductId};
use super::status::OrderStatus;

/// Customer contact and shipping fields captured on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A frozen order line: product identity plus the name, unit price, and
/// quantity at the time of order. Not a live reference to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    /// Freeze a cart line into an order line.
    #[must_use]
    pub fn from_cart_line(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
        }
    }

    /// Line total at order-time prices.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order as written to the remote backend.
///
/// Created once at checkout submission and never mutated by the client
/// afterwards, except for the admin status-update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line totals. Matches `total` for any order built by checkout.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::Product;

    fn cart_line(id: &str, price_cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            Product {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                description: None,
                price: Decimal::new(price_cents, 2),
                media_url: None,
                available: true,
                stock: 100,
                likes: 0,
                category: None,
                featured: false,
                created_at: Utc::now(),
            },
            quantity,
        )
    }

    #[test]
    fn test_order_line_freezes_price_and_name() {
        let line = cart_line("p1", 999, 2);
        let frozen = OrderLine::from_cart_line(&line);
        assert_eq!(frozen.product_id, ProductId::new("p1"));
        assert_eq!(frozen.unit_price, Decimal::new(999, 2));
        assert_eq!(frozen.quantity, 2);
        assert_eq!(frozen.line_total(), Decimal::new(1998, 2));
    }
}
