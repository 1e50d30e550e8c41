//! Checkout: order snapshot creation and the messaging hand-off.
//!
//! Placing an order is the one write path that spans modules: the cart is
//! validated opportunistically against current stock, frozen into an
//! immutable [`Order`], written to the backend, and only then is inventory
//! decremented (best-effort) and the cart cleared. Payment is out-of-band:
//! the result carries a human-readable summary and messaging deep links the
//! caller fires and forgets.

use std::sync::Arc;

use chrono::Utc;
use clementine_core::{
    CustomerDetails, Order, OrderId, OrderLine, OrderStatus, ProductId, format_amount,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::CartStore;
use crate::data::{DataService, DataServiceError};
use crate::settings::SettingsCache;

/// Checkout failure.
///
/// Validation variants reject the submission and leave the cart unchanged;
/// `Submit` means the backend write itself failed (also cart-preserving and
/// retryable).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Requested quantity exceeds the product's current on-hand quantity.
    #[error("only {available} of \"{product_name}\" in stock (requested {requested})")]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// The product was removed from the catalog or marked unavailable since
    /// it was added to the cart.
    #[error("\"{product_name}\" is no longer available")]
    Unavailable {
        product_id: ProductId,
        product_name: String,
    },

    /// Writing the order record failed.
    #[error("order submission failed: {0}")]
    Submit(#[from] DataServiceError),
}

/// Deep links for the one-way order hand-off.
///
/// The native link is tried first; the web link is the fallback when the
/// native scheme does not resolve within the caller's short timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffLinks {
    /// `whatsapp://send?...` deep link with the prefilled summary.
    pub native: String,
    /// `https://wa.me/...` web fallback with the same text.
    pub web: String,
}

/// A successfully placed order plus its hand-off material.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    /// Human-readable order summary, also embedded in the links.
    pub summary: String,
    pub handoff: HandoffLinks,
}

/// Drives order placement.
pub struct CheckoutService<S> {
    data: Arc<S>,
    cart: CartStore,
    settings: SettingsCache<S>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for CheckoutService<S> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            cart: self.cart.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S: DataService> CheckoutService<S> {
    /// Create a checkout service over the shared cart.
    #[must_use]
    pub const fn new(data: Arc<S>, cart: CartStore, settings: SettingsCache<S>) -> Self {
        Self {
            data,
            cart,
            settings,
        }
    }

    /// Validate the cart, write the order, and hand back the summary links.
    ///
    /// On success the cart has been cleared and per-line inventory
    /// decrements were attempted; a failed decrement is logged and never
    /// rolls the order back (the order record is the durable source of
    /// truth, inventory is best-effort accounting).
    ///
    /// # Errors
    ///
    /// Validation errors and submission failures leave the cart exactly as
    /// it was.
    #[instrument(skip_all, fields(customer = %customer.name))]
    pub async fn place_order(
        &self,
        customer: CustomerDetails,
    ) -> Result<PlacedOrder, CheckoutError> {
        let items = self.cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Opportunistic stock check against current catalog state. This is
        // not a reservation: concurrent checkouts for the same product can
        // still race.
        for line in &items {
            let current = self.data.get_product(line.product_id()).await?;
            match current {
                Some(product) if product.available => {
                    if line.quantity > product.stock {
                        return Err(CheckoutError::InsufficientStock {
                            product_id: product.id,
                            product_name: product.name,
                            requested: line.quantity,
                            available: product.stock,
                        });
                    }
                }
                _ => {
                    return Err(CheckoutError::Unavailable {
                        product_id: line.product.id.clone(),
                        product_name: line.product.name.clone(),
                    });
                }
            }
        }

        let lines: Vec<OrderLine> = items.iter().map(OrderLine::from_cart_line).collect();
        let total = lines.iter().map(OrderLine::line_total).sum();
        let order = Order {
            id: OrderId::generate(),
            customer,
            lines,
            total,
            status: OrderStatus::New,
            created_at: Utc::now(),
        };

        self.data.create_order(&order).await?;
        info!(order = %order.id, total = %order.total, "order created");

        // Best-effort inventory accounting, after the order is durable.
        for line in &order.lines {
            if let Err(error) = self
                .data
                .decrement_inventory(&line.product_id, line.quantity)
                .await
            {
                warn!(%error, product = %line.product_id, "inventory decrement failed");
            }
        }

        self.cart.clear();

        let settings = self.settings.get_or_default().await;
        let summary = compose_summary(&order, &settings.currency_symbol);
        let handoff = handoff_links(&settings.contact_phone, &summary);

        Ok(PlacedOrder {
            order,
            summary,
            handoff,
        })
    }
}

/// Render the human-readable order summary used for the hand-off message.
fn compose_summary(order: &Order, symbol: &str) -> String {
    let mut out = format!("New order {}\n", order.id);
    for line in &order.lines {
        out.push_str(&format!(
            "{} x {} - {}\n",
            line.quantity,
            line.product_name,
            format_amount(line.line_total(), symbol),
        ));
    }
    out.push_str(&format!("Total: {}\n", format_amount(order.total, symbol)));
    out.push_str(&format!(
        "\n{}\n{}\n{}, {}",
        order.customer.name, order.customer.phone, order.customer.address, order.customer.city,
    ));
    if let Some(note) = &order.customer.note {
        out.push_str(&format!("\nNote: {note}"));
    }
    out
}

/// Build the native and web messaging links for a summary.
fn handoff_links(phone: &str, summary: &str) -> HandoffLinks {
    let text = urlencoding::encode(summary);
    HandoffLinks {
        native: format!("whatsapp://send?phone={phone}&text={text}"),
        web: format!("https://wa.me/{phone}?text={text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order_with_note(note: Option<String>) -> Order {
        Order {
            id: OrderId::new("ord-1"),
            customer: CustomerDetails {
                name: "Ada".to_string(),
                phone: "2348012345678".to_string(),
                email: None,
                address: "1 Market St".to_string(),
                city: "Lagos".to_string(),
                note,
            },
            lines: vec![OrderLine {
                product_id: ProductId::new("p1"),
                product_name: "Ceramic mug".to_string(),
                unit_price: Decimal::new(1500, 2),
                quantity: 2,
            }],
            total: Decimal::new(3000, 2),
            status: OrderStatus::New,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_lists_lines_and_total() {
        let summary = compose_summary(&order_with_note(None), "$");
        assert!(summary.contains("2 x Ceramic mug - $30.00"));
        assert!(summary.contains("Total: $30.00"));
        assert!(summary.contains("Ada"));
        assert!(!summary.contains("Note:"));
    }

    #[test]
    fn test_summary_includes_note_when_present() {
        let summary = compose_summary(&order_with_note(Some("ring the bell".to_string())), "$");
        assert!(summary.contains("Note: ring the bell"));
    }

    #[test]
    fn test_handoff_links_encode_text() {
        let links = handoff_links("2348012345678", "hello world");
        assert_eq!(
            links.native,
            "whatsapp://send?phone=2348012345678&text=hello%20world"
        );
        assert_eq!(links.web, "https://wa.me/2348012345678?text=hello%20world");
    }
}
