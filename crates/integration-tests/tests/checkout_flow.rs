//! Checkout scenarios: validation, order snapshots, best-effort inventory,
//! and the messaging hand-off.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use clementine_core::{CustomerDetails, OrderStatus, ProductId, StoreSettings};
use clementine_integration_tests::{FakeBackend, product};
use clementine_storefront::cart::CartStore;
use clementine_storefront::checkout::{CheckoutError, CheckoutService};
use clementine_storefront::settings::SettingsCache;
use clementine_storefront::storage::MemoryStore;
use rust_decimal::Decimal;

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Ada".to_string(),
        phone: "2348012345678".to_string(),
        email: Some("ada@example.com".to_string()),
        address: "1 Market St".to_string(),
        city: "Lagos".to_string(),
        note: None,
    }
}

fn setup(products: Vec<clementine_core::Product>) -> (Arc<FakeBackend>, CartStore, CheckoutService<FakeBackend>) {
    let backend = Arc::new(FakeBackend::with_products(products));
    backend.set_settings(StoreSettings {
        currency_code: "NGN".to_string(),
        currency_symbol: "₦".to_string(),
        contact_phone: "2349000000000".to_string(),
        payment_instructions: Some("Bank transfer".to_string()),
        contact_links: Vec::new(),
    });
    let cart = CartStore::new(Arc::new(MemoryStore::new()));
    let checkout = CheckoutService::new(
        backend.clone(),
        cart.clone(),
        SettingsCache::new(backend.clone()),
    );
    (backend, cart, checkout)
}

#[tokio::test]
async fn successful_checkout_freezes_order_and_clears_cart() {
    let (backend, cart, checkout) = setup(vec![
        product("p1", "Mug", 1500, 10),
        product("p2", "Bowl", 2500, 4),
    ]);
    cart.add_item(&product("p1", "Mug", 1500, 10), 2);
    cart.add_item(&product("p2", "Bowl", 2500, 4), 1);

    let placed = checkout.place_order(customer()).await.expect("checkout");

    assert_eq!(placed.order.status, OrderStatus::New);
    assert_eq!(placed.order.total, Decimal::new(5500, 2));
    assert_eq!(placed.order.computed_total(), placed.order.total);
    assert_eq!(placed.order.lines.len(), 2);

    // The order is durable on the backend and the cart is gone.
    assert_eq!(backend.orders().len(), 1);
    assert!(cart.is_empty());

    // Inventory was decremented best-effort.
    assert_eq!(backend.stock_of(&ProductId::new("p1")), Some(8));
    assert_eq!(backend.stock_of(&ProductId::new("p2")), Some(3));

    // Hand-off carries the summary in both links.
    assert!(placed.summary.contains("2 x Mug"));
    assert!(placed.handoff.native.starts_with("whatsapp://send?phone=2349000000000"));
    assert!(placed.handoff.web.starts_with("https://wa.me/2349000000000?text="));
    assert!(placed.handoff.web.contains("%E2%82%A6")); // encoded ₦
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let (_, _, checkout) = setup(vec![product("p1", "Mug", 1500, 10)]);
    assert_eq!(
        checkout.place_order(customer()).await,
        Err(CheckoutError::EmptyCart)
    );
}

#[tokio::test]
async fn over_stock_quantity_rejects_and_preserves_cart() {
    let (backend, cart, checkout) = setup(vec![product("p1", "Mug", 1500, 2)]);
    cart.add_item(&product("p1", "Mug", 1500, 2), 5);

    let err = checkout.place_order(customer()).await.expect_err("rejected");
    assert_eq!(
        err,
        CheckoutError::InsufficientStock {
            product_id: ProductId::new("p1"),
            product_name: "Mug".to_string(),
            requested: 5,
            available: 2,
        }
    );

    assert_eq!(cart.total_items(), 5, "cart unchanged");
    assert!(backend.orders().is_empty());
    assert_eq!(backend.stock_of(&ProductId::new("p1")), Some(2));
}

#[tokio::test]
async fn vanished_product_rejects_checkout() {
    // Cart line snapshots a product the catalog no longer has.
    let (_, cart, checkout) = setup(vec![product("p1", "Mug", 1500, 10)]);
    cart.add_item(&product("p2", "Bowl", 2500, 4), 1);

    let err = checkout.place_order(customer()).await.expect_err("rejected");
    assert!(matches!(err, CheckoutError::Unavailable { .. }));
    assert_eq!(cart.total_items(), 1);
}

#[tokio::test]
async fn failed_submission_preserves_cart() {
    let (backend, cart, checkout) = setup(vec![product("p1", "Mug", 1500, 10)]);
    cart.add_item(&product("p1", "Mug", 1500, 10), 1);

    backend.fail_create_order.store(true, Ordering::SeqCst);
    assert!(matches!(
        checkout.place_order(customer()).await,
        Err(CheckoutError::Submit(_))
    ));

    assert_eq!(cart.total_items(), 1, "cart survives a failed submission");
    assert!(backend.orders().is_empty());
}

#[tokio::test]
async fn failed_inventory_decrement_never_rolls_back_the_order() {
    let (backend, cart, checkout) = setup(vec![product("p1", "Mug", 1500, 10)]);
    cart.add_item(&product("p1", "Mug", 1500, 10), 2);

    backend.fail_decrement.store(true, Ordering::SeqCst);
    let placed = checkout.place_order(customer()).await.expect("order placed");

    assert_eq!(backend.orders().len(), 1, "order is the durable source of truth");
    assert_eq!(placed.order.total, Decimal::new(3000, 2));
    assert!(cart.is_empty(), "cart still clears");
    assert_eq!(
        backend.stock_of(&ProductId::new("p1")),
        Some(10),
        "stock untouched when the decrement fails"
    );
}

#[tokio::test]
async fn order_prices_are_frozen_at_add_time() {
    let (backend, cart, checkout) = setup(vec![product("p1", "Mug", 2000, 10)]);
    // Added at an older price than the catalog now shows.
    cart.add_item(&product("p1", "Mug", 1500, 10), 1);

    let placed = checkout.place_order(customer()).await.expect("checkout");
    assert_eq!(placed.order.total, Decimal::new(1500, 2));
    assert_eq!(backend.orders().first().map(|o| o.total), Some(Decimal::new(1500, 2)));
}
