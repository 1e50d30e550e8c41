//! The shared shopping cart store.
//!
//! Single authoritative, in-memory + persisted representation of the cart,
//! shared by every consuming view. Construct one [`CartStore`] at
//! application start and clone it wherever cart state is read or written;
//! clones share the same state via an inner `Arc`.
//!
//! Every mutation persists the full versioned snapshot to the key-value
//! bridge before subscribers are notified and before the call returns, so a
//! reload immediately after a mutation never loses it. Mutations are
//! synchronous and applied in call order; subscribers are notified
//! synchronously after each mutation, in subscription order.

use std::sync::{Arc, Mutex};

use clementine_core::{CartLineItem, CartSnapshot, Product, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, keys};

/// Handle returned by [`CartStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&[CartLineItem]) + Send + Sync>;

/// The shared cart store.
///
/// Cheaply cloneable; all clones share one cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<CartState>,
}

struct CartState {
    items: Vec<CartLineItem>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl CartStore {
    /// Create a cart store, hydrating from a previously persisted snapshot.
    ///
    /// A missing or unreadable snapshot silently yields an empty cart; boot
    /// never fails on corrupt storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let items = match storage.get(keys::CART) {
            Some(json) => match CartSnapshot::from_json(&json) {
                Some(snapshot) => snapshot.items,
                None => {
                    warn!("persisted cart snapshot unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(lines = items.len(), "cart hydrated");

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                state: Mutex::new(CartState {
                    items,
                    subscribers: Vec::new(),
                    next_subscription: 0,
                }),
            }),
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// If a line for this product already exists its quantity increases;
    /// otherwise a new line with a fresh line-item id is appended. Stock is
    /// not checked here: validation against on-hand quantity happens at the
    /// point of action (add-to-cart button, checkout), not inside the store.
    pub fn add_item(&self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|l| l.product_id() == &product.id) {
                line.quantity += quantity;
            } else {
                items.push(CartLineItem::new(product.clone(), quantity));
            }
        });
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A non-positive quantity removes the line (delete, not an error).
    /// No-op if no line for `product_id` exists.
    pub fn update_quantity(&self, product_id: &ProductId, new_quantity: u32) {
        self.mutate(|items| {
            if new_quantity == 0 {
                items.retain(|l| l.product_id() != product_id);
            } else if let Some(line) = items.iter_mut().find(|l| l.product_id() == product_id) {
                line.quantity = new_quantity;
            }
        });
    }

    /// Remove the line for `product_id` if present.
    pub fn remove_item(&self, product_id: &ProductId) {
        self.mutate(|items| {
            items.retain(|l| l.product_id() != product_id);
        });
    }

    /// Empty the cart. Called after successful order placement.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock_state().items.clone()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().items.is_empty()
    }

    /// Sum of quantities across all lines (the header badge number), not
    /// the count of distinct lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lock_state().items.iter().map(|l| l.quantity).sum()
    }

    /// Sum over all lines of add-time unit price times quantity.
    ///
    /// Recomputed on every call; never cached.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lock_state()
            .items
            .iter()
            .map(CartLineItem::line_total)
            .sum()
    }

    /// Quantity currently in the cart for `product_id`, 0 when absent.
    #[must_use]
    pub fn line_quantity(&self, product_id: &ProductId) -> u32 {
        self.lock_state()
            .items
            .iter()
            .find(|l| l.product_id() == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Register a callback invoked synchronously after every mutation with
    /// the post-mutation line items. Callbacks run in subscription order.
    pub fn subscribe(&self, callback: impl Fn(&[CartLineItem]) + Send + Sync + 'static) -> SubscriptionId {
        let mut state = self.lock_state();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a previously registered callback. No-op for unknown ids.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock_state().subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Apply a mutation, persist the result, then notify subscribers.
    fn mutate(&self, f: impl FnOnce(&mut Vec<CartLineItem>)) {
        let (items, subscribers) = {
            let mut state = self.lock_state();
            f(&mut state.items);
            self.persist(&state.items);
            (
                state.items.clone(),
                state
                    .subscribers
                    .iter()
                    .map(|(_, s)| Arc::clone(s))
                    .collect::<Vec<_>>(),
            )
        };
        // Callbacks run outside the lock so a subscriber may call back into
        // the store.
        for subscriber in subscribers {
            subscriber(&items);
        }
    }

    fn persist(&self, items: &[CartLineItem]) {
        match CartSnapshot::new(items.to_vec()).to_json() {
            Ok(json) => self.inner.storage.set(keys::CART, &json),
            // Serialization of plain data types does not fail in practice;
            // losing one persist beats poisoning the session.
            Err(error) => warn!(%error, "failed to serialize cart snapshot"),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CartState> {
        self.inner.state.lock().expect("cart state lock poisoned")
    }
}
