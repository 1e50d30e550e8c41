//! Persistent key-value bridge.
//!
//! Thin abstraction over the host's persistent storage (browser local
//! storage or equivalent). Used to hydrate and save the cart snapshot, the
//! guest identity, the guest like-set mirror, and the recently-viewed list.
//!
//! The interface is synchronous and infallible: hosts map storage I/O
//! failures to absent data, and unreadable blobs degrade to defaults at the
//! deserialization layer rather than blocking boot.

use std::collections::HashMap;
use std::sync::RwLock;

/// Well-known storage keys.
pub mod keys {
    /// Versioned cart snapshot.
    pub const CART: &str = "clementine.cart";
    /// Locally generated guest identity.
    pub const GUEST_ID: &str = "clementine.guest_id";
    /// Guest like-set mirror.
    pub const GUEST_LIKES: &str = "clementine.guest_likes";
    /// Bounded recently-viewed product list.
    pub const RECENTLY_VIEWED: &str = "clementine.recently_viewed";
}

/// Persistent string-to-string storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Delete `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`] for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1");
        assert_eq!(store.get("k"), Some("v1".to_string()));
        store.set("k", "v2");
        assert_eq!(store.get("k"), Some("v2".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }
}
