//! Like records and the liking actor identity.

use serde::{Deserialize, Serialize};

use super::id::{GuestId, ProductId, UserId};

/// The identity a like is recorded against.
///
/// Authenticated sessions like as their user id (durable, cross-device);
/// anonymous sessions like as a locally persisted guest id (durable only for
/// this browser). All guest/user branching lives behind this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActorId {
    User(UserId),
    Guest(GuestId),
}

impl ActorId {
    /// Stable string form used as the `liker` field of remote records.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(id) => id.as_str(),
            Self::Guest(id) => id.as_str(),
        }
    }

    /// Whether this actor is an anonymous guest.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest(_))
    }
}

/// A (product, actor) like pair. At most one record exists per pair;
/// toggling is idempotent per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeRecord {
    pub product_id: ProductId,
    pub actor: ActorId,
}

/// Current schema version for the persisted guest like set.
pub const GUEST_LIKES_VERSION: u32 = 1;

/// The locally persisted mirror of a guest's liked products.
///
/// Kept alongside the remote records so guest likes stay visible even when
/// the backend is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GuestLikeSet {
    pub version: u32,
    pub product_ids: Vec<ProductId>,
}

impl GuestLikeSet {
    /// A like set over the given product ids at the current schema version.
    #[must_use]
    pub fn new(product_ids: Vec<ProductId>) -> Self {
        Self {
            version: GUEST_LIKES_VERSION,
            product_ids,
        }
    }

    /// Deserialize, degrading to `None` on any shape or version mismatch.
    #[must_use]
    pub fn from_json(json: &str) -> Option<Self> {
        let set: Self = serde_json::from_str(json).ok()?;
        (set.version == GUEST_LIKES_VERSION).then_some(set)
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
