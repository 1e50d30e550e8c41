//! Like/wishlist reconciliation.
//!
//! Presents one boolean "liked by the current actor" per product and one
//! toggle operation, regardless of whether the session is authenticated.
//! The guest/authenticated branch lives entirely in [`LikeReconciler::actor`]:
//! authenticated sessions act as their user id, anonymous sessions as a
//! guest id generated once and persisted per-browser.
//!
//! Guest toggles are mirrored into a locally persisted like-set alongside
//! the remote record, so guest likes stay visible without a durable
//! server-side identity. Guest likes are not merged into the user account
//! on login; see DESIGN.md.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use clementine_core::{ActorId, GuestId, GuestLikeSet, LikeRecord, ProductId, UserId};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::data::{DataService, DataServiceError};
use crate::storage::{KeyValueStore, keys};

/// Like toggle failure. The in-memory and mirrored state are only updated
/// after the remote write succeeds, so a failed toggle leaves everything as
/// it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("like update failed: {0}")]
pub struct LikeError(#[from] pub DataServiceError);

/// Reconciles the current actor's like set across guest and authenticated
/// identities.
pub struct LikeReconciler<S> {
    inner: Arc<LikeReconcilerInner<S>>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for LikeReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LikeReconcilerInner<S> {
    data: Arc<S>,
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<LikeState>,
}

struct LikeState {
    session_user: Option<UserId>,
    liked: HashSet<ProductId>,
}

impl<S: DataService> LikeReconciler<S> {
    /// Create a reconciler for an initially anonymous session.
    ///
    /// For guests, the locally mirrored like-set is loaded immediately so
    /// liked hearts render before any remote round-trip; call
    /// [`Self::hydrate`] to reconcile with the backend.
    #[must_use]
    pub fn new(data: Arc<S>, storage: Arc<dyn KeyValueStore>) -> Self {
        let liked = read_guest_mirror(storage.as_ref());
        Self {
            inner: Arc::new(LikeReconcilerInner {
                data,
                storage,
                state: Mutex::new(LikeState {
                    session_user: None,
                    liked,
                }),
            }),
        }
    }

    /// Resolve the current liking identity.
    ///
    /// Authenticated session ⇒ user id; otherwise a guest id, generated and
    /// persisted on first use.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        if let Some(user) = self.lock_state().session_user.clone() {
            return ActorId::User(user);
        }
        ActorId::Guest(self.guest_id())
    }

    /// Switch the session identity (login/logout).
    ///
    /// The in-memory like set is cleared; callers re-hydrate for the new
    /// actor. Guest likes are deliberately not merged into the account.
    pub fn set_session_user(&self, user: Option<UserId>) {
        let mut state = self.lock_state();
        state.session_user = user;
        state.liked = match state.session_user {
            // Back to anonymous: the local mirror is authoritative again.
            None => read_guest_mirror(self.inner.storage.as_ref()),
            Some(_) => HashSet::new(),
        };
    }

    /// Load the current actor's like set from the backend.
    ///
    /// For guests the remote set is unioned with the local mirror, so likes
    /// recorded while offline are kept.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError`] when the backend read fails; the previously
    /// known state is left intact.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<(), LikeError> {
        let actor = self.actor();
        let remote = self.inner.data.list_likes(&actor).await?;
        let mut state = self.lock_state();
        let mut liked: HashSet<ProductId> = remote.into_iter().collect();
        if actor.is_guest() {
            liked.extend(read_guest_mirror(self.inner.storage.as_ref()));
        }
        debug!(actor = %actor.as_str(), likes = liked.len(), "like set hydrated");
        state.liked = liked;
        Ok(())
    }

    /// Whether the current actor has liked `product_id`.
    #[must_use]
    pub fn is_liked(&self, product_id: &ProductId) -> bool {
        self.lock_state().liked.contains(product_id)
    }

    /// Product ids the current actor has liked.
    #[must_use]
    pub fn liked_products(&self) -> Vec<ProductId> {
        self.lock_state().liked.iter().cloned().collect()
    }

    /// Flip the like state for (product, current actor).
    ///
    /// Liked ⇒ deletes the remote record; Unliked ⇒ inserts one. Returns
    /// the new state (`true` = liked). Toggling is idempotent per
    /// (product, actor) pair and never touches any other actor's state.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError`] when the remote write fails; local state is
    /// unchanged in that case.
    #[instrument(skip(self), fields(product = %product_id))]
    pub async fn toggle_like(&self, product_id: &ProductId) -> Result<bool, LikeError> {
        let actor = self.actor();
        let was_liked = self.is_liked(product_id);

        if was_liked {
            self.inner.data.delete_like(product_id, &actor).await?;
        } else {
            let record = LikeRecord {
                product_id: product_id.clone(),
                actor: actor.clone(),
            };
            self.inner.data.insert_like(&record).await?;
        }

        let mut state = self.lock_state();
        if was_liked {
            state.liked.remove(product_id);
        } else {
            state.liked.insert(product_id.clone());
        }
        if actor.is_guest() {
            write_guest_mirror(self.inner.storage.as_ref(), &state.liked);
        }
        Ok(!was_liked)
    }

    /// The persisted guest id, created on first use.
    fn guest_id(&self) -> GuestId {
        if let Some(id) = self.inner.storage.get(keys::GUEST_ID) {
            return GuestId::new(id);
        }
        let id = GuestId::generate();
        self.inner.storage.set(keys::GUEST_ID, id.as_str());
        id
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, LikeState> {
        self.inner.state.lock().expect("like state lock poisoned")
    }
}

/// Read the guest like-set mirror, degrading to empty on corrupt data.
fn read_guest_mirror(storage: &dyn KeyValueStore) -> HashSet<ProductId> {
    let Some(json) = storage.get(keys::GUEST_LIKES) else {
        return HashSet::new();
    };
    match GuestLikeSet::from_json(&json) {
        Some(set) => set.product_ids.into_iter().collect(),
        None => {
            warn!("persisted guest like set unreadable, starting empty");
            HashSet::new()
        }
    }
}

/// Persist the guest like-set mirror.
fn write_guest_mirror(storage: &dyn KeyValueStore, liked: &HashSet<ProductId>) {
    let mut ids: Vec<ProductId> = liked.iter().cloned().collect();
    ids.sort();
    match GuestLikeSet::new(ids).to_json() {
        Ok(json) => storage.set(keys::GUEST_LIKES, &json),
        Err(error) => warn!(%error, "failed to serialize guest like set"),
    }
}
