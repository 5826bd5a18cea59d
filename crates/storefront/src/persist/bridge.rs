//! Hydration and write-back between the store and durable storage.
//!
//! The bridge has an explicit two-state lifecycle: `Uninitialized` until
//! [`PersistenceBridge::hydrate`] has run, then `Ready`. UI layers must
//! hold gated content (anything reading auth, favorites, or cart) behind
//! a neutral skeleton until `Ready`, otherwise the first paint of a
//! fresh process renders guest state that flashes to the hydrated state
//! a moment later.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::{PersistError, StateStorage, codec, keys};
use crate::state::{
    Action, AuthAction, AuthState, CartAction, CartState, FavoritesAction, FavoritesState,
    RootState, Store, Subscription, ThemeAction, ThemeState,
};

/// Bridge lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    /// Hydration has not run; gated content must not render.
    Uninitialized,
    /// Hydration completed; the store reflects durable storage.
    Ready,
}

/// Connects the [`Store`] to durable storage.
pub struct PersistenceBridge {
    storage: Arc<dyn StateStorage>,
    ready: AtomicBool,
}

impl PersistenceBridge {
    /// Create a bridge over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            storage,
            ready: AtomicBool::new(false),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> BridgePhase {
        if self.is_ready() {
            BridgePhase::Ready
        } else {
            BridgePhase::Uninitialized
        }
    }

    /// Whether hydration has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Populate the store from durable storage. Runs once, at startup,
    /// before gated content is shown.
    ///
    /// Each of the four keys is decoded independently: a present,
    /// shape-valid record replaces that slice wholesale; an absent,
    /// corrupt, or invariant-breaking record leaves the slice default
    /// and affects nothing else. Storage read errors are treated like
    /// absent records (logged at warn).
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::AlreadyHydrated`] when called on a bridge
    /// that is already `Ready`.
    pub fn hydrate(&self, store: &Store) -> Result<(), PersistError> {
        if self.is_ready() {
            return Err(PersistError::AlreadyHydrated);
        }

        if let Some(cart) = self.read_record::<CartState>(keys::CART) {
            store.dispatch(Action::Cart(CartAction::Replace(cart)));
        }
        if let Some(favorites) = self.read_record::<FavoritesState>(keys::FAVORITES) {
            if favorites.is_consistent() {
                store.dispatch(Action::Favorites(FavoritesAction::Replace(favorites)));
            } else {
                tracing::warn!(
                    key = keys::FAVORITES,
                    "stored favorites violate the order/snapshot invariant; using default"
                );
            }
        }
        if let Some(theme) = self.read_record::<ThemeState>(keys::THEME) {
            store.dispatch(Action::Theme(ThemeAction::Replace(theme)));
        }
        if let Some(auth) = self.read_record::<AuthState>(keys::AUTH) {
            store.dispatch(Action::Auth(AuthAction::Replace(auth)));
        }

        self.ready.store(true, Ordering::Release);
        tracing::debug!("store hydrated from durable storage");
        Ok(())
    }

    /// Subscribe write-back: after every store mutation, re-encode all
    /// four slices and persist each independently, for the life of the
    /// returned subscription.
    ///
    /// Write failures (storage unavailable, quota) are logged and
    /// swallowed; they never crash the mutation path that triggered
    /// them, and the next mutation's write-back attempt is independent.
    #[must_use = "dropping the subscription stops write-back"]
    pub fn attach(&self, store: &Store) -> Subscription {
        let storage = Arc::clone(&self.storage);
        store.subscribe(move |state| write_back(storage.as_ref(), state))
    }

    fn read_record<T: serde::de::DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = self.storage.read(key).unwrap_or_else(|error| {
            tracing::warn!(key, %error, "storage read failed during hydration; using default");
            None
        });
        codec::decode(key, raw.as_deref())
    }
}

/// Persist a full snapshot, one record per slice.
fn write_back(storage: &dyn StateStorage, state: &RootState) {
    persist_slice(storage, keys::CART, &state.cart);
    persist_slice(storage, keys::FAVORITES, &state.favorites);
    persist_slice(storage, keys::THEME, &state.theme);
    persist_slice(storage, keys::AUTH, &state.auth);
}

fn persist_slice<T: Serialize>(storage: &dyn StateStorage, key: &'static str, value: &T) {
    let encoded = match codec::encode(key, value) {
        Ok(encoded) => encoded,
        Err(error) => {
            tracing::warn!(key, %error, "state encode failed; record not written");
            return;
        }
    };
    if let Err(error) = storage.write(key, &encoded) {
        tracing::warn!(key, %error, "state write-back failed");
    }
}
