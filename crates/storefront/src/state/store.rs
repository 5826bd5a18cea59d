//! The composed state store.
//!
//! One store instance exists per running session, constructed at startup
//! and passed explicitly to whatever needs it - never a hidden
//! module-level singleton, so tests construct isolated instances.
//!
//! `dispatch` routes an action to exactly one slice reducer, swaps the
//! new tree in, and synchronously notifies every subscriber with the new
//! tree before returning. Mutations are observed in call order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{Action, RootState, reduce};

type Listener = Arc<dyn Fn(&RootState) + Send + Sync>;

struct Subscriber {
    id: u64,
    listener: Listener,
}

struct StoreInner {
    state: Mutex<Arc<RootState>>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscriber_id: AtomicU64,
}

/// Application state store.
///
/// Cheaply cloneable handle; clones share the same state tree and
/// subscriber list.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store seeded with default slice states.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(RootState::default())
    }

    /// Create a store seeded with an explicit tree.
    #[must_use]
    pub fn with_state(state: RootState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(Arc::new(state)),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current state tree. Cheap: clones an `Arc`, not the tree.
    #[must_use]
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&lock(&self.inner.state))
    }

    /// Apply an action and synchronously notify all subscribers with the
    /// resulting tree, in subscription order, before returning.
    pub fn dispatch(&self, action: Action) {
        let next = {
            let mut state = lock(&self.inner.state);
            let next = Arc::new(reduce(&state, &action));
            *state = Arc::clone(&next);
            next
        };

        // Snapshot the listener list so a listener may subscribe,
        // unsubscribe, or dispatch again without deadlocking.
        let listeners: Vec<Listener> = lock(&self.inner.subscribers)
            .iter()
            .map(|sub| Arc::clone(&sub.listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }

    /// Register a subscriber invoked after every dispatch.
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RootState) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.subscribers).push(Subscriber {
            id,
            listener: Arc::new(listener),
        });
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle for a store subscription; dropping it unsubscribes.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner.subscribers).retain(|sub| sub.id != self.id);
        }
    }
}

/// Lock a mutex, recovering the guard if a prior holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
