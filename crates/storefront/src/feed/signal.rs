//! Viewport-proximity signal capability.
//!
//! The feed controller reacts to "the user is near the end of the loaded
//! list", but stays decoupled from any rendering or layout concern: the
//! embedding UI injects a [`NearEndSignal`] (in a browser-like host this
//! wraps an intersection observer) and the controller only registers a
//! callback against it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback invoked each time the viewport nears the end of the list.
pub type NearEndCallback = Box<dyn Fn() + Send + Sync>;

/// A source of near-end proximity events.
pub trait NearEndSignal {
    /// Register a callback. The returned subscription unregisters it
    /// when dropped; an already in-flight fetch is unaffected.
    fn on_near_end(&self, callback: NearEndCallback) -> NearEndSubscription;
}

/// RAII handle for a proximity registration; dropping it unregisters.
pub struct NearEndSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl NearEndSubscription {
    /// Wrap a cancellation closure, run exactly once on drop.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for NearEndSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// A [`NearEndSignal`] fired explicitly by the embedding code.
///
/// Hosts without a real viewport (the demo binary, tests) drive this by
/// calling [`ManualSignal::fire`]; each fire invokes every currently
/// registered callback.
#[derive(Clone, Default)]
pub struct ManualSignal {
    inner: Arc<ManualSignalInner>,
}

#[derive(Default)]
struct ManualSignalInner {
    callbacks: Mutex<Vec<(u64, Arc<dyn Fn() + Send + Sync>)>>,
    next_id: AtomicU64,
}

impl ManualSignal {
    /// Create a signal with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every registered callback once.
    pub fn fire(&self) {
        let callbacks: Vec<Arc<dyn Fn() + Send + Sync>> = lock(&self.inner.callbacks)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Number of currently registered callbacks.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        lock(&self.inner.callbacks).len()
    }
}

impl NearEndSignal for ManualSignal {
    fn on_near_end(&self, callback: NearEndCallback) -> NearEndSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.callbacks).push((id, Arc::from(callback)));

        let inner: Weak<ManualSignalInner> = Arc::downgrade(&self.inner);
        NearEndSubscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                lock(&inner.callbacks).retain(|(callback_id, _)| *callback_id != id);
            }
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
