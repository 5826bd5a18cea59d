//! Incremental catalog feed: per-context pagination over the catalog.
//!
//! A [`FeedController`] owns one filter context's pagination state
//! (items loaded so far, authoritative total, in-flight flag, last
//! error) and moves through `Idle -> Fetching -> Idle | Errored`.
//! Changing the filter context discards the state wholesale and bumps a
//! generation token; a fetch that resolves under an older generation is
//! dropped silently so stale results never land in the new context.

mod signal;

pub use signal::{ManualSignal, NearEndCallback, NearEndSignal, NearEndSubscription};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vitrine_core::{Product, ProductPage};

use crate::catalog::{CatalogApi, CatalogError};

/// The active filter discriminator scoping a feed's pagination.
///
/// A context is exactly one of these, never a combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedContext {
    /// Unfiltered listing.
    Default,
    /// Full-text search results.
    Search(String),
    /// One category's listing.
    Category(String),
}

/// What a `load_more` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and appended.
    Appended,
    /// A fetch for this context was already in flight; no request made.
    AlreadyFetching,
    /// Everything is loaded (`loaded >= total`); no request made.
    UpToDate,
    /// The fetch resolved after the context changed; result dropped.
    Stale,
    /// The fetch failed; the error is readable in the snapshot.
    Failed,
}

/// Read model handed to the UI layer.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Context this snapshot belongs to.
    pub context: FeedContext,
    /// Products loaded so far, in arrival order.
    pub items: Vec<Product>,
    /// Server-reported total for the whole filtered set.
    pub total: u64,
    /// Items loaded so far (`items.len()`).
    pub loaded: u64,
    /// Whether a fetch is currently in flight.
    pub is_fetching: bool,
    /// User-facing message from the last failed fetch, cleared on the
    /// next attempt.
    pub error: Option<String>,
    /// Whether more items remain on the server.
    pub has_more: bool,
}

struct FeedState {
    context: FeedContext,
    items: Vec<Product>,
    total: u64,
    is_fetching: bool,
    error: Option<String>,
    /// Identity token for the current context; bumped on every reset.
    generation: u64,
}

impl FeedState {
    fn seed(context: FeedContext, initial: Option<ProductPage>, generation: u64) -> Self {
        let (items, total) = initial.map_or((Vec::new(), 0), |page| (page.products, page.total));
        Self {
            context,
            items,
            total,
            is_fetching: false,
            error: None,
            generation,
        }
    }

    fn loaded(&self) -> u64 {
        self.items.len() as u64
    }

    fn has_more(&self) -> bool {
        self.loaded() < self.total
    }
}

struct FeedInner {
    client: Arc<dyn CatalogApi>,
    page_size: u64,
    state: Mutex<FeedState>,
}

/// Pagination controller for one filtered catalog view.
///
/// Cheaply cloneable handle; clones share the same state.
#[derive(Clone)]
pub struct FeedController {
    inner: Arc<FeedInner>,
}

impl FeedController {
    /// Create a controller seeded with a server-rendered first page, or
    /// with nothing (`loaded = total = 0`, so `load_more` is a no-op
    /// until [`reset`](Self::reset) provides a real context).
    #[must_use]
    pub fn new(
        client: Arc<dyn CatalogApi>,
        page_size: u64,
        context: FeedContext,
        initial: Option<ProductPage>,
    ) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                client,
                page_size,
                state: Mutex::new(FeedState::seed(context, initial, 0)),
            }),
        }
    }

    /// Current read model. Clones the loaded items.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = lock(&self.inner.state);
        FeedSnapshot {
            context: state.context.clone(),
            items: state.items.clone(),
            total: state.total,
            loaded: state.loaded(),
            is_fetching: state.is_fetching,
            error: state.error.clone(),
            has_more: state.has_more(),
        }
    }

    /// The context this controller is currently scoped to.
    #[must_use]
    pub fn context(&self) -> FeedContext {
        lock(&self.inner.state).context.clone()
    }

    /// Replace the context wholesale: new filter, new seed page, fresh
    /// pagination. Any fetch still in flight for the old context will
    /// resolve against a stale generation and be dropped.
    pub fn reset(&self, context: FeedContext, initial: Option<ProductPage>) {
        let mut state = lock(&self.inner.state);
        let generation = state.generation + 1;
        *state = FeedState::seed(context, initial, generation);
    }

    /// Fetch the next page for the current context.
    ///
    /// No-op while a fetch is in flight (`AlreadyFetching`) or when
    /// everything is loaded (`UpToDate`) - in both cases no request is
    /// issued. The in-flight guard is the sole dedup mechanism for
    /// proximity signals firing repeatedly. On failure the snapshot
    /// carries a user-facing message and already-loaded items are
    /// untouched; retry is re-invoking this method.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, skip, context) = {
            let mut state = lock(&self.inner.state);
            if state.is_fetching {
                return LoadOutcome::AlreadyFetching;
            }
            if !state.has_more() {
                return LoadOutcome::UpToDate;
            }
            state.is_fetching = true;
            state.error = None;
            (state.generation, state.loaded(), state.context.clone())
        };

        let result = self.fetch_page(&context, skip).await;

        let mut state = lock(&self.inner.state);
        if state.generation != generation {
            // The context changed while this request was in flight; the
            // replacement state was seeded with is_fetching = false and
            // must not be touched at all.
            tracing::debug!(?context, "dropping stale feed page");
            return LoadOutcome::Stale;
        }

        state.is_fetching = false;
        match result {
            Ok(page) => {
                state.items.extend(page.products);
                state.total = page.total;
                LoadOutcome::Appended
            }
            Err(error) => {
                tracing::warn!(%error, ?context, "feed page fetch failed");
                state.error = Some(error.user_message());
                LoadOutcome::Failed
            }
        }
    }

    /// React to a proximity signal: each near-end event triggers a
    /// `load_more` on a background task. Dropping the returned
    /// subscription (unmount) stops further triggers; an in-flight
    /// request is not aborted and dies by the stale-generation rule.
    #[must_use = "dropping the subscription detaches the proximity trigger"]
    pub fn watch(&self, signal: &dyn NearEndSignal) -> NearEndSubscription {
        let controller = self.clone();
        signal.on_near_end(Box::new(move || {
            let controller = controller.clone();
            tokio::spawn(async move {
                let _ = controller.load_more().await;
            });
        }))
    }

    async fn fetch_page(
        &self,
        context: &FeedContext,
        skip: u64,
    ) -> Result<ProductPage, CatalogError> {
        let limit = self.inner.page_size;
        match context {
            FeedContext::Default => self.inner.client.list_products(limit, skip).await,
            FeedContext::Search(term) => {
                self.inner.client.search_products(term, limit, skip).await
            }
            FeedContext::Category(slug) => {
                self.inner
                    .client
                    .products_by_category(slug, limit, skip)
                    .await
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
