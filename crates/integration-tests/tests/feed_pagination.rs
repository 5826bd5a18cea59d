//! Integration tests for feed pagination, request dedup, and
//! stale-result handling.
//!
//! The gated [`ScriptedCatalog`] holds listing calls open so tests can
//! interleave proximity signals and filter changes with a fetch that is
//! still in flight.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use vitrine_integration_tests::ScriptedCatalog;
use vitrine_storefront::catalog::CatalogApi;
use vitrine_storefront::feed::{FeedContext, FeedController, LoadOutcome, ManualSignal};

const PAGE_SIZE: u64 = 12;

fn seeded_feed(catalog: &Arc<ScriptedCatalog>) -> FeedController {
    FeedController::new(
        Arc::clone(catalog) as Arc<dyn CatalogApi>,
        PAGE_SIZE,
        FeedContext::Default,
        Some(catalog.first_page(PAGE_SIZE)),
    )
}

/// Yield until the feed settles at `loaded` items.
async fn wait_for_loaded(feed: &FeedController, loaded: u64) {
    while feed.snapshot().loaded < loaded {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Sequential Pagination
// =============================================================================

/// total=42, page_size=12, seeded with 12: three awaited loads reach 42,
/// and a fourth call issues no request at all.
#[tokio::test]
async fn test_sequential_loads_reach_exact_total() {
    let catalog = Arc::new(ScriptedCatalog::new(42));
    let feed = seeded_feed(&catalog);

    assert_eq!(feed.load_more().await, LoadOutcome::Appended);
    assert_eq!(feed.load_more().await, LoadOutcome::Appended);
    assert_eq!(feed.load_more().await, LoadOutcome::Appended);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.loaded, 42);
    assert_eq!(snapshot.total, 42);
    assert!(!snapshot.has_more);
    assert_eq!(catalog.calls(), 3);

    assert_eq!(feed.load_more().await, LoadOutcome::UpToDate);
    assert_eq!(catalog.calls(), 3, "no-op must not issue a request");
}

#[tokio::test]
async fn test_category_context_paginates_its_own_subset() {
    // 40 products, 20 in category "even".
    let catalog = Arc::new(ScriptedCatalog::new(40));
    let feed = FeedController::new(
        Arc::clone(&catalog) as Arc<dyn CatalogApi>,
        PAGE_SIZE,
        FeedContext::Category("even".to_string()),
        None,
    );

    // Seed via reset, the way a category page mounts with server data.
    feed.reset(
        FeedContext::Category("even".to_string()),
        Some(
            catalog
                .products_by_category("even", PAGE_SIZE, 0)
                .await
                .unwrap(),
        ),
    );
    assert_eq!(feed.load_more().await, LoadOutcome::Appended);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.total, 20);
    assert_eq!(snapshot.loaded, 20);
    assert!(snapshot.items.iter().all(|p| p.category == "even"));
}

// =============================================================================
// Concurrent Dedup
// =============================================================================

/// Two back-to-back load_more calls while the first is pending issue
/// exactly one outbound request; the in-flight guard absorbs the second.
#[tokio::test]
async fn test_concurrent_load_more_issues_one_request() {
    let catalog = Arc::new(ScriptedCatalog::gated(42));
    let feed = seeded_feed(&catalog);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    catalog.wait_for_in_flight().await;

    assert_eq!(feed.load_more().await, LoadOutcome::AlreadyFetching);
    assert_eq!(catalog.calls(), 1);

    catalog.release_one();
    assert_eq!(pending.await.unwrap(), LoadOutcome::Appended);
    assert_eq!(feed.snapshot().loaded, 24);
    assert_eq!(catalog.calls(), 1);
}

/// A proximity signal firing repeatedly while a fetch is outstanding is
/// deduplicated by the same guard.
#[tokio::test]
async fn test_signal_storm_dedups_to_one_request() {
    let catalog = Arc::new(ScriptedCatalog::gated(42));
    let feed = seeded_feed(&catalog);
    let signal = ManualSignal::new();
    let subscription = feed.watch(&signal);

    signal.fire();
    catalog.wait_for_in_flight().await;
    signal.fire();
    signal.fire();
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    assert_eq!(catalog.calls(), 1);

    catalog.release_one();
    wait_for_loaded(&feed, 24).await;

    // Unmount: no further triggers fire, in-flight state is already idle.
    drop(subscription);
    signal.fire();
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    assert_eq!(catalog.calls(), 1);
}

// =============================================================================
// Stale Results Across Context Changes
// =============================================================================

/// A fetch still in flight when the filter context changes resolves to
/// nothing: its items never reach the new context.
#[tokio::test]
async fn test_stale_fetch_is_dropped_after_context_change() {
    let catalog = Arc::new(ScriptedCatalog::gated(42));
    let feed = seeded_feed(&catalog);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    catalog.wait_for_in_flight().await;

    // The user types a search while page two is still loading.
    let search_seed = catalog.first_page(PAGE_SIZE);
    feed.reset(FeedContext::Search("Product 1".to_string()), Some(search_seed));
    let reseeded = feed.snapshot();

    catalog.release_one();
    assert_eq!(pending.await.unwrap(), LoadOutcome::Stale);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.context, FeedContext::Search("Product 1".to_string()));
    assert_eq!(snapshot.loaded, reseeded.loaded, "stale items must not append");
    assert!(!snapshot.is_fetching);
    assert_eq!(snapshot.error, None);
}

/// After a stale drop, the new context paginates normally from its own
/// offsets.
#[tokio::test]
async fn test_new_context_loads_after_stale_drop() {
    let catalog = Arc::new(ScriptedCatalog::gated(42));
    let feed = seeded_feed(&catalog);

    let pending = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    catalog.wait_for_in_flight().await;

    feed.reset(FeedContext::Category("even".to_string()), None);
    catalog.release_one();
    assert_eq!(pending.await.unwrap(), LoadOutcome::Stale);

    // Empty seed means nothing to load until a real seed arrives.
    assert_eq!(feed.load_more().await, LoadOutcome::UpToDate);

    let seed = catalog.category_first_page("even", PAGE_SIZE);
    feed.reset(FeedContext::Category("even".to_string()), Some(seed));

    let load = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_more().await }
    });
    catalog.wait_for_in_flight().await;
    catalog.release_one();
    assert_eq!(load.await.unwrap(), LoadOutcome::Appended);
    assert_eq!(feed.snapshot().loaded, 20);
}
