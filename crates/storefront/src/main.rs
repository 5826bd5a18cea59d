//! Vitrine Storefront - demo session driver.
//!
//! Boots the application-state engine the way an embedding UI would:
//! load configuration, hydrate the store from the state directory, then
//! run a small scripted session against the live catalog (browse the
//! first pages of the feed, add to cart, toggle a favorite, log in, and
//! perform the demo checkout). Network failures degrade to logged
//! errors; a second run of the binary starts from the state the first
//! run persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrine_storefront::app::App;
use vitrine_storefront::catalog::{CatalogApi, CatalogClient};
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::feed::{FeedContext, FeedController};
use vitrine_storefront::state::{Action, AuthAction, CartAction, FavoritesAction, ThemeAction};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info level for this
    // crate if RUST_LOG is not set.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_storefront=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    tracing::info!(
        catalog = %config.catalog.base_url,
        state_dir = %config.state_dir.display(),
        "booting storefront engine"
    );

    let app = App::boot(config).expect("Failed to boot application state");
    let hydrated = app.store().state();
    tracing::info!(
        cart_lines = hydrated.cart.lines.len(),
        favorites = hydrated.favorites.len(),
        theme = ?hydrated.theme.mode,
        authenticated = hydrated.auth.is_authenticated,
        "store hydrated"
    );

    if let Err(error) = run_demo_session(&app).await {
        tracing::error!(%error, "demo session aborted");
    }

    let state = app.store().state();
    tracing::info!(
        cart_lines = state.cart.lines.len(),
        favorites = state.favorites.len(),
        "session finished; state persisted for the next run"
    );
}

/// Browse the feed and exercise each slice once.
async fn run_demo_session(app: &App) -> vitrine_storefront::Result<()> {
    let page_size = app.config().page_size;
    let catalog = app.catalog().clone();

    // Seed the feed the way a server-rendered first page would.
    let first_page = catalog.list_products(page_size, 0).await?;
    let feed = FeedController::new(
        Arc::new(catalog) as Arc<dyn CatalogApi>,
        page_size,
        FeedContext::Default,
        Some(first_page),
    );
    tracing::info!(
        loaded = feed.snapshot().loaded,
        total = feed.snapshot().total,
        "feed seeded"
    );

    // Scroll one page further.
    let outcome = feed.load_more().await;
    tracing::info!(?outcome, loaded = feed.snapshot().loaded, "loaded next page");

    let store = app.store();
    let snapshot = feed.snapshot();
    if let Some(product) = snapshot.items.first() {
        store.dispatch(Action::Cart(CartAction::AddItem(product.clone())));
        store.dispatch(Action::Cart(CartAction::AddItem(product.clone())));
        tracing::info!(product = %product.title, "added to cart twice");
    }
    if let Some(product) = snapshot.items.get(1) {
        store.dispatch(Action::Favorites(FavoritesAction::Toggle(product.clone())));
        tracing::info!(product = %product.title, "favorited");
    }

    store.dispatch(Action::Theme(ThemeAction::Toggle));
    store.dispatch(Action::Auth(AuthAction::Login {
        name: "Demo Shopper".to_string(),
    }));

    // Demo checkout: no payment is processed; the cart is simply cleared.
    let subtotal = store.state().cart.subtotal();
    store.dispatch(Action::Cart(CartAction::Clear));
    tracing::info!(%subtotal, "demo checkout complete");

    Ok(())
}
