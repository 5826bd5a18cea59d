//! Application wiring shared across the session.
//!
//! One [`App`] is constructed at process start and passed to whatever
//! needs it. Booting hydrates the store from durable storage and
//! attaches write-back before returning, so gated content can render as
//! soon as the handle exists.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::persist::{FileStorage, PersistenceBridge, StateStorage};
use crate::state::{Store, Subscription};

/// Application state shared across the session.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the catalog client, the state store,
/// and the persistence bridge.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    store: Store,
    bridge: PersistenceBridge,
    // Held for the life of the session; dropping it would stop write-back.
    _write_back: Subscription,
}

impl App {
    /// Boot the application: build the catalog client, hydrate the store
    /// from the configured state directory, and attach write-back.
    ///
    /// Returns only once the bridge is `Ready`, so callers never observe
    /// un-hydrated state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or if
    /// hydration is attempted twice (impossible through this path).
    pub fn boot(config: StorefrontConfig) -> Result<Self> {
        let storage: Arc<dyn StateStorage> = Arc::new(FileStorage::new(&config.state_dir));
        Self::boot_with_storage(config, storage)
    }

    /// Boot against an explicit storage backend. Tests use this with
    /// in-memory storage.
    ///
    /// # Errors
    ///
    /// Same as [`App::boot`].
    pub fn boot_with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn StateStorage>,
    ) -> Result<Self> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let store = Store::new();
        let bridge = PersistenceBridge::new(storage);

        bridge.hydrate(&store)?;
        let write_back = bridge.attach(&store);

        Ok(Self {
            inner: Arc::new(AppInner {
                config,
                catalog,
                store,
                bridge,
                _write_back: write_back,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the state store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the persistence bridge.
    #[must_use]
    pub fn bridge(&self) -> &PersistenceBridge {
        &self.inner.bridge
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use crate::state::{Action, ThemeAction, ThemeMode};

    #[test]
    fn test_boot_hydrates_before_returning() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write("theme", r#"{"mode":"light"}"#).unwrap();

        let app = App::boot_with_storage(
            StorefrontConfig::default(),
            Arc::clone(&storage) as Arc<dyn StateStorage>,
        )
        .unwrap();

        assert!(app.bridge().is_ready());
        assert_eq!(app.store().state().theme.mode, ThemeMode::Light);
    }

    #[test]
    fn test_mutations_after_boot_are_written_back() {
        let storage = Arc::new(MemoryStorage::new());
        let app = App::boot_with_storage(
            StorefrontConfig::default(),
            Arc::clone(&storage) as Arc<dyn StateStorage>,
        )
        .unwrap();

        app.store()
            .dispatch(Action::Theme(ThemeAction::Set(ThemeMode::Light)));

        let record = storage.read("theme").unwrap();
        assert_eq!(record.as_deref(), Some(r#"{"mode":"light"}"#));
    }
}
