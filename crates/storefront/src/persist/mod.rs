//! Persistence: durable snapshots of the state tree.
//!
//! Four independently keyed text records (cart, favorites, theme, auth),
//! each holding the JSON encoding of one slice's full state. An absent
//! or corrupt record means "use the slice default", never a fatal error.
//!
//! The [`PersistenceBridge`] hydrates the store from these records once
//! at startup, then writes every slice back after each mutation for the
//! life of the session.

pub mod bridge;
pub mod codec;
pub mod storage;

pub use bridge::{BridgePhase, PersistenceBridge};
pub use storage::{FileStorage, MemoryStorage, StateStorage};

use thiserror::Error;

/// Storage keys, one per slice.
pub mod keys {
    /// Cart slice record.
    pub const CART: &str = "cart";
    /// Favorites slice record.
    pub const FAVORITES: &str = "favorites";
    /// Theme slice record.
    pub const THEME: &str = "theme";
    /// Auth slice record.
    pub const AUTH: &str = "auth";

    /// All slice keys, in hydration order.
    pub const ALL: [&str; 4] = [CART, FAVORITES, THEME, AUTH];
}

/// Errors from the persistence layer.
///
/// Write-back callers swallow these (logged, never propagated into the
/// mutation path); hydration treats read errors like absent records.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying storage I/O failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A slice failed to encode. Indicates a bug, not bad user data:
    /// every well-formed in-memory state encodes.
    #[error("failed to encode '{key}' record: {source}")]
    Encode {
        /// Slice key being written.
        key: &'static str,
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// `hydrate` was called on a bridge that is already `Ready`.
    #[error("store already hydrated")]
    AlreadyHydrated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let mut sorted = keys::ALL;
        sorted.sort_unstable();
        sorted.windows(2).for_each(|pair| assert_ne!(pair[0], pair[1]));
    }

    #[test]
    fn test_persist_error_display() {
        let err = PersistError::AlreadyHydrated;
        assert_eq!(err.to_string(), "store already hydrated");
    }
}
