//! Unified error handling for the storefront engine.
//!
//! Provides a unified `AppError` aggregating the per-concern error types.
//! Fallible engine entry points return `Result<T, AppError>`; note that
//! most failure modes in this crate deliberately never surface as errors
//! at all (decode failures fall back to defaults, write-back failures
//! are logged and swallowed, feed failures become retryable state).

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persist::PersistError;

/// Application-level error type for the storefront engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persistence operation failed.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
