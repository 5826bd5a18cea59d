//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit the public demo catalog.
//!
//! - `CATALOG_BASE_URL` - Catalog API base URL (default: `https://dummyjson.com`)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout in seconds (default: 8)
//! - `STOREFRONT_STATE_DIR` - Directory for persisted state records (default: `.vitrine-state`)
//! - `STOREFRONT_PAGE_SIZE` - Feed page size, fixed for the session (default: 12)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_TIMEOUT_SECS: &str = "8";
const DEFAULT_STATE_DIR: &str = ".vitrine-state";
const DEFAULT_PAGE_SIZE: &str = "12";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API configuration.
    pub catalog: CatalogConfig,
    /// Directory the persisted state records live in.
    pub state_dir: PathBuf,
    /// Feed page size, fixed for the session.
    pub page_size: u64,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog REST API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = validate_base_url(
            "CATALOG_BASE_URL",
            &get_env_or_default("CATALOG_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let timeout_secs = parse_u64(
            "CATALOG_TIMEOUT_SECS",
            &get_env_or_default("CATALOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?;
        let state_dir =
            PathBuf::from(get_env_or_default("STOREFRONT_STATE_DIR", DEFAULT_STATE_DIR));
        let page_size = parse_page_size(
            "STOREFRONT_PAGE_SIZE",
            &get_env_or_default("STOREFRONT_PAGE_SIZE", DEFAULT_PAGE_SIZE),
        )?;

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            state_dir,
            page_size,
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(8),
            },
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            page_size: 12,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_page_size(key: &str, value: &str) -> Result<u64, ConfigError> {
    let size = parse_u64(key, value)?;
    if size == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "page size must be at least 1".to_string(),
        ));
    }
    Ok(size)
}

/// Validate a catalog base URL and normalize away a trailing slash.
fn validate_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}
