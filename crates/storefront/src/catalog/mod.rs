//! Catalog API client.
//!
//! # Architecture
//!
//! - The catalog is the source of truth - no local sync, direct REST
//!   calls against a DummyJSON-compatible endpoint
//! - [`CatalogApi`] is the seam the rest of the engine depends on; the
//!   feed controller and tests inject their own implementations
//! - In-memory caching via `moka` for read responses (5 minute TTL);
//!   search and category listings are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::catalog::{CatalogApi, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! // First page of the default listing
//! let page = client.list_products(12, 0).await?;
//!
//! // Scoped listings
//! let hits = client.search_products("phone", 12, 0).await?;
//! let beauty = client.products_by_category("beauty", 12, 0).await?;
//! ```

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use thiserror::Error;
use vitrine_core::{Category, Product, ProductId, ProductPage, ProductPayload};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP transport failed (DNS, connect, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status}{}", format_status_detail(.message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, when the error body carried one.
        message: Option<String>,
    },

    /// Response body was not the expected shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

fn format_status_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl CatalogError {
    /// The human-readable message surfaced to the UI (e.g. in the feed's
    /// retryable error state).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => {
                "Unable to reach the catalog at the moment. Please check your connection and try again."
                    .to_string()
            }
            Self::Status { message: Some(message), .. } => message.clone(),
            Self::Status { .. } | Self::Parse(_) => "Failed to load products.".to_string(),
            Self::NotFound(what) => format!("{what} was not found."),
        }
    }
}

/// Read and CRUD surface of the external catalog.
///
/// Every listing returns a [`ProductPage`] envelope; `total` in the
/// envelope is the authoritative count for the whole filtered set.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Page through the unfiltered listing.
    async fn list_products(&self, limit: u64, skip: u64) -> Result<ProductPage, CatalogError>;

    /// Page through full-text search results.
    async fn search_products(
        &self,
        term: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError>;

    /// Page through one category's listing.
    async fn products_by_category(
        &self,
        category: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError>;

    /// All product categories.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// A single product by id.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Create a product.
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, CatalogError>;

    /// Partially update a product.
    async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, CatalogError>;

    /// Delete a product.
    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError>;
}
