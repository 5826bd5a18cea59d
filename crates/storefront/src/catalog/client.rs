//! REST catalog client implementation.
//!
//! Uses `reqwest` against a DummyJSON-compatible endpoint and caches
//! stable reads with `moka` (5-minute TTL). Search and category listings
//! are request-shaped by the user and are never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use vitrine_core::{Category, Product, ProductId, ProductPage, ProductPayload};

use super::{CatalogApi, CatalogError};
use crate::config::CatalogConfig;

const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Error body shape the catalog uses for non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Page(ProductPage),
    Categories(Vec<Category>),
}

/// Client for the catalog REST API.
///
/// Cheaply cloneable; clones share the connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Execute a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        decode_response(response, what).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Check status and decode the body, mapping failures into the
/// [`CatalogError`] taxonomy.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, CatalogError> {
    let status = response.status();
    let body = response.text().await?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(what.to_string()));
    }

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "catalog returned non-success status"
        );
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message);
        return Err(CatalogError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|error| {
        tracing::error!(
            %error,
            body = %body.chars().take(500).collect::<String>(),
            "failed to parse catalog response"
        );
        CatalogError::Parse(error)
    })
}

fn paging(limit: u64, skip: u64) -> Vec<(&'static str, String)> {
    vec![("limit", limit.to_string()), ("skip", skip.to_string())]
}

#[async_trait]
impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self, limit: u64, skip: u64) -> Result<ProductPage, CatalogError> {
        let cache_key = format!("products:{limit}:{skip}");

        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for products");
            return Ok(page);
        }

        let page: ProductPage = self
            .get_json("/products", &paging(limit, skip), "products")
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(page.clone()))
            .await;

        Ok(page)
    }

    #[instrument(skip(self), fields(term = %term))]
    async fn search_products(
        &self,
        term: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError> {
        // User-shaped queries are not cached.
        let mut query = paging(limit, skip);
        query.push(("q", term.to_string()));
        self.get_json("/products/search", &query, "products").await
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn products_by_category(
        &self,
        category: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError> {
        let path = format!("/products/category/{category}");
        self.get_json(&path, &paging(limit, skip), "products").await
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        const CACHE_KEY: &str = "categories";

        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(CACHE_KEY).await
        {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .get_json("/products/categories", &[], "categories")
            .await?;

        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let path = format!("/products/{id}");
        let product: Product = self
            .get_json(&path, &[], &format!("Product {id}"))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self, payload))]
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, CatalogError> {
        let url = format!("{}/products/add", self.inner.base_url);
        let response = self.inner.client.post(&url).json(payload).send().await?;
        let product = decode_response(response, "products").await?;
        self.invalidate_all().await;
        Ok(product)
    }

    #[instrument(skip(self, payload), fields(id = %id))]
    async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, CatalogError> {
        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.patch(&url).json(payload).send().await?;
        let product = decode_response(response, &format!("Product {id}")).await?;
        self.invalidate_all().await;
        Ok(product)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.delete(&url).send().await?;
        // The catalog echoes the deleted product; the body is irrelevant
        // here beyond status checking.
        let _: serde_json::Value = decode_response(response, &format!("Product {id}")).await?;
        self.invalidate_all().await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_params() {
        let params = paging(12, 24);
        assert_eq!(params[0], ("limit", "12".to_string()));
        assert_eq!(params[1], ("skip", "24".to_string()));
    }

    #[test]
    fn test_error_body_parses_catalog_shape() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "Product not found"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Product not found"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message, None);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = CatalogConfig {
            base_url: "https://dummyjson.com/".to_string(),
            timeout: Duration::from_secs(8),
        };
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(client.inner.base_url, "https://dummyjson.com");
    }
}
