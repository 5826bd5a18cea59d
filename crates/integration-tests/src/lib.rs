//! Integration tests for Vitrine.
//!
//! # Test Categories
//!
//! - `store_persistence` - Store dispatch, hydration, and write-back
//!   through real storage backends
//! - `feed_pagination` - Feed controller pagination, request dedup, and
//!   stale-result handling
//!
//! This crate also provides the [`ScriptedCatalog`] fake used by the
//! feed tests: it serves pages out of a fixed product list, counts
//! outbound requests, and can hold requests open at a gate so tests can
//! interleave events with an in-flight fetch.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use vitrine_core::{Category, Product, ProductId, ProductPage, ProductPayload};
use vitrine_storefront::catalog::{CatalogApi, CatalogError};

/// A deterministic product for tests; priced at `id * 10`.
#[must_use]
pub fn sample_product(id: u64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: String::new(),
        category: if id % 2 == 0 { "even" } else { "odd" }.to_string(),
        price: Decimal::from(id * 10),
        discount_percentage: 0.0,
        rating: 4.0,
        stock: 100,
        brand: None,
        thumbnail: String::new(),
        images: Vec::new(),
    }
}

/// Fake catalog for feed tests.
///
/// Serves slices of a fixed product list with an authoritative total.
/// When constructed with [`ScriptedCatalog::gated`], every listing call
/// parks at a gate after being counted; tests release calls one at a
/// time with [`ScriptedCatalog::release_one`] to script interleavings.
pub struct ScriptedCatalog {
    products: Vec<Product>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    gated: bool,
    release: Notify,
}

impl ScriptedCatalog {
    /// Ungated catalog over `count` products: calls complete immediately.
    #[must_use]
    pub fn new(count: u64) -> Self {
        Self::build(count, false)
    }

    /// Gated catalog: every listing call blocks until released.
    #[must_use]
    pub fn gated(count: u64) -> Self {
        Self::build(count, true)
    }

    fn build(count: u64, gated: bool) -> Self {
        Self {
            products: (1..=count).map(sample_product).collect(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            gated,
            release: Notify::new(),
        }
    }

    /// Total listing calls issued so far, including gated ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Listing calls currently parked at the gate.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Let one parked call proceed.
    pub fn release_one(&self) {
        self.release.notify_one();
    }

    /// Yield until at least one call is parked at the gate.
    pub async fn wait_for_in_flight(&self) {
        while self.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// The first page an embedding server would render.
    #[must_use]
    pub fn first_page(&self, page_size: u64) -> ProductPage {
        self.page_of(&self.products, page_size, 0)
    }

    /// The first page of one category, built without going through the
    /// (possibly gated) API path.
    #[must_use]
    pub fn category_first_page(&self, category: &str, page_size: u64) -> ProductPage {
        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        self.page_of(&matching, page_size, 0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn page_of(&self, matching: &[Product], limit: u64, skip: u64) -> ProductPage {
        let end = ((skip + limit) as usize).min(matching.len());
        let products = matching.get(skip as usize..end).unwrap_or(&[]).to_vec();
        ProductPage {
            products,
            total: matching.len() as u64,
            skip,
            limit,
        }
    }

    async fn serve(&self, matching: Vec<Product>, limit: u64, skip: u64) -> ProductPage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        self.page_of(&matching, limit, skip)
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn list_products(&self, limit: u64, skip: u64) -> Result<ProductPage, CatalogError> {
        Ok(self.serve(self.products.clone(), limit, skip).await)
    }

    async fn search_products(
        &self,
        term: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError> {
        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.title.contains(term))
            .cloned()
            .collect();
        Ok(self.serve(matching, limit, skip).await)
    }

    async fn products_by_category(
        &self,
        category: &str,
        limit: u64,
        skip: u64,
    ) -> Result<ProductPage, CatalogError> {
        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        Ok(self.serve(matching, limit, skip).await)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(vec![
            Category {
                slug: "even".to_string(),
                name: "Even".to_string(),
                url: String::new(),
            },
            Category {
                slug: "odd".to_string(),
                name: "Odd".to_string(),
                url: String::new(),
            },
        ])
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Product {id}")))
    }

    async fn create_product(&self, _payload: &ProductPayload) -> Result<Product, CatalogError> {
        Err(CatalogError::Status {
            status: 501,
            message: Some("not supported by the fake catalog".to_string()),
        })
    }

    async fn update_product(
        &self,
        _id: ProductId,
        _payload: &ProductPayload,
    ) -> Result<Product, CatalogError> {
        Err(CatalogError::Status {
            status: 501,
            message: Some("not supported by the fake catalog".to_string()),
        })
    }

    async fn delete_product(&self, _id: ProductId) -> Result<(), CatalogError> {
        Err(CatalogError::Status {
            status: 501,
            message: Some("not supported by the fake catalog".to_string()),
        })
    }
}
