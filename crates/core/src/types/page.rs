//! Paginated response envelope for catalog listings.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One page of a catalog listing.
///
/// Every listing endpoint (default, search, category) returns this
/// envelope. `total` is the server-reported count for the whole filtered
/// result set and is authoritative; it may change between pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page, in server order.
    pub products: Vec<Product>,
    /// Total products matching the filter, across all pages.
    pub total: u64,
    /// Offset this page starts at.
    pub skip: u64,
    /// Page size requested.
    pub limit: u64,
}

impl ProductPage {
    /// An empty zero-total page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
            total: 0,
            skip: 0,
            limit: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_envelope() {
        let json = r#"{
            "products": [{"id": 1, "title": "Thing", "price": 9.99}],
            "total": 194,
            "skip": 0,
            "limit": 12
        }"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total, 194);
        assert_eq!(page.limit, 12);
    }

    #[test]
    fn test_empty_page() {
        let page = ProductPage::empty();
        assert!(page.products.is_empty());
        assert_eq!(page.total, 0);
    }
}
