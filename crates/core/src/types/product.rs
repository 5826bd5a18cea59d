//! Catalog domain types.
//!
//! These types mirror the wire shape of the external catalog API
//! (camelCase JSON). The engine treats them as read-only: cart and
//! favorites copy snapshots at the moment of interaction, so later
//! catalog edits are not reflected in copies already stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog-assigned numeric id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Category slug this product belongs to.
    #[serde(default)]
    pub category: String,
    /// Unit price in the catalog's currency.
    pub price: Decimal,
    /// Current discount, as a percentage (e.g. 12.5).
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average review rating (0.0 - 5.0).
    #[serde(default)]
    pub rating: f64,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Brand name, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A product category as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// URL-safe identifier (e.g. "smartphones").
    pub slug: String,
    /// Human-readable name (e.g. "Smartphones").
    pub name: String,
    /// Catalog resource URL for this category's product listing.
    #[serde(default)]
    pub url: String,
}

/// Create/update body for the catalog's CRUD surface.
///
/// All fields except `title` are optional so the same type serves both
/// full creates and partial updates (absent fields are omitted from the
/// request body entirely).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Display title.
    pub title: String,
    /// Long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Brand name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Units in stock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// Thumbnail image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "description": "Popular mascara known for volumizing effects.",
            "category": "beauty",
            "price": 9.99,
            "discountPercentage": 7.17,
            "rating": 4.94,
            "stock": 5,
            "brand": "Essence",
            "thumbnail": "https://cdn.example.com/1/thumbnail.png",
            "images": ["https://cdn.example.com/1/1.png"]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title, "Essence Mascara Lash Princess");
        assert_eq!(product.category, "beauty");
        assert_eq!(product.price.to_string(), "9.99");
        assert_eq!(product.stock, 5);
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        // Some catalog records omit brand, images, and rating entirely.
        let json = r#"{"id": 2, "title": "Bare minimum", "price": 3}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.brand, None);
        assert!(product.images.is_empty());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let payload = ProductPayload {
            title: "New thing".to_string(),
            price: Some(Decimal::new(1999, 2)),
            ..ProductPayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "New thing");
        assert!(json.get("description").is_none());
        assert!(json.get("stock").is_none());
    }

    #[test]
    fn test_category_deserializes() {
        let json = r#"{"slug": "smartphones", "name": "Smartphones", "url": "https://catalog.example.com/products/category/smartphones"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.slug, "smartphones");
        assert_eq!(category.name, "Smartphones");
    }
}
