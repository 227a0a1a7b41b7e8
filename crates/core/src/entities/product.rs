//! Product entity: catalog record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, ProductId};

/// A stored catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price; persisted as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    pub subcategory: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match across name, description, brand,
    /// category, and subcategory. No ranking; every match is returned.
    #[must_use]
    pub fn matches_query(&self, lowercase_query: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_query)
            || self.description.to_lowercase().contains(lowercase_query)
            || self
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(lowercase_query))
            || self.category.to_string().contains(lowercase_query)
            || self.subcategory.to_lowercase().contains(lowercase_query)
    }

    /// Apply a partial update. Fields absent from the patch are retained.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        let ProductPatch {
            name,
            description,
            price,
            image,
            category,
            subcategory,
            stock,
            rating,
            reviews,
            brand,
            features,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(image) = image {
            self.image = image;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(subcategory) = subcategory {
            self.subcategory = subcategory;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(reviews) = reviews {
            self.reviews = reviews;
        }
        if let Some(brand) = brand {
            self.brand = Some(brand);
        }
        if let Some(features) = features {
            self.features = features;
        }
    }
}

/// Input for creating a product. The repository assigns the id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    pub subcategory: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl NewProduct {
    /// Validate the input the way the API boundary requires.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message describing the first failed check.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().len() < 2 {
            return Err("Product name is required and must be at least 2 characters".to_owned());
        }
        if self.description.trim().len() < 10 {
            return Err(
                "Product description is required and must be at least 10 characters".to_owned(),
            );
        }
        if self.price <= Decimal::ZERO {
            return Err("Valid price is required".to_owned());
        }
        if self.image.trim().is_empty() {
            return Err("Product image URL is required".to_owned());
        }
        if self.subcategory.trim().is_empty() {
            return Err("Subcategory is required".to_owned());
        }
        Ok(())
    }
}

/// Partial update for a [`Product`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl ProductPatch {
    /// Patch that replaces only the stock count.
    #[must_use]
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_product() -> Product {
        Product {
            id: ProductId::new("product_1_a"),
            name: "Aurora Smartwatch".to_owned(),
            description: "Fitness tracking with a week of battery life.".to_owned(),
            price: dec("199.99"),
            image: "https://img.example.com/aurora.jpg".to_owned(),
            category: Category::Gadgets,
            subcategory: "watch".to_owned(),
            stock: 10,
            rating: 4.5,
            reviews: 120,
            brand: Some("Aurora".to_owned()),
            features: vec!["GPS".to_owned(), "Heart rate".to_owned()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_matches_all_fields() {
        let p = sample_product();
        assert!(p.matches_query("aurora"));
        assert!(p.matches_query("battery"));
        assert!(p.matches_query("gadget"));
        assert!(p.matches_query("watch"));
        assert!(!p.matches_query("blender"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let p = sample_product();
        assert!(p.matches_query(&"AURORA".to_lowercase()));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let p = sample_product();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("price").unwrap().is_f64());
    }

    #[test]
    fn test_patch_retains_omitted_fields() {
        let mut p = sample_product();
        p.apply_patch(ProductPatch::stock(3));
        assert_eq!(p.stock, 3);
        assert_eq!(p.name, "Aurora Smartwatch");
        assert_eq!(p.rating, 4.5);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut input = NewProduct {
            name: "Aurora Smartwatch".to_owned(),
            description: "Fitness tracking with a week of battery life.".to_owned(),
            price: dec("199.99"),
            image: "https://img.example.com/aurora.jpg".to_owned(),
            category: Category::Gadgets,
            subcategory: "watch".to_owned(),
            stock: 10,
            rating: 0.0,
            reviews: 0,
            brand: None,
            features: Vec::new(),
        };
        assert!(input.validate().is_ok());

        input.name = "A".to_owned();
        assert!(input.validate().is_err());
        input.name = "Aurora".to_owned();

        input.price = Decimal::ZERO;
        assert!(input.validate().is_err());
        input.price = dec("1");

        input.description = "too short".to_owned();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_patch_json_omits_unset_fields() {
        let patch = ProductPatch::stock(7);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json.get("stock").unwrap(), 7);
    }
}
