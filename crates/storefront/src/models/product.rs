//! Product records and the validated inputs that create or change them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use atelier_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
    pub bestseller: bool,
    pub new_arrival: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the first image reference, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product can be ordered in the given size.
    ///
    /// Products without a size list accept any size.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.is_empty() || self.sizes.iter().any(|s| s == size)
    }
}

/// A validated, sanitized product awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
    pub bestseller: bool,
    pub new_arrival: bool,
    pub fabric: Option<String>,
    pub care: Option<String>,
}

impl NewProduct {
    /// Build the stored record once the store has assigned an id.
    #[must_use]
    pub fn into_product(self, id: ProductId, created_at: Option<DateTime<Utc>>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            category: self.category,
            images: self.images,
            sizes: self.sizes,
            in_stock: self.in_stock,
            featured: self.featured,
            bestseller: self.bestseller,
            new_arrival: self.new_arrival,
            fabric: self.fabric,
            care: self.care,
            created_at,
            updated_at: None,
        }
    }
}

/// A validated partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    pub new_arrival: Option<bool>,
    pub fabric: Option<String>,
    pub care: Option<String>,
}

impl ProductChanges {
    /// Apply the supplied fields to `product` and stamp `updated_at`.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(sizes) = self.sizes {
            product.sizes = sizes;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(bestseller) = self.bestseller {
            product.bestseller = bestseller;
        }
        if let Some(new_arrival) = self.new_arrival {
            product.new_arrival = new_arrival;
        }
        if let Some(fabric) = self.fabric {
            product.fabric = Some(fabric);
        }
        if let Some(care) = self.care {
            product.care = Some(care);
        }
        product.updated_at = Some(now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample() -> Product {
        NewProduct {
            name: "Organic Cotton Tee".to_string(),
            price: Price::new(Decimal::new(85, 0)).unwrap(),
            description: "Crew neck tee".to_string(),
            category: "Basics".to_string(),
            images: vec!["tee.jpg".to_string()],
            sizes: vec!["S".to_string(), "M".to_string()],
            in_stock: true,
            featured: false,
            bestseller: false,
            new_arrival: true,
            fabric: None,
            care: None,
        }
        .into_product(ProductId::new(3), None)
    }

    #[test]
    fn test_serializes_camel_case_with_string_id() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["inStock"], true);
        assert_eq!(json["newArrival"], true);
        assert!(json.get("fabric").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_offers_size() {
        let mut product = sample();
        assert!(product.offers_size("M"));
        assert!(!product.offers_size("XL"));

        product.sizes.clear();
        assert!(product.offers_size("anything"));
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut product = sample();
        let now = Utc::now();
        ProductChanges {
            name: Some("Heavy Tee".to_string()),
            in_stock: Some(false),
            ..ProductChanges::default()
        }
        .apply(&mut product, now);

        assert_eq!(product.name, "Heavy Tee");
        assert!(!product.in_stock);
        assert_eq!(product.category, "Basics");
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.updated_at, Some(now));
    }
}
