//! Catalog service.
//!
//! Read access to products and collections, plus the validated write path
//! used by the admin product editor. Admin payloads arrive as loose JSON
//! objects: prices may be numbers or numeric strings, and any field may be
//! missing. Everything that reaches the store is trimmed and markup-escaped.

use askama::filters::{Html, escape};
use serde_json::{Map, Value};
use thiserror::Error;

use atelier_core::{Price, PriceError, ProductId};

use crate::db::{CollectionRepository, ProductRepository, RepositoryError};
use crate::models::{Collection, NewProduct, Product, ProductChanges};

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field has the wrong JSON type.
    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// Price is not a number or out of range.
    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Collection not found")]
    CollectionNotFound,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service over the product and collection stores.
pub struct CatalogService<'a> {
    products: &'a dyn ProductRepository,
    collections: &'a dyn CollectionRepository,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(
        products: &'a dyn ProductRepository,
        collections: &'a dyn CollectionRepository,
    ) -> Self {
        Self {
            products,
            collections,
        }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list()?)
    }

    /// Look up a product by its raw path id.
    ///
    /// An id that is not a number cannot exist, so it is reported as not
    /// found rather than as a bad request.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this id.
    pub fn product(&self, raw_id: &str) -> Result<Product, CatalogError> {
        let id = parse_product_id(raw_id)?;
        self.products
            .get(id)?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Products in `category` (exact, case-sensitive match).
    ///
    /// Stored categories are escaped, so the lookup key is escaped the same
    /// way before matching.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_category(&escape_markup(category))?)
    }

    /// All collections.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub fn collections(&self) -> Result<Vec<Collection>, CatalogError> {
        Ok(self.collections.list()?)
    }

    /// Look up a collection by slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CollectionNotFound` if the slug is unknown.
    pub fn collection(&self, id: &str) -> Result<Collection, CatalogError> {
        self.collections
            .get(id)?
            .ok_or(CatalogError::CollectionNotFound)
    }

    /// Validate and store a new product.
    ///
    /// # Errors
    ///
    /// Returns a validation variant for missing or malformed fields.
    pub fn create_product(&self, payload: &Map<String, Value>) -> Result<Product, CatalogError> {
        let product = validate_new_product(payload)?;
        Ok(self.products.create(product)?)
    }

    /// Validate and apply a partial update. The id is never changed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for unknown ids and a
    /// validation variant for malformed fields.
    pub fn update_product(
        &self,
        raw_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Product, CatalogError> {
        let id = parse_product_id(raw_id)?;
        if self.products.get(id)?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        let changes = validate_changes(payload)?;
        self.products
            .update(id, changes)?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for unknown ids.
    pub fn delete_product(&self, raw_id: &str) -> Result<(), CatalogError> {
        let id = parse_product_id(raw_id)?;
        if self.products.delete(id)? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound)
        }
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId, CatalogError> {
    raw.parse().map_err(|_| CatalogError::ProductNotFound)
}

/// Escape markup-significant characters with the same escaper the
/// templates use.
#[must_use]
pub fn escape_markup(input: &str) -> String {
    let Ok(escaped) = escape(input, Html);
    escaped.to_string()
}

/// Trim then escape.
fn sanitize(input: &str) -> String {
    escape_markup(input.trim())
}

fn validate_new_product(payload: &Map<String, Value>) -> Result<NewProduct, CatalogError> {
    let name = required_text(payload, "name", "Name")?;
    let price = required_price(payload.get("price"))?;
    let description = required_text(payload, "description", "Description")?;
    let category = required_text(payload, "category", "Category")?;

    Ok(NewProduct {
        name,
        price,
        description,
        category,
        images: optional_list(payload, "images", "Images")?.unwrap_or_default(),
        sizes: optional_list(payload, "sizes", "Sizes")?.unwrap_or_default(),
        in_stock: optional_bool(payload, "inStock", "inStock")?.unwrap_or(true),
        featured: optional_bool(payload, "featured", "featured")?.unwrap_or(false),
        bestseller: optional_bool(payload, "bestseller", "bestseller")?.unwrap_or(false),
        new_arrival: optional_bool(payload, "newArrival", "newArrival")?.unwrap_or(false),
        fabric: optional_text(payload, "fabric", "Fabric")?,
        care: optional_text(payload, "care", "Care")?,
    })
}

fn validate_changes(payload: &Map<String, Value>) -> Result<ProductChanges, CatalogError> {
    let supplied_text = |key: &str, label: &'static str| {
        payload
            .contains_key(key)
            .then(|| required_text(payload, key, label))
            .transpose()
    };

    let mut changes = ProductChanges {
        name: supplied_text("name", "Name")?,
        description: supplied_text("description", "Description")?,
        category: supplied_text("category", "Category")?,
        ..ProductChanges::default()
    };

    if payload.contains_key("price") {
        changes.price = Some(required_price(payload.get("price"))?);
    }

    changes.images = optional_list(payload, "images", "Images")?;
    changes.sizes = optional_list(payload, "sizes", "Sizes")?;
    changes.in_stock = optional_bool(payload, "inStock", "inStock")?;
    changes.featured = optional_bool(payload, "featured", "featured")?;
    changes.bestseller = optional_bool(payload, "bestseller", "bestseller")?;
    changes.new_arrival = optional_bool(payload, "newArrival", "newArrival")?;
    changes.fabric = optional_text(payload, "fabric", "Fabric")?;
    changes.care = optional_text(payload, "care", "Care")?;

    Ok(changes)
}

fn required_text(
    payload: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<String, CatalogError> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(sanitize(s)),
        Some(Value::String(_) | Value::Null) | None => Err(CatalogError::Required(label)),
        Some(_) => Err(CatalogError::InvalidField {
            field: label,
            expected: "text",
        }),
    }
}

fn required_price(value: Option<&Value>) -> Result<Price, CatalogError> {
    match value {
        None | Some(Value::Null) => Err(CatalogError::Required("Price")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CatalogError::Required("Price")),
        Some(value) => Ok(Price::from_json(value)?),
    }
}

fn optional_text(
    payload: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<Option<String>, CatalogError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(sanitize(s))),
        Some(_) => Err(CatalogError::InvalidField {
            field: label,
            expected: "text",
        }),
    }
}

fn optional_bool(
    payload: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<Option<bool>, CatalogError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(CatalogError::InvalidField {
            field: label,
            expected: "true or false",
        }),
    }
}

/// A list of strings; blank entries are dropped.
fn optional_list(
    payload: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<Option<Vec<String>>, CatalogError> {
    let invalid = || CatalogError::InvalidField {
        field: label,
        expected: "a list of text values",
    };

    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(Ok(sanitize(s))),
                _ => Some(Err(invalid())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::db::{InMemoryCollections, InMemoryProducts, seed};

    fn stores() -> (InMemoryProducts, InMemoryCollections) {
        (
            InMemoryProducts::new(seed::products().unwrap()),
            InMemoryCollections::new(seed::collections()),
        )
    }

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn valid() -> Value {
        json!({
            "name": "Wool Coat",
            "price": 450,
            "description": "Double-breasted coat",
            "category": "Outerwear"
        })
    }

    #[test]
    fn test_product_lookup_and_non_numeric_id() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        assert_eq!(catalog.product("1").unwrap().name, "Essential Cashmere Sweater");
        assert!(matches!(
            catalog.product("999"),
            Err(CatalogError::ProductNotFound)
        ));
        assert!(matches!(
            catalog.product("abc"),
            Err(CatalogError::ProductNotFound)
        ));
    }

    #[test]
    fn test_create_applies_defaults() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let product = catalog.create_product(&payload(valid())).unwrap();

        assert_eq!(product.id, ProductId::new(9));
        assert!(product.in_stock);
        assert!(!product.featured);
        assert!(product.sizes.is_empty());
        assert!(product.images.is_empty());
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_create_requires_fields() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        for (key, message) in [
            ("name", "Name is required"),
            ("price", "Price is required"),
            ("description", "Description is required"),
            ("category", "Category is required"),
        ] {
            let mut body = payload(valid());
            body.insert(key.to_string(), json!("   "));
            let err = catalog.create_product(&body).unwrap_err();
            assert_eq!(err.to_string(), message);

            body.remove(key);
            let err = catalog.create_product(&body).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_create_rejects_out_of_range_price() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        for price in [json!(-5), json!(1_000_000), json!("-0.01")] {
            let mut body = payload(valid());
            body.insert("price".to_string(), price);
            let err = catalog.create_product(&body).unwrap_err();
            assert_eq!(err.to_string(), "Price must be between 0 and 999999");
        }
    }

    #[test]
    fn test_create_accepts_numeric_string_price() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let mut body = payload(valid());
        body.insert("price".to_string(), json!(" 129.50 "));
        let product = catalog.create_product(&body).unwrap();
        assert_eq!(product.price.amount(), Decimal::new(1295, 1));
    }

    #[test]
    fn test_create_escapes_markup() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let mut body = payload(valid());
        body.insert(
            "name".to_string(),
            json!("  <script>alert('x')</script>  "),
        );
        body.insert("sizes".to_string(), json!(["S", " ", "<b>M</b>"]));
        let product = catalog.create_product(&body).unwrap();

        assert_eq!(
            product.name,
            "&#60;script&#62;alert(&#39;x&#39;)&#60;/script&#62;"
        );
        assert_eq!(product.sizes, vec!["S", "&#60;b&#62;M&#60;/b&#62;"]);
    }

    #[test]
    fn test_category_lookup_matches_escaped_text() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let mut body = payload(valid());
        body.insert("category".to_string(), json!("Tops & Tees"));
        let product = catalog.create_product(&body).unwrap();
        assert_eq!(product.category, "Tops &#38; Tees");

        let found = catalog.products_in_category("Tops & Tees").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().unwrap().id, product.id);

        assert_eq!(catalog.products_in_category("Knitwear").unwrap().len(), 2);
        assert!(catalog.products_in_category("knitwear").unwrap().is_empty());
    }

    #[test]
    fn test_update_only_touches_supplied_fields() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let updated = catalog
            .update_product("3", &payload(json!({"id": "77", "price": "90", "featured": true})))
            .unwrap();

        assert_eq!(updated.id, ProductId::new(3));
        assert_eq!(updated.name, "Organic Cotton Tee");
        assert_eq!(updated.price.amount(), Decimal::from(90));
        assert!(updated.featured);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_update_rejects_blank_required_and_bad_price() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let err = catalog
            .update_product("3", &payload(json!({"name": ""})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        let err = catalog
            .update_product("3", &payload(json!({"price": -1})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Price must be between 0 and 999999");

        assert_eq!(catalog.product("3").unwrap().name, "Organic Cotton Tee");
    }

    #[test]
    fn test_wrong_types_rejected() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        let mut body = payload(valid());
        body.insert("inStock".to_string(), json!("yes"));
        assert!(matches!(
            catalog.create_product(&body),
            Err(CatalogError::InvalidField { field: "inStock", .. })
        ));

        let mut body = payload(valid());
        body.insert("price".to_string(), json!("cheap"));
        assert!(matches!(
            catalog.create_product(&body),
            Err(CatalogError::Price(PriceError::NotANumber))
        ));
    }

    #[test]
    fn test_unknown_ids_not_found() {
        let (products, collections) = stores();
        let catalog = CatalogService::new(&products, &collections);

        for body in [json!({}), json!({"price": -5}), json!({"name": " "})] {
            assert!(matches!(
                catalog.update_product("42", &payload(body)),
                Err(CatalogError::ProductNotFound)
            ));
        }
        assert!(matches!(
            catalog.delete_product("42"),
            Err(CatalogError::ProductNotFound)
        ));
        assert!(matches!(
            catalog.collection("outerwear"),
            Err(CatalogError::CollectionNotFound)
        ));
    }
}
