//! Product repository.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use atelier_core::ProductId;

use super::{RepositoryError, read_guard, write_guard};
use crate::models::{NewProduct, Product, ProductChanges};

const STORE: &str = "products";

/// Catalog product storage.
pub trait ProductRepository: Send + Sync {
    /// All products in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products whose category matches exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Store a new product under the next id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Exhausted` if no id is left, or
    /// `RepositoryError::LockPoisoned` if the store is unusable.
    fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Apply changes to an existing product. `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Delete a product. Returns `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

/// In-memory product store.
///
/// Ids come from a counter that only grows, so an id is never handed out
/// twice, even after the product holding it is deleted.
pub struct InMemoryProducts {
    products: RwLock<Vec<Product>>,
    next_id: AtomicU64,
}

impl InMemoryProducts {
    /// Create a store holding `products`; the counter starts above the
    /// highest existing id.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products
            .iter()
            .map(|p| p.id.as_u64())
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            products: RwLock::new(products),
            next_id: AtomicU64::new(next_id),
        }
    }

    fn allocate_id(&self) -> Result<ProductId, RepositoryError> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(ProductId::new)
            .map_err(|_| RepositoryError::Exhausted(STORE))
    }
}

impl Default for InMemoryProducts {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ProductRepository for InMemoryProducts {
    fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(read_guard(self.products.read(), STORE)?.clone())
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(read_guard(self.products.read(), STORE)?
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(read_guard(self.products.read(), STORE)?
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let id = self.allocate_id()?;
        let product = product.into_product(id, Some(Utc::now()));

        write_guard(self.products.write(), STORE)?.push(product.clone());
        Ok(product)
    }

    fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = write_guard(self.products.write(), STORE)?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        changes.apply(product, Utc::now());
        Ok(Some(product.clone()))
    }

    fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut products = write_guard(self.products.write(), STORE)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}
