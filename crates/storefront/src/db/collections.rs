//! Collection repository.

use std::sync::RwLock;

use super::{RepositoryError, read_guard};
use crate::models::Collection;

const STORE: &str = "collections";

/// Read-only collection storage.
pub trait CollectionRepository: Send + Sync {
    /// All collections.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn list(&self) -> Result<Vec<Collection>, RepositoryError>;

    /// Get a collection by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn get(&self, id: &str) -> Result<Option<Collection>, RepositoryError>;
}

/// In-memory collection store.
pub struct InMemoryCollections {
    collections: RwLock<Vec<Collection>>,
}

impl InMemoryCollections {
    #[must_use]
    pub const fn new(collections: Vec<Collection>) -> Self {
        Self {
            collections: RwLock::new(collections),
        }
    }
}

impl CollectionRepository for InMemoryCollections {
    fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
        Ok(read_guard(self.collections.read(), STORE)?.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Collection>, RepositoryError> {
        Ok(read_guard(self.collections.read(), STORE)?
            .iter()
            .find(|c| c.id.as_str() == id)
            .cloned())
    }
}
