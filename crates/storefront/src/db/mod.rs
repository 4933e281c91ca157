//! Storage for storefront records.
//!
//! # Stores
//!
//! Every store is a repository trait with an in-memory implementation. The
//! traits are the seam for a persistent backend later; handlers and services
//! only see `Arc<dyn ...Repository>`.
//!
//! - `products` - Catalog products, with a store-owned id counter
//! - `collections` - Read-only collections
//! - `users` - Credential registry (email -> password hash)
//! - `orders` - Append-only order ledger
//!
//! State lives for the life of the process. Locks are `std::sync::RwLock`;
//! a poisoned lock is reported as `RepositoryError::LockPoisoned`, never a
//! panic.

pub mod collections;
pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

pub use collections::{CollectionRepository, InMemoryCollections};
pub use orders::{InMemoryOrders, OrderRepository};
pub use products::{InMemoryProducts, ProductRepository};
pub use users::{CredentialRepository, InMemoryCredentials};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An id counter ran out of values.
    #[error("id space exhausted: {0}")]
    Exhausted(&'static str),
}

/// Map a poisoned read guard to `RepositoryError::LockPoisoned`.
pub(crate) fn read_guard<'a, T>(
    result: Result<RwLockReadGuard<'a, T>, PoisonError<RwLockReadGuard<'a, T>>>,
    store: &'static str,
) -> Result<RwLockReadGuard<'a, T>, RepositoryError> {
    result.map_err(|_| RepositoryError::LockPoisoned(store))
}

/// Map a poisoned write guard to `RepositoryError::LockPoisoned`.
pub(crate) fn write_guard<'a, T>(
    result: Result<RwLockWriteGuard<'a, T>, PoisonError<RwLockWriteGuard<'a, T>>>,
    store: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, RepositoryError> {
    result.map_err(|_| RepositoryError::LockPoisoned(store))
}
