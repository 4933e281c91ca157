//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password registration and login
//! - `catalog` - Product/collection reads and validated admin writes
//! - `orders` - Checkout into the order ledger, owner-scoped reads
//!
//! Services borrow repositories from `AppState` for the duration of one
//! request; they hold no state of their own.

pub mod auth;
pub mod catalog;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
pub use orders::{CheckoutRequest, OrderError, OrderService};
