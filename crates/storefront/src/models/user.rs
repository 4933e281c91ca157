//! User domain types.

use chrono::{DateTime, Utc};

use atelier_core::Email;

/// A registered storefront account.
///
/// The password hash is kept by the credential repository and never leaves it
/// except for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Normalized email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
