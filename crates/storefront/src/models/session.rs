//! Session-related types.
//!
//! The session carries two independent pieces of state: the authenticated
//! identity and the cart. Each lives under its own key so logging out never
//! touches the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::Email;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// Normalized email, also the owner key for orders.
    pub email: Email,
    /// When this session was authenticated.
    pub authenticated_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Create a session identity authenticated now.
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            authenticated_at: Utc::now(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the visitor's cart.
    pub const CART: &str = "cart";
}
