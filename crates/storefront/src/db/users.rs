//! Credential registry.
//!
//! Maps a normalized email to its password hash. Entries are never removed.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use atelier_core::Email;

use super::{RepositoryError, read_guard, write_guard};
use crate::models::User;

const STORE: &str = "users";

struct Credential {
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Storage for user credentials.
pub trait CredentialRepository: Send + Sync {
    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Get the password hash stored for `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn get_password_hash(&self, email: &Email) -> Result<Option<String>, RepositoryError>;

    /// Register a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;
}

/// In-memory credential registry.
#[derive(Default)]
pub struct InMemoryCredentials {
    users: RwLock<HashMap<Email, Credential>>,
}

impl InMemoryCredentials {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialRepository for InMemoryCredentials {
    fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(read_guard(self.users.read(), STORE)?
            .get(email)
            .map(|c| User {
                email: email.clone(),
                created_at: c.created_at,
            }))
    }

    fn get_password_hash(&self, email: &Email) -> Result<Option<String>, RepositoryError> {
        Ok(read_guard(self.users.read(), STORE)?
            .get(email)
            .map(|c| c.password_hash.clone()))
    }

    fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = write_guard(self.users.write(), STORE)?;
        if users.contains_key(email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created_at = Utc::now();
        users.insert(
            email.clone(),
            Credential {
                password_hash: password_hash.to_owned(),
                created_at,
            },
        );

        Ok(User {
            email: email.clone(),
            created_at,
        })
    }
}
