//! Authentication service.
//!
//! Password registration and login against the credential registry.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use atelier_core::Email;

use crate::db::{CredentialRepository, RepositoryError};
use crate::models::User;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: &'a dyn CredentialRepository,
    reserved: Option<&'a Email>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn CredentialRepository) -> Self {
        Self {
            users,
            reserved: None,
        }
    }

    /// Refuse registration for `email`; its credential is provisioned
    /// out of band.
    #[must_use]
    pub const fn reserving(mut self, email: &'a Email) -> Self {
        self.reserved = Some(email);
        self
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered
    /// or reserved.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    pub fn register_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        if self.reserved == Some(&email) || self.users.get_by_email(&email)?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        // A concurrent signup for the same email can still win the race.
        self.users
            .create_with_password(&email, &password_hash)
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    pub fn login_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let password_hash = self
            .users
            .get_password_hash(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.users
            .get_by_email(&email)?
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
