//! Application state shared across handlers.

use std::sync::Arc;

use atelier_core::PriceError;
use secrecy::ExposeSecret;

use crate::config::StorefrontConfig;
use crate::db::{
    CollectionRepository, CredentialRepository, InMemoryCollections, InMemoryCredentials,
    InMemoryOrders, InMemoryProducts, OrderRepository, ProductRepository, seed,
};
use crate::razorpay::RazorpayClient;
use crate::services::{AuthError, AuthService, CatalogService, OrderService};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid seed catalog: {0}")]
    Seed(#[from] PriceError),
    #[error("failed to seed account: {0}")]
    Account(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The stores live for the whole process and
/// start over on restart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: Arc<dyn ProductRepository>,
    collections: Arc<dyn CollectionRepository>,
    users: Arc<dyn CredentialRepository>,
    orders: Arc<dyn OrderRepository>,
    razorpay: Option<RazorpayClient>,
}

impl AppState {
    /// Create the application state with the seed catalog.
    ///
    /// The admin account is registered when its password is configured, and
    /// the demo account when `seed_demo_user` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data is invalid or an account cannot be
    /// stored.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let products = Arc::new(InMemoryProducts::new(seed::products()?));
        let collections = Arc::new(InMemoryCollections::new(seed::collections()));
        let users = Arc::new(InMemoryCredentials::new());
        let orders = Arc::new(InMemoryOrders::new());

        if let Some(password) = &config.admin_password {
            AuthService::new(users.as_ref())
                .register_with_password(config.admin_email.as_str(), password.expose_secret())?;
            tracing::info!(email = %config.admin_email, "admin account provisioned");
        } else {
            tracing::warn!("STOREFRONT_ADMIN_PASSWORD not set; admin API is locked");
        }

        if config.seed_demo_user {
            AuthService::new(users.as_ref())
                .register_with_password(seed::DEMO_USER_EMAIL, seed::DEMO_USER_PASSWORD)?;
            tracing::info!(email = seed::DEMO_USER_EMAIL, "demo user seeded");
        }

        let razorpay = config.razorpay.as_ref().map(RazorpayClient::new);
        if razorpay.is_none() {
            tracing::warn!("Razorpay credentials not set; payment endpoints answer 503");
        }

        Ok(Self::from_parts(
            config,
            products,
            collections,
            users,
            orders,
            razorpay,
        ))
    }

    /// Assemble state from explicit stores.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        products: Arc<dyn ProductRepository>,
        collections: Arc<dyn CollectionRepository>,
        users: Arc<dyn CredentialRepository>,
        orders: Arc<dyn OrderRepository>,
        razorpay: Option<RazorpayClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                collections,
                users,
                orders,
                razorpay,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Catalog service over the product and collection stores.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(
            self.inner.products.as_ref(),
            self.inner.collections.as_ref(),
        )
    }

    /// Authentication service over the credential registry.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.users.as_ref()).reserving(&self.inner.config.admin_email)
    }

    /// Order service over the ledger.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.inner.orders.as_ref())
    }

    /// Razorpay client, if credentials are configured.
    #[must_use]
    pub fn razorpay(&self) -> Option<&RazorpayClient> {
        self.inner.razorpay.as_ref()
    }
}
