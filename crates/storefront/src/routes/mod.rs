//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! POST /api/auth/login                  - Password login (rate limited)
//! POST /api/auth/signup                 - Register (rate limited)
//! POST /api/auth/logout                 - Drop the identity, keep the cart
//! GET  /api/auth/user                   - Current identity or null
//!
//! # Catalog
//! GET  /api/products                    - All products
//! GET  /api/products/{id}               - One product
//! GET  /api/products/category/{category} - Products in a category
//! GET  /api/collections                 - All collections
//! GET  /api/collections/{id}            - One collection
//!
//! # Cart (session)
//! GET  /api/cart                        - Cart lines
//! POST /api/cart                        - Add a line
//! DELETE /api/cart/{itemId}             - Remove a product, any size
//! PUT  /api/cart/update                 - Set a line's quantity
//! POST /api/cart/clear                  - Empty the cart
//!
//! # Payment (Razorpay)
//! GET  /api/payment/razorpay-key        - Public key id
//! POST /api/payment/create-order        - Gateway order (auth)
//! POST /api/payment/verify              - Signature check (auth)
//!
//! # Orders (auth)
//! POST /api/orders                      - Place an order from the cart
//! GET  /api/orders                      - Caller's orders
//! GET  /api/orders/{id}                 - One of the caller's orders
//!
//! # Admin (admin identity)
//! GET  /api/admin/orders                - Full ledger
//! PUT  /api/admin/orders/{id}/status    - Move fulfilment status
//! GET|POST /api/admin/products          - List / create
//! GET|PUT|DELETE /api/admin/products/{id} - Read / update / delete
//!
//! # Pages
//! GET  /, /shop, /product/{id}, /cart, /checkout, /login, /signup,
//!      /account, /admin
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod collections;
pub mod orders;
pub mod pages;
pub mod payment;
pub mod products;

use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::from_fn,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::{
    auth_rate_limiter, create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Static assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the auth API router.
///
/// Login and signup sit behind the auth rate limiter when it is enabled.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let credentials = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup));

    let credentials = match rate_limit.then(auth_rate_limiter).flatten() {
        Some(limiter) => credentials.layer(limiter),
        None => credentials,
    };

    Router::new()
        .merge(credentials)
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
}

/// Create the product API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/category/{category}", get(products::by_category))
}

/// Create the collection API router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{id}", get(collections::show))
}

/// Create the cart API router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/{item_id}", axum::routing::delete(cart::remove))
        .route("/update", put(cart::update))
        .route("/clear", post(cart::clear))
}

/// Create the payment API router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/razorpay-key", get(payment::razorpay_key))
        .route("/create-order", post(payment::create_order))
        .route("/verify", post(payment::verify))
}

/// Create the order API router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create the admin API router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            get(admin::show_product)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
}

/// Create the page shell router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/shop", get(pages::shop))
        .route("/product/{id}", get(pages::product))
        .route("/cart", get(pages::cart))
        .route("/checkout", get(pages::checkout))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/account", get(pages::account))
        .route("/admin", get(pages::admin))
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/api/auth", auth_routes(rate_limit))
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/payment", payment_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
}

/// Build the complete application with its middleware stack.
///
/// Layers run outermost first: trace span, request ID, CSP nonce, security
/// headers, then the session. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let rate_limit = state.config().rate_limit;

    Router::new()
        .route("/health", get(health))
        .merge(routes(rate_limit))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(create_session_layer())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "payment_configured": state.razorpay().is_some(),
    }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
