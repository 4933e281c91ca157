//! Admin API: product CRUD and the order ledger.
//!
//! Every handler takes `RequireAdmin`, so anonymous callers get 401 and any
//! other identity gets 403 before the body runs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Order, Product};
use crate::state::AppState;

/// Body of `PUT /api/admin/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

// =============================================================================
// Products
// =============================================================================

/// `GET /api/admin/products`
///
/// # Errors
///
/// 500 if the product store fails.
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().products()?))
}

/// `POST /api/admin/products`
///
/// # Errors
///
/// 400 when a required field is missing or the price is out of range.
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create_product(&payload)?;
    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/admin/products/{id}`
///
/// # Errors
///
/// 404 for unknown ids.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn show_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().product(&id)?))
}

/// `PUT /api/admin/products/{id}`
///
/// Applies only the supplied fields; the id never changes.
///
/// # Errors
///
/// 404 for unknown ids, 400 for invalid fields.
#[instrument(skip_all, fields(admin = %admin.email, product_id = %id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Product>> {
    let product = state.catalog().update_product(&id, &payload)?;
    tracing::info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
///
/// # Errors
///
/// 404 for unknown ids.
#[instrument(skip_all, fields(admin = %admin.email, product_id = %id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.catalog().delete_product(&id)?;
    tracing::info!("product deleted");
    Ok(Json(json!({ "success": true })))
}

// =============================================================================
// Orders
// =============================================================================

/// `GET /api/admin/orders`
///
/// # Errors
///
/// 500 if the ledger fails.
#[instrument(skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list_all()?))
}

/// `PUT /api/admin/orders/{id}/status`
///
/// # Errors
///
/// 400 for an unknown status, 404 for an unknown order.
#[instrument(skip_all, fields(admin = %admin.email, order_id = %id))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().update_status(&id, &body.status)?))
}
