//! Public catalog reads.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::models::Product;
use crate::state::AppState;

/// `GET /api/products`
///
/// # Errors
///
/// 500 if the product store fails.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().products()?))
}

/// `GET /api/products/{id}`
///
/// # Errors
///
/// 404 "Product not found" for unknown or non-numeric ids.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    Ok(Json(state.catalog().product(&id)?))
}

/// `GET /api/products/category/{category}`
///
/// Exact, case-sensitive match; an unknown category is an empty list.
///
/// # Errors
///
/// 500 if the product store fails.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().products_in_category(&category)?))
}
