//! Collection reads.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::models::Collection;
use crate::state::AppState;

/// `GET /api/collections`
///
/// # Errors
///
/// 500 if the collection store fails.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.catalog().collections()?))
}

/// `GET /api/collections/{id}`
///
/// # Errors
///
/// 404 "Collection not found" for unknown slugs.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>> {
    Ok(Json(state.catalog().collection(&id)?))
}
