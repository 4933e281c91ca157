//! Customer order routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::CheckoutRequest;
use crate::state::AppState;

/// `POST /api/orders`
///
/// Line items come from the session cart. Once the order is recorded the
/// cart is emptied, whatever payment status the client reported.
///
/// # Errors
///
/// 400 for an empty cart or a malformed total.
#[instrument(skip_all, fields(user = %user.email))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let mut cart = load_cart(&session).await?;

    let order = state
        .orders()
        .place(&user.email, cart.items().to_vec(), request)?;

    cart.clear();
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "order",
        "Placed order",
        Some(&[("order_id", order.id.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders`
///
/// # Errors
///
/// 500 if the ledger fails.
#[instrument(skip_all, fields(user = %user.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list_for(&user.email)?))
}

/// `GET /api/orders/{id}`
///
/// # Errors
///
/// 404 "Order not found" unless the order exists and belongs to the caller.
#[instrument(skip_all, fields(user = %user.email, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().get_for(&id, &user.email)?))
}
