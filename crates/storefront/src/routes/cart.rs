//! Session cart route handlers.
//!
//! The cart is stored in the visitor's session under its own key, so it
//! works for anonymous visitors and survives logout. Line details are
//! snapshotted from the catalog when an item is added; the client only names
//! the product, size, and quantity.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use atelier_core::ProductId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{Cart, CartItem, cart::DEFAULT_SIZE, session_keys};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart, empty if none was stored yet.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// `{success: true, cart: [...]}`
fn cart_response(cart: &Cart) -> Json<Value> {
    Json(json!({ "success": true, "cart": cart.items() }))
}

/// A product id as sent by the storefront scripts: string or number.
fn raw_product_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Body of `PUT /api/cart/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/cart`
///
/// # Errors
///
/// 500 if the session store fails.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<Vec<CartItem>>> {
    let cart = load_cart(&session).await?;
    Ok(Json(cart.items().to_vec()))
}

/// `POST /api/cart`
///
/// # Errors
///
/// 404 if the product does not exist, 400 for a size the product does not
/// offer or a quantity below one.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCart>,
) -> Result<Json<Value>> {
    let raw_id = raw_product_id(&body.id).unwrap_or_default();
    let product = state.catalog().product(&raw_id)?;

    let quantity = body.quantity.unwrap_or(1);
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::BadRequest("Quantity must be at least 1".to_string()))?;

    let size = body
        .size
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SIZE.to_owned());

    if !product.offers_size(&size) {
        return Err(AppError::BadRequest("Size not available".to_string()));
    }

    let mut cart = load_cart(&session).await?;
    cart.add(CartItem {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
        size,
        quantity,
        image: product.primary_image().map(str::to_owned),
    });
    save_cart(&session, &cart).await?;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added item", Some(&[("product_id", product_id.as_str())]));
    tracing::debug!(product_id = %product.id, lines = cart.len(), "cart item added");

    Ok(cart_response(&cart))
}

/// `DELETE /api/cart/{itemId}`
///
/// Removes every line for the product, whatever the size. An id that is not
/// in the cart leaves it unchanged.
///
/// # Errors
///
/// 500 if the session store fails.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(item_id): Path<String>) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;

    if let Ok(id) = item_id.parse::<ProductId>()
        && cart.remove(id) > 0
    {
        save_cart(&session, &cart).await?;
        add_breadcrumb("cart", "Removed item", Some(&[("product_id", item_id.as_str())]));
    }

    Ok(cart_response(&cart))
}

/// `PUT /api/cart/update`
///
/// Sets the quantity of the exact (id, size) line; zero or less removes it.
/// A missing line is a no-op.
///
/// # Errors
///
/// 500 if the session store fails.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(body): Json<UpdateQuantity>) -> Result<Json<Value>> {
    let mut cart = load_cart(&session).await?;

    let id = raw_product_id(&body.id).and_then(|raw| raw.parse::<ProductId>().ok());
    let size = body.size.as_deref().map_or(DEFAULT_SIZE, str::trim);

    if let Some(id) = id
        && cart.update_quantity(id, size, body.quantity.unwrap_or(1))
    {
        save_cart(&session, &cart).await?;
    }

    Ok(cart_response(&cart))
}

/// `POST /api/cart/clear`
///
/// # Errors
///
/// 500 if the session store fails.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<Value>> {
    save_cart(&session, &Cart::new()).await?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(Json(json!({ "success": true })))
}
