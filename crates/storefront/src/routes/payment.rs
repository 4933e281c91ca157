//! Razorpay payment bridge.
//!
//! The server creates gateway orders and checks checkout signatures; the
//! browser widget does the rest. Every handler answers 503 when the gateway
//! credentials are not configured.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::razorpay::{CreateOrderRequest, PaymentVerification, RazorpayClient, paise_from_major};
use crate::state::AppState;

/// Smallest chargeable amount, in rupees.
const MIN_AMOUNT: Decimal = Decimal::ONE;

/// Largest chargeable amount, in rupees.
const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999, 0, 0, false, 0);

const AMOUNT_MESSAGE: &str = "Amount must be between 1 and 999999";

/// Body of `POST /api/payment/create-order`.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentOrder {
    #[serde(default)]
    pub amount: Option<Value>,
}

fn gateway(state: &AppState) -> Result<&RazorpayClient> {
    state.razorpay().ok_or(AppError::PaymentNotConfigured)
}

/// Parse the amount: a JSON number within [1, 999999].
fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    let Some(Value::Number(number)) = value else {
        return None;
    };

    number
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&number.to_string()).ok())
        .filter(|amount| (MIN_AMOUNT..=MAX_AMOUNT).contains(amount))
}

/// Receipt reference sent with each gateway order (at most 40 characters).
fn receipt() -> String {
    format!("rcpt_{}", Uuid::new_v4().simple())
}

/// `GET /api/payment/razorpay-key`
///
/// Only the public key id is ever exposed.
pub async fn razorpay_key(State(state): State<AppState>) -> Json<Value> {
    let key = state.razorpay().map(RazorpayClient::key_id);
    Json(json!({ "configured": key.is_some(), "key": key }))
}

/// `POST /api/payment/create-order`
///
/// # Errors
///
/// 503 when the gateway is not configured, 400 for a bad amount, 502 when
/// the gateway call fails.
#[instrument(skip_all, fields(user = %user.email))]
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreatePaymentOrder>,
) -> Result<(StatusCode, Json<Map<String, Value>>)> {
    let client = gateway(&state)?;

    let paise = parse_amount(body.amount.as_ref())
        .and_then(paise_from_major)
        .ok_or_else(|| AppError::BadRequest(AMOUNT_MESSAGE.to_string()))?;

    let order = client
        .create_order(&CreateOrderRequest::new(paise, receipt()))
        .await?;

    add_breadcrumb("payment", "Created gateway order", None);
    tracing::info!(amount_paise = paise, "gateway order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `POST /api/payment/verify`
///
/// # Errors
///
/// 503 when the gateway is not configured, 400 when a field is missing, 403
/// when the signature does not match.
#[instrument(skip_all, fields(user = %user.email))]
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PaymentVerification>,
) -> Result<Json<Value>> {
    let client = gateway(&state)?;

    let (order_id, payment_id, signature) = body
        .fields()
        .ok_or_else(|| AppError::BadRequest("Missing payment verification fields".to_string()))?;

    client
        .verify_payment_signature(order_id, payment_id, signature)
        .inspect_err(|_| {
            tracing::warn!(gateway_order_id = order_id, "payment signature mismatch");
        })?;

    add_breadcrumb(
        "payment",
        "Verified payment",
        Some(&[("gateway_order_id", order_id)]),
    );

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_number_in_range() {
        assert_eq!(parse_amount(Some(&json!(1))), Some(Decimal::ONE));
        assert_eq!(
            parse_amount(Some(&json!(999_999))),
            Some(Decimal::from(999_999))
        );
        assert_eq!(parse_amount(Some(&json!(250.5))), Some(Decimal::new(2505, 1)));
        assert_eq!(parse_amount(Some(&json!(0.5))), None);
        assert_eq!(parse_amount(Some(&json!(1_000_000))), None);
        assert_eq!(parse_amount(Some(&json!(-10))), None);
        assert_eq!(parse_amount(Some(&json!("100"))), None);
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn test_receipt_fits_gateway_limit() {
        let receipt = receipt();
        assert!(receipt.starts_with("rcpt_"));
        assert!(receipt.len() <= 40);
    }
}
