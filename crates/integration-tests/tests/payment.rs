//! Razorpay bridge: key exposure, order creation guards, signature checks.

#![allow(clippy::unwrap_used)]

use atelier_integration_tests::{RAZORPAY_KEY_ID, TestApp, payment_signature};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_key_endpoint_unconfigured() {
    let mut app = TestApp::new();
    let response = app.get("/api/payment/razorpay-key").await;
    assert_eq!(response.body, json!({ "configured": false, "key": null }));
}

#[tokio::test]
async fn test_key_endpoint_exposes_only_key_id() {
    let mut app = TestApp::with_payments();
    let response = app.get("/api/payment/razorpay-key").await;

    assert_eq!(
        response.body,
        json!({ "configured": true, "key": RAZORPAY_KEY_ID })
    );
}

#[tokio::test]
async fn test_unconfigured_gateway_is_checked_before_amount() {
    let mut app = TestApp::new();
    app.signup_fresh().await;

    let response = app
        .post("/api/payment/create-order", json!({ "amount": -4 }))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body,
        json!({ "error": "Payment gateway not configured" })
    );

    let verify = app.post("/api/payment/verify", json!({})).await;
    assert_eq!(verify.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_amount_validation() {
    let mut app = TestApp::with_payments();
    app.signup_fresh().await;

    for body in [
        json!({}),
        json!({ "amount": 0 }),
        json!({ "amount": 0.99 }),
        json!({ "amount": 1_000_000 }),
        json!({ "amount": "500" }),
        json!({ "amount": null }),
    ] {
        let response = app.post("/api/payment/create-order", body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            response.body,
            json!({ "error": "Amount must be between 1 and 999999" })
        );
    }
}

#[tokio::test]
async fn test_gateway_failure_is_bad_gateway() {
    let mut app = TestApp::with_payments();
    app.signup_fresh().await;

    let response = app
        .post("/api/payment/create-order", json!({ "amount": 295 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body, json!({ "error": "Payment processing failed" }));
}

#[tokio::test]
async fn test_verify_accepts_valid_signature() {
    let mut app = TestApp::with_payments();
    app.signup_fresh().await;

    let signature = payment_signature("order_Nx1", "pay_Qa7");
    let response = app
        .post(
            "/api/payment/verify",
            json!({
                "razorpay_order_id": "order_Nx1",
                "razorpay_payment_id": "pay_Qa7",
                "razorpay_signature": signature,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));
}

#[tokio::test]
async fn test_verify_rejects_tampered_signature() {
    let mut app = TestApp::with_payments();
    app.signup_fresh().await;

    // Signed for a different payment id.
    let signature = payment_signature("order_Nx1", "pay_other");
    let response = app
        .post(
            "/api/payment/verify",
            json!({
                "razorpay_order_id": "order_Nx1",
                "razorpay_payment_id": "pay_Qa7",
                "razorpay_signature": signature,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, json!({ "error": "Invalid payment signature" }));
}

#[tokio::test]
async fn test_verify_requires_all_fields() {
    let mut app = TestApp::with_payments();
    app.signup_fresh().await;

    let response = app
        .post(
            "/api/payment/verify",
            json!({ "razorpay_order_id": "order_Nx1", "razorpay_payment_id": " " }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "error": "Missing payment verification fields" })
    );
}
