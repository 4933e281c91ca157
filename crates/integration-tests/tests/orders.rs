//! Order ledger: checkout from the session cart and owner-scoped reads.

#![allow(clippy::unwrap_used)]

use atelier_integration_tests::TestApp;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_order_from_cart_clears_cart() {
    let mut app = TestApp::new();
    let email = app.signup_fresh().await;
    app.post("/api/cart", json!({ "id": "1", "size": "M", "quantity": 2 }))
        .await;
    app.post("/api/cart", json!({ "id": "8" })).await;

    let response = app
        .post(
            "/api/orders",
            json!({
                "shippingAddress": { "city": "Pune" },
                "paymentStatus": "completed",
                "razorpayOrderId": "order_Nx1",
                "razorpayPaymentId": "pay_Qa7",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    let order = &response.body;
    assert!(order["id"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(order["customerId"], email.as_str());
    assert_eq!(order["customerEmail"], email.as_str());
    assert_eq!(order["status"], "pending");
    assert_eq!(order["paymentStatus"], "completed");
    assert_eq!(order["paymentMethod"], "razorpay");
    assert_eq!(order["razorpayPaymentId"], "pay_Qa7");
    assert_eq!(order["shippingAddress"], json!({ "city": "Pune" }));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    // 2 x 295 + 165
    assert_eq!(order["total"].as_f64(), Some(755.0));

    assert_eq!(app.get("/api/cart").await.body, json!([]));
}

#[tokio::test]
async fn test_cart_cleared_even_when_payment_pending() {
    let mut app = TestApp::new();
    app.signup_fresh().await;
    app.post("/api/cart", json!({ "id": "3", "size": "S" })).await;

    let response = app
        .post("/api/orders", json!({ "paymentStatus": "pending", "total": "85" }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["paymentStatus"], "pending");
    assert_eq!(app.get("/api/cart").await.body, json!([]));
}

#[tokio::test]
async fn test_empty_cart_cannot_order() {
    let mut app = TestApp::new();
    app.signup_fresh().await;

    let response = app.post("/api/orders", json!({})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Cart is empty" }));
}

#[tokio::test]
async fn test_invalid_total_keeps_cart() {
    let mut app = TestApp::new();
    app.signup_fresh().await;
    app.post("/api/cart", json!({ "id": "3", "size": "S" })).await;

    let response = app.post("/api/orders", json!({ "total": -1 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "error": "Total must be a number between 0 and 999999" })
    );
    assert_eq!(app.get("/api/cart").await.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_orders_are_scoped_to_owner() {
    let mut alice = TestApp::new();
    alice.signup_fresh().await;
    alice.post("/api/cart", json!({ "id": "7" })).await;
    let order = alice.post("/api/orders", json!({})).await;
    let order_id = order.body["id"].as_str().unwrap().to_string();

    let mine = alice.get("/api/orders").await;
    assert_eq!(mine.body.as_array().unwrap().len(), 1);
    let one = alice.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(one.body["id"], order_id.as_str());

    let mut bob = alice.client();
    bob.signup_fresh().await;
    assert_eq!(bob.get("/api/orders").await.body, json!([]));

    let stolen = bob.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(stolen.status, StatusCode::NOT_FOUND);
    assert_eq!(stolen.body, json!({ "error": "Order not found" }));
}

#[tokio::test]
async fn test_order_ids_are_distinct() {
    let mut app = TestApp::new();
    app.signup_fresh().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        app.post("/api/cart", json!({ "id": "8" })).await;
        let order = app.post("/api/orders", json!({})).await;
        ids.push(order.body["id"].as_str().unwrap().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}
