//! Cross-cutting HTTP behaviour: health, headers, session cookie, pages.

#![allow(clippy::unwrap_used)]

use atelier_integration_tests::TestApp;
use axum::http::{StatusCode, header};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "status": "ok", "payment_configured": false })
    );

    let mut app = TestApp::with_payments();
    assert_eq!(app.get("/health").await.body["payment_configured"], true);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let mut app = TestApp::new();

    for path in ["/health", "/api/products/404", "/shop"] {
        let headers = app.get(path).await.headers;
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY", "{path}");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store, max-age=0");
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
        assert!(headers.contains_key(header::REFERRER_POLICY));
        assert!(headers.contains_key("permissions-policy"));
        assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
        assert_eq!(headers["cross-origin-resource-policy"], "same-origin");
        assert!(headers.contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn test_page_nonce_matches_csp() {
    let mut app = TestApp::new();
    let response = app.get("/product/3").await;
    assert_eq!(response.status, StatusCode::OK);

    let csp = response.headers[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .to_string();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();

    assert!(response.text.contains(&format!("nonce=\"{nonce}\"")));
    assert!(response.text.contains("data-product-id=\"3\""));
    assert!(response.text.contains("data-page=\"product\""));
}

#[tokio::test]
async fn test_nonce_differs_per_request() {
    let mut app = TestApp::new();
    let first = app.get("/").await.headers[header::CONTENT_SECURITY_POLICY].clone();
    let second = app.get("/").await.headers[header::CONTENT_SECURITY_POLICY].clone();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    let request_id = response.headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let mut app = TestApp::new();
    let response = app.post("/api/cart", json!({ "id": "8" })).await;

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("atelier_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn test_all_page_shells_render() {
    let mut app = TestApp::new();

    for path in [
        "/", "/shop", "/product/1", "/cart", "/checkout", "/login", "/signup", "/account",
        "/admin",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(response.text.contains("<main id=\"main\">"), "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let mut app = TestApp::new();
    let response = app.get("/api/nothing-here").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "error": "Not found" }));
}
