//! Integration test harness for the Atelier storefront.
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`,
//! carrying the session cookie between requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;

use atelier_storefront::config::StorefrontConfig;
use atelier_storefront::middleware::session::SESSION_COOKIE_NAME;
use atelier_storefront::routes;
use atelier_storefront::state::AppState;

/// Seeded demo account.
pub const DEMO_EMAIL: &str = "user@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// Admin identity used by the tests.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Gv4nW8qLt2Zr6Hx9";

/// Razorpay test credentials. The secret passes the config entropy check.
pub const RAZORPAY_KEY_ID: &str = "rzp_test_k7Q2mXv9";
pub const RAZORPAY_KEY_SECRET: &str = "Zr4Tq8Ld2Wf6Yh1Nc5Bv9Kx3";

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

/// One browser-like client against a fresh application.
///
/// Every `TestApp` owns its own stores and session store. Use
/// [`TestApp::client`] for a second visitor on the same application.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Fresh app without payment credentials.
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Fresh app with Razorpay credentials configured.
    ///
    /// The API base points at an unroutable address; gateway calls fail fast.
    pub fn with_payments() -> Self {
        Self::with_env(&[
            ("RAZORPAY_KEY_ID", RAZORPAY_KEY_ID),
            ("RAZORPAY_KEY_SECRET", RAZORPAY_KEY_SECRET),
            ("RAZORPAY_API_BASE", "http://127.0.0.1:9/v1"),
        ])
    }

    /// Fresh app with extra environment overrides.
    ///
    /// Rate limiting is off unless overridden.
    pub fn with_env(overrides: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([
            ("STOREFRONT_RATE_LIMIT".to_string(), "false".to_string()),
            ("STOREFRONT_ADMIN_EMAIL".to_string(), ADMIN_EMAIL.to_string()),
            ("STOREFRONT_ADMIN_PASSWORD".to_string(), ADMIN_PASSWORD.to_string()),
        ]);
        for (key, value) in overrides {
            env.insert((*key).to_string(), (*value).to_string());
        }

        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();

        Self {
            router: routes::app(state),
            cookie: None,
        }
    }

    /// Another visitor (no cookie) on the same application.
    pub fn client(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Current session cookie value, if any.
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Send a request, storing any session cookie the response sets.
    pub async fn request(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let pair = value.to_str().unwrap().split(';').next().unwrap_or_default();
            if let Some((name, cookie)) = pair.split_once('=')
                && name == SESSION_COOKIE_NAME
            {
                self.cookie = Some(cookie.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&mut self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// Log in and assert success.
    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        let response = self
            .post(
                "/api/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response
    }

    /// Sign up a fresh random account and stay logged in as it.
    pub async fn signup_fresh(&mut self) -> String {
        let email = format!("shopper-{}@example.com", uuid::Uuid::new_v4().simple());
        let response = self
            .post(
                "/api/auth/signup",
                serde_json::json!({ "email": email, "password": "s3cure-pass" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.text);
        email
    }

    /// Log in as the provisioned admin account.
    pub async fn login_admin(&mut self) -> TestResponse {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature the checkout widget would return for this order and payment.
pub fn payment_signature(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(RAZORPAY_KEY_SECRET.as_bytes()).unwrap();
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
