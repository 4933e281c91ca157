//! Razorpay payment gateway bridge.
//!
//! # Scope
//!
//! - Create a gateway order for a checkout amount (REST, basic auth)
//! - Verify the checkout signature returned to the browser (local HMAC)
//!
//! The gateway's order object is passed through to the client untouched; the
//! browser checkout widget needs it as-is. Nothing here retries.

mod client;
pub mod types;

pub use client::RazorpayClient;
pub use types::{CreateOrderRequest, PaymentVerification, paise_from_major};

use thiserror::Error;

/// Errors that can occur when talking to Razorpay.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("gateway returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Gateway answered with something other than a JSON object.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Checkout signature does not match.
    #[error("invalid payment signature")]
    InvalidSignature,
}
