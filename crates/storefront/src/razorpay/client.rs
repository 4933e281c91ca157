//! Razorpay REST client.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sha2::Sha256;
use tracing::{debug, error, instrument};

use super::RazorpayError;
use super::types::CreateOrderRequest;
use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Razorpay API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    client: Client,
    api_base: String,
    key_id: String,
    key_secret: SecretString,
}

impl std::fmt::Debug for RazorpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayClient")
            .field("api_base", &self.inner.api_base)
            .field("key_id", &self.inner.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            inner: Arc::new(RazorpayClientInner {
                client: Client::new(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
            }),
        }
    }

    /// Public key id, safe to hand to the browser.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create a gateway order.
    ///
    /// Returns the gateway's order object as received.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::Http` if the request fails,
    /// `RazorpayError::Api` on a non-success status, and
    /// `RazorpayError::Parse` if the body is not a JSON object.
    #[instrument(skip(self, request), fields(amount = request.amount, receipt = %request.receipt))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<Map<String, Value>, RazorpayError> {
        let response = self
            .inner
            .client
            .post(format!("{}/orders", self.inner.api_base))
            .basic_auth(
                &self.inner.key_id,
                Some(self.inner.key_secret.expose_secret()),
            )
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Razorpay API returned non-success status"
            );
            return Err(RazorpayError::Api {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        let order: Map<String, Value> = serde_json::from_str(&body)?;

        debug!(gateway_order_id = ?order.get("id"), "Razorpay order created");

        Ok(order)
    }

    /// Verify the checkout signature for a payment.
    ///
    /// The expected signature is the hex HMAC-SHA256 of
    /// `"{order_id}|{payment_id}"` keyed with the key secret.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::InvalidSignature` on mismatch.
    #[instrument(skip(self, signature))]
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), RazorpayError> {
        let mut mac = HmacSha256::new_from_slice(self.inner.key_secret.expose_secret().as_bytes())
            .map_err(|_| RazorpayError::InvalidSignature)?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());

        let expected = hex::encode(mac.finalize().into_bytes());

        if !constant_time_compare(&expected, &signature.to_ascii_lowercase()) {
            return Err(RazorpayError::InvalidSignature);
        }

        debug!("Razorpay signature verified");

        Ok(())
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "kq7Xv2Lm9Pz4Rt8Wb3Nc6Hj1";

    fn client() -> RazorpayClient {
        RazorpayClient::new(&RazorpayConfig {
            key_id: "rzp_test_abc123".to_string(),
            key_secret: SecretString::from(SECRET),
            api_base: "https://api.razorpay.com/v1/".to_string(),
        })
    }

    fn sign(message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }

    #[test]
    fn test_signature_valid() {
        let signature = sign("order_1|pay_1");
        assert!(
            client()
                .verify_payment_signature("order_1", "pay_1", &signature)
                .is_ok()
        );
    }

    #[test]
    fn test_signature_tampered() {
        let mut signature = sign("order_1|pay_1");
        signature.replace_range(0..1, if signature.starts_with('0') { "1" } else { "0" });

        assert!(matches!(
            client().verify_payment_signature("order_1", "pay_1", &signature),
            Err(RazorpayError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_bound_to_ids() {
        let signature = sign("order_1|pay_1");
        assert!(
            client()
                .verify_payment_signature("order_2", "pay_1", &signature)
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("rzp_test_abc123"));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        assert_eq!(client().inner.api_base, "https://api.razorpay.com/v1");
    }
}
