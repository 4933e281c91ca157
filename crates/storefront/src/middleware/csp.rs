//! Per-request CSP nonce.
//!
//! Page shells carry their inline bootstrap script as
//! `<script nonce="{{ nonce }}">`; the same value goes into the
//! `script-src` directive built by `security_headers_middleware`.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Nonce length in bytes before base64 encoding.
const NONCE_BYTES: usize = 16;

/// A CSP nonce value for inline scripts.
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a fresh 128-bit nonce, base64-encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Store a fresh nonce in the request extensions.
///
/// Layered outside `security_headers_middleware` so the header sees it.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            // An empty nonce makes the CSP refuse every inline script.
            tracing::warn!("page rendered without a CSP nonce");
            Self(String::new())
        }))
    }
}
