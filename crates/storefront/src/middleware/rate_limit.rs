//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the auth endpoints are limited: `auth_rate_limiter` allows ~10
//! requests per minute per client IP.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that prefers proxy headers and falls back to the peer
/// address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

/// Cloudflare's client IP header; trusted ahead of `X-Forwarded-For`.
const CLOUDFLARE_IP_HEADER: &str = "cf-connecting-ip";

/// Single-IP proxy headers checked after `X-Forwarded-For`, in order.
const FALLBACK_IP_HEADERS: &[&str] = &["x-real-ip", "fly-client-ip"];

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        if let Some(ip) = header_ip(CLOUDFLARE_IP_HEADER) {
            return Ok(ip);
        }

        // X-Forwarded-For (first IP in the chain)
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        if let Some(ip) = FALLBACK_IP_HEADERS.iter().find_map(|name| header_ip(name)) {
            return Ok(ip);
        }

        // Direct connection (requires `into_make_service_with_connect_info`)
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
/// This slows brute force attempts on login and signup.
///
/// Returns `None` only if governor rejects the quota.
#[must_use]
pub fn auth_rate_limiter() -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.7"),
        ]);
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "203.0.113.7"
        );
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let req = request(&[("x-forwarded-for", "198.51.100.2, 10.0.0.1")]);
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "198.51.100.2"
        );
    }

    #[test]
    fn test_single_ip_headers_after_forwarded_for() {
        let req = request(&[
            ("fly-client-ip", "192.0.2.44"),
            ("x-real-ip", "192.0.2.33"),
        ]);
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "192.0.2.33"
        );

        let req = request(&[
            ("x-real-ip", "192.0.2.33"),
            ("x-forwarded-for", "198.51.100.2"),
        ]);
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "198.51.100.2"
        );

        let req = request(&[("fly-client-ip", "192.0.2.44")]);
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "192.0.2.44"
        );
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[]);
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.9:5000".parse::<SocketAddr>().unwrap()));
        assert_eq!(
            ClientIpKeyExtractor.extract(&req).unwrap().to_string(),
            "192.0.2.9"
        );
    }

    #[test]
    fn test_no_source_is_error() {
        assert!(ClientIpKeyExtractor.extract(&request(&[])).is_err());
    }

    #[test]
    fn test_auth_limiter_builds() {
        assert!(auth_rate_limiter().is_some());
    }
}
