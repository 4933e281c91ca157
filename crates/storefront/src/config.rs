//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_ADMIN_EMAIL` - Account allowed into the admin API (default: admin@example.com)
//! - `STOREFRONT_ADMIN_PASSWORD` - Admin account password (high entropy, no placeholders)
//! - `STOREFRONT_SEED_DEMO_USER` - Register the demo shopper at startup (default: true)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit the auth endpoints (default: true)
//! - `RAZORPAY_KEY_ID` - Razorpay public key id
//! - `RAZORPAY_KEY_SECRET` - Razorpay key secret (high entropy, no placeholders)
//! - `RAZORPAY_API_BASE` - Razorpay REST base (default: <https://api.razorpay.com/v1>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//!
//! `RAZORPAY_KEY_ID` and `RAZORPAY_KEY_SECRET` are set together or not at all.
//! Without them the payment endpoints answer 503.
//!
//! The admin account is registered at startup from `STOREFRONT_ADMIN_PASSWORD`
//! and can never be claimed through signup. Without a password nobody can log
//! in as the admin.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use atelier_core::Email;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// The one identity allowed into `/api/admin/*`
    pub admin_email: Email,
    /// Password for the admin account; `None` leaves the admin API locked
    pub admin_password: Option<SecretString>,
    /// Register the demo shopper account at startup
    pub seed_demo_user: bool,
    /// Rate limit the auth endpoints per client IP
    pub rate_limit: bool,
    /// Razorpay credentials; `None` leaves payments unconfigured
    pub razorpay: Option<RazorpayConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Razorpay API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (shown to the browser checkout widget)
    pub key_id: String,
    /// Key secret used for API auth and signature verification
    pub key_secret: SecretString,
    /// REST API base URL
    pub api_base: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if secrets fail
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let host = env.parsed("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = env.parsed("STOREFRONT_PORT", 3000_u16)?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let admin_email =
            Email::parse(&env.or_default("STOREFRONT_ADMIN_EMAIL", "admin@example.com")).map_err(
                |e| ConfigError::InvalidEnvVar("STOREFRONT_ADMIN_EMAIL".to_string(), e.to_string()),
            )?;
        let admin_password = env
            .optional("STOREFRONT_ADMIN_PASSWORD")
            .map(|password| {
                validate_secret_strength(&password, "STOREFRONT_ADMIN_PASSWORD")
                    .map(|()| SecretString::from(password))
            })
            .transpose()?;
        let seed_demo_user = env.flag("STOREFRONT_SEED_DEMO_USER", true)?;
        let rate_limit = env.flag("STOREFRONT_RATE_LIMIT", true)?;

        let razorpay = RazorpayConfig::from_env(&env)?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.parsed("SENTRY_SAMPLE_RATE", 1.0_f32)?;
        let sentry_traces_sample_rate = env.parsed("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?;

        Ok(Self {
            host,
            port,
            base_url,
            admin_email,
            admin_password,
            seed_demo_user,
            rate_limit,
            razorpay,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RazorpayConfig {
    fn from_env<F>(env: &Env<'_, F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_id = env.optional("RAZORPAY_KEY_ID");
        let key_secret = env.optional("RAZORPAY_KEY_SECRET");

        match (key_id, key_secret) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("RAZORPAY_KEY_SECRET".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("RAZORPAY_KEY_ID".to_string())),
            (Some(key_id), Some(key_secret)) => {
                validate_secret_strength(&key_secret, "RAZORPAY_KEY_SECRET")?;
                Ok(Some(Self {
                    key_id,
                    key_secret: SecretString::from(key_secret),
                    api_base: env.or_default("RAZORPAY_API_BASE", DEFAULT_RAZORPAY_API_BASE),
                }))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with the parsing helpers used above.
///
/// Blank values count as unset.
struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional environment variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get an environment variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
    fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{value}'"),
            )),
        }
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const GOOD_SECRET: &str = "kq7Xv2Lm9Pz4Rt8Wb3Nc6Hj1";

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.admin_email.as_str(), "admin@example.com");
        assert!(config.seed_demo_user);
        assert!(config.rate_limit);
        assert!(config.admin_password.is_none());
        assert!(config.razorpay.is_none());
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_ADMIN_EMAIL", " Owner@Shop.IN "),
            ("STOREFRONT_RATE_LIMIT", "off"),
            ("STOREFRONT_SEED_DEMO_USER", "0"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.admin_email.as_str(), "owner@shop.in");
        assert!(!config.rate_limit);
        assert!(!config.seed_demo_user);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("STOREFRONT_PORT", "http")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_PORT"
        ));
        assert!(matches!(
            load(&[("STOREFRONT_RATE_LIMIT", "maybe")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            load(&[("STOREFRONT_ADMIN_EMAIL", "nobody")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_razorpay_requires_both_keys() {
        assert!(matches!(
            load(&[("RAZORPAY_KEY_ID", "rzp_test_1")]),
            Err(ConfigError::MissingEnvVar(key)) if key == "RAZORPAY_KEY_SECRET"
        ));
        assert!(matches!(
            load(&[("RAZORPAY_KEY_SECRET", GOOD_SECRET)]),
            Err(ConfigError::MissingEnvVar(key)) if key == "RAZORPAY_KEY_ID"
        ));
    }

    #[test]
    fn test_razorpay_configured() {
        let config = load(&[
            ("RAZORPAY_KEY_ID", "rzp_test_1"),
            ("RAZORPAY_KEY_SECRET", GOOD_SECRET),
        ])
        .unwrap();

        let razorpay = config.razorpay.unwrap();
        assert_eq!(razorpay.key_id, "rzp_test_1");
        assert_eq!(razorpay.api_base, DEFAULT_RAZORPAY_API_BASE);
        assert_eq!(razorpay.key_secret.expose_secret(), GOOD_SECRET);
    }

    #[test]
    fn test_razorpay_rejects_placeholder_secret() {
        for secret in ["your-razorpay-key", "changeme123", "aaaaaaaaaaaaaaaaaaaaaaaa"] {
            let result = load(&[
                ("RAZORPAY_KEY_ID", "rzp_test_1"),
                ("RAZORPAY_KEY_SECRET", secret),
            ]);
            assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
        }
    }

    #[test]
    fn test_admin_password_is_checked_like_a_secret() {
        let config = load(&[("STOREFRONT_ADMIN_PASSWORD", GOOD_SECRET)]).unwrap();
        assert_eq!(
            config.admin_password.unwrap().expose_secret(),
            GOOD_SECRET
        );

        for weak in ["password123", "admin-admin", "zzzzzzzzzzzz"] {
            assert!(matches!(
                load(&[("STOREFRONT_ADMIN_PASSWORD", weak)]),
                Err(ConfigError::InsecureSecret(key, _)) if key == "STOREFRONT_ADMIN_PASSWORD"
            ));
        }
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_razorpay_config_debug_redacts_secret() {
        let config = RazorpayConfig {
            key_id: "rzp_live_visible".to_string(),
            key_secret: SecretString::from("super_hidden_value"),
            api_base: DEFAULT_RAZORPAY_API_BASE.to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("rzp_live_visible"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_hidden_value"));
    }
}
