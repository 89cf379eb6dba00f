//! # Gateway Configuration
//!
//! Configuration for the Request Network gateway client.
//! The payee private key is loaded from the environment.

use invoice_core::InvoiceError;
use std::env;
use std::time::Duration;

/// Default public gateway for Sepolia
pub const DEFAULT_GATEWAY_URL: &str = "https://sepolia.gateway.request.network/";

const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Gateway client configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Hex-encoded secp256k1 key of the payee (signs every request)
    pub private_key: String,

    /// Gateway base URL (for testing/mocking)
    pub base_url: String,

    /// Upper bound of a confirmation wait
    pub confirmation_timeout: Duration,

    /// Delay between confirmation polls
    pub poll_interval: Duration,

    /// Per-call HTTP timeout
    pub http_timeout: Duration,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYEE_PRIVATE_KEY`
    ///
    /// Optional:
    /// - `REQUEST_GATEWAY_URL`
    /// - `CONFIRMATION_TIMEOUT_SECS`
    /// - `CONFIRMATION_POLL_MS`
    pub fn from_env() -> Result<Self, InvoiceError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let private_key = env::var("PAYEE_PRIVATE_KEY").map_err(|_| {
            InvoiceError::Configuration("PAYEE_PRIVATE_KEY not set".to_string())
        })?;

        let mut config = Self::new(private_key);

        if let Ok(url) = env::var("REQUEST_GATEWAY_URL") {
            config.base_url = url;
        }

        if let Some(secs) = parse_env_u64("CONFIRMATION_TIMEOUT_SECS")? {
            config.confirmation_timeout = Duration::from_secs(secs);
        }

        if let Some(ms) = parse_env_u64("CONFIRMATION_POLL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit key and defaults (for testing)
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Check key format and intervals
    pub fn validate(&self) -> Result<(), InvoiceError> {
        let key = self
            .private_key
            .strip_prefix("0x")
            .unwrap_or(&self.private_key);

        if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvoiceError::Configuration(
                "PAYEE_PRIVATE_KEY must be 32 bytes of hex".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(InvoiceError::Configuration(
                "CONFIRMATION_POLL_MS must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of a gateway endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Builder: set custom gateway URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder: set confirmation timeout and poll interval
    pub fn with_confirmation(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("private_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn parse_env_u64(name: &str) -> Result<Option<u64>, InvoiceError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| InvoiceError::Configuration(format!("{} must be an integer", name))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xc87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";

    #[test]
    fn test_validate_key_format() {
        assert!(GatewayConfig::new(KEY).validate().is_ok());
        assert!(GatewayConfig::new(&KEY[2..]).validate().is_ok());
        assert!(GatewayConfig::new("0x1234").validate().is_err());
        assert!(GatewayConfig::new(KEY.replace('c', "z")).validate().is_err());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = GatewayConfig::new(KEY);
        assert_eq!(
            config.endpoint("persistTransaction"),
            "https://sepolia.gateway.request.network/persistTransaction"
        );

        let config = config.with_base_url("http://127.0.0.1:9999");
        assert_eq!(
            config.endpoint("getConfirmedTransaction"),
            "http://127.0.0.1:9999/getConfirmedTransaction"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GatewayConfig::new(KEY));
        assert!(!rendered.contains(&KEY[2..]));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = GatewayConfig::new(KEY)
            .with_confirmation(Duration::from_secs(1), Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
