//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at startup and handed to every handler; nothing in it is
//! mutated while serving.

use invoice_core::{BoxedRequestClient, ConfirmationOptions, Identity, NetworkConfig};
use invoice_request_network::{GatewayConfig, RequestNetworkClient};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Request network client
    pub client: BoxedRequestClient,
    /// Identity invoices are issued by
    pub payee: Identity,
    /// Settlement network constants
    pub network: NetworkConfig,
    /// Upper bound of a confirmation wait
    pub confirmation_timeout: Duration,
    /// Fires on shutdown; aborts pending confirmation waits
    pub shutdown: CancellationToken,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Request Network gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let network = load_network_config()?;

        let gateway = GatewayConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure gateway: {}", e))?;
        tracing::info!("Gateway: {}", gateway.base_url);
        let confirmation_timeout = gateway.confirmation_timeout;

        let client = RequestNetworkClient::new(gateway)
            .map_err(|e| anyhow::anyhow!("Failed to initialize request client: {}", e))?;
        let payee = client.payee_identity();

        Ok(Self::with_client(
            Arc::new(client),
            payee,
            network,
            confirmation_timeout,
            config,
        ))
    }

    /// Assemble state around an existing client (tests, embedding)
    pub fn with_client(
        client: BoxedRequestClient,
        payee: Identity,
        network: NetworkConfig,
        confirmation_timeout: Duration,
        config: AppConfig,
    ) -> Self {
        Self {
            client,
            payee,
            network,
            confirmation_timeout,
            shutdown: CancellationToken::new(),
            config,
        }
    }

    /// Bounds for one confirmation wait
    pub fn confirmation_options(&self) -> ConfirmationOptions {
        ConfirmationOptions::new(self.confirmation_timeout, self.shutdown.child_token())
    }
}

/// Load network constants from config file, falling back to Sepolia
fn load_network_config() -> anyhow::Result<NetworkConfig> {
    let config_paths = [
        "config/network.toml",
        "../config/network.toml",
        "../../config/network.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let network = NetworkConfig::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded network {} from {}", network.name, path);
            return Ok(network);
        }
    }

    tracing::warn!("No network config found, using Sepolia defaults");
    Ok(NetworkConfig::sepolia())
}
