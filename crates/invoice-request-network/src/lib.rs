//! # invoice-request-network
//!
//! Request Network gateway client for request-invoice-rs.
//!
//! Requests are built and signed locally with the payee key, persisted
//! through the gateway, and confirmed by polling the gateway until the
//! transaction is anchored.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_request_network::RequestNetworkClient;
//! use invoice_core::{ConfirmationOptions, RequestClient};
//!
//! // Create client from environment (PAYEE_PRIVATE_KEY, REQUEST_GATEWAY_URL)
//! let client = RequestNetworkClient::from_env()?;
//!
//! let pending = client.create_request(&params).await?;
//! let confirmed = client
//!     .wait_for_confirmation(&pending, ConfirmationOptions::with_timeout(timeout))
//!     .await?;
//!
//! // Later: re-fetch by identifier
//! let request = client.fetch_request(&confirmed.request_id).await?;
//! ```

pub mod action;
pub mod client;
pub mod config;
pub mod signer;

// Re-exports
pub use action::{SignedAction, StoredAction, REQUEST_LOGIC_VERSION};
pub use client::RequestNetworkClient;
pub use config::{GatewayConfig, DEFAULT_GATEWAY_URL};
pub use signer::PayeeSigner;
