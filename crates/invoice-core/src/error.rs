//! # Invoice Error Types
//!
//! Typed error handling for request-invoice.
//! All invoice and payment operations return `Result<T, InvoiceError>`.

use std::time::Duration;
use thiserror::Error;

/// Core error type for all invoice operations
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request identifier unknown to the network
    #[error("Request not found: {request_id}")]
    RequestNotFound { request_id: String },

    /// The fetched request carries no extension for the expected payment network
    #[error("Payment network not configured for this request: {payment_network}")]
    PaymentNetworkMissing {
        request_id: String,
        payment_network: String,
    },

    /// Gateway answered with a non-success status
    #[error("Gateway error [{status}]: {message}")]
    GatewayError { status: u16, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request was persisted but not confirmed in time
    #[error("Confirmation of {request_id} timed out after {timeout:?}")]
    ConfirmationTimeout {
        request_id: String,
        timeout: Duration,
    },

    /// The confirmation wait was cancelled (shutdown)
    #[error("Confirmation of {request_id} cancelled")]
    ConfirmationCancelled { request_id: String },

    /// Signing or signature recovery failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// ABI encoding or value parsing failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad failure classes used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Gateway unreachable, gateway failure, confirmation never arrived
    ExternalNetwork,
    /// Unknown request identifier
    NotFound,
    /// Request exists but is not in the expected shape
    MalformedState,
    /// Local failure (config, input, encoding)
    Local,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ExternalNetwork => "external_network",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::MalformedState => "malformed_state",
            ErrorCategory::Local => "local",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InvoiceError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            InvoiceError::GatewayError { .. }
            | InvoiceError::NetworkError(_)
            | InvoiceError::ConfirmationTimeout { .. }
            | InvoiceError::ConfirmationCancelled { .. } => ErrorCategory::ExternalNetwork,
            InvoiceError::RequestNotFound { .. } => ErrorCategory::NotFound,
            InvoiceError::PaymentNetworkMissing { .. } => ErrorCategory::MalformedState,
            InvoiceError::Configuration(_)
            | InvoiceError::InvalidRequest(_)
            | InvoiceError::Signing(_)
            | InvoiceError::Encoding(_)
            | InvoiceError::Serialization(_)
            | InvoiceError::Internal(_) => ErrorCategory::Local,
        }
    }
}

impl From<serde_json::Error> for InvoiceError {
    fn from(err: serde_json::Error) -> Self {
        InvoiceError::Serialization(err.to_string())
    }
}

/// Result type alias for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
