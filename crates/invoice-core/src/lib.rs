//! # invoice-core
//!
//! Core types and traits for the request-invoice service.
//!
//! This crate provides:
//! - `RequestClient` trait for the network that stores payment requests
//! - `InvoiceDraft` and `InvoiceReceipt` for invoice creation
//! - `resolve_payment` for fee-proxy payment references and payloads
//! - `Extensions` for typed payment-network lookups
//! - `InvoiceError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use invoice_core::{InvoiceDraft, NetworkConfig, ConfirmationOptions, resolve_payment};
//!
//! let network = NetworkConfig::sepolia();
//! let params = InvoiceDraft::new(payer, "Invoice #1", "2025-01-01")
//!     .into_create_parameters(&payee, &network, now);
//!
//! let pending = client.create_request(&params).await?;
//! let confirmed = client.wait_for_confirmation(&pending, options).await?;
//!
//! let request = client.fetch_request(&confirmed.request_id).await?.unwrap();
//! let instructions = resolve_payment(&request, payer, &network)?;
//! ```

pub mod client;
pub mod error;
pub mod extension;
pub mod invoice;
pub mod network;
pub mod payment;
pub mod request;

// Re-exports for convenience
pub use client::{BoxedRequestClient, ConfirmationOptions, RequestClient};
pub use error::{ErrorCategory, InvoiceError, InvoiceResult};
pub use extension::{
    ExtensionId, ExtensionState, Extensions, PaymentNetworkKind, PaymentNetworkValues,
};
pub use invoice::{InvoiceDraft, InvoiceReceipt, FEE_AMOUNT, FEE_RECIPIENT, INVOICE_EXPECTED_AMOUNT};
pub use network::NetworkConfig;
pub use payment::{resolve_payment, PaymentCommitment, PaymentInstructions};
pub use request::{
    CreateRequestParameters, CurrencyRef, CurrencyType, FeeProxyParameters, Identity,
    IdentityType, PaymentNetworkParameters, PendingRequest, RequestData, RequestInfo,
    RequestState,
};
