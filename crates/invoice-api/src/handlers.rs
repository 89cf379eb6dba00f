//! # Request Handlers
//!
//! Axum request handlers for invoice creation and payment resolution.
//! Every failure is logged and answered with a 500 `{ error, details }`
//! envelope.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use invoice_core::{
    resolve_payment, InvoiceDraft, InvoiceError, InvoiceReceipt, InvoiceResult,
    PaymentInstructions,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create invoice request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Payer wallet address
    pub address: String,
    /// Free-text reason
    pub reason: String,
    /// Due date, free text
    pub due_date: String,
}

/// Process payment request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub request_id: String,
    pub payer_address: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn invoice_error_to_response(context: &str, err: &InvoiceError) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(context, err.to_string())),
    )
}

fn body_error(rejection: JsonRejection) -> InvoiceError {
    InvoiceError::InvalidRequest(rejection.body_text())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "request-invoice",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an invoice and wait for the network to confirm it
#[instrument(skip(state, payload))]
pub async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<Json<InvoiceReceipt>, HandlerError> {
    let result = match payload {
        Ok(Json(request)) => create_invoice_internal(&state, request).await,
        Err(rejection) => Err(body_error(rejection)),
    };

    result.map(Json).map_err(|e| {
        error!(category = %e.category(), "Error creating invoice: {}", e);
        invoice_error_to_response("Failed to create invoice", &e)
    })
}

async fn create_invoice_internal(
    state: &AppState,
    request: CreateInvoiceRequest,
) -> InvoiceResult<InvoiceReceipt> {
    let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let params = InvoiceDraft::new(request.address, request.reason, request.due_date)
        .into_create_parameters(&state.payee, &state.network, timestamp);
    let expected_amount = params.request_info.expected_amount.clone();

    info!(
        "Creating invoice: client={}, payee={}, network={}",
        state.client.client_name(),
        state.payee.value,
        state.network.name
    );

    let pending = state.client.create_request(&params).await?;

    info!("Waiting for confirmation of {}", pending.request_id);

    let confirmed = state
        .client
        .wait_for_confirmation(&pending, state.confirmation_options())
        .await?;

    InvoiceReceipt::from_confirmed(&confirmed, &expected_amount)
}

/// Compute the fee-proxy payment parameters of an existing invoice
#[instrument(skip(state, payload))]
pub async fn process_payment(
    State(state): State<AppState>,
    payload: Result<Json<ProcessPaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentInstructions>, HandlerError> {
    let result = match payload {
        Ok(Json(request)) => process_payment_internal(&state, request).await,
        Err(rejection) => Err(body_error(rejection)),
    };

    result.map(Json).map_err(|e| {
        error!(category = %e.category(), "Error processing payment: {}", e);
        invoice_error_to_response("Failed to process payment", &e)
    })
}

async fn process_payment_internal(
    state: &AppState,
    request: ProcessPaymentRequest,
) -> InvoiceResult<PaymentInstructions> {
    info!("Processing payment for request: {}", request.request_id);

    let data = state
        .client
        .fetch_request(&request.request_id)
        .await?
        .ok_or_else(|| InvoiceError::RequestNotFound {
            request_id: request.request_id.clone(),
        })?;

    debug!("Request data: {:?}", data);

    resolve_payment(&data, &request.payer_address, &state.network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Failed to process payment", "Request not found: 0xdeadbeef");
        assert_eq!(err.error, "Failed to process payment");
        assert_eq!(err.details, "Request not found: 0xdeadbeef");
    }

    #[test]
    fn test_every_error_is_500() {
        let errors = [
            InvoiceError::RequestNotFound {
                request_id: "0xdeadbeef".into(),
            },
            InvoiceError::NetworkError("unreachable".into()),
            InvoiceError::PaymentNetworkMissing {
                request_id: "01ab".into(),
                payment_network: "pn-erc20-fee-proxy-contract".into(),
            },
        ];

        for err in errors {
            let (status, Json(body)) = invoice_error_to_response("Failed", &err);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.details, err.to_string());
        }
    }

    #[test]
    fn test_request_field_names() {
        let request: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
            "address": "0xf17f52151EbEF6C7334FAD080c5704D77216b732",
            "reason": "Invoice #1",
            "dueDate": "2025-01-01"
        }))
        .unwrap();
        assert_eq!(request.due_date, "2025-01-01");

        let request: ProcessPaymentRequest = serde_json::from_value(serde_json::json!({
            "requestId": "01ab",
            "payerAddress": "0xf17f52151EbEF6C7334FAD080c5704D77216b732"
        }))
        .unwrap();
        assert_eq!(request.request_id, "01ab");
    }
}
