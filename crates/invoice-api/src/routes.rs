//! # Routes
//!
//! Axum router configuration for the invoice API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check (also at /)
/// - POST /create-invoice - Create and confirm an invoice
/// - POST /process-payment - Payment parameters for an invoice
pub fn create_router(state: AppState) -> Router {
    // Browser wallets call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/create-invoice", post(handlers::create_invoice))
        .route("/process-payment", post(handlers::process_payment))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
