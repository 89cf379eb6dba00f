//! # invoice-api
//!
//! HTTP API layer for request-invoice-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Invoice creation backed by the Request Network gateway
//! - Fee-proxy payment parameters for existing invoices
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-invoice` | Create an invoice and wait for confirmation |
//! | POST | `/process-payment` | Payment reference and payload for an invoice |

pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
