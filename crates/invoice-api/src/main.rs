//! # Request Invoice
//!
//! Invoice creation and ERC20 fee-proxy settlement parameters over the
//! Request Network.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYEE_PRIVATE_KEY=0x...
//! export REQUEST_GATEWAY_URL=https://sepolia.gateway.request.network/
//!
//! # Run the server
//! request-invoice
//! ```

use invoice_api::{routes, state::AppState};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();
    let shutdown = state.shutdown.clone();

    info!("Environment: {}", state.config.environment);
    info!("Payee: {}", state.payee.value);
    info!(
        "Network: {} (token {}, fee proxy {})",
        state.network.name,
        state.network.token_address_string(),
        state.network.fee_proxy_address_string()
    );
    info!("Request client: {}", state.client.client_name());

    let app = routes::create_router(state);

    info!("Server running on http://{}", addr);

    if !is_prod {
        info!("Create invoice: POST http://{}/create-invoice", addr);
        info!("Process payment: POST http://{}/process-payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on ctrl-c and cancel in-flight confirmation waits
async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    token.cancel();
}

fn print_banner() {
    println!(
        r#"
  Request Invoice
  ━━━━━━━━━━━━━━━━━━━━━━━
  ERC20 invoices over Request Network
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
