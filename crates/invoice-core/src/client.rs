//! # Request Client Trait
//!
//! Seam between the HTTP handlers and the network that stores requests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RequestClient (trait)                    │
//! │  ├── create_request()                                       │
//! │  ├── wait_for_confirmation()                                │
//! │  ├── fetch_request()                                        │
//! │  └── client_name()                                          │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!              ┌─────────────┴─────────────┐
//!      ┌───────┴────────┐          ┌───────┴───────┐
//!      │ RequestNetwork │          │  in-memory    │
//!      │    Client      │          │  (tests)      │
//!      └────────────────┘          └───────────────┘
//! ```

use crate::error::InvoiceResult;
use crate::request::{CreateRequestParameters, PendingRequest, RequestData};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounds of a confirmation wait
#[derive(Debug, Clone)]
pub struct ConfirmationOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Abort early when cancelled
    pub cancel: CancellationToken,
}

impl ConfirmationOptions {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// Timeout only, never cancelled
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, CancellationToken::new())
    }
}

/// Operations the service needs from the request network.
#[async_trait]
pub trait RequestClient: Send + Sync {
    /// Sign and submit a new request.
    ///
    /// Returns as soon as the network accepted it; the request is not yet
    /// confirmed.
    async fn create_request(&self, params: &CreateRequestParameters) -> InvoiceResult<PendingRequest>;

    /// Suspend until the submitted request is confirmed.
    ///
    /// Fails with `ConfirmationTimeout` or `ConfirmationCancelled` when the
    /// options' bounds are hit first.
    async fn wait_for_confirmation(
        &self,
        pending: &PendingRequest,
        options: ConfirmationOptions,
    ) -> InvoiceResult<RequestData>;

    /// Fetch the current state of a request; `None` when the network has
    /// never seen the identifier.
    async fn fetch_request(&self, request_id: &str) -> InvoiceResult<Option<RequestData>>;

    /// Client name (for logging)
    fn client_name(&self) -> &'static str;
}

/// Type alias for a shared request client (dynamic dispatch)
pub type BoxedRequestClient = Arc<dyn RequestClient>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_is_not_cancelled() {
        let options = ConfirmationOptions::with_timeout(Duration::from_secs(5));
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(!options.cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_shared_with_clones() {
        let token = CancellationToken::new();
        let options = ConfirmationOptions::new(Duration::from_secs(5), token.child_token());
        let copy = options.clone();

        token.cancel();
        assert!(options.cancel.is_cancelled());
        assert!(copy.cancel.is_cancelled());
    }
}
