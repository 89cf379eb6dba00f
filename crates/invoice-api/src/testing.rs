//! In-memory `RequestClient` for handler and router tests.

use async_trait::async_trait;
use invoice_core::{
    ConfirmationOptions, CreateRequestParameters, ExtensionId, ExtensionState, Extensions,
    InvoiceError, InvoiceResult, PaymentNetworkKind, PaymentNetworkValues, PendingRequest,
    RequestClient, RequestData, RequestState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stores confirmed requests in a map; optionally never confirms or
/// refuses creation.
#[derive(Default)]
pub struct InMemoryRequestClient {
    requests: Mutex<HashMap<String, RequestData>>,
    counter: AtomicU64,
    stall_confirmation: bool,
    unavailable: bool,
}

impl InMemoryRequestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmation never arrives
    pub fn stalled() -> Self {
        Self {
            stall_confirmation: true,
            ..Self::default()
        }
    }

    /// Every call fails as if the gateway were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Store a request directly
    pub fn insert(&self, data: RequestData) {
        self.requests
            .lock()
            .unwrap()
            .insert(data.request_id.clone(), data);
    }

    fn check_available(&self) -> InvoiceResult<()> {
        if self.unavailable {
            return Err(InvoiceError::NetworkError(
                "gateway unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestClient for InMemoryRequestClient {
    async fn create_request(&self, params: &CreateRequestParameters) -> InvoiceResult<PendingRequest> {
        self.check_available()?;

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let request_id = format!("01{:064x}", n);
        let salt = format!("{:016x}", n.wrapping_mul(0x9e37_79b9_7f4a_7c15));

        let mut extensions = Extensions::new();
        extensions.insert(
            ExtensionId::ContentData,
            ExtensionState::ContentData {
                content: params.content_data.clone(),
            },
        );
        let fee = &params.payment_network.parameters;
        extensions.insert(
            ExtensionId::Erc20FeeProxyContract,
            ExtensionState::PaymentNetwork {
                network: PaymentNetworkKind::Erc20FeeProxyContract,
                values: PaymentNetworkValues {
                    payment_address: fee.payment_address.clone(),
                    fee_address: Some(fee.fee_address.clone()),
                    fee_amount: Some(fee.fee_amount.clone()),
                    salt,
                    refund_address: None,
                },
            },
        );

        let info = &params.request_info;
        let data = RequestData {
            request_id: request_id.clone(),
            creator: params.signer.clone(),
            currency: info.currency.clone(),
            expected_amount: info.expected_amount.clone(),
            payee: info.payee.clone(),
            payer: info.payer.clone(),
            timestamp: info.timestamp,
            state: RequestState::Pending,
            extensions,
        };

        Ok(PendingRequest {
            transaction_hash: format!("01{:064x}", n << 8),
            request_id,
            data,
        })
    }

    async fn wait_for_confirmation(
        &self,
        pending: &PendingRequest,
        options: ConfirmationOptions,
    ) -> InvoiceResult<RequestData> {
        self.check_available()?;

        if self.stall_confirmation {
            return tokio::select! {
                _ = options.cancel.cancelled() => Err(InvoiceError::ConfirmationCancelled {
                    request_id: pending.request_id.clone(),
                }),
                _ = tokio::time::sleep(options.timeout) => Err(InvoiceError::ConfirmationTimeout {
                    request_id: pending.request_id.clone(),
                    timeout: options.timeout,
                }),
            };
        }

        let mut data = pending.data.clone();
        data.state = RequestState::Created;
        self.insert(data.clone());
        Ok(data)
    }

    async fn fetch_request(&self, request_id: &str) -> InvoiceResult<Option<RequestData>> {
        self.check_available()?;
        Ok(self.requests.lock().unwrap().get(request_id).cloned())
    }

    fn client_name(&self) -> &'static str {
        "in-memory"
    }
}
