//! # Request Network Client
//!
//! `RequestClient` implementation over a Request Network gateway (request
//! node HTTP API). Requests are signed locally with the payee key and
//! persisted as the first transaction of a channel named after the request
//! identifier.

use crate::action::{
    generate_salt, identity_topics, multi_format, normalize_keccak256, SignedAction, StoredAction,
};
use crate::config::GatewayConfig;
use crate::signer::PayeeSigner;
use async_trait::async_trait;
use invoice_core::{
    ConfirmationOptions, CreateRequestParameters, Identity, InvoiceError, InvoiceResult,
    PendingRequest, RequestClient, RequestData, RequestState,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Gateway-backed request client
pub struct RequestNetworkClient {
    config: GatewayConfig,
    client: Client,
    signer: PayeeSigner,
}

impl RequestNetworkClient {
    /// Create a new client; fails on an invalid key
    pub fn new(config: GatewayConfig) -> InvoiceResult<Self> {
        config.validate()?;
        let signer = PayeeSigner::from_config(&config)?;

        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| InvoiceError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            signer,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> InvoiceResult<Self> {
        let config = GatewayConfig::from_env()?;
        Self::new(config)
    }

    /// Identity every request is created and signed by
    pub fn payee_identity(&self) -> Identity {
        self.signer.identity()
    }

    async fn persist_transaction(
        &self,
        channel_id: &str,
        topics: Vec<String>,
        data: String,
    ) -> InvoiceResult<()> {
        let body = PersistTransactionRequest {
            channel_id: channel_id.to_string(),
            topics,
            transaction_data: TransactionData { data: Some(data) },
        };

        let response = self
            .client
            .post(self.config.endpoint("persistTransaction"))
            .json(&body)
            .send()
            .await
            .map_err(|e| InvoiceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gateway rejected transaction: status={}, body={}", status, body);
            return Err(gateway_error(status, &body));
        }

        Ok(())
    }

    /// `true` once the gateway reports the transaction as confirmed
    async fn is_confirmed(&self, transaction_hash: &str) -> InvoiceResult<bool> {
        let response = self
            .client
            .get(self.config.endpoint("getConfirmedTransaction"))
            .query(&[("transactionHash", transaction_hash)])
            .send()
            .await
            .map_err(|e| InvoiceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(gateway_error(status, &body));
        }

        Ok(true)
    }

    async fn poll_confirmation(&self, transaction_hash: &str) -> InvoiceResult<()> {
        loop {
            if self.is_confirmed(transaction_hash).await? {
                return Ok(());
            }
            debug!("Transaction {} not confirmed yet", transaction_hash);
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn channel_transactions(&self, channel_id: &str) -> InvoiceResult<Vec<ChannelTransaction>> {
        let response = self
            .client
            .get(self.config.endpoint("getTransactionsByChannelId"))
            .query(&[("channelId", channel_id)])
            .send()
            .await
            .map_err(|e| InvoiceError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InvoiceError::NetworkError(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            error!("Gateway error fetching channel: status={}, body={}", status, body);
            return Err(gateway_error(status, &body));
        }

        let parsed: ChannelResponse = serde_json::from_str(&body).map_err(|e| {
            InvoiceError::Serialization(format!("Failed to parse gateway response: {}", e))
        })?;

        Ok(parsed.result.transactions)
    }
}

#[async_trait]
impl RequestClient for RequestNetworkClient {
    #[instrument(skip(self, params))]
    async fn create_request(&self, params: &CreateRequestParameters) -> InvoiceResult<PendingRequest> {
        let salt = generate_salt();
        let action = SignedAction::create(params, &salt, &self.signer)?;
        let request_id = action.request_id()?;

        let data = action.to_transaction_data()?;
        let transaction_hash =
            multi_format(&normalize_keccak256(&serde_json::json!({ "data": data })));
        let topics = identity_topics(params)?;

        debug!(
            "Persisting request {}: {} topics, tx={}",
            request_id,
            topics.len(),
            transaction_hash
        );

        self.persist_transaction(&request_id, topics, data).await?;

        info!("Persisted request {}", request_id);

        let data = action.into_request_data(&request_id, RequestState::Pending)?;

        Ok(PendingRequest {
            request_id,
            transaction_hash,
            data,
        })
    }

    #[instrument(skip(self, pending, options), fields(request_id = %pending.request_id))]
    async fn wait_for_confirmation(
        &self,
        pending: &PendingRequest,
        options: ConfirmationOptions,
    ) -> InvoiceResult<RequestData> {
        let outcome = tokio::select! {
            biased;
            _ = options.cancel.cancelled() => {
                return Err(InvoiceError::ConfirmationCancelled {
                    request_id: pending.request_id.clone(),
                });
            }
            outcome = tokio::time::timeout(
                options.timeout,
                self.poll_confirmation(&pending.transaction_hash),
            ) => outcome,
        };

        match outcome {
            Ok(Ok(())) => {
                info!("Request {} confirmed", pending.request_id);
                let mut data = pending.data.clone();
                data.state = RequestState::Created;
                Ok(data)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(InvoiceError::ConfirmationTimeout {
                request_id: pending.request_id.clone(),
                timeout: options.timeout,
            }),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_request(&self, request_id: &str) -> InvoiceResult<Option<RequestData>> {
        // Channels are named by the bare lowercase identifier
        let request_id = request_id.trim_start_matches("0x").to_lowercase();
        let request_id = request_id.as_str();
        let transactions = self.channel_transactions(request_id).await?;

        let Some(first) = transactions.into_iter().next() else {
            debug!("No transactions in channel {}", request_id);
            return Ok(None);
        };

        let data = first.transaction.data.ok_or_else(|| {
            InvoiceError::Serialization("Channel transaction carries no clear data".to_string())
        })?;

        let action = StoredAction::from_transaction_data(&data)?;
        if action.request_id() != request_id {
            return Err(InvoiceError::Serialization(format!(
                "Channel {} does not start with its create action",
                request_id
            )));
        }

        let state = match first.state.as_deref() {
            Some("pending") => RequestState::Pending,
            _ => RequestState::Created,
        };

        action.into_request_data(request_id, state).map(Some)
    }

    fn client_name(&self) -> &'static str {
        "request-network"
    }
}

fn gateway_error(status: StatusCode, body: &str) -> InvoiceError {
    let message = serde_json::from_str::<GatewayErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    InvoiceError::GatewayError {
        status: status.as_u16(),
        message,
    }
}

// =============================================================================
// Gateway API Types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistTransactionRequest {
    channel_id: String,
    topics: Vec<String>,
    transaction_data: TransactionData,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    result: ChannelResult,
}

#[derive(Debug, Deserialize)]
struct ChannelResult {
    #[serde(default)]
    transactions: Vec<ChannelTransaction>,
}

#[derive(Debug, Deserialize)]
struct ChannelTransaction {
    #[serde(default)]
    state: Option<String>,
    transaction: TransactionData,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    #[serde(default)]
    message: Option<String>,
}
