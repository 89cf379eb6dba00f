//! # Request Actions
//!
//! Signed create actions as stored on the network, their hashing rules, and
//! the reduction of a stored create action back into [`RequestData`].
//!
//! Hashing follows the network's normalization: object keys are sorted
//! recursively, the JSON text is lowercased, then hashed with keccak256.
//! Identifiers are multi-format serialized as `"01" + hex(hash)`.

use crate::signer::{recover_signer, PayeeSigner};
use alloy_primitives::{hex, keccak256, B256};
use invoice_core::{
    CreateRequestParameters, CurrencyRef, ExtensionId, ExtensionState, Extensions, Identity,
    InvoiceError, InvoiceResult, PaymentNetworkKind, PaymentNetworkValues, RequestData,
    RequestState,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Request-logic version written into create actions
pub const REQUEST_LOGIC_VERSION: &str = "2.0.3";

/// Multi-format prefix of a keccak256 hash
const KECCAK256_PREFIX: &str = "01";

const CREATE: &str = "create";

/// Problems found while decoding a stored action
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("malformed transaction: {0}")]
    Malformed(String),
}

impl From<ActionError> for InvoiceError {
    fn from(err: ActionError) -> Self {
        InvoiceError::Serialization(err.to_string())
    }
}

// =============================================================================
// Hashing
// =============================================================================

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Canonical text of a JSON value: sorted keys, lowercased
pub fn normalize(value: &Value) -> String {
    sort_keys(value).to_string().to_lowercase()
}

pub fn normalize_keccak256(value: &Value) -> B256 {
    keccak256(normalize(value).as_bytes())
}

/// `"01"` + hex digest
pub fn multi_format(hash: &B256) -> String {
    format!("{}{}", KECCAK256_PREFIX, hex::encode(hash))
}

/// Fresh 8-byte hex salt for a payment network
pub fn generate_salt() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

// =============================================================================
// Action Types
// =============================================================================

/// An extension's contribution to an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionAction {
    pub action: String,
    pub id: String,
    pub parameters: Value,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionParameters {
    pub currency: CurrencyRef,
    pub expected_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Identity>,
    pub timestamp: u64,
    #[serde(default)]
    pub extensions_data: Vec<ExtensionAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub parameters: CreateActionParameters,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureData {
    pub method: String,
    pub value: String,
}

/// Signed action as persisted in a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedAction {
    pub data: ActionData,
    pub signature: SignatureData,
}

impl SignedAction {
    /// Build and sign the create action for `params`.
    ///
    /// `salt` is attached to the payment-network extension. The declared
    /// signer must be the key holder.
    pub fn create(
        params: &CreateRequestParameters,
        salt: &str,
        signer: &PayeeSigner,
    ) -> InvoiceResult<Self> {
        if !params.signer.same_address(&signer.identity()) {
            return Err(InvoiceError::Signing(format!(
                "declared signer {} does not match key holder {}",
                params.signer.value,
                signer.identity().value
            )));
        }

        let content_data = ExtensionAction {
            action: CREATE.to_string(),
            id: ExtensionId::ContentData.as_str().to_string(),
            parameters: serde_json::json!({ "content": params.content_data }),
            version: ExtensionId::ContentData.version().to_string(),
        };

        let network_id = ExtensionId::from(params.payment_network.id);
        let fee = &params.payment_network.parameters;
        let payment_network = ExtensionAction {
            action: CREATE.to_string(),
            id: network_id.as_str().to_string(),
            parameters: serde_json::json!({
                "paymentAddress": fee.payment_address,
                "feeAddress": fee.fee_address,
                "feeAmount": fee.fee_amount,
                "salt": salt,
            }),
            version: network_id.version().to_string(),
        };

        let info = &params.request_info;
        let data = ActionData {
            name: CREATE.to_string(),
            parameters: CreateActionParameters {
                currency: info.currency.clone(),
                expected_amount: info.expected_amount.clone(),
                payee: info.payee.clone(),
                payer: info.payer.clone(),
                timestamp: info.timestamp,
                extensions_data: vec![content_data, payment_network],
            },
            version: REQUEST_LOGIC_VERSION.to_string(),
        };

        let hash = normalize_keccak256(&serde_json::to_value(&data)?);
        let value = signer.sign_hash(&hash)?;

        Ok(Self {
            data,
            signature: SignatureData {
                method: "ecdsa".to_string(),
                value,
            },
        })
    }

    /// Identifier of the request this action creates
    pub fn request_id(&self) -> InvoiceResult<String> {
        Ok(multi_format(&normalize_keccak256(&serde_json::to_value(self)?)))
    }

    /// JSON text stored as the transaction's data
    pub fn to_transaction_data(&self) -> InvoiceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reduce an action this service just signed into request data
    pub fn into_request_data(self, request_id: &str, state: RequestState) -> InvoiceResult<RequestData> {
        let hash = normalize_keccak256(&serde_json::to_value(&self.data)?);
        self.reduce(request_id, &hash, state)
    }

    /// The creator is recovered from the signature over `data_hash`; unknown
    /// or malformed extensions are skipped.
    fn reduce(self, request_id: &str, data_hash: &B256, state: RequestState) -> InvoiceResult<RequestData> {
        if self.data.name != CREATE {
            return Err(ActionError::UnsupportedAction(self.data.name).into());
        }

        let creator = recover_signer(data_hash, &self.signature.value)?;

        let params = self.data.parameters;
        let extensions = reduce_extensions(request_id, params.extensions_data);

        Ok(RequestData {
            request_id: request_id.to_string(),
            creator: Identity::ethereum(creator.to_checksum(None)),
            currency: params.currency,
            expected_amount: params.expected_amount,
            payee: params.payee,
            payer: params.payer,
            timestamp: params.timestamp,
            state,
            extensions,
        })
    }
}

/// A create action read back from a channel.
///
/// Identifier and signature hash are taken over the JSON exactly as stored,
/// so fields the typed action does not model still count.
#[derive(Debug, Clone)]
pub struct StoredAction {
    raw: Value,
    action: SignedAction,
}

impl StoredAction {
    pub fn from_transaction_data(data: &str) -> InvoiceResult<Self> {
        let raw: Value =
            serde_json::from_str(data).map_err(|e| ActionError::Malformed(e.to_string()))?;
        let action = serde_json::from_value(raw.clone())
            .map_err(|e| ActionError::Malformed(e.to_string()))?;
        Ok(Self { raw, action })
    }

    pub fn request_id(&self) -> String {
        multi_format(&normalize_keccak256(&self.raw))
    }

    pub fn action(&self) -> &SignedAction {
        &self.action
    }

    pub fn into_request_data(self, request_id: &str, state: RequestState) -> InvoiceResult<RequestData> {
        let hash = normalize_keccak256(&self.raw["data"]);
        self.action.reduce(request_id, &hash, state)
    }
}

fn reduce_extensions(request_id: &str, actions: Vec<ExtensionAction>) -> Extensions {
    let mut extensions = Extensions::new();

    for action in actions {
        if action.action != CREATE {
            debug!(request_id, extension = %action.id, action = %action.action, "Skipping extension action");
            continue;
        }

        let id = match action.id.parse::<ExtensionId>() {
            Ok(id) => id,
            Err(_) => {
                debug!(request_id, extension = %action.id, "Skipping unknown extension");
                continue;
            }
        };

        let state = match id {
            ExtensionId::ContentData => ExtensionState::ContentData {
                content: action.parameters.get("content").cloned().unwrap_or(Value::Null),
            },
            ExtensionId::Erc20FeeProxyContract
            | ExtensionId::Erc20ProxyContract
            | ExtensionId::EthInputData => {
                let network = payment_network_kind(id);
                match serde_json::from_value::<PaymentNetworkValues>(action.parameters) {
                    Ok(values) => ExtensionState::PaymentNetwork { network, values },
                    Err(e) => {
                        warn!(request_id, extension = %id, "Malformed payment network values: {}", e);
                        continue;
                    }
                }
            }
        };

        extensions.insert(id, state);
    }

    extensions
}

fn payment_network_kind(id: ExtensionId) -> PaymentNetworkKind {
    match id {
        ExtensionId::Erc20ProxyContract => PaymentNetworkKind::Erc20ProxyContract,
        ExtensionId::EthInputData => PaymentNetworkKind::EthInputData,
        _ => PaymentNetworkKind::Erc20FeeProxyContract,
    }
}

/// Topics a create action is indexed under (one per party)
pub fn identity_topics(params: &CreateRequestParameters) -> InvoiceResult<Vec<String>> {
    let info = &params.request_info;
    let mut topics = Vec::new();
    for identity in [info.payee.as_ref(), info.payer.as_ref()].into_iter().flatten() {
        topics.push(multi_format(&normalize_keccak256(&serde_json::to_value(identity)?)));
    }
    Ok(topics)
}
