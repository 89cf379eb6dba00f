//! # Request Types
//!
//! Payment request types shared by the API and the gateway client.
//! Field names follow the gateway's camelCase JSON.

use crate::extension::{Extensions, PaymentNetworkKind};
use serde::{Deserialize, Serialize};

/// Identity kinds understood by the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityType {
    #[serde(rename = "ethereumAddress")]
    EthereumAddress,
}

/// A party of a request (payee, payer, signer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub value: String,
}

impl Identity {
    /// Identity for an EVM address
    pub fn ethereum(address: impl Into<String>) -> Self {
        Self {
            identity_type: IdentityType::EthereumAddress,
            value: address.into(),
        }
    }

    /// Case-insensitive address comparison
    pub fn same_address(&self, other: &Identity) -> bool {
        self.identity_type == other.identity_type
            && self.value.eq_ignore_ascii_case(&other.value)
    }
}

/// Currency kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyType {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ISO4217")]
    Iso4217,
}

/// Currency a request is denominated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRef {
    #[serde(rename = "type")]
    pub currency_type: CurrencyType,
    /// Token contract address for ERC20, symbol otherwise
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl CurrencyRef {
    pub fn erc20(token_address: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            currency_type: CurrencyType::Erc20,
            value: token_address.into(),
            network: Some(network.into()),
        }
    }
}

/// Core information of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub currency: CurrencyRef,
    /// Amount in the token's smallest unit, decimal string
    pub expected_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Identity>,
    /// Creation time, seconds since the epoch
    pub timestamp: u64,
}

/// Creation parameters of the ERC20 fee-proxy payment network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeProxyParameters {
    pub payment_address: String,
    pub fee_address: String,
    pub fee_amount: String,
}

/// Payment network to attach at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNetworkParameters {
    pub id: PaymentNetworkKind,
    pub parameters: FeeProxyParameters,
}

/// Everything the client needs to create a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestParameters {
    pub request_info: RequestInfo,
    pub payment_network: PaymentNetworkParameters,
    pub content_data: serde_json::Value,
    pub signer: Identity,
}

/// Lifecycle state of a request as seen by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    /// Persisted, not yet confirmed
    Pending,
    /// Confirmed by the network
    Created,
}

/// A request as known to the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub request_id: String,
    /// Identity that signed the create action
    pub creator: Identity,
    pub currency: CurrencyRef,
    pub expected_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Identity>,
    pub timestamp: u64,
    pub state: RequestState,
    #[serde(default)]
    pub extensions: Extensions,
}

impl RequestData {
    /// Content attached through the content-data extension
    pub fn content_data(&self) -> Option<&serde_json::Value> {
        self.extensions.content_data()
    }
}

/// A request that has been submitted but not yet confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: String,
    /// Hash the gateway reports confirmation under
    pub transaction_hash: String,
    /// Request data as submitted
    pub data: RequestData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_wire_format() {
        let identity = Identity::ethereum("0x627306090abaB3A6e1400e9345bC60c78a8BEf57");
        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(
            value,
            json!({ "type": "ethereumAddress", "value": "0x627306090abaB3A6e1400e9345bC60c78a8BEf57" })
        );
    }

    #[test]
    fn test_same_address_ignores_case() {
        let a = Identity::ethereum("0x627306090abaB3A6e1400e9345bC60c78a8BEf57");
        let b = Identity::ethereum("0x627306090abab3a6e1400e9345bc60c78a8bef57");
        assert!(a.same_address(&b));
    }

    #[test]
    fn test_request_info_wire_format() {
        let info = RequestInfo {
            currency: CurrencyRef::erc20("0x370DE27fdb7D1Ff1e1BaA7D11c5820a324Cf623C", "sepolia"),
            expected_amount: "1000000000000000000".to_string(),
            payee: None,
            payer: Some(Identity::ethereum("0x0000000000000000000000000000000000000001")),
            timestamp: 1_700_000_000,
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["currency"]["type"], "ERC20");
        assert_eq!(value["currency"]["network"], "sepolia");
        assert_eq!(value["expectedAmount"], "1000000000000000000");
        assert!(value.get("payee").is_none());
    }
}
