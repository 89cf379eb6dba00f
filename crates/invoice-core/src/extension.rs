//! # Request Extensions
//!
//! Typed view over the extensions attached to a request.
//! Lookups go through [`ExtensionId`] / [`PaymentNetworkKind`] and return
//! `Option`, never a dynamic property probe.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Known extension identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtensionId {
    #[serde(rename = "content-data")]
    ContentData,
    #[serde(rename = "pn-erc20-fee-proxy-contract")]
    Erc20FeeProxyContract,
    #[serde(rename = "pn-erc20-proxy-contract")]
    Erc20ProxyContract,
    #[serde(rename = "pn-eth-input-data")]
    EthInputData,
}

impl ExtensionId {
    /// Wire identifier of this extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionId::ContentData => "content-data",
            ExtensionId::Erc20FeeProxyContract => "pn-erc20-fee-proxy-contract",
            ExtensionId::Erc20ProxyContract => "pn-erc20-proxy-contract",
            ExtensionId::EthInputData => "pn-eth-input-data",
        }
    }

    /// Protocol version this crate writes for the extension's create action
    pub fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl std::fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content-data" => Ok(ExtensionId::ContentData),
            "pn-erc20-fee-proxy-contract" => Ok(ExtensionId::Erc20FeeProxyContract),
            "pn-erc20-proxy-contract" => Ok(ExtensionId::Erc20ProxyContract),
            "pn-eth-input-data" => Ok(ExtensionId::EthInputData),
            other => Err(format!("unknown extension: {}", other)),
        }
    }
}

/// Payment-network subset of the known extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentNetworkKind {
    #[serde(rename = "pn-erc20-fee-proxy-contract")]
    Erc20FeeProxyContract,
    #[serde(rename = "pn-erc20-proxy-contract")]
    Erc20ProxyContract,
    #[serde(rename = "pn-eth-input-data")]
    EthInputData,
}

impl PaymentNetworkKind {
    pub fn extension_id(&self) -> ExtensionId {
        match self {
            PaymentNetworkKind::Erc20FeeProxyContract => ExtensionId::Erc20FeeProxyContract,
            PaymentNetworkKind::Erc20ProxyContract => ExtensionId::Erc20ProxyContract,
            PaymentNetworkKind::EthInputData => ExtensionId::EthInputData,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.extension_id().as_str()
    }
}

impl From<PaymentNetworkKind> for ExtensionId {
    fn from(kind: PaymentNetworkKind) -> Self {
        kind.extension_id()
    }
}

impl std::fmt::Display for PaymentNetworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of a payment-network extension once the request is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNetworkValues {
    /// Address receiving the payment
    pub payment_address: String,

    /// Address receiving the fee (fee-proxy only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_address: Option<String>,

    /// Fee in smallest token units (fee-proxy only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<String>,

    /// Per-request random salt assigned at creation
    pub salt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_address: Option<String>,
}

/// State of a single extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtensionState {
    /// Free-form content attached to the request
    ContentData { content: serde_json::Value },
    /// Settlement configuration
    PaymentNetwork {
        network: PaymentNetworkKind,
        values: PaymentNetworkValues,
    },
}

/// All extensions of a request, keyed by identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions(BTreeMap<ExtensionId, ExtensionState>);

impl Extensions {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or replace an extension state
    pub fn insert(&mut self, id: ExtensionId, state: ExtensionState) {
        self.0.insert(id, state);
    }

    /// Look up the values of a payment network, if the request has it
    pub fn payment_network(&self, kind: PaymentNetworkKind) -> Option<&PaymentNetworkValues> {
        match self.0.get(&kind.extension_id()) {
            Some(ExtensionState::PaymentNetwork { network, values }) if *network == kind => {
                Some(values)
            }
            _ => None,
        }
    }

    /// Content attached through the content-data extension
    pub fn content_data(&self) -> Option<&serde_json::Value> {
        match self.0.get(&ExtensionId::ContentData) {
            Some(ExtensionState::ContentData { content }) => Some(content),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
