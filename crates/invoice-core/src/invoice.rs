//! # Invoice Creation
//!
//! Turns a payer/reason/due-date draft into the parameters of a
//! fee-proxy ERC20 request, and shapes the confirmed request into the
//! receipt returned to the caller.

use crate::error::{InvoiceError, InvoiceResult};
use crate::extension::PaymentNetworkKind;
use crate::network::NetworkConfig;
use crate::request::{
    CreateRequestParameters, CurrencyRef, FeeProxyParameters, Identity, PaymentNetworkParameters,
    RequestData, RequestInfo,
};
use serde::{Deserialize, Serialize};

/// Amount of every invoice: one whole token (18 decimals)
pub const INVOICE_EXPECTED_AMOUNT: &str = "1000000000000000000";

/// Fee recipient; the fee is always zero
pub const FEE_RECIPIENT: &str = "0x0000000000000000000000000000000000000000";

pub const FEE_AMOUNT: &str = "0";

/// Caller-supplied invoice fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    /// Payer wallet address (not validated here)
    pub address: String,
    pub reason: String,
    pub due_date: String,
}

impl InvoiceDraft {
    pub fn new(
        address: impl Into<String>,
        reason: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            reason: reason.into(),
            due_date: due_date.into(),
        }
    }

    /// Content attached to the request through the content-data extension
    pub fn content_data(&self) -> serde_json::Value {
        serde_json::json!({
            "reason": self.reason,
            "dueDate": self.due_date,
        })
    }

    /// Build the request parameters for this draft.
    ///
    /// The payee receives the payment and signs the request; the payer is
    /// the draft's address.
    pub fn into_create_parameters(
        self,
        payee: &Identity,
        network: &NetworkConfig,
        timestamp: u64,
    ) -> CreateRequestParameters {
        let content_data = self.content_data();

        CreateRequestParameters {
            request_info: RequestInfo {
                currency: CurrencyRef::erc20(network.token_address_string(), &network.name),
                expected_amount: INVOICE_EXPECTED_AMOUNT.to_string(),
                payee: Some(payee.clone()),
                payer: Some(Identity::ethereum(self.address)),
                timestamp,
            },
            payment_network: PaymentNetworkParameters {
                id: PaymentNetworkKind::Erc20FeeProxyContract,
                parameters: FeeProxyParameters {
                    payment_address: payee.value.clone(),
                    fee_address: FEE_RECIPIENT.to_string(),
                    fee_amount: FEE_AMOUNT.to_string(),
                },
            },
            content_data,
            signer: payee.clone(),
        }
    }
}

/// Response body of a successful invoice creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceReceipt {
    pub request_id: String,
    pub payee_identity: String,
    pub expected_amount: String,
    pub content_data: serde_json::Value,
}

impl InvoiceReceipt {
    /// Build from the confirmed request and the amount that was requested
    pub fn from_confirmed(data: &RequestData, expected_amount: &str) -> InvoiceResult<Self> {
        if data.request_id.is_empty() {
            return Err(InvoiceError::Internal(
                "Confirmed request has no identifier".to_string(),
            ));
        }

        Ok(Self {
            request_id: data.request_id.clone(),
            payee_identity: data.creator.value.clone(),
            expected_amount: expected_amount.to_string(),
            content_data: data
                .content_data()
                .cloned()
                .unwrap_or(serde_json::Value::Null),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{ExtensionId, ExtensionState, Extensions};
    use crate::request::{CurrencyType, RequestState};

    const PAYEE: &str = "0x627306090abaB3A6e1400e9345bC60c78a8BEf57";
    const PAYER: &str = "0xf17f52151EbEF6C7334FAD080c5704D77216b732";

    fn draft() -> InvoiceDraft {
        InvoiceDraft::new(PAYER, "Invoice #1", "2025-01-01")
    }

    #[test]
    fn test_create_parameters() {
        let payee = Identity::ethereum(PAYEE);
        let params = draft().into_create_parameters(&payee, &NetworkConfig::sepolia(), 1_700_000_000);

        let info = &params.request_info;
        assert_eq!(info.currency.currency_type, CurrencyType::Erc20);
        assert_eq!(info.currency.value, "0x370DE27fdb7D1Ff1e1BaA7D11c5820a324Cf623C");
        assert_eq!(info.currency.network.as_deref(), Some("sepolia"));
        assert_eq!(info.expected_amount, "1000000000000000000");
        assert_eq!(info.payee.as_ref().unwrap().value, PAYEE);
        assert_eq!(info.payer.as_ref().unwrap().value, PAYER);
        assert_eq!(info.timestamp, 1_700_000_000);

        assert_eq!(
            params.payment_network.id,
            PaymentNetworkKind::Erc20FeeProxyContract
        );
        assert_eq!(params.payment_network.parameters.payment_address, PAYEE);
        assert_eq!(params.payment_network.parameters.fee_address, FEE_RECIPIENT);
        assert_eq!(params.payment_network.parameters.fee_amount, "0");

        assert_eq!(params.signer, payee);
        assert_eq!(params.content_data["reason"], "Invoice #1");
        assert_eq!(params.content_data["dueDate"], "2025-01-01");
    }

    #[test]
    fn test_receipt_from_confirmed() {
        let mut extensions = Extensions::new();
        extensions.insert(
            ExtensionId::ContentData,
            ExtensionState::ContentData {
                content: draft().content_data(),
            },
        );

        let data = RequestData {
            request_id: "01a1b2c3".to_string(),
            creator: Identity::ethereum(PAYEE),
            currency: CurrencyRef::erc20("0x370DE27fdb7D1Ff1e1BaA7D11c5820a324Cf623C", "sepolia"),
            expected_amount: INVOICE_EXPECTED_AMOUNT.to_string(),
            payee: Some(Identity::ethereum(PAYEE)),
            payer: Some(Identity::ethereum(PAYER)),
            timestamp: 1_700_000_000,
            state: RequestState::Created,
            extensions,
        };

        let receipt = InvoiceReceipt::from_confirmed(&data, INVOICE_EXPECTED_AMOUNT).unwrap();
        assert_eq!(receipt.request_id, "01a1b2c3");
        assert_eq!(receipt.payee_identity, PAYEE);
        assert_eq!(receipt.expected_amount, "1000000000000000000");
        assert_eq!(receipt.content_data["dueDate"], "2025-01-01");

        let body = serde_json::to_value(&receipt).unwrap();
        assert!(body.get("requestId").is_some());
        assert!(body.get("payeeIdentity").is_some());
    }
}
