//! # Payment Resolution
//!
//! Derives what a payer submits to the fee-proxy contract to settle a
//! request: the payment reference and the ABI-encoded payment payload.
//!
//! Both are computed over the same ordered tuple
//! `(string requestId, string salt, address payer, uint256 amount)`:
//!
//! ```text
//! paymentReference = keccak256(abi.encodePacked(requestId, salt, payer, amount))
//! paymentData      = abi.encode(requestId, salt, payer, amount)
//! ```

use crate::error::{InvoiceError, InvoiceResult};
use crate::extension::PaymentNetworkKind;
use crate::network::NetworkConfig;
use crate::request::RequestData;
use alloy_primitives::{hex, keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// The four values a payment commits to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCommitment {
    pub request_id: String,
    pub salt: String,
    pub payer: Address,
    pub amount: U256,
}

impl PaymentCommitment {
    /// Parse payer address and decimal amount
    pub fn parse(
        request_id: impl Into<String>,
        salt: impl Into<String>,
        payer_address: &str,
        expected_amount: &str,
    ) -> InvoiceResult<Self> {
        let payer = parse_payer(payer_address)?;

        let amount = U256::from_str_radix(expected_amount, 10).map_err(|e| {
            InvoiceError::Encoding(format!("invalid amount {:?}: {}", expected_amount, e))
        })?;

        Ok(Self {
            request_id: request_id.into(),
            salt: salt.into(),
            payer,
            amount,
        })
    }

    fn as_tuple(&self) -> (String, String, Address, U256) {
        (
            self.request_id.clone(),
            self.salt.clone(),
            self.payer,
            self.amount,
        )
    }

    /// keccak256 over the tightly packed tuple
    pub fn payment_reference(&self) -> B256 {
        keccak256(self.as_tuple().abi_encode_packed())
    }

    /// Standard ABI parameter encoding of the tuple
    pub fn payment_data(&self) -> Vec<u8> {
        self.as_tuple().abi_encode_params()
    }
}

/// Single-case hex is taken as is; mixed case must carry a valid EIP-55 checksum
fn parse_payer(payer_address: &str) -> InvoiceResult<Address> {
    let address = payer_address.trim();
    let digits = address.strip_prefix("0x").unwrap_or(address);
    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());

    let parsed = if mixed_case {
        Address::parse_checksummed(address, None).map_err(|e| e.to_string())
    } else {
        address.parse::<Address>().map_err(|e| e.to_string())
    };

    parsed.map_err(|e| {
        InvoiceError::Encoding(format!("invalid payer address {:?}: {}", payer_address, e))
    })
}

/// Response body of a successful payment resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstructions {
    pub token_address: String,
    pub payment_proxy_address: String,
    pub expected_amount: String,
    /// `0x`-prefixed 32-byte digest
    pub payment_reference: String,
    /// `0x`-prefixed ABI payload
    pub payment_data: String,
}

/// Compute payment instructions for `payer_address` against a fetched request.
///
/// Fails when the request has no ERC20 fee-proxy extension, or when the
/// payer address or the request amount cannot be encoded.
pub fn resolve_payment(
    request: &RequestData,
    payer_address: &str,
    network: &NetworkConfig,
) -> InvoiceResult<PaymentInstructions> {
    let kind = PaymentNetworkKind::Erc20FeeProxyContract;
    let values = request.extensions.payment_network(kind).ok_or_else(|| {
        InvoiceError::PaymentNetworkMissing {
            request_id: request.request_id.clone(),
            payment_network: kind.to_string(),
        }
    })?;

    let commitment = PaymentCommitment::parse(
        &request.request_id,
        &values.salt,
        payer_address,
        &request.expected_amount,
    )?;

    Ok(PaymentInstructions {
        token_address: network.token_address_string(),
        payment_proxy_address: network.fee_proxy_address_string(),
        expected_amount: request.expected_amount.clone(),
        payment_reference: hex::encode_prefixed(commitment.payment_reference()),
        payment_data: hex::encode_prefixed(commitment.payment_data()),
    })
}
