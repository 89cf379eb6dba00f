//! # Payee Signer
//!
//! ECDSA signing with the payee's private key, and signer recovery for
//! actions read back from the gateway.

use crate::config::GatewayConfig;
use alloy_primitives::{hex, Address, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use invoice_core::{Identity, InvoiceError, InvoiceResult};

/// Local private-key signer of the payee
#[derive(Clone)]
pub struct PayeeSigner {
    inner: PrivateKeySigner,
}

impl PayeeSigner {
    /// Parse a hex key (with or without `0x`)
    pub fn from_hex(private_key: &str) -> InvoiceResult<Self> {
        let inner = private_key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| InvoiceError::Configuration(format!("Invalid payee private key: {}", e)))?;
        Ok(Self { inner })
    }

    pub fn from_config(config: &GatewayConfig) -> InvoiceResult<Self> {
        Self::from_hex(&config.private_key)
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Payee identity with a checksummed address
    pub fn identity(&self) -> Identity {
        Identity::ethereum(self.address().to_checksum(None))
    }

    /// Sign a 32-byte digest, returning `0x` + r || s || v
    pub fn sign_hash(&self, hash: &B256) -> InvoiceResult<String> {
        let signature = self
            .inner
            .sign_hash_sync(hash)
            .map_err(|e| InvoiceError::Signing(e.to_string()))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

impl std::fmt::Debug for PayeeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayeeSigner")
            .field("address", &self.address())
            .finish()
    }
}

/// Recover the address that produced `signature` over `hash`
pub fn recover_signer(hash: &B256, signature: &str) -> InvoiceResult<Address> {
    let bytes = hex::decode(signature.strip_prefix("0x").unwrap_or(signature))
        .map_err(|e| InvoiceError::Signing(format!("signature is not hex: {}", e)))?;

    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| InvoiceError::Signing(format!("malformed signature: {}", e)))?;

    signature
        .recover_address_from_prehash(hash)
        .map_err(|e| InvoiceError::Signing(format!("signature recovery failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    // Well-known development key (ganache account #0)
    const KEY: &str = "0xc87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";
    const ADDRESS: &str = "0x627306090abaB3A6e1400e9345bC60c78a8BEf57";

    #[test]
    fn test_identity_from_key() {
        let signer = PayeeSigner::from_hex(KEY).unwrap();
        assert_eq!(signer.identity().value, ADDRESS);

        let without_prefix = PayeeSigner::from_hex(&KEY[2..]).unwrap();
        assert_eq!(without_prefix.address(), signer.address());
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(
            PayeeSigner::from_hex("0xnotakey"),
            Err(InvoiceError::Configuration(_))
        ));
    }

    #[test]
    fn test_sign_and_recover() {
        let signer = PayeeSigner::from_hex(KEY).unwrap();
        let hash = keccak256(b"request");

        let signature = signer.sign_hash(&hash).unwrap();
        assert_eq!(signature.len(), 2 + 65 * 2);

        let recovered = recover_signer(&hash, &signature).unwrap();
        assert_eq!(recovered, signer.address());

        // Different digest recovers a different address
        let other = recover_signer(&keccak256(b"other"), &signature).unwrap();
        assert_ne!(other, signer.address());
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = PayeeSigner::from_hex(KEY).unwrap();
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains(&KEY[2..]));
    }
}
