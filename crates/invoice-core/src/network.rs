//! # Network Configuration
//!
//! Chain-side constants: settlement network name, token and fee-proxy
//! contract addresses. Defaults target Sepolia; a deployment may override
//! them from `config/network.toml`.

use crate::error::{InvoiceError, InvoiceResult};
use alloy_primitives::{address, Address};
use serde::Deserialize;

/// FAU test token on Sepolia
pub const SEPOLIA_FAU_TOKEN: Address = address!("0x370DE27fdb7D1Ff1e1BaA7D11c5820a324Cf623C");

/// ERC20 fee-proxy contract on Sepolia
pub const SEPOLIA_ERC20_FEE_PROXY: Address = address!("0x399F5EE127ce7432E4921a61b8CF52b0af52cbfE");

/// Settlement network configuration, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network name as the gateway knows it (e.g. "sepolia")
    pub name: String,
    /// ERC20 token invoices are denominated in
    pub token_address: Address,
    /// Fee-proxy contract payers submit payments to
    pub fee_proxy_address: Address,
}

impl NetworkConfig {
    /// Sepolia test network constants
    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".to_string(),
            token_address: SEPOLIA_FAU_TOKEN,
            fee_proxy_address: SEPOLIA_ERC20_FEE_PROXY,
        }
    }

    /// Parse a TOML document; missing keys keep their Sepolia defaults
    pub fn from_toml_str(content: &str) -> InvoiceResult<Self> {
        let config: NetworkConfig = toml::from_str(content)
            .map_err(|e| InvoiceError::Configuration(format!("Invalid network config: {}", e)))?;

        if config.name.trim().is_empty() {
            return Err(InvoiceError::Configuration(
                "network name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Checksummed token address
    pub fn token_address_string(&self) -> String {
        self.token_address.to_checksum(None)
    }

    /// Checksummed fee-proxy address
    pub fn fee_proxy_address_string(&self) -> String {
        self.fee_proxy_address.to_checksum(None)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sepolia_constants() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.name, "sepolia");
        assert_eq!(
            config.token_address_string(),
            "0x370DE27fdb7D1Ff1e1BaA7D11c5820a324Cf623C"
        );
        assert_eq!(
            config.fee_proxy_address_string(),
            "0x399F5EE127ce7432E4921a61b8CF52b0af52cbfE"
        );
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = NetworkConfig::from_toml_str(
            r#"
name = "mainnet"
token_address = "0x6B175474E89094C44Da98b954EedeAC495271d0F"
"#,
        )
        .unwrap();

        assert_eq!(config.name, "mainnet");
        assert_eq!(
            config.token_address_string(),
            "0x6B175474E89094C44Da98b954EedeAC495271d0F"
        );
        assert_eq!(config.fee_proxy_address, SEPOLIA_ERC20_FEE_PROXY);
    }

    #[test]
    fn test_from_toml_rejects_bad_address() {
        let result = NetworkConfig::from_toml_str(r#"token_address = "0x1234""#);
        assert!(matches!(result, Err(InvoiceError::Configuration(_))));
    }

    #[test]
    fn test_from_toml_rejects_empty_name() {
        let result = NetworkConfig::from_toml_str(r#"name = """#);
        assert!(result.is_err());
    }
}
