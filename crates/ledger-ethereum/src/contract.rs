//! Contract client for reaching the AgroSafe contract over RPC
//!
//! Holds connection details and the optional signing key. Providers are not
//! cached: a new one is created for each call.

use crate::config::EthereumLedgerConfig;
use crate::conversions::address_to_string;
use agrosafe_ledger_trait::{ContractAddress, LedgerError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;

/// Contract client that manages connection details
pub struct ContractClient {
    /// RPC URL
    pub rpc_url: String,
    /// Signing key, when writes are allowed
    signer: Option<PrivateKeySigner>,
    /// Configuration
    pub config: EthereumLedgerConfig,
}

impl ContractClient {
    /// Creates a new contract client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the private key is invalid (if provided)
    pub fn new(config: EthereumLedgerConfig) -> Result<Self> {
        let signer = match config.private_key.as_deref() {
            Some(pk) if !pk.is_empty() => Some(pk.parse::<PrivateKeySigner>().map_err(|e| {
                LedgerError::Configuration(format!("Invalid private key: {}", e))
            })?),
            _ => None,
        };

        Ok(Self {
            rpc_url: config.rpc_url.clone(),
            signer,
            config,
        })
    }

    /// Returns the chain ID from configuration
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Checks if the client has a wallet for signing transactions
    pub fn has_wallet(&self) -> bool {
        self.signer.is_some()
    }

    /// Address of the signing key, lowercase hex
    pub fn signer_address(&self) -> Option<String> {
        self.signer
            .as_ref()
            .map(|signer| address_to_string(signer.address()))
    }

    /// Returns the RPC URL
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Alloy address for a resolved contract target
    pub fn contract_address(contract: &ContractAddress) -> Result<Address> {
        Address::from_str(contract.as_str()).map_err(|e| {
            LedgerError::Configuration(format!("Invalid contract address '{}': {}", contract, e))
        })
    }

    /// Create a read-only provider for contract calls
    pub fn create_provider(&self) -> Result<impl Provider> {
        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| LedgerError::Configuration(format!("Invalid RPC URL: {}", e)))?;

        Ok(ProviderBuilder::new().connect_http(rpc_url))
    }

    /// Create a provider with wallet for sending transactions
    ///
    /// # Errors
    ///
    /// Returns `WalletNotConnected` if no private key is configured
    pub fn create_provider_with_signer(&self) -> Result<impl Provider> {
        let signer = self
            .signer
            .clone()
            .ok_or(LedgerError::WalletNotConnected)?;

        let wallet = EthereumWallet::from(signer);

        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| LedgerError::Configuration(format!("Invalid RPC URL: {}", e)))?;

        Ok(ProviderBuilder::new().wallet(wallet).connect_http(rpc_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first default account
    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn test_config() -> EthereumLedgerConfig {
        EthereumLedgerConfig {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            private_key: None,
            abi_path: None,
            confirmation_blocks: 1,
        }
    }

    #[test]
    fn test_contract_client_creation() {
        let client = ContractClient::new(test_config()).unwrap();
        assert_eq!(client.chain_id(), 31337);
        assert!(!client.has_wallet());
        assert_eq!(client.signer_address(), None);
        assert_eq!(client.rpc_url(), "http://localhost:8545");
    }

    #[test]
    fn test_signer_address() {
        let mut config = test_config();
        config.private_key = Some(ANVIL_KEY.to_string());

        let client = ContractClient::new(config).unwrap();
        assert!(client.has_wallet());
        assert_eq!(client.signer_address().as_deref(), Some(ANVIL_ADDRESS));
    }

    #[test]
    fn test_invalid_private_key() {
        let mut config = test_config();
        config.private_key = Some(format!("0x{}", "00".repeat(32)));
        assert!(matches!(
            ContractClient::new(config),
            Err(LedgerError::Configuration(_))
        ));
    }

    #[test]
    fn test_read_only_has_no_signing_provider() {
        let client = ContractClient::new(test_config()).unwrap();
        assert!(matches!(
            client.create_provider_with_signer(),
            Err(LedgerError::WalletNotConnected)
        ));
    }
}
