//! Configuration types for the Ethereum ledger backend

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the Ethereum ledger backend
///
/// The contract address is not part of this: it is resolved by the adapters
/// and passed with every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumLedgerConfig {
    /// RPC URL for the Ethereum node
    /// Example: "https://rpc.sepolia.org"
    pub rpc_url: String,

    /// Chain ID (1=mainnet, 11155111=Sepolia, 31337=Anvil, etc.)
    pub chain_id: u64,

    /// Private key for signing transactions (optional for read-only use)
    /// 0x followed by 64 hex characters. Absent or empty means read-only
    pub private_key: Option<String>,

    /// Compiled contract artifact (Foundry/Hardhat JSON) to take the record
    /// getter ABI from. Its named outputs make records decode by field name.
    /// If not provided, a built-in positional ABI is used
    pub abi_path: Option<PathBuf>,

    /// Number of confirmations before a receipt counts as final (default 1)
    pub confirmation_blocks: u64,
}

impl Default for EthereumLedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337, // Local anvil
            private_key: None,
            abi_path: None,
            confirmation_blocks: 1,
        }
    }
}

impl EthereumLedgerConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agrosafe_ledger_ethereum::EthereumLedgerConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = EthereumLedgerConfig::from_file("ethereum.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, anyhow::Error> {
        let config: Self = toml::from_str(toml)?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Returns `Ok(())` if valid, otherwise returns error message
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_url.is_empty() {
            return Err("rpc_url cannot be empty".to_string());
        }

        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err("rpc_url must start with http:// or https://".to_string());
        }

        if self.chain_id == 0 {
            return Err("chain_id must be > 0".to_string());
        }

        if let Some(pk) = self.private_key.as_deref().filter(|pk| !pk.is_empty()) {
            if !pk.starts_with("0x") {
                return Err("private_key must start with 0x".to_string());
            }

            if pk.len() != 66 {
                return Err(format!(
                    "private_key must be 66 characters (0x + 64 hex), got {}",
                    pk.len()
                ));
            }

            if hex::decode(&pk[2..]).is_err() {
                return Err("private_key must contain only hex characters after 0x".to_string());
            }
        }

        if let Some(path) = &self.abi_path {
            if path.as_os_str().is_empty() {
                return Err("abi_path cannot be empty".to_string());
            }
        }

        if self.confirmation_blocks == 0 {
            return Err("confirmation_blocks must be > 0".to_string());
        }

        if self.confirmation_blocks > 100 {
            return Err("confirmation_blocks too large (max 100)".to_string());
        }

        Ok(())
    }

    /// Check if configuration supports write operations (has private key)
    pub fn can_write(&self) -> bool {
        self.private_key.as_deref().is_some_and(|pk| !pk.is_empty())
    }
}
