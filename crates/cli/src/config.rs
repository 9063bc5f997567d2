//! `agrosafe.toml`: contract address plus the ledger and adapter sections
//!
//! ```toml
//! contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//!
//! [ledger]
//! rpc_url = "http://localhost:8545"
//! chain_id = 31337
//!
//! [adapter]
//! rpc_timeout_secs = 20
//! ```

use crate::cli::ConnectionArgs;
use agrosafe_adapter::{AdapterConfig, AddressResolver, ContractTarget};
use agrosafe_ledger_ethereum::EthereumLedgerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "agrosafe.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgroSafeConfig {
    /// Runtime slot for the contract address
    pub contract_address: Option<String>,

    pub ledger: EthereumLedgerConfig,

    pub adapter: AdapterConfig,
}

impl AgroSafeConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Load the configured file, then apply flag and environment overrides
    ///
    /// A missing `agrosafe.toml` in the working directory means defaults; a
    /// file named explicitly must exist.
    pub fn load(args: &ConnectionArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply(args);
        Ok(config)
    }

    /// Flag values win over file values
    pub fn apply(&mut self, args: &ConnectionArgs) {
        if let Some(address) = &args.contract_address {
            self.contract_address = Some(address.clone());
        }
        if let Some(rpc_url) = &args.rpc_url {
            self.ledger.rpc_url = rpc_url.clone();
        }
        if let Some(chain_id) = args.chain_id {
            self.ledger.chain_id = chain_id;
        }
        if let Some(private_key) = &args.private_key {
            self.ledger.private_key = Some(private_key.clone());
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.ledger
            .validate()
            .map_err(|e| format!("[ledger] {}", e))?;
        self.adapter
            .validate()
            .map_err(|e| format!("[adapter] {}", e))?;
        Ok(())
    }

    /// Resolve the contract target: this file or flag, then the environment
    pub fn resolve_target(&self) -> ContractTarget {
        AddressResolver::from_environment()
            .with_runtime(self.contract_address.clone())
            .resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrosafe_adapter::AddressSource;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_empty_file_is_default() {
        let config = AgroSafeConfig::from_toml_str("").unwrap();
        assert_eq!(config.contract_address, None);
        assert_eq!(config.ledger.rpc_url, "http://localhost:8545");
        assert_eq!(config.adapter.rpc_timeout_secs, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sections() {
        let config = AgroSafeConfig::from_toml_str(&format!(
            r#"
            contract_address = "{}"

            [ledger]
            rpc_url = "https://rpc.example.org"
            chain_id = 11155111
            confirmation_blocks = 2

            [adapter]
            read_retries = 0
            poll_interval_ms = 500
            "#,
            CONTRACT
        ))
        .unwrap();

        assert_eq!(config.contract_address.as_deref(), Some(CONTRACT));
        assert_eq!(config.ledger.chain_id, 11155111);
        assert_eq!(config.ledger.confirmation_blocks, 2);
        assert_eq!(config.adapter.read_retries, 0);
        assert_eq!(config.adapter.poll_interval_ms, 500);
        assert_eq!(config.adapter.confirmation_timeout_secs, 120);
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = AgroSafeConfig::from_toml_str(
            r#"
            contract_address = "0x0000000000000000000000000000000000000001"
            [ledger]
            rpc_url = "http://file:8545"
            "#,
        )
        .unwrap();

        config.apply(&ConnectionArgs {
            contract_address: Some(CONTRACT.to_string()),
            rpc_url: Some("http://flag:8545".to_string()),
            chain_id: Some(1),
            ..Default::default()
        });

        assert_eq!(config.contract_address.as_deref(), Some(CONTRACT));
        assert_eq!(config.ledger.rpc_url, "http://flag:8545");
        assert_eq!(config.ledger.chain_id, 1);
        assert_eq!(config.ledger.private_key, None);
    }

    #[test]
    fn test_validate_names_section() {
        let mut config = AgroSafeConfig::default();
        config.adapter.rpc_timeout_secs = 0;
        assert!(config.validate().unwrap_err().starts_with("[adapter]"));

        let mut config = AgroSafeConfig::default();
        config.ledger.rpc_url = "ws://localhost:8545".to_string();
        assert!(config.validate().unwrap_err().starts_with("[ledger]"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let args = ConnectionArgs {
            config: Some("/nonexistent/agrosafe.toml".into()),
            ..Default::default()
        };
        assert!(AgroSafeConfig::load(&args).is_err());
    }

    #[test]
    fn test_runtime_address_resolves_first() {
        let config = AgroSafeConfig {
            contract_address: Some(CONTRACT.to_string()),
            ..Default::default()
        };

        match config.resolve_target() {
            ContractTarget::Resolved { address, source } => {
                assert_eq!(address.as_str(), CONTRACT.to_ascii_lowercase());
                assert_eq!(source, AddressSource::Runtime);
            }
            other => panic!("expected resolved target, got {:?}", other),
        }
    }
}
