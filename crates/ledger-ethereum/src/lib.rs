//! Ethereum Ledger Backend
//!
//! This crate implements the `Ledger` trait from `agrosafe-ledger-trait` for
//! an AgroSafe contract deployed on Ethereum or any EVM-compatible chain.
//!
//! # Features
//!
//! - Type-safe write and counter bindings via Alloy's `sol!`
//! - Record getters decoded from either a positional (built-in) or a named
//!   (compiled artifact) ABI
//! - Receipt lookups that honour `confirmation_blocks`
//! - Revert reasons recovered from node error messages
//!
//! # Example
//!
//! ```ignore
//! use agrosafe_ledger_ethereum::{EthereumLedger, EthereumLedgerConfig};
//! use agrosafe_ledger_trait::{ContractAddress, Ledger};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EthereumLedgerConfig::from_file("ethereum.toml")?;
//! let ledger = EthereumLedger::new(config)?;
//!
//! let contract = ContractAddress::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3")?;
//! let total = ledger.total_farmers(&contract).await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod config;
pub mod contract;
pub mod conversions;
mod error;
pub mod ledger;

pub use config::EthereumLedgerConfig;
pub use contract::ContractClient;
pub use ledger::EthereumLedger;

/// Re-export the Ledger trait for convenience
pub use agrosafe_ledger_trait::Ledger;
