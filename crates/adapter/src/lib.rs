//! AgroSafe ledger adapters
//!
//! Two adapters sit between a front end and any `Ledger` backend:
//!
//! - [`ReadAdapter`]: lookups against the latest confirmed state, decoded
//!   into [`Farmer`] / [`Produce`] records
//! - [`WriteAdapter`]: locally validated mutating calls, returning a
//!   [`Submitted`] handle; confirmation is a separate, awaitable step
//!
//! Both take the contract target from an [`AddressResolver`], resolved once at
//! start-up and injected. When no address resolved, every operation fails
//! with `LedgerError::Configuration` before the ledger is touched.
//!
//! # Example
//!
//! ```ignore
//! use agrosafe_adapter::{AdapterConfig, AddressResolver, ReadAdapter, WriteAdapter};
//! use std::sync::Arc;
//!
//! let target = AddressResolver::from_environment()
//!     .with_runtime(config.contract_address.clone())
//!     .resolve();
//! let ledger = Arc::new(EthereumLedger::new(ledger_config)?);
//!
//! let write = WriteAdapter::new(ledger.clone(), target.clone(), AdapterConfig::default())?;
//! let submitted = write.register_farmer("Ada Lovelace", "Kent, UK").await?;
//! write.wait(&submitted).await?;
//!
//! let read = ReadAdapter::new(ledger, target, AdapterConfig::default())?;
//! let farmer_id = read.get_farmer_id_by_wallet(&write.signer().unwrap()).await?;
//! let farmer = read.get_farmer_by_id(farmer_id).await?;
//! ```

pub mod address;
pub mod config;
pub mod read;
mod rpc;
pub mod validation;
pub mod write;

pub use address::{AddressResolver, AddressSource, CONTRACT_ADDRESS_ENV, ContractTarget};
pub use config::AdapterConfig;
pub use read::{LedgerSummary, ProduceTrace, ReadAdapter};
pub use write::{UNKNOWN_REVERT_REASON, WriteAdapter};

pub use agrosafe_ledger_trait::{
    Confirmed, ErrorKind, Farmer, Ledger, LedgerCall, LedgerError, Produce, Result, Submitted,
    TxStatus,
};
