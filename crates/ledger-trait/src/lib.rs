//! Ledger Trait - Core abstraction over the AgroSafe traceability contract
//!
//! This crate defines the `Ledger` trait which every backend (EVM RPC,
//! in-process) implements, together with the record types the adapters
//! decode contract results into.
//!
//! The trait mirrors the contract call surface one to one. It does no input
//! validation, no address resolution and no retrying; those live in
//! `agrosafe-adapter`, which is the only intended caller.

use async_trait::async_trait;

pub mod address;
pub mod backend;
pub mod error;
pub mod types;

pub use address::{ContractAddress, ZERO_ADDRESS, is_valid_address};
pub use backend::LedgerBackend;
pub use error::{ErrorKind, LedgerError, Result, extract_revert_reason};
pub use types::*;

/// Contract call surface shared by all ledger backends
///
/// Every method is a single round trip. Reads return the latest confirmed
/// state; `submit` returns as soon as the transaction has been accepted.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Which backend this is
    fn backend(&self) -> LedgerBackend;

    /// Address of the signing identity, `None` when the ledger is read-only
    fn signer(&self) -> Option<String>;

    // ===== Read operations =====

    /// Raw `farmers(uint256)` record
    async fn farmer(&self, contract: &ContractAddress, farmer_id: u64) -> Result<RawRecord>;

    /// Raw `produce(uint256)` record
    async fn produce(&self, contract: &ContractAddress, produce_id: u64) -> Result<RawRecord>;

    /// `totalFarmers()`
    async fn total_farmers(&self, contract: &ContractAddress) -> Result<u64>;

    /// `totalProduce()`
    async fn total_produce(&self, contract: &ContractAddress) -> Result<u64>;

    /// `farmerIdByWallet(address)`, 0 when the wallet has no farmer
    async fn farmer_id_by_wallet(&self, contract: &ContractAddress, wallet: &str) -> Result<u64>;

    // ===== Write operations =====

    /// Submit one mutating call under the signing identity
    ///
    /// Returns the transaction hash once the ledger accepted the transaction.
    /// Inclusion is not awaited.
    async fn submit(&self, contract: &ContractAddress, call: &LedgerCall) -> Result<TxHash>;

    /// Receipt of a submitted transaction, `None` while it is still pending
    async fn receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>>;
}
