//! `Ledger` implementation backed by [`AgroSafeContract`]

use crate::contract::AgroSafeContract;
use agrosafe_ledger_trait::{
    ContractAddress, Farmer, Ledger, LedgerBackend, LedgerCall, LedgerError, LedgerValue,
    Produce, RawRecord, Result, TxHash, TxReceipt, ZERO_ADDRESS,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Shape of the records returned by `farmer` / `produce`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordEncoding {
    /// Ordered tuple, as decoded from a human-readable ABI
    #[default]
    Positional,
    /// Named outputs, as decoded from a compiled artifact
    Named,
}

/// Number of round trips made against the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub reads: u64,
    pub writes: u64,
    pub receipts: u64,
}

impl CallCounts {
    pub fn total(&self) -> u64 {
        self.reads + self.writes + self.receipts
    }
}

#[derive(Debug)]
struct PendingTx {
    tx_hash: TxHash,
    sender: String,
    call: LedgerCall,
}

#[derive(Debug)]
struct LedgerState {
    contract: AgroSafeContract,
    pending: Vec<PendingTx>,
    receipts: HashMap<TxHash, TxReceipt>,
    submitted: Vec<LedgerCall>,
    block_number: u64,
    tx_counter: u64,
    counts: CallCounts,
    failures_left: u32,
    latency: Option<Duration>,
    encoding: RecordEncoding,
}

/// Handle on a shared in-process ledger
///
/// Cloning or calling [`MemoryLedger::connect_as`] yields another handle on
/// the same state.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    address: ContractAddress,
    state: Arc<Mutex<LedgerState>>,
    signer: Option<String>,
}

impl MemoryLedger {
    /// Deploy a fresh contract at `address`, returning a handle signed by `admin`
    pub fn deploy(address: ContractAddress, admin: &str) -> Self {
        let state = LedgerState {
            contract: AgroSafeContract::new(admin),
            pending: Vec::new(),
            receipts: HashMap::new(),
            submitted: Vec::new(),
            block_number: 0,
            tx_counter: 0,
            counts: CallCounts::default(),
            failures_left: 0,
            latency: None,
            encoding: RecordEncoding::default(),
        };

        Self {
            address,
            state: Arc::new(Mutex::new(state)),
            signer: Some(admin.to_ascii_lowercase()),
        }
    }

    /// Handle on the same ledger signing as `wallet`
    pub fn connect_as(&self, wallet: &str) -> Self {
        Self {
            address: self.address.clone(),
            state: Arc::clone(&self.state),
            signer: Some(wallet.to_ascii_lowercase()),
        }
    }

    /// Handle on the same ledger without a signing identity
    pub fn read_only(&self) -> Self {
        Self {
            address: self.address.clone(),
            state: Arc::clone(&self.state),
            signer: None,
        }
    }

    /// Address the contract is deployed at
    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    /// Return records as tuples or named outputs
    pub fn set_encoding(&self, encoding: RecordEncoding) {
        self.lock().encoding = encoding;
    }

    /// Make the next `count` calls fail with a transport error
    pub fn fail_next_calls(&self, count: u32) {
        self.lock().failures_left = count;
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    pub fn call_counts(&self) -> CallCounts {
        self.lock().counts
    }

    /// Every call accepted by `submit`, in order
    pub fn submitted_calls(&self) -> Vec<LedgerCall> {
        self.lock().submitted.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn block_number(&self) -> u64 {
        self.lock().block_number
    }

    /// Include all pending transactions in a new block
    ///
    /// Returns the block number, unchanged when nothing was pending.
    pub fn mine(&self) -> u64 {
        let mut state = self.lock();
        mine_pending(&mut state)
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Common entry for every trait call: latency, injected failures, address check
    async fn enter(&self, contract: Option<&ContractAddress>) -> Result<()> {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        if state.failures_left > 0 {
            state.failures_left -= 1;
            return Err(LedgerError::Transport(
                "connection reset by peer".to_string(),
            ));
        }

        if let Some(contract) = contract {
            if contract != &self.address {
                return Err(LedgerError::Transport(format!(
                    "no contract deployed at {}",
                    contract
                )));
            }
        }

        Ok(())
    }
}

fn mine_pending(state: &mut LedgerState) -> u64 {
    if state.pending.is_empty() {
        return state.block_number;
    }

    state.block_number += 1;
    let block_number = state.block_number;

    for tx in std::mem::take(&mut state.pending) {
        let outcome = state.contract.apply(&tx.sender, &tx.call);
        debug!(
            "Mined {} in block {}: {}",
            tx.tx_hash,
            block_number,
            if outcome.is_ok() { "success" } else { "reverted" }
        );
        state.receipts.insert(
            tx.tx_hash.clone(),
            TxReceipt {
                tx_hash: tx.tx_hash,
                block_number,
                success: outcome.is_ok(),
                revert_reason: outcome.err(),
            },
        );
    }

    block_number
}

fn farmer_record(farmer: Option<&Farmer>, encoding: RecordEncoding) -> RawRecord {
    let values = match farmer {
        Some(f) => vec![
            LedgerValue::Uint(u128::from(f.id)),
            LedgerValue::Text(f.name.clone()),
            LedgerValue::Address(f.wallet.clone()),
            LedgerValue::Text(f.location.clone()),
            LedgerValue::Bool(f.verified),
        ],
        None => vec![
            LedgerValue::Uint(0),
            LedgerValue::Text(String::new()),
            LedgerValue::Address(ZERO_ADDRESS.to_string()),
            LedgerValue::Text(String::new()),
            LedgerValue::Bool(false),
        ],
    };
    encode(values, &["id", "name", "wallet", "location", "verified"], encoding)
}

fn produce_record(produce: Option<&Produce>, encoding: RecordEncoding) -> RawRecord {
    let values = match produce {
        Some(p) => vec![
            LedgerValue::Uint(u128::from(p.id)),
            LedgerValue::Uint(u128::from(p.farmer_id)),
            LedgerValue::Text(p.crop_type.clone()),
            LedgerValue::Text(p.harvest_date.clone()),
            LedgerValue::Bool(p.certified),
        ],
        None => vec![
            LedgerValue::Uint(0),
            LedgerValue::Uint(0),
            LedgerValue::Text(String::new()),
            LedgerValue::Text(String::new()),
            LedgerValue::Bool(false),
        ],
    };
    encode(
        values,
        &["id", "farmerId", "cropType", "harvestDate", "certified"],
        encoding,
    )
}

fn encode(values: Vec<LedgerValue>, names: &[&str], encoding: RecordEncoding) -> RawRecord {
    match encoding {
        RecordEncoding::Positional => RawRecord::Positional(values),
        RecordEncoding::Named => RawRecord::Named(
            names
                .iter()
                .map(|name| name.to_string())
                .zip(values)
                .collect(),
        ),
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn backend(&self) -> LedgerBackend {
        LedgerBackend::Memory
    }

    fn signer(&self) -> Option<String> {
        self.signer.clone()
    }

    async fn farmer(&self, contract: &ContractAddress, farmer_id: u64) -> Result<RawRecord> {
        self.enter(Some(contract)).await?;
        let mut state = self.lock();
        state.counts.reads += 1;
        Ok(farmer_record(state.contract.farmer(farmer_id), state.encoding))
    }

    async fn produce(&self, contract: &ContractAddress, produce_id: u64) -> Result<RawRecord> {
        self.enter(Some(contract)).await?;
        let mut state = self.lock();
        state.counts.reads += 1;
        Ok(produce_record(state.contract.produce(produce_id), state.encoding))
    }

    async fn total_farmers(&self, contract: &ContractAddress) -> Result<u64> {
        self.enter(Some(contract)).await?;
        let mut state = self.lock();
        state.counts.reads += 1;
        Ok(state.contract.total_farmers())
    }

    async fn total_produce(&self, contract: &ContractAddress) -> Result<u64> {
        self.enter(Some(contract)).await?;
        let mut state = self.lock();
        state.counts.reads += 1;
        Ok(state.contract.total_produce())
    }

    async fn farmer_id_by_wallet(&self, contract: &ContractAddress, wallet: &str) -> Result<u64> {
        self.enter(Some(contract)).await?;
        let mut state = self.lock();
        state.counts.reads += 1;
        Ok(state.contract.farmer_id_by_wallet(wallet))
    }

    async fn submit(&self, contract: &ContractAddress, call: &LedgerCall) -> Result<TxHash> {
        let sender = self.signer.clone().ok_or(LedgerError::WalletNotConnected)?;
        self.enter(Some(contract)).await?;

        let mut state = self.lock();
        state.counts.writes += 1;

        // Gas estimation runs the call against current state first
        let mut simulated = state.contract.clone();
        if let Err(reason) = simulated.apply(&sender, call) {
            debug!("Rejected {} from {}: {}", call, sender, reason);
            return Err(LedgerError::ContractRevert { reason });
        }

        state.tx_counter += 1;
        let tx_hash = format!("0x{:064x}", state.tx_counter);
        state.pending.push(PendingTx {
            tx_hash: tx_hash.clone(),
            sender,
            call: call.clone(),
        });
        state.submitted.push(call.clone());

        debug!("Accepted {} as {}", call, tx_hash);
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>> {
        self.enter(None).await?;
        let mut state = self.lock();
        state.counts.receipts += 1;

        // Each receipt poll seals the next block
        mine_pending(&mut state);
        Ok(state.receipts.get(tx_hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::revert;

    const ADMIN: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const FARMER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    fn contract() -> ContractAddress {
        ContractAddress::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()
    }

    fn register_call() -> LedgerCall {
        LedgerCall::RegisterFarmer {
            name: "Ada Lovelace".into(),
            location: "Kent, UK".into(),
        }
    }

    #[tokio::test]
    async fn test_writes_invisible_until_mined() {
        let admin = MemoryLedger::deploy(contract(), ADMIN);
        let farmer = admin.connect_as(FARMER);

        let tx_hash = farmer.submit(&contract(), &register_call()).await.unwrap();
        assert_eq!(farmer.total_farmers(&contract()).await.unwrap(), 0);
        assert_eq!(farmer.pending_count(), 1);

        let receipt = farmer.receipt(&tx_hash).await.unwrap().unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.block_number, 1);
        assert_eq!(farmer.total_farmers(&contract()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_reverts_on_preflight() {
        let admin = MemoryLedger::deploy(contract(), ADMIN);
        let farmer = admin.connect_as(FARMER);

        let err = farmer
            .submit(
                &contract(),
                &LedgerCall::VerifyFarmer {
                    farmer_id: 1,
                    status: true,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::ContractRevert {
                reason: revert::ONLY_ADMIN.to_string()
            }
        );
        assert!(farmer.submitted_calls().is_empty());
    }

    #[tokio::test]
    async fn test_revert_at_inclusion_keeps_reason() {
        let admin = MemoryLedger::deploy(contract(), ADMIN);
        let farmer = admin.connect_as(FARMER);

        // Both pass preflight, the second fails once the first is included
        let first = farmer.submit(&contract(), &register_call()).await.unwrap();
        let second = farmer.submit(&contract(), &register_call()).await.unwrap();

        assert!(farmer.receipt(&first).await.unwrap().unwrap().success);
        let receipt = farmer.receipt(&second).await.unwrap().unwrap();
        assert!(!receipt.success);
        assert_eq!(
            receipt.revert_reason.as_deref(),
            Some(revert::ALREADY_REGISTERED)
        );
    }

    #[tokio::test]
    async fn test_read_only_cannot_submit() {
        let ledger = MemoryLedger::deploy(contract(), ADMIN).read_only();
        assert_eq!(
            ledger.submit(&contract(), &register_call()).await,
            Err(LedgerError::WalletNotConnected)
        );
        assert_eq!(ledger.call_counts().total(), 0);
    }

    #[tokio::test]
    async fn test_wrong_contract_address() {
        let ledger = MemoryLedger::deploy(contract(), ADMIN);
        let other = ContractAddress::parse("0x1234567890123456789012345678901234567890").unwrap();
        assert!(matches!(
            ledger.total_farmers(&other).await,
            Err(LedgerError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let ledger = MemoryLedger::deploy(contract(), ADMIN);
        ledger.fail_next_calls(1);
        assert!(ledger.total_farmers(&contract()).await.is_err());
        assert_eq!(ledger.total_farmers(&contract()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_named_encoding() {
        let ledger = MemoryLedger::deploy(contract(), ADMIN);
        ledger.set_encoding(RecordEncoding::Named);
        let record = ledger.farmer(&contract(), 1).await.unwrap();
        match record {
            RawRecord::Named(fields) => {
                assert_eq!(fields[0], ("id".to_string(), LedgerValue::Uint(0)));
                assert_eq!(fields.len(), 5);
            }
            other => panic!("expected named record, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_counts() {
        let admin = MemoryLedger::deploy(contract(), ADMIN);
        let tx_hash = admin.submit(&contract(), &register_call()).await.unwrap();
        admin.receipt(&tx_hash).await.unwrap();
        admin.farmer(&contract(), 1).await.unwrap();

        assert_eq!(
            admin.call_counts(),
            CallCounts {
                reads: 1,
                writes: 1,
                receipts: 1
            }
        );
    }
}
