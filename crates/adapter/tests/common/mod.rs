//! Shared fixture: an in-memory AgroSafe deployment with adapters bound to it

#![allow(dead_code)]

use agrosafe_adapter::{AdapterConfig, AddressResolver, ContractTarget, ReadAdapter, WriteAdapter};
use agrosafe_ledger_memory::MemoryLedger;
use agrosafe_ledger_trait::ContractAddress;
use chrono::NaiveDate;
use std::sync::Arc;

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const ADMIN: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const FARMER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
pub const OTHER_FARMER: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

/// Fixed "today" so harvest date checks are deterministic
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn target() -> ContractTarget {
    AddressResolver::empty()
        .with_runtime(Some(CONTRACT.to_string()))
        .resolve()
}

pub fn unresolved() -> ContractTarget {
    AddressResolver::empty().resolve()
}

pub fn fast_config() -> AdapterConfig {
    AdapterConfig {
        poll_interval_ms: 10,
        ..AdapterConfig::default()
    }
}

pub struct TestFixture {
    /// Admin-signed handle on the deployment
    pub ledger: MemoryLedger,
}

impl TestFixture {
    pub fn new() -> Self {
        let address = ContractAddress::parse(CONTRACT).unwrap();
        Self {
            ledger: MemoryLedger::deploy(address, ADMIN),
        }
    }

    pub fn reader(&self) -> ReadAdapter<MemoryLedger> {
        ReadAdapter::new(Arc::new(self.ledger.read_only()), target(), fast_config()).unwrap()
    }

    pub fn admin(&self) -> WriteAdapter<MemoryLedger> {
        self.writer_for(self.ledger.clone())
    }

    pub fn farmer(&self, wallet: &str) -> WriteAdapter<MemoryLedger> {
        self.writer_for(self.ledger.connect_as(wallet))
    }

    pub fn disconnected(&self) -> WriteAdapter<MemoryLedger> {
        self.writer_for(self.ledger.read_only())
    }

    fn writer_for(&self, ledger: MemoryLedger) -> WriteAdapter<MemoryLedger> {
        WriteAdapter::new(Arc::new(ledger), target(), fast_config())
            .unwrap()
            .with_today(today)
    }

    /// Register `wallet` as a farmer and have the admin verify it
    pub async fn verified_farmer(&self, wallet: &str, name: &str) -> u64 {
        let farmer = self.farmer(wallet);
        let submitted = farmer.register_farmer(name, "Kent, UK").await.unwrap();
        farmer.wait(&submitted).await.unwrap();

        let farmer_id = self
            .reader()
            .get_farmer_id_by_wallet(wallet)
            .await
            .unwrap();

        let admin = self.admin();
        let submitted = admin.verify_farmer(farmer_id, true).await.unwrap();
        admin.wait(&submitted).await.unwrap();

        farmer_id
    }
}
