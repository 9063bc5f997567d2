//! Side-effect free lookups against the latest confirmed ledger state

use crate::address::ContractTarget;
use crate::config::AdapterConfig;
use crate::rpc::bounded;
use crate::validation;
use agrosafe_ledger_trait::{Farmer, Ledger, LedgerError, Produce, Result};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// A produce record together with the farmer who recorded it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProduceTrace {
    pub produce: Produce,
    /// `None` if the farmer record could not be found
    pub farmer: Option<Farmer>,
}

/// Ledger-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub total_farmers: u64,
    pub total_produce: u64,
}

/// Read side of the ledger
///
/// Every call checks the contract target, then its arguments, then makes
/// the ledger round trip. Transport failures are retried up to
/// `read_retries` times. Nothing is cached.
pub struct ReadAdapter<L: Ledger + ?Sized> {
    ledger: Arc<L>,
    target: ContractTarget,
    config: AdapterConfig,
}

impl<L: Ledger + ?Sized> Clone for ReadAdapter<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            target: self.target.clone(),
            config: self.config.clone(),
        }
    }
}

impl<L: Ledger + ?Sized> ReadAdapter<L> {
    /// Fails with `Configuration` when `config` is out of range
    pub fn new(ledger: Arc<L>, target: ContractTarget, config: AdapterConfig) -> Result<Self> {
        config.validate().map_err(LedgerError::Configuration)?;

        Ok(Self {
            ledger,
            target,
            config,
        })
    }

    pub fn target(&self) -> &ContractTarget {
        &self.target
    }

    /// Farmer with the given id
    ///
    /// Fails with `NotFound` when the ledger answers with its default record.
    pub async fn get_farmer_by_id(&self, farmer_id: u64) -> Result<Farmer> {
        let contract = self.target.address()?;
        validation::record_id("farmer id", farmer_id)?;
        debug!("Reading farmer {} from {}", farmer_id, contract);

        let raw = self
            .read("farmers", || self.ledger.farmer(contract, farmer_id))
            .await?;
        Farmer::decode(&raw)?.ok_or_else(|| LedgerError::not_found("Farmer", farmer_id))
    }

    /// Produce with the given id
    pub async fn get_produce(&self, produce_id: u64) -> Result<Produce> {
        let contract = self.target.address()?;
        validation::record_id("produce id", produce_id)?;
        debug!("Reading produce {} from {}", produce_id, contract);

        let raw = self
            .read("produce", || self.ledger.produce(contract, produce_id))
            .await?;
        Produce::decode(&raw)?.ok_or_else(|| LedgerError::not_found("Produce", produce_id))
    }

    pub async fn get_total_farmers(&self) -> Result<u64> {
        let contract = self.target.address()?;
        self.read("totalFarmers", || self.ledger.total_farmers(contract))
            .await
    }

    pub async fn get_total_produce(&self) -> Result<u64> {
        let contract = self.target.address()?;
        self.read("totalProduce", || self.ledger.total_produce(contract))
            .await
    }

    /// Farmer id registered by `wallet`, 0 when there is none
    pub async fn get_farmer_id_by_wallet(&self, wallet: &str) -> Result<u64> {
        let contract = self.target.address()?;
        let wallet = validation::wallet(wallet)?;
        debug!("Looking up farmer for wallet {}", wallet);

        self.read("farmerIdByWallet", || {
            self.ledger.farmer_id_by_wallet(contract, &wallet)
        })
        .await
    }

    /// Up to `limit` farmers after skipping the first `offset`
    pub async fn list_farmers(&self, offset: u64, limit: u64) -> Result<Vec<Farmer>> {
        let contract = self.target.address()?;
        let limit = validation::page(limit)?;
        let total = self.get_total_farmers().await?;

        let mut farmers = Vec::new();
        for farmer_id in page_ids(offset, limit, total) {
            let raw = self
                .read("farmers", || self.ledger.farmer(contract, farmer_id))
                .await?;
            match Farmer::decode(&raw)? {
                Some(farmer) => farmers.push(farmer),
                None => warn!("Farmer {} below total {} has no record", farmer_id, total),
            }
        }
        Ok(farmers)
    }

    /// Up to `limit` produce records after skipping the first `offset`
    pub async fn list_produce(&self, offset: u64, limit: u64) -> Result<Vec<Produce>> {
        let contract = self.target.address()?;
        let limit = validation::page(limit)?;
        let total = self.get_total_produce().await?;

        let mut produce = Vec::new();
        for produce_id in page_ids(offset, limit, total) {
            let raw = self
                .read("produce", || self.ledger.produce(contract, produce_id))
                .await?;
            match Produce::decode(&raw)? {
                Some(record) => produce.push(record),
                None => warn!("Produce {} below total {} has no record", produce_id, total),
            }
        }
        Ok(produce)
    }

    /// Up to `limit` of one farmer's produce records after skipping the
    /// first `offset` of them
    ///
    /// The ledger has no per-farmer index, so every produce id up to the
    /// total is read until the page is full.
    pub async fn list_produce_by_farmer(
        &self,
        farmer_id: u64,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Produce>> {
        let contract = self.target.address()?;
        let farmer_id = validation::record_id("farmer id", farmer_id)?;
        let limit = validation::page(limit)?;
        let total = self.get_total_produce().await?;
        debug!("Listing produce of farmer {} ({} records)", farmer_id, total);

        let mut skipped = 0;
        let mut produce = Vec::new();
        for produce_id in 1..=total {
            if produce.len() as u64 >= limit {
                break;
            }

            let raw = self
                .read("produce", || self.ledger.produce(contract, produce_id))
                .await?;
            match Produce::decode(&raw)? {
                Some(record) if record.farmer_id == farmer_id => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        produce.push(record);
                    }
                }
                Some(_) => {}
                None => warn!("Produce {} below total {} has no record", produce_id, total),
            }
        }
        Ok(produce)
    }

    /// Produce record and the farmer behind it
    pub async fn trace_produce(&self, produce_id: u64) -> Result<ProduceTrace> {
        let produce = self.get_produce(produce_id).await?;

        let farmer = match self.get_farmer_by_id(produce.farmer_id).await {
            Ok(farmer) => Some(farmer),
            Err(LedgerError::NotFound { .. } | LedgerError::Validation { .. }) => {
                warn!(
                    "Produce {} references unknown farmer {}",
                    produce.id, produce.farmer_id
                );
                None
            }
            Err(e) => return Err(e),
        };

        Ok(ProduceTrace { produce, farmer })
    }

    pub async fn summary(&self) -> Result<LedgerSummary> {
        Ok(LedgerSummary {
            total_farmers: self.get_total_farmers().await?,
            total_produce: self.get_total_produce().await?,
        })
    }

    /// One bounded round trip, retried on transport failures
    async fn read<T, F, Fut>(&self, call: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u8 = 0;
        loop {
            match bounded(self.config.rpc_timeout(), op()).await {
                Err(e) if e.is_retriable() && attempt < self.config.read_retries => {
                    attempt += 1;
                    warn!(
                        "{} failed, retrying ({}/{}): {}",
                        call, attempt, self.config.read_retries, e
                    );
                }
                result => return result,
            }
        }
    }
}

/// 1-based ids on one page, clipped to `total`
fn page_ids(offset: u64, limit: u64, total: u64) -> std::ops::RangeInclusive<u64> {
    let first = offset.saturating_add(1);
    let last = offset.saturating_add(limit).min(total);
    first..=last
}
