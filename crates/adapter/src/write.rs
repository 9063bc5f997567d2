//! Mutating ledger calls and transaction confirmation
//!
//! Every write runs its checks in a fixed order before anything is sent:
//! contract target, then signing identity, then arguments. Submission returns
//! a [`Submitted`] handle as soon as the ledger accepts the transaction;
//! waiting for inclusion is a separate call.

use crate::address::ContractTarget;
use crate::config::AdapterConfig;
use crate::rpc::bounded;
use crate::validation;
use agrosafe_ledger_trait::{
    Confirmed, ContractAddress, Ledger, LedgerCall, LedgerError, Result, Submitted, TxStatus,
};
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Revert reason used when the ledger gave none
pub const UNKNOWN_REVERT_REASON: &str = "transaction reverted without a reason";

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Write side of the ledger
///
/// Writes are never retried: the ledger offers no idempotency, so a second
/// attempt could register the same call twice.
pub struct WriteAdapter<L: Ledger + ?Sized> {
    ledger: Arc<L>,
    target: ContractTarget,
    config: AdapterConfig,
    today: fn() -> NaiveDate,
}

impl<L: Ledger + ?Sized> Clone for WriteAdapter<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            target: self.target.clone(),
            config: self.config.clone(),
            today: self.today,
        }
    }
}

impl<L: Ledger + ?Sized> WriteAdapter<L> {
    /// Fails with `Configuration` when `config` is out of range
    pub fn new(ledger: Arc<L>, target: ContractTarget, config: AdapterConfig) -> Result<Self> {
        config.validate().map_err(LedgerError::Configuration)?;

        Ok(Self {
            ledger,
            target,
            config,
            today: local_today,
        })
    }

    /// Replace the clock used to reject future harvest dates
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Signing identity writes go out under
    pub fn signer(&self) -> Option<String> {
        self.ledger.signer()
    }

    pub fn target(&self) -> &ContractTarget {
        &self.target
    }

    // ===== Writes =====

    pub async fn register_farmer(&self, name: &str, location: &str) -> Result<Submitted> {
        let contract = self.preflight()?;
        let name = validation::farmer_name(name)?;
        let location = validation::location(location)?;

        self.submit(contract, LedgerCall::RegisterFarmer { name, location })
            .await
    }

    pub async fn record_produce(&self, crop_type: &str, harvest_date: &str) -> Result<Submitted> {
        let contract = self.preflight()?;
        let crop_type = validation::crop_type(crop_type)?;
        let harvest_date = validation::harvest_date(harvest_date, (self.today)())?;

        self.submit(
            contract,
            LedgerCall::RecordProduce {
                crop_type,
                harvest_date,
            },
        )
        .await
    }

    /// Admin only
    pub async fn verify_farmer(&self, farmer_id: u64, status: bool) -> Result<Submitted> {
        let contract = self.preflight()?;
        let farmer_id = validation::record_id("farmer id", farmer_id)?;

        self.submit(contract, LedgerCall::VerifyFarmer { farmer_id, status })
            .await
    }

    /// Admin only
    pub async fn certify_produce(&self, produce_id: u64, certified: bool) -> Result<Submitted> {
        let contract = self.preflight()?;
        let produce_id = validation::record_id("produce id", produce_id)?;

        self.submit(
            contract,
            LedgerCall::CertifyProduce {
                produce_id,
                certified,
            },
        )
        .await
    }

    /// Admin only
    pub async fn pause(&self) -> Result<Submitted> {
        let contract = self.preflight()?;
        self.submit(contract, LedgerCall::Pause).await
    }

    /// Admin only
    pub async fn unpause(&self) -> Result<Submitted> {
        let contract = self.preflight()?;
        self.submit(contract, LedgerCall::Unpause).await
    }

    // ===== Confirmation =====

    /// Poll until the transaction is included
    ///
    /// Returns `Confirmed` or `Reverted`. Gives up with `Timeout` after the
    /// confirmation timeout. Transport failures while polling are logged and
    /// polling continues.
    pub async fn confirm(&self, submitted: &Submitted) -> Result<TxStatus> {
        self.target.address()?;
        self.confirm_within(&submitted.tx_hash).await
    }

    /// [`Self::confirm`] for a transaction known only by its hash
    pub async fn confirm_tx(&self, tx_hash: &str) -> Result<TxStatus> {
        self.target.address()?;
        let tx_hash = validation::tx_hash(tx_hash)?;
        self.confirm_within(&tx_hash).await
    }

    /// Like [`Self::confirm`], but a revert is an error
    pub async fn wait(&self, submitted: &Submitted) -> Result<Confirmed> {
        match self.confirm(submitted).await? {
            TxStatus::Confirmed {
                tx_hash,
                block_number,
            } => Ok(Confirmed {
                tx_hash,
                block_number,
            }),
            TxStatus::Reverted { reason, .. } => Err(LedgerError::ContractRevert {
                reason: reason.unwrap_or_else(|| UNKNOWN_REVERT_REASON.to_string()),
            }),
            TxStatus::Submitted { tx_hash } => Err(LedgerError::Transport(format!(
                "{} is still pending",
                tx_hash
            ))),
        }
    }

    /// Like [`Self::confirm`], but stop waiting once `cancel` completes
    ///
    /// A cancelled wait returns `TxStatus::Submitted`. The transaction is not
    /// withdrawn and may still be included or revert later.
    pub async fn confirm_until<C>(&self, submitted: &Submitted, cancel: C) -> Result<TxStatus>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            result = self.confirm(submitted) => result,
            _ = cancel => {
                info!(
                    "Stopped waiting for {}; it may still be included",
                    submitted.tx_hash
                );
                Ok(TxStatus::Submitted {
                    tx_hash: submitted.tx_hash.clone(),
                })
            }
        }
    }

    /// Current status of a transaction, one receipt lookup
    pub async fn status(&self, tx_hash: &str) -> Result<TxStatus> {
        self.target.address()?;
        let tx_hash = validation::tx_hash(tx_hash)?;

        let receipt = bounded(self.config.rpc_timeout(), self.ledger.receipt(&tx_hash)).await?;
        Ok(match receipt {
            Some(receipt) => TxStatus::from_receipt(receipt),
            None => TxStatus::Submitted { tx_hash },
        })
    }

    // ===== Internals =====

    fn preflight(&self) -> Result<&ContractAddress> {
        let contract = self.target.address()?;
        if self.ledger.signer().is_none() {
            return Err(LedgerError::WalletNotConnected);
        }
        Ok(contract)
    }

    async fn submit(&self, contract: &ContractAddress, call: LedgerCall) -> Result<Submitted> {
        info!("Submitting {} to {}", call, contract);

        let tx_hash = match bounded(self.config.rpc_timeout(), self.ledger.submit(contract, &call))
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(LedgerError::ContractRevert { reason }) => {
                warn!("{} rejected: {}", call.function_name(), reason);
                return Err(LedgerError::ContractRevert { reason });
            }
            Err(e) => {
                warn!("Failed to submit {}: {}", call.function_name(), e);
                return Err(e);
            }
        };

        info!("{} submitted: {}", call.function_name(), tx_hash);
        Ok(Submitted { tx_hash, call })
    }

    async fn confirm_within(&self, tx_hash: &str) -> Result<TxStatus> {
        let limit = self.config.confirmation_timeout();

        match tokio::time::timeout(limit, self.poll_until_final(tx_hash)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Gave up waiting for {} after {}s", tx_hash, limit.as_secs());
                Err(LedgerError::Timeout(limit.as_secs()))
            }
        }
    }

    async fn poll_until_final(&self, tx_hash: &str) -> Result<TxStatus> {
        loop {
            match bounded(self.config.rpc_timeout(), self.ledger.receipt(tx_hash)).await {
                Ok(Some(receipt)) => {
                    let status = TxStatus::from_receipt(receipt);
                    match &status {
                        TxStatus::Reverted { .. } => warn!("{}", status),
                        _ => info!("{}", status),
                    }
                    return Ok(status);
                }
                Ok(None) => debug!("{} still pending", tx_hash),
                Err(e) if e.is_retriable() => {
                    warn!("Receipt lookup for {} failed, will retry: {}", tx_hash, e)
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}
