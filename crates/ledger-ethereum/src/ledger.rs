//! `Ledger` implementation for Ethereum and EVM-compatible chains
//!
//! Each call is a separate RPC round trip on a freshly built provider. There
//! is no batching, no background task and no local state beyond the
//! configuration.

use crate::abi::{self, FARMERS_FN, IAgroSafe, PRODUCE_FN};
use crate::config::EthereumLedgerConfig;
use crate::contract::ContractClient;
use crate::conversions::{record_from_outputs, tx_hash_to_string, u256_to_u64};
use crate::error::{contract_error, replayed_revert_reason, rpc_error};
use agrosafe_ledger_trait::*;
use alloy::contract::{ContractInstance, Interface};
use alloy::consensus::Transaction as SignedTransaction;
use alloy::dyn_abi::DynSolValue;
use alloy::eips::BlockId;
use alloy::json_abi::JsonAbi;
use alloy::network::{Ethereum, TransactionBuilder, TransactionResponse};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Ethereum ledger backend
///
/// # Example
///
/// ```ignore
/// use agrosafe_ledger_ethereum::{EthereumLedger, EthereumLedgerConfig};
///
/// let ledger = EthereumLedger::new(EthereumLedgerConfig {
///     rpc_url: "http://localhost:8545".to_string(),
///     private_key: Some("0xYourPrivateKey".to_string()),
///     ..Default::default()
/// })?;
/// let total = ledger.total_farmers(&contract).await?;
/// ```
pub struct EthereumLedger {
    /// Contract client with connection details
    client: Arc<ContractClient>,

    /// ABI used for the `farmers` / `produce` getters
    record_abi: JsonAbi,
}

impl EthereumLedger {
    /// Create a new Ethereum ledger
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - Private key is invalid (if provided)
    /// - The ABI artifact cannot be loaded (if configured)
    pub fn new(config: EthereumLedgerConfig) -> Result<Self> {
        info!(
            "Initializing Ethereum ledger for chain {} at {}",
            config.chain_id, config.rpc_url
        );

        config.validate().map_err(LedgerError::Configuration)?;

        let record_abi = match &config.abi_path {
            Some(path) => {
                debug!("Loading record ABI from {}", path.display());
                abi::load_artifact_abi(path)?
            }
            None => abi::builtin_record_abi()?,
        };

        let client = Arc::new(ContractClient::new(config)?);

        info!(
            "Ethereum ledger initialized ({})",
            if client.has_wallet() {
                "read-write"
            } else {
                "read-only"
            }
        );

        Ok(Self { client, record_abi })
    }

    /// Configured chain ID
    pub fn chain_id(&self) -> u64 {
        self.client.chain_id()
    }

    /// Compare the node's chain ID with the configured one
    pub async fn check_chain_id(&self) -> Result<u64> {
        let provider = self.client.create_provider()?;
        let actual = provider.get_chain_id().await.map_err(rpc_error)?;

        if actual != self.client.chain_id() {
            return Err(LedgerError::Configuration(format!(
                "RPC endpoint is on chain {}, configuration expects {}",
                actual,
                self.client.chain_id()
            )));
        }

        Ok(actual)
    }

    /// Call one of the record getters through the dynamic ABI
    async fn read_record(
        &self,
        contract: &ContractAddress,
        function: &str,
        record_id: u64,
    ) -> Result<RawRecord> {
        let address = ContractClient::contract_address(contract)?;
        let getter = abi::record_getter(&self.record_abi, function)?;

        let provider = self.client.create_provider()?;
        let instance: ContractInstance<_, Ethereum> =
            ContractInstance::new(address, provider, Interface::new(self.record_abi.clone()));

        let outputs = instance
            .function(function, &[DynSolValue::Uint(U256::from(record_id), 256)])
            .map_err(contract_error)?
            .call()
            .await
            .map_err(contract_error)?;

        record_from_outputs(&getter.outputs, outputs)
    }
}

#[async_trait]
impl Ledger for EthereumLedger {
    fn backend(&self) -> LedgerBackend {
        LedgerBackend::Ethereum
    }

    fn signer(&self) -> Option<String> {
        self.client.signer_address()
    }

    // ===== Read operations =====

    async fn farmer(&self, contract: &ContractAddress, farmer_id: u64) -> Result<RawRecord> {
        debug!("Fetching farmer {} from {}", farmer_id, contract);
        self.read_record(contract, FARMERS_FN, farmer_id).await
    }

    async fn produce(&self, contract: &ContractAddress, produce_id: u64) -> Result<RawRecord> {
        debug!("Fetching produce {} from {}", produce_id, contract);
        self.read_record(contract, PRODUCE_FN, produce_id).await
    }

    async fn total_farmers(&self, contract: &ContractAddress) -> Result<u64> {
        let provider = self.client.create_provider()?;
        let agrosafe = IAgroSafe::new(ContractClient::contract_address(contract)?, &provider);

        let total = agrosafe
            .totalFarmers()
            .call()
            .await
            .map_err(contract_error)?;

        u256_to_u64(total)
    }

    async fn total_produce(&self, contract: &ContractAddress) -> Result<u64> {
        let provider = self.client.create_provider()?;
        let agrosafe = IAgroSafe::new(ContractClient::contract_address(contract)?, &provider);

        let total = agrosafe
            .totalProduce()
            .call()
            .await
            .map_err(contract_error)?;

        u256_to_u64(total)
    }

    async fn farmer_id_by_wallet(&self, contract: &ContractAddress, wallet: &str) -> Result<u64> {
        let wallet = Address::from_str(wallet)
            .map_err(|e| LedgerError::validation("wallet", e.to_string()))?;

        let provider = self.client.create_provider()?;
        let agrosafe = IAgroSafe::new(ContractClient::contract_address(contract)?, &provider);

        let farmer_id = agrosafe
            .farmerIdByWallet(wallet)
            .call()
            .await
            .map_err(contract_error)?;

        u256_to_u64(farmer_id)
    }

    // ===== Write operations =====

    async fn submit(&self, contract: &ContractAddress, call: &LedgerCall) -> Result<TxHash> {
        debug!("Sending {} to {}", call, contract);

        let provider = self.client.create_provider_with_signer()?;
        let agrosafe = IAgroSafe::new(ContractClient::contract_address(contract)?, &provider);

        let pending_tx = match call {
            LedgerCall::RegisterFarmer { name, location } => {
                agrosafe
                    .registerFarmer(name.clone(), location.clone())
                    .send()
                    .await
            }
            LedgerCall::VerifyFarmer { farmer_id, status } => {
                agrosafe
                    .verifyFarmer(U256::from(*farmer_id), *status)
                    .send()
                    .await
            }
            LedgerCall::RecordProduce {
                crop_type,
                harvest_date,
            } => {
                agrosafe
                    .recordProduce(crop_type.clone(), harvest_date.clone())
                    .send()
                    .await
            }
            LedgerCall::CertifyProduce {
                produce_id,
                certified,
            } => {
                agrosafe
                    .certifyProduce(U256::from(*produce_id), *certified)
                    .send()
                    .await
            }
            LedgerCall::Pause => agrosafe.pause().send().await,
            LedgerCall::Unpause => agrosafe.unpause().send().await,
        }
        .map_err(contract_error)?;

        let tx_hash = tx_hash_to_string(*pending_tx.tx_hash());
        debug!("{} sent with tx hash: {}", call.function_name(), tx_hash);
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>> {
        let hash = alloy::primitives::TxHash::from_str(tx_hash)
            .map_err(|e| LedgerError::validation("transaction hash", e.to_string()))?;

        let provider = self.client.create_provider()?;

        let Some(receipt) = provider
            .get_transaction_receipt(hash)
            .await
            .map_err(rpc_error)?
        else {
            return Ok(None);
        };

        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };

        let latest = provider.get_block_number().await.map_err(rpc_error)?;
        let confirmations = latest.saturating_sub(block_number) + 1;
        let required = self.client.config.confirmation_blocks;
        if confirmations < required {
            debug!(
                "{} has {}/{} confirmations",
                tx_hash, confirmations, required
            );
            return Ok(None);
        }

        let success = receipt.status();
        let revert_reason = if success {
            None
        } else {
            self.replay_revert_reason(&provider, hash, block_number).await
        };

        Ok(Some(TxReceipt {
            tx_hash: tx_hash_to_string(receipt.transaction_hash),
            block_number,
            success,
            revert_reason,
        }))
    }
}

impl EthereumLedger {
    /// Re-run a reverted transaction as `eth_call` against the parent block
    ///
    /// Receipts carry no revert data, so the reason is recovered from the
    /// replayed call's error. Any lookup failure leaves the reason unknown.
    async fn replay_revert_reason(
        &self,
        provider: &impl Provider,
        hash: alloy::primitives::TxHash,
        block_number: u64,
    ) -> Option<String> {
        let tx = match provider.get_transaction_by_hash(hash).await {
            Ok(Some(tx)) => tx,
            Ok(None) => return None,
            Err(e) => {
                debug!("Cannot fetch {} for replay: {}", hash, e);
                return None;
            }
        };

        let mut request = TransactionRequest::default()
            .with_from(TransactionResponse::from(&tx))
            .with_input(SignedTransaction::input(&tx).clone())
            .with_value(SignedTransaction::value(&tx));
        if let Some(to) = SignedTransaction::to(&tx) {
            request = request.with_to(to);
        }

        match provider
            .call(request)
            .block(BlockId::number(block_number.saturating_sub(1)))
            .await
        {
            Ok(_) => {
                debug!("Replay of {} succeeded, revert reason unavailable", hash);
                None
            }
            Err(e) => replayed_revert_reason(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn contract() -> ContractAddress {
        ContractAddress::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap()
    }

    #[test]
    fn test_new_read_only() {
        let ledger = EthereumLedger::new(EthereumLedgerConfig::default()).unwrap();
        assert_eq!(ledger.backend(), LedgerBackend::Ethereum);
        assert_eq!(ledger.signer(), None);
        assert_eq!(ledger.chain_id(), 31337);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EthereumLedgerConfig {
            confirmation_blocks: 0,
            ..Default::default()
        };
        assert!(matches!(
            EthereumLedger::new(config),
            Err(LedgerError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_with_missing_artifact() {
        let config = EthereumLedgerConfig {
            abi_path: Some("/nonexistent/AgroSafe.json".into()),
            ..Default::default()
        };
        assert!(EthereumLedger::new(config).is_err());
    }

    #[test]
    fn test_new_with_artifact() {
        let path = std::env::temp_dir().join(format!("agrosafe-abi-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "{}",
            serde_json::json!([
                {
                    "type": "function", "name": "farmers", "stateMutability": "view",
                    "inputs": [{ "name": "", "type": "uint256" }],
                    "outputs": [{ "name": "id", "type": "uint256" }]
                },
                {
                    "type": "function", "name": "produce", "stateMutability": "view",
                    "inputs": [{ "name": "", "type": "uint256" }],
                    "outputs": [{ "name": "id", "type": "uint256" }]
                }
            ])
        )
        .unwrap();

        let config = EthereumLedgerConfig {
            abi_path: Some(path.clone()),
            ..Default::default()
        };
        let ledger = EthereumLedger::new(config);
        std::fs::remove_file(&path).ok();
        assert!(ledger.is_ok());
    }

    #[tokio::test]
    async fn test_read_only_submit_is_wallet_error() {
        let ledger = EthereumLedger::new(EthereumLedgerConfig::default()).unwrap();
        let err = ledger
            .submit(&contract(), &LedgerCall::Pause)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::WalletNotConnected);
    }

    #[tokio::test]
    async fn test_malformed_tx_hash() {
        let ledger = EthereumLedger::new(EthereumLedgerConfig::default()).unwrap();
        let err = ledger.receipt("0x1234").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
