//! Transaction lifecycle types

use super::call::LedgerCall;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction hash, `0x`-prefixed hex
pub type TxHash = String;

/// Receipt of an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// Execution status, `false` when the contract reverted
    pub success: bool,
    /// Revert reason, when the backend can recover it
    pub revert_reason: Option<String>,
}

/// Handle for a transaction the ledger accepted but may not have included yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitted {
    pub tx_hash: TxHash,
    /// Call that was submitted
    pub call: LedgerCall,
}

/// A transaction known to be included and successful
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmed {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Where a submitted transaction stands
///
/// `Submitted` after an abandoned wait only means the caller stopped
/// looking. The transaction may still be included later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxStatus {
    Submitted {
        tx_hash: TxHash,
    },
    Confirmed {
        tx_hash: TxHash,
        block_number: u64,
    },
    Reverted {
        tx_hash: TxHash,
        reason: Option<String>,
    },
}

impl TxStatus {
    pub fn tx_hash(&self) -> &str {
        match self {
            Self::Submitted { tx_hash }
            | Self::Confirmed { tx_hash, .. }
            | Self::Reverted { tx_hash, .. } => tx_hash,
        }
    }

    /// Check if the transaction reached a final outcome
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Submitted { .. })
    }

    /// Status implied by a receipt
    pub fn from_receipt(receipt: TxReceipt) -> Self {
        if receipt.success {
            Self::Confirmed {
                tx_hash: receipt.tx_hash,
                block_number: receipt.block_number,
            }
        } else {
            Self::Reverted {
                tx_hash: receipt.tx_hash,
                reason: receipt.revert_reason,
            }
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted { tx_hash } => write!(f, "Submitted {}", tx_hash),
            Self::Confirmed {
                tx_hash,
                block_number,
            } => write!(f, "Confirmed {} in block {}", tx_hash, block_number),
            Self::Reverted {
                tx_hash,
                reason: Some(reason),
            } => write!(f, "Reverted {}: {}", tx_hash, reason),
            Self::Reverted {
                tx_hash,
                reason: None,
            } => write!(f, "Reverted {}", tx_hash),
        }
    }
}
