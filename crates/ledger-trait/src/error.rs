//! Error types for ledger operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors surfaced by ledger backends and the adapters built on them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Contract address unresolved or configuration invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Write attempted without a signing identity
    #[error("Wallet not connected - write operations require a signing identity")]
    WalletNotConnected,

    /// Local input check failed before anything was sent
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending input
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// RPC connection or network error
    #[error("RPC error: {0}")]
    Transport(String),

    /// RPC round trip or confirmation wait exceeded its bound
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Response did not match the contract schema
    #[error("Malformed ledger response: {0}")]
    Decode(String),

    /// Read returned the ledger's default record
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name (farmer, produce)
        entity: &'static str,
        /// Requested id
        id: String,
    },

    /// The contract rejected the transaction
    #[error("Transaction rejected by contract: {reason}")]
    ContractRevert {
        /// Revert reason as reported by the ledger
        reason: String,
    },
}

/// The six failure kinds callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Configuration,
    WalletNotConnected,
    Validation,
    Transport,
    NotFound,
    ContractRevert,
}

impl ErrorKind {
    /// Short copy suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration => "The AgroSafe contract address is not configured",
            Self::WalletNotConnected => "Connect your wallet to continue",
            Self::Validation => "Please check your input",
            Self::Transport => "Could not reach the network, please try again",
            Self::NotFound => "No matching record on the ledger",
            Self::ContractRevert => "The transaction was rejected by the network",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "ConfigurationError"),
            Self::WalletNotConnected => write!(f, "WalletNotConnectedError"),
            Self::Validation => write!(f, "ValidationError"),
            Self::Transport => write!(f, "TransportError"),
            Self::NotFound => write!(f, "NotFoundError"),
            Self::ContractRevert => write!(f, "ContractRevertError"),
        }
    }
}

impl LedgerError {
    /// Shorthand for a validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a missing record
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Kind used for user-facing branching
    ///
    /// Timeouts and malformed responses are transport failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::WalletNotConnected => ErrorKind::WalletNotConnected,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport(_) | Self::Timeout(_) | Self::Decode(_) => ErrorKind::Transport,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ContractRevert { .. } => ErrorKind::ContractRevert,
        }
    }

    /// Check if this error is retriable
    ///
    /// Only network failures qualify. A malformed response will be malformed
    /// again.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Check if this error indicates a configuration problem
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this error indicates a network problem
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Pull the revert reason out of an RPC error message
///
/// Nodes format reverts differently (geth, anvil, hardhat). Returns `None`
/// for a bare `execution reverted` without reason text.
pub fn extract_revert_reason(message: &str) -> Option<String> {
    const MARKERS: [(&str, &str); 3] = [
        ("reverted with reason string '", "'"),
        ("execution reverted: ", ", data:"),
        ("revert: ", ", data:"),
    ];

    for (marker, terminator) in MARKERS {
        let Some(start) = message.find(marker) else {
            continue;
        };
        let rest = &message[start + marker.len()..];
        let end = rest.find(terminator).unwrap_or(rest.len());
        let reason = rest[..end].trim().trim_matches('"').trim();
        // Anvil nests the solidity prefix: "execution reverted: revert: <reason>"
        let reason = reason.strip_prefix("revert: ").unwrap_or(reason).trim();
        if !reason.is_empty() {
            return Some(reason.to_string());
        }
    }

    None
}
