//! Ledger backend identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enum representing the available ledger backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerBackend {
    /// EVM chain reached over JSON-RPC
    Ethereum,
    /// In-process ledger
    Memory,
}

impl fmt::Display for LedgerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "Ethereum"),
            Self::Memory => write!(f, "Memory"),
        }
    }
}

impl LedgerBackend {
    /// Check if calls leave the process
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Ethereum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_display() {
        assert_eq!(LedgerBackend::Ethereum.to_string(), "Ethereum");
        assert_eq!(LedgerBackend::Memory.to_string(), "Memory");
    }

    #[test]
    fn test_is_remote() {
        assert!(LedgerBackend::Ethereum.is_remote());
        assert!(!LedgerBackend::Memory.is_remote());
    }
}
