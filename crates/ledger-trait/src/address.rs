//! Contract and wallet address handling

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The all-zero address, never a valid contract target
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Check that `value` is `0x` followed by exactly 40 hex characters
pub fn is_valid_address(value: &str) -> bool {
    value.len() == 42
        && (value.starts_with("0x") || value.starts_with("0X"))
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validated contract address, stored lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress(String);

impl ContractAddress {
    /// Parse and validate a contract address
    ///
    /// Surrounding whitespace is ignored. Anything that is not a 20-byte hex
    /// address is a configuration error.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(LedgerError::Configuration(
                "contract address cannot be empty".to_string(),
            ));
        }

        if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
            return Err(LedgerError::Configuration(format!(
                "contract address must start with 0x, got '{}'",
                trimmed
            )));
        }

        if trimmed.len() != 42 {
            return Err(LedgerError::Configuration(format!(
                "contract address must be 42 characters (0x + 40 hex), got {}",
                trimmed.len()
            )));
        }

        if !is_valid_address(trimmed) {
            return Err(LedgerError::Configuration(
                "contract address must contain only hex characters after 0x".to_string(),
            ));
        }

        Ok(Self(format!("0x{}", trimmed[2..].to_ascii_lowercase())))
    }

    /// Lowercase `0x`-prefixed form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the all-zero address
    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContractAddress {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ContractAddress> for String {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}
