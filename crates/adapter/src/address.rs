//! Contract address resolution
//!
//! Sources are consulted in order and the first non-empty one wins:
//!
//! 1. runtime slot: a value handed over at start-up (CLI flag, config file)
//! 2. `AGROSAFE_CONTRACT_ADDRESS` from the process environment
//! 3. `AGROSAFE_CONTRACT_ADDRESS` as it was when the crate was built
//! 4. [`FALLBACK_CONTRACT_ADDRESS`]
//!
//! The all-zero address counts as empty. A malformed value stops the search
//! and leaves the target unresolved.

use agrosafe_ledger_trait::{ContractAddress, LedgerError, Result};
use std::fmt;
use tracing::debug;

/// Environment variable holding the deployed contract address
pub const CONTRACT_ADDRESS_ENV: &str = "AGROSAFE_CONTRACT_ADDRESS";

/// Hardcoded last resort, empty: there is no canonical deployment
pub const FALLBACK_CONTRACT_ADDRESS: &str = "";

const BUILD_CONTRACT_ADDRESS: Option<&str> = option_env!("AGROSAFE_CONTRACT_ADDRESS");

/// Where a resolved address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    Runtime,
    Environment,
    BuildEnvironment,
    Fallback,
}

impl fmt::Display for AddressSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime => write!(f, "runtime configuration"),
            Self::Environment => write!(f, "{}", CONTRACT_ADDRESS_ENV),
            Self::BuildEnvironment => write!(f, "build-time {}", CONTRACT_ADDRESS_ENV),
            Self::Fallback => write!(f, "built-in fallback"),
        }
    }
}

/// Outcome of address resolution, shared read-only by both adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractTarget {
    Resolved {
        address: ContractAddress,
        source: AddressSource,
    },
    Unresolved {
        reason: String,
    },
}

impl ContractTarget {
    /// Address to call, or the configuration error to fail with
    pub fn address(&self) -> Result<&ContractAddress> {
        match self {
            Self::Resolved { address, .. } => Ok(address),
            Self::Unresolved { reason } => Err(LedgerError::Configuration(reason.clone())),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Collects candidate addresses and picks one
#[derive(Debug, Clone, Default)]
pub struct AddressResolver {
    runtime: Option<String>,
    environment: Option<String>,
    build_environment: Option<String>,
    fallback: Option<String>,
}

impl AddressResolver {
    /// Resolver with no sources at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolver reading the process and build environments plus the fallback
    pub fn from_environment() -> Self {
        Self {
            runtime: None,
            environment: std::env::var(CONTRACT_ADDRESS_ENV).ok(),
            build_environment: BUILD_CONTRACT_ADDRESS.map(str::to_string),
            fallback: Some(FALLBACK_CONTRACT_ADDRESS.to_string()),
        }
    }

    pub fn with_runtime(mut self, value: Option<String>) -> Self {
        self.runtime = value;
        self
    }

    pub fn with_environment(mut self, value: Option<String>) -> Self {
        self.environment = value;
        self
    }

    pub fn with_build_environment(mut self, value: Option<String>) -> Self {
        self.build_environment = value;
        self
    }

    pub fn with_fallback(mut self, value: Option<String>) -> Self {
        self.fallback = value;
        self
    }

    /// Pick the first usable source
    pub fn resolve(&self) -> ContractTarget {
        let candidates = [
            (AddressSource::Runtime, &self.runtime),
            (AddressSource::Environment, &self.environment),
            (AddressSource::BuildEnvironment, &self.build_environment),
            (AddressSource::Fallback, &self.fallback),
        ];

        for (source, value) in candidates {
            let Some(value) = value.as_deref().map(str::trim) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            match ContractAddress::parse(value) {
                Ok(address) if address.is_zero() => {
                    debug!("Ignoring all-zero contract address from {}", source);
                }
                Ok(address) => {
                    debug!("Resolved contract address {} from {}", address, source);
                    return ContractTarget::Resolved { address, source };
                }
                Err(e) => {
                    return ContractTarget::Unresolved {
                        reason: format!("{} from {}", e, source),
                    };
                }
            }
        }

        ContractTarget::Unresolved {
            reason: format!(
                "no contract address configured - set {} or pass --contract-address",
                CONTRACT_ADDRESS_ENV
            ),
        }
    }
}
