use agrosafe_ledger_trait::{ErrorKind, LedgerError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Error as printed with `--json`
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
    pub detail: String,
}

impl CliError {
    /// Ledger error kind, when there is one to branch on
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ledger(e) => Some(e.kind()),
            Self::Config(_) => Some(ErrorKind::Configuration),
            Self::Output(_) | Self::Other(_) => None,
        }
    }

    /// Process exit code, distinct per error kind
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            Some(ErrorKind::Configuration) => 2,
            Some(ErrorKind::WalletNotConnected) => 3,
            Some(ErrorKind::Validation) => 4,
            Some(ErrorKind::Transport) => 5,
            Some(ErrorKind::NotFound) => 6,
            Some(ErrorKind::ContractRevert) => 7,
            None => 1,
        }
    }

    /// One line for the user, the kind's message followed by the detail
    ///
    /// Revert reasons come through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Ledger(LedgerError::ContractRevert { reason }) => {
                format!("{}: {}", ErrorKind::ContractRevert.user_message(), reason)
            }
            Self::Ledger(LedgerError::Validation { field, message }) => {
                format!(
                    "{}: {} {}",
                    ErrorKind::Validation.user_message(),
                    field,
                    message
                )
            }
            Self::Ledger(LedgerError::WalletNotConnected) => {
                format!(
                    "{} (set AGROSAFE_PRIVATE_KEY or pass --private-key)",
                    ErrorKind::WalletNotConnected.user_message()
                )
            }
            other => match other.kind() {
                Some(kind) => format!("{}: {}", kind.user_message(), other),
                None => other.to_string(),
            },
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self
                .kind()
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "Error".to_string()),
            message: self.user_message(),
            detail: self.to_string(),
        }
    }
}
