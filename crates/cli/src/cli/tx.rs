use super::Session;
use crate::error::Result;
use crate::output;
use agrosafe_adapter::{Ledger, LedgerError, TxStatus, UNKNOWN_REVERT_REASON};
use tracing::info;

pub async fn handle_confirm_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    tx_hash: &str,
) -> Result<String> {
    let status = tokio::select! {
        status = session.write.confirm_tx(tx_hash) => status?,
        _ = interrupted() => {
            info!("Stopped waiting for {}", tx_hash);
            session.write.status(tx_hash).await?
        }
    };

    let status = settle(status)?;
    session.output.render(&status, output::status)
}

/// A reverted transaction is a failed command
pub(crate) fn settle(status: TxStatus) -> Result<TxStatus> {
    match status {
        TxStatus::Reverted { reason, .. } => Err(LedgerError::ContractRevert {
            reason: reason.unwrap_or_else(|| UNKNOWN_REVERT_REASON.to_string()),
        }
        .into()),
        status => Ok(status),
    }
}

/// Completes on Ctrl-C; never, if the handler cannot be installed
pub(crate) async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
