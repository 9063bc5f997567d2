use agrosafe_ledger_trait::{LedgerError, Result};
use std::future::Future;
use std::time::Duration;

/// Run one ledger round trip under `limit`
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout(limit.as_secs())),
    }
}
