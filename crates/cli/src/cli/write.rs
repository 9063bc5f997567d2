use super::Session;
use super::tx::{interrupted, settle};
use crate::error::Result;
use crate::output;
use agrosafe_adapter::{Ledger, Submitted};
use tracing::info;

pub async fn handle_register_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    name: &str,
    location: &str,
    wait: bool,
) -> Result<String> {
    let submitted = session.write.register_farmer(name, location).await?;
    finish(session, submitted, wait).await
}

pub async fn handle_record_produce_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    crop_type: &str,
    harvest_date: &str,
    wait: bool,
) -> Result<String> {
    let submitted = session.write.record_produce(crop_type, harvest_date).await?;
    finish(session, submitted, wait).await
}

pub async fn handle_verify_farmer_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    farmer_id: u64,
    status: bool,
    wait: bool,
) -> Result<String> {
    let submitted = session.write.verify_farmer(farmer_id, status).await?;
    finish(session, submitted, wait).await
}

pub async fn handle_certify_produce_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    produce_id: u64,
    certified: bool,
    wait: bool,
) -> Result<String> {
    let submitted = session.write.certify_produce(produce_id, certified).await?;
    finish(session, submitted, wait).await
}

pub async fn handle_pause_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    paused: bool,
    wait: bool,
) -> Result<String> {
    let submitted = if paused {
        session.write.pause().await?
    } else {
        session.write.unpause().await?
    };
    finish(session, submitted, wait).await
}

/// Print the handle, or wait for inclusion when `--wait` was given
///
/// Ctrl-C stops the wait without withdrawing the transaction.
async fn finish<L: Ledger + ?Sized>(
    session: &Session<L>,
    submitted: Submitted,
    wait: bool,
) -> Result<String> {
    if !wait {
        return session.output.render(&submitted, output::submitted);
    }

    info!("Waiting for {} to be confirmed", submitted.tx_hash);
    let status = session
        .write
        .confirm_until(&submitted, interrupted())
        .await?;

    let status = settle(status)?;
    session.output.render(&status, output::status)
}
