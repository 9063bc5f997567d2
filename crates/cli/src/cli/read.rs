use super::Session;
use crate::error::Result;
use crate::output;
use agrosafe_adapter::{ContractTarget, Farmer, Ledger, LedgerError};
use serde::Serialize;
use std::fmt::Write;

pub async fn handle_farmer_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    farmer_id: u64,
) -> Result<String> {
    let farmer = session.read.get_farmer_by_id(farmer_id).await?;
    session.output.render(&farmer, output::farmer)
}

pub async fn handle_produce_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    produce_id: u64,
) -> Result<String> {
    let produce = session.read.get_produce(produce_id).await?;
    session.output.render(&produce, output::produce)
}

pub async fn handle_trace_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    produce_id: u64,
) -> Result<String> {
    let trace = session.read.trace_produce(produce_id).await?;
    session.output.render(&trace, output::trace)
}

pub async fn handle_farmers_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    offset: u64,
    limit: u64,
) -> Result<String> {
    let farmers = session.read.list_farmers(offset, limit).await?;
    session.output.render(farmers.as_slice(), output::farmers)
}

pub async fn handle_produce_list_command<L: Ledger + ?Sized>(
    session: &Session<L>,
    farmer: Option<u64>,
    offset: u64,
    limit: u64,
) -> Result<String> {
    let produce = match farmer {
        Some(farmer_id) => {
            session
                .read
                .list_produce_by_farmer(farmer_id, offset, limit)
                .await?
        }
        None => session.read.list_produce(offset, limit).await?,
    };
    session.output.render(produce.as_slice(), output::produce_list)
}

pub async fn handle_summary_command<L: Ledger + ?Sized>(session: &Session<L>) -> Result<String> {
    let summary = session.read.summary().await?;
    session.output.render(&summary, output::summary)
}

/// Signing wallet, the contract it talks to, and its farmer record if any
#[derive(Debug, Serialize)]
pub struct Identity {
    pub contract: String,
    pub contract_source: String,
    pub wallet: String,
    pub farmer: Option<Farmer>,
}

pub async fn handle_whoami_command<L: Ledger + ?Sized>(session: &Session<L>) -> Result<String> {
    let (contract, source) = match session.read.target() {
        ContractTarget::Resolved { address, source } => (address.to_string(), source.to_string()),
        ContractTarget::Unresolved { reason } => {
            return Err(LedgerError::Configuration(reason.clone()).into());
        }
    };
    let wallet = session
        .write
        .signer()
        .ok_or(LedgerError::WalletNotConnected)?;

    let farmer = match session.read.get_farmer_id_by_wallet(&wallet).await? {
        0 => None,
        farmer_id => Some(session.read.get_farmer_by_id(farmer_id).await?),
    };

    let identity = Identity {
        contract,
        contract_source: source,
        wallet,
        farmer,
    };

    session.output.render(&identity, |identity| {
        let mut out = format!(
            "👤 {}\n  Contract: {} (from {})",
            identity.wallet, identity.contract, identity.contract_source
        );
        match &identity.farmer {
            Some(farmer) => {
                let _ = write!(out, "\n{}", output::farmer(farmer));
            }
            None => out.push_str("\n  Not registered as a farmer"),
        }
        out
    })
}
