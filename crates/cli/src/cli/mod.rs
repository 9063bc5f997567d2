mod commands;
pub mod read;
pub mod tx;
pub mod write;

// Re-export all items from commands module
pub use commands::*;

use crate::error::Result;
use crate::output::Output;
use agrosafe_adapter::{AdapterConfig, ContractTarget, Ledger, ReadAdapter, WriteAdapter};
use std::sync::Arc;

/// Adapters and output settings shared by every command handler
pub struct Session<L: Ledger + ?Sized> {
    pub read: ReadAdapter<L>,
    pub write: WriteAdapter<L>,
    pub output: Output,
}

impl<L: Ledger + ?Sized> Session<L> {
    pub fn new(
        ledger: Arc<L>,
        target: ContractTarget,
        config: AdapterConfig,
        output: Output,
    ) -> Result<Self> {
        Ok(Self {
            read: ReadAdapter::new(Arc::clone(&ledger), target.clone(), config.clone())?,
            write: WriteAdapter::new(ledger, target, config)?,
            output,
        })
    }
}

/// Run one command, returning what should be printed on success
pub async fn dispatch<L: Ledger + ?Sized>(session: &Session<L>, command: Commands) -> Result<String> {
    match command {
        Commands::Register {
            name,
            location,
            wait,
        } => write::handle_register_command(session, &name, &location, wait).await,
        Commands::RecordProduce {
            crop_type,
            harvest_date,
            wait,
        } => write::handle_record_produce_command(session, &crop_type, &harvest_date, wait).await,
        Commands::VerifyFarmer {
            farmer_id,
            revoke,
            wait,
        } => write::handle_verify_farmer_command(session, farmer_id, !revoke, wait).await,
        Commands::CertifyProduce {
            produce_id,
            revoke,
            wait,
        } => write::handle_certify_produce_command(session, produce_id, !revoke, wait).await,
        Commands::Pause { wait } => write::handle_pause_command(session, true, wait).await,
        Commands::Unpause { wait } => write::handle_pause_command(session, false, wait).await,
        Commands::Farmer { farmer_id } => read::handle_farmer_command(session, farmer_id).await,
        Commands::Produce { produce_id } => read::handle_produce_command(session, produce_id).await,
        Commands::Trace { produce_id } => read::handle_trace_command(session, produce_id).await,
        Commands::Farmers { offset, limit } => {
            read::handle_farmers_command(session, offset, limit).await
        }
        Commands::ProduceList {
            farmer,
            offset,
            limit,
        } => read::handle_produce_list_command(session, farmer, offset, limit).await,
        Commands::Whoami => read::handle_whoami_command(session).await,
        Commands::Summary => read::handle_summary_command(session).await,
        Commands::Confirm { tx_hash } => tx::handle_confirm_command(session, &tx_hash).await,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use clap::Parser;

    async fn run(session: &Session<agrosafe_ledger_memory::MemoryLedger>, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("agrosafe").chain(args.iter().copied()))
            .unwrap();
        dispatch(session, cli.command).await
    }

    #[tokio::test]
    async fn test_register_verify_and_read_through_commands() {
        let ledger = deploy();
        let farmer = session(ledger.connect_as(FARMER), true);
        let admin = session(ledger.clone(), true);

        run(
            &farmer,
            &["register", "--name", "Ada Lovelace", "--location", "Kent, UK", "--wait"],
        )
        .await
        .unwrap();
        run(&admin, &["verify-farmer", "1", "--wait"]).await.unwrap();

        let shown = run(&farmer, &["farmer", "1"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["verified"], true);

        let summary = run(&farmer, &["summary"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(value["total_farmers"], 1);
        assert_eq!(value["total_produce"], 0);
    }

    #[tokio::test]
    async fn test_revoke_flag_sends_false() {
        let ledger = deploy();
        let farmer = session(ledger.connect_as(FARMER), false);
        let admin = session(ledger.clone(), false);

        run(
            &farmer,
            &["register", "--name", "Ada Lovelace", "--location", "Kent, UK", "--wait"],
        )
        .await
        .unwrap();
        run(&admin, &["verify-farmer", "1", "--revoke"]).await.unwrap();

        assert_eq!(
            ledger.submitted_calls().last(),
            Some(&agrosafe_adapter::LedgerCall::VerifyFarmer {
                farmer_id: 1,
                status: false
            })
        );
    }
}
