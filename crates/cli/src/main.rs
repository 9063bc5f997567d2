mod cli;
mod config;
mod error;
mod output;

use crate::cli::{Cli, Session};
use crate::config::AgroSafeConfig;
use crate::error::{CliError, Result};
use crate::output::Output;
use agrosafe_adapter::ContractTarget;
use agrosafe_ledger_ethereum::EthereumLedger;
use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = Output::new(cli.json);
    match run(cli).await {
        Ok(printed) => println!("{}", printed),
        Err(e) => {
            if output.json {
                match serde_json::to_string_pretty(&e.report()) {
                    Ok(report) => eprintln!("{}", report),
                    Err(_) => eprintln!("{}", e),
                }
            } else {
                eprintln!("❌ {}", e.user_message());
            }
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = AgroSafeConfig::load(&cli.connection)?;
    config.validate().map_err(CliError::Config)?;

    let target = config.resolve_target();
    match &target {
        ContractTarget::Resolved { address, source } => {
            debug!("Using contract {} from {}", address, source)
        }
        ContractTarget::Unresolved { reason } => debug!("No contract address: {}", reason),
    }

    let ledger = Arc::new(EthereumLedger::new(config.ledger)?);
    let session = Session::new(ledger, target, config.adapter, Output::new(cli.json))?;

    cli::dispatch(&session, cli.command).await
}
