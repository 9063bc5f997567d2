use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agrosafe")]
#[command(about = "AgroSafe traceability ledger CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the ledger lives and who signs
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Configuration file; a missing default file is not an error
    #[arg(long, global = true, env = "AGROSAFE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Contract address, takes precedence over the environment
    #[arg(long, global = true)]
    pub contract_address: Option<String>,

    #[arg(long, global = true, env = "AGROSAFE_RPC_URL")]
    pub rpc_url: Option<String>,

    #[arg(long, global = true, env = "AGROSAFE_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Signing key; without one only reads are possible
    #[arg(long, global = true, env = "AGROSAFE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the connected wallet as a farmer
    Register {
        /// Farmer name, 2-100 characters
        #[arg(long)]
        name: String,

        /// Farm location, 2-200 characters
        #[arg(long)]
        location: String,

        /// Wait for the transaction to be confirmed
        #[arg(long)]
        wait: bool,
    },

    /// Record a harvest for the connected (verified) farmer
    RecordProduce {
        /// Crop type, 2-100 characters
        #[arg(long)]
        crop_type: String,

        /// Harvest date as YYYY-MM-DD, not in the future
        #[arg(long)]
        harvest_date: String,

        #[arg(long)]
        wait: bool,
    },

    /// Verify a farmer (admin only)
    VerifyFarmer {
        farmer_id: u64,

        /// Withdraw verification instead of granting it
        #[arg(long)]
        revoke: bool,

        #[arg(long)]
        wait: bool,
    },

    /// Certify a produce record (admin only)
    CertifyProduce {
        produce_id: u64,

        /// Withdraw certification instead of granting it
        #[arg(long)]
        revoke: bool,

        #[arg(long)]
        wait: bool,
    },

    /// Stop all farmer and produce writes (admin only)
    Pause {
        #[arg(long)]
        wait: bool,
    },

    /// Resume writes after a pause (admin only)
    Unpause {
        #[arg(long)]
        wait: bool,
    },

    /// Show a farmer by id
    Farmer { farmer_id: u64 },

    /// Show a produce record by id
    Produce { produce_id: u64 },

    /// Show a produce record together with the farmer who recorded it
    Trace { produce_id: u64 },

    /// List registered farmers
    Farmers {
        /// Number of records to skip
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Maximum number of records, 1-100
        #[arg(long, default_value = "20")]
        limit: u64,
    },

    /// List recorded produce
    ProduceList {
        /// Only produce recorded by this farmer
        #[arg(long)]
        farmer: Option<u64>,

        #[arg(long, default_value = "0")]
        offset: u64,

        #[arg(long, default_value = "20")]
        limit: u64,
    },

    /// Show the signing wallet and its farmer record
    Whoami,

    /// Show ledger totals
    Summary,

    /// Wait for a transaction and report its outcome
    Confirm {
        /// Transaction hash, 0x followed by 64 hex characters
        tx_hash: String,
    },
}
