use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledger - UTXO validation and batch commit
#[derive(Parser)]
#[command(name = "ledger")]
#[command(about = "Validate and apply transaction batches to an unspent-output snapshot")]
#[command(version)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration with a fresh genesis owner
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "ledger.json")]
        output: PathBuf,
    },

    /// Generate a new keypair
    Keygen {
        /// Output file for secret key
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the genesis snapshot described by a configuration file
    Genesis {
        /// Path to configuration file
        #[arg(short, long, default_value = "ledger.json")]
        config: PathBuf,
        /// Snapshot output path (defaults to the configured state path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build and sign a transaction spending outputs of one owner
    Txgen {
        /// Snapshot the spent outputs are taken from
        #[arg(short, long, default_value = "state.json")]
        state: PathBuf,
        /// Owner secret key hex
        #[arg(long)]
        from_secret: String,
        /// Outputs to spend as <tx hash>:<index>, repeatable
        #[arg(long = "outpoint", required = true)]
        outpoints: Vec<String>,
        /// Recipient public key hex
        #[arg(long)]
        to: String,
        /// Value sent to the recipient
        #[arg(long)]
        value: i64,
        /// Value returned to the sender as a second output
        #[arg(long)]
        change: Option<i64>,
        /// Output file (JSON)
        #[arg(long)]
        out: PathBuf,
    },

    /// Validate one transaction against a snapshot
    Check {
        /// Snapshot file
        #[arg(short, long, default_value = "state.json")]
        state: PathBuf,
        /// Transaction JSON file
        #[arg(short, long)]
        tx: PathBuf,
    },

    /// Apply a batch of transactions to a snapshot
    Apply {
        /// Snapshot file
        #[arg(short, long, default_value = "state.json")]
        state: PathBuf,
        /// JSON file holding an array of transactions
        #[arg(short, long)]
        batch: PathBuf,
        /// Where to write the next snapshot (defaults to overwriting --state)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the state root and value totals of a snapshot
    Root {
        /// Snapshot file
        #[arg(short, long, default_value = "state.json")]
        state: PathBuf,
    },
}
