use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use ledger_core::KeyPair;
use ledger_engine::{commit_batch, Ed25519Verifier, TxHandler};
use ledger_state::UtxoPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod snapshot;
mod txgen;

use cli::{Cli, Commands};
use config::{generate_sample_config, LedgerConfig};
use txgen::SpendRequest;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { output } => init_config(output)?,
        Commands::Keygen { output } => generate_keypair(output)?,
        Commands::Genesis { config, out } => write_genesis(config, out)?,
        Commands::Txgen {
            state,
            from_secret,
            outpoints,
            to,
            value,
            change,
            out,
        } => {
            let pool = snapshot::load_pool(&state)?;
            let from_secret = txgen::parse_secret(&from_secret)?;
            let outpoints = txgen::parse_outpoints(&outpoints)?;
            let tx = txgen::build_spend(
                &pool,
                &SpendRequest {
                    from_secret: &from_secret,
                    outpoints: &outpoints,
                    to: txgen::parse_pubkey(&to)?,
                    value,
                    change,
                },
            )?;
            snapshot::write_json(&tx, &out)?;
            println!("Transaction {} written to {}", tx.hash()?, out.display());
        }
        Commands::Check { state, tx } => check_transaction(state, tx)?,
        Commands::Apply { state, batch, out } => apply_batch(state, batch, out)?,
        Commands::Root { state } => show_root(state)?,
    }

    Ok(())
}

/// Initialize a new configuration file
fn init_config(output: PathBuf) -> Result<()> {
    let config = generate_sample_config();
    config.save(&output)?;

    info!("Configuration saved to {:?}", output);

    println!("Configuration file created: {}", output.display());
    println!(
        "Genesis owner secret key: {}",
        config.owner_key.as_deref().unwrap_or_default()
    );
    println!("\nTo build the genesis snapshot, run:");
    println!("  ledger genesis --config {}", output.display());

    Ok(())
}

/// Generate a new keypair
fn generate_keypair(output: Option<PathBuf>) -> Result<()> {
    let keypair = KeyPair::generate();

    println!("Generated new keypair:");
    println!("  Public key:  {}", keypair.public.to_hex());
    println!("  Secret key:  {}", keypair.secret.to_hex());

    if let Some(path) = output {
        std::fs::write(&path, keypair.secret.to_hex())?;
        info!("Secret key saved to {:?}", path);
    }

    Ok(())
}

/// Build the genesis snapshot from configuration
fn write_genesis(config_path: PathBuf, out: Option<PathBuf>) -> Result<()> {
    if !config_path.exists() {
        bail!(
            "Configuration file not found: {}. Run 'ledger init' to create one.",
            config_path.display()
        );
    }
    let config = LedgerConfig::load(&config_path)?;
    let genesis = config.to_genesis_transaction()?;
    let pool = UtxoPool::from_genesis(&genesis)?;

    let out = out.unwrap_or(config.state_path);
    snapshot::save_pool(&pool, &out)?;

    println!("Genesis {} with {} outputs", genesis.hash()?, pool.len());
    for (outpoint, output) in pool.iter() {
        println!("  {}  {}  {}", outpoint, output.value, output.owner);
    }
    println!("Snapshot written to {}", out.display());

    Ok(())
}

/// Validate one transaction without applying it
fn check_transaction(state: PathBuf, tx_path: PathBuf) -> Result<()> {
    let pool = snapshot::load_pool(&state)?;
    let tx = snapshot::load_transaction(&tx_path)?;

    let result = TxHandler::new(&pool).validate(&tx);
    match result.error {
        None => println!(
            "Transaction {} is valid (inputs {}, outputs {}, fee {})",
            tx.hash()?,
            result.input_total,
            result.output_total,
            result.fee()
        ),
        Some(reason) => println!("Transaction {} is invalid: {}", tx.hash()?, reason),
    }

    Ok(())
}

/// Apply a batch and write the next snapshot
fn apply_batch(state: PathBuf, batch: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let pool = snapshot::load_pool(&state)?;
    let candidates = snapshot::load_batch(&batch)?;

    info!(
        "Applying {} candidates to {} unspent outputs",
        candidates.len(),
        pool.len()
    );

    let outcome = commit_batch(pool, &candidates, Ed25519Verifier);

    for result in &outcome.results {
        match &result.error {
            None => println!("accepted  {}", result.tx_hash),
            Some(reason) => println!("rejected  {}  {}", result.tx_hash, reason),
        }
    }

    let out = out.unwrap_or(state);
    snapshot::save_pool(&outcome.pool, &out)?;

    println!(
        "\n{} of {} accepted, state root {}",
        outcome.accepted.len(),
        candidates.len(),
        outcome.pool.state_root()?
    );
    println!("Snapshot written to {}", out.display());

    Ok(())
}

/// Show state root and totals
fn show_root(state: PathBuf) -> Result<()> {
    let pool = snapshot::load_pool(&state)?;

    println!("State root:   {}", pool.state_root()?);
    println!("Outputs:      {}", pool.len());
    println!("Total value:  {}", pool.total_value()?);

    Ok(())
}
