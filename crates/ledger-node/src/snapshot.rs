use std::path::Path;

use anyhow::{Context, Result};
use ledger_core::{serialize, Transaction};
use ledger_state::UtxoPool;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub fn load_pool(path: &Path) -> Result<UtxoPool> {
    let pool: UtxoPool = read_json(path)?;
    debug!("Loaded {} unspent outputs from {:?}", pool.len(), path);
    Ok(pool)
}

pub fn save_pool(pool: &UtxoPool, path: &Path) -> Result<()> {
    write_json(pool, path)?;
    debug!("Wrote {} unspent outputs to {:?}", pool.len(), path);
    Ok(())
}

pub fn load_transaction(path: &Path) -> Result<Transaction> {
    read_json(path)
}

pub fn load_batch(path: &Path) -> Result<Vec<Transaction>> {
    read_json(path)
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serialize::to_json_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serialize::from_json(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}
