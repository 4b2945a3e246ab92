use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use ledger_core::{KeyPair, PublicKey, Transaction, TxOutput};
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Snapshot written by `genesis` and read by default elsewhere
    pub state_path: PathBuf,

    /// Genesis allocation
    pub genesis: GenesisConfigFile,

    /// Secret key (hex) of the sample genesis owner, written by `init`
    pub owner_key: Option<String>,
}

/// Genesis configuration for file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesisConfigFile {
    pub allocations: Vec<AllocationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub owner: String,
    pub value: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            state_path: PathBuf::from("state.json"),
            genesis: GenesisConfigFile::default(),
            owner_key: None,
        }
    }
}

impl LedgerConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LedgerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The transaction whose outputs seed the ledger
    pub fn to_genesis_transaction(&self) -> Result<Transaction> {
        let outputs = self
            .genesis
            .allocations
            .iter()
            .map(|entry| -> Result<TxOutput> {
                if entry.value < 0 {
                    return Err(anyhow!(
                        "Genesis allocation to {} is negative: {}",
                        entry.owner,
                        entry.value
                    ));
                }
                let owner = PublicKey::from_hex(&entry.owner).map_err(|e| anyhow!(e))?;
                Ok(TxOutput::new(entry.value, owner))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Transaction::coinbase(outputs))
    }
}

/// Generate a sample configuration for testing
pub fn generate_sample_config() -> LedgerConfig {
    let owner = KeyPair::generate();

    LedgerConfig {
        state_path: PathBuf::from("state.json"),
        genesis: GenesisConfigFile {
            allocations: vec![
                AllocationEntry {
                    owner: owner.public.to_hex(),
                    value: 1_000_000,
                },
                AllocationEntry {
                    owner: owner.public.to_hex(),
                    value: 250_000,
                },
            ],
        },
        owner_key: Some(owner.secret.to_hex()),
    }
}
