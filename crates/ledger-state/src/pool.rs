use std::collections::BTreeMap;

use ledger_core::{serialize, Hash, OutPoint, PublicKey, Transaction, TxOutput};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StateError;
use crate::merkle::compute_state_root;

/// One snapshot entry, the serialized form of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub outpoint: OutPoint,
    pub output: TxOutput,
}

/// The set of unspent transaction outputs.
///
/// Every entry was produced by an accepted transaction and has not been
/// consumed since. `Clone` is a deep copy: handlers always work on their own
/// pool and never alias a caller's snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UtxoEntry>", into = "Vec<UtxoEntry>")]
pub struct UtxoPool {
    utxos: BTreeMap<OutPoint, TxOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        UtxoPool {
            utxos: BTreeMap::new(),
        }
    }

    /// Seed a pool with every output of a transaction that spends nothing
    pub fn from_genesis(genesis: &Transaction) -> Result<Self, StateError> {
        let tx_hash = genesis.hash()?;
        let mut pool = UtxoPool::new();
        for (index, output) in genesis.outputs.iter().enumerate() {
            pool.insert(OutPoint::new(tx_hash, index as u32), *output);
        }
        info!(
            "Seeded pool from genesis {} with {} outputs",
            tx_hash.short(),
            pool.len()
        );
        Ok(pool)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Look up an output; absent entries are `None`
    pub fn get(&self, outpoint: &OutPoint) -> Option<&TxOutput> {
        self.utxos.get(outpoint)
    }

    /// Add an output, replacing any entry with the same identity
    pub fn insert(&mut self, outpoint: OutPoint, output: TxOutput) {
        if self.utxos.insert(outpoint, output).is_some() {
            debug!("Replaced existing output {}", outpoint);
        }
    }

    /// Remove an output; a no-op when absent
    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TxOutput> {
        self.utxos.remove(outpoint)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// All output identities, in order
    pub fn outpoints(&self) -> Vec<OutPoint> {
        self.utxos.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TxOutput)> {
        self.utxos.iter()
    }

    /// Sum of every unspent value
    pub fn total_value(&self) -> Result<i128, StateError> {
        sum_values(self.utxos.values())
    }

    /// Sum of unspent value owned by `owner`
    pub fn balance_of(&self, owner: &PublicKey) -> Result<i128, StateError> {
        sum_values(self.utxos.values().filter(|output| output.owner == *owner))
    }

    /// Merkle root over the encoded entries
    pub fn state_root(&self) -> Result<Hash, StateError> {
        let encoded = self
            .utxos
            .iter()
            .map(|(outpoint, output)| -> Result<_, StateError> {
                Ok((serialize::to_bytes(outpoint)?, serialize::to_bytes(output)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(compute_state_root(
            encoded.iter().map(|(k, v)| (k.as_slice(), v.as_slice())),
        ))
    }
}

fn sum_values<'a, I>(outputs: I) -> Result<i128, StateError>
where
    I: IntoIterator<Item = &'a TxOutput>,
{
    outputs.into_iter().try_fold(0i128, |total, output| {
        total
            .checked_add(i128::from(output.value))
            .ok_or(StateError::Overflow)
    })
}

impl From<Vec<UtxoEntry>> for UtxoPool {
    fn from(entries: Vec<UtxoEntry>) -> Self {
        UtxoPool {
            utxos: entries
                .into_iter()
                .map(|entry| (entry.outpoint, entry.output))
                .collect(),
        }
    }
}

impl From<UtxoPool> for Vec<UtxoEntry> {
    fn from(pool: UtxoPool) -> Self {
        pool.utxos
            .into_iter()
            .map(|(outpoint, output)| UtxoEntry { outpoint, output })
            .collect()
    }
}
