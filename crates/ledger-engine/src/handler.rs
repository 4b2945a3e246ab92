use std::collections::HashSet;

use ledger_core::{Hash, OutPoint, Transaction, TxOutput};
use ledger_state::UtxoPool;
use tracing::{debug, info, warn};

use crate::error::TxRejection;
use crate::validation::{validate_transaction, ValidationResult};
use crate::verifier::{Ed25519Verifier, SignatureVerifier};

/// State changes made by an accepted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitEvent {
    Spent { outpoint: OutPoint, output: TxOutput },
    Created { outpoint: OutPoint, output: TxOutput },
}

/// Outcome of offering one candidate to the handler
#[derive(Debug)]
pub struct CommitResult {
    /// Transaction hash (zero if the transaction could not be hashed)
    pub tx_hash: Hash,
    pub accepted: bool,
    /// Rejection reason if not accepted
    pub error: Option<TxRejection>,
    /// Events generated by the commit, empty when rejected
    pub events: Vec<CommitEvent>,
}

impl CommitResult {
    fn rejected(tx_hash: Hash, error: TxRejection) -> Self {
        CommitResult {
            tx_hash,
            accepted: false,
            error: Some(error),
            events: Vec::new(),
        }
    }
}

/// Result of `commit_batch`: the next pool and what happened to each candidate
#[derive(Debug)]
pub struct BatchOutcome {
    pub pool: UtxoPool,
    /// Accepted transactions, in the order they were applied
    pub accepted: Vec<Transaction>,
    /// One entry per candidate, in candidate order
    pub results: Vec<CommitResult>,
}

/// Owns an unspent-output pool and applies batches of transactions to it.
///
/// Batches are applied greedily in the order given: each candidate is
/// validated against the pool as left by the candidates before it, so when
/// two candidates conflict the first one wins. No reordering or search for a
/// larger admissible subset is attempted.
///
/// A transaction identical to one already accepted in the same batch is
/// rejected with `TxRejection::AlreadyAccepted`.
pub struct TxHandler<V = Ed25519Verifier> {
    pool: UtxoPool,
    verifier: V,
}

impl TxHandler {
    /// Create a handler over a copy of `pool`. The caller's pool is never
    /// modified.
    pub fn new(pool: &UtxoPool) -> Self {
        Self::with_verifier(pool, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> TxHandler<V> {
    pub fn with_verifier(pool: &UtxoPool, verifier: V) -> Self {
        TxHandler {
            pool: pool.clone(),
            verifier,
        }
    }

    /// Current pool
    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    /// Validate against the current pool without changing it
    pub fn validate(&self, tx: &Transaction) -> ValidationResult {
        validate_transaction(tx, &self.pool, &self.verifier)
    }

    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        self.validate(tx).is_valid
    }

    /// Apply a batch and return the accepted transactions in the order they
    /// were applied
    pub fn handle_txs(&mut self, txs: &[Transaction]) -> Vec<Transaction> {
        self.handle_txs_detailed(txs).0
    }

    /// Apply a batch, returning the accepted transactions and one
    /// `CommitResult` per candidate
    pub fn handle_txs_detailed(
        &mut self,
        txs: &[Transaction],
    ) -> (Vec<Transaction>, Vec<CommitResult>) {
        let mut accepted = Vec::new();
        let mut accepted_hashes = HashSet::new();
        let mut results = Vec::with_capacity(txs.len());

        for tx in txs {
            let result = self.commit_transaction(tx, &accepted_hashes);
            if result.accepted {
                accepted_hashes.insert(result.tx_hash);
                accepted.push(tx.clone());
            }
            results.push(result);
        }

        info!(
            "Batch applied: {} of {} accepted, {} unspent outputs",
            accepted.len(),
            txs.len(),
            self.pool.len()
        );

        (accepted, results)
    }

    /// Validate one candidate and, if admissible, apply it to the pool
    fn commit_transaction(
        &mut self,
        tx: &Transaction,
        accepted_hashes: &HashSet<Hash>,
    ) -> CommitResult {
        let tx_hash = match tx.hash() {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Rejected unhashable transaction: {}", e);
                return CommitResult::rejected(Hash::ZERO, e.into());
            }
        };

        if accepted_hashes.contains(&tx_hash) {
            warn!("Transaction {} rejected: already accepted", tx_hash.short());
            return CommitResult::rejected(tx_hash, TxRejection::AlreadyAccepted(tx_hash));
        }

        let validation = self.validate(tx);
        let fee = validation.fee();
        if let Some(error) = validation.error {
            warn!("Transaction {} rejected: {}", tx_hash.short(), error);
            return CommitResult::rejected(tx_hash, error);
        }

        let mut events = Vec::with_capacity(tx.inputs.len() + tx.outputs.len());

        for outpoint in tx.claimed_outpoints() {
            if let Some(output) = self.pool.remove(&outpoint) {
                events.push(CommitEvent::Spent { outpoint, output });
            }
        }

        for (index, output) in tx.outputs.iter().enumerate() {
            let outpoint = OutPoint::new(tx_hash, index as u32);
            self.pool.insert(outpoint, *output);
            events.push(CommitEvent::Created {
                outpoint,
                output: *output,
            });
        }

        debug!(
            "Transaction {} accepted: spent {}, created {}, fee {}",
            tx_hash.short(),
            tx.inputs.len(),
            tx.outputs.len(),
            fee
        );

        CommitResult {
            tx_hash,
            accepted: true,
            error: None,
            events,
        }
    }
}

/// Apply a batch to an owned pool and hand the next pool back
pub fn commit_batch<V: SignatureVerifier>(
    pool: UtxoPool,
    txs: &[Transaction],
    verifier: V,
) -> BatchOutcome {
    let mut handler = TxHandler { pool, verifier };
    let (accepted, results) = handler.handle_txs_detailed(txs);
    BatchOutcome {
        pool: handler.into_pool(),
        accepted,
        results,
    }
}
