use serde::{Deserialize, Serialize};

use crate::crypto::{hash_blake3, sign, Hash, PublicKey, SecretKey, Sig};
use crate::error::CoreError;
use crate::serialize;
use crate::types::outpoint::OutPoint;

/// Value in integer minor units.
///
/// Signed so that a negative declared output is representable and can be
/// rejected by validation.
pub type Amount = i64;

/// A claim on a previously produced output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Hash of the transaction whose output is spent
    pub prev_tx_hash: Hash,
    /// Index of the spent output in that transaction
    pub output_index: u32,
    /// Owner's signature over `Transaction::signing_bytes` for this input
    pub signature: Option<Sig>,
}

impl TxInput {
    pub fn new(prev_tx_hash: Hash, output_index: u32) -> Self {
        TxInput {
            prev_tx_hash,
            output_index,
            signature: None,
        }
    }

    /// The output identity this input claims
    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.prev_tx_hash, self.output_index)
    }
}

/// Value assigned to an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: Amount,
    pub owner: PublicKey,
}

impl TxOutput {
    pub fn new(value: Amount, owner: PublicKey) -> Self {
        TxOutput { value, owner }
    }
}

/// A transaction consuming prior outputs and producing new ones.
///
/// The identity is derived from the full content (signatures included), so
/// two transactions are the same transaction exactly when they are equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// Data signed for one input (excludes every signature field)
#[derive(Serialize)]
struct InputSigningData<'a> {
    outpoint: OutPoint,
    outputs: &'a [TxOutput],
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transaction with no inputs that mints `outputs`. Used to seed a
    /// ledger; validation never accepts one because it has nothing to
    /// balance its outputs against unless they are all zero.
    pub fn coinbase(outputs: Vec<TxOutput>) -> Self {
        Transaction {
            inputs: Vec::new(),
            outputs,
        }
    }

    pub fn add_input(&mut self, prev_tx_hash: Hash, output_index: u32) {
        self.inputs.push(TxInput::new(prev_tx_hash, output_index));
    }

    pub fn add_output(&mut self, value: Amount, owner: PublicKey) {
        self.outputs.push(TxOutput::new(value, owner));
    }

    pub fn remove_input(&mut self, index: usize) -> Option<TxInput> {
        if index < self.inputs.len() {
            Some(self.inputs.remove(index))
        } else {
            None
        }
    }

    /// Bytes the owner of the output claimed by input `index` must sign
    pub fn signing_bytes(&self, index: usize) -> Result<Vec<u8>, CoreError> {
        let input = self
            .inputs
            .get(index)
            .ok_or(CoreError::InputIndexOutOfRange {
                index,
                len: self.inputs.len(),
            })?;
        serialize::to_bytes(&InputSigningData {
            outpoint: input.outpoint(),
            outputs: &self.outputs,
        })
    }

    /// Sign input `index` in place
    pub fn sign_input(&mut self, index: usize, secret_key: &SecretKey) -> Result<(), CoreError> {
        let bytes = self.signing_bytes(index)?;
        self.inputs[index].signature = Some(sign(secret_key, &bytes));
        Ok(())
    }

    /// Sign every input with the same key
    pub fn sign_all(&mut self, secret_key: &SecretKey) -> Result<(), CoreError> {
        for index in 0..self.inputs.len() {
            self.sign_input(index, secret_key)?;
        }
        Ok(())
    }

    /// Compute the transaction hash
    pub fn hash(&self) -> Result<Hash, CoreError> {
        let bytes = serialize::to_bytes(self)?;
        Ok(hash_blake3(&bytes))
    }

    /// Identity of the output at `index` once this transaction is accepted
    pub fn output_outpoint(&self, index: u32) -> Result<OutPoint, CoreError> {
        Ok(OutPoint::new(self.hash()?, index))
    }

    /// Outpoints claimed by the inputs, in input order
    pub fn claimed_outpoints(&self) -> impl Iterator<Item = OutPoint> + '_ {
        self.inputs.iter().map(TxInput::outpoint)
    }
}
