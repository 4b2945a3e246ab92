use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::Hash;
use crate::error::CoreError;

/// Reference to a specific output of a transaction.
///
/// Equality, hashing and ordering are structural over
/// `(tx_hash, index)`; the ordering gives snapshots a stable iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    /// Hash of the transaction that produced the output
    pub tx_hash: Hash,
    /// Position of the output within that transaction
    pub index: u32,
}

impl OutPoint {
    pub const fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

/// Parses the `<tx hash hex>:<index>` form produced by `Display`.
impl FromStr for OutPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash, index) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidOutPoint(s.to_string()))?;
        let tx_hash = Hash::from_hex(hash)?;
        let index = index
            .parse::<u32>()
            .map_err(|_| CoreError::InvalidOutPoint(s.to_string()))?;
        Ok(OutPoint::new(tx_hash, index))
    }
}
