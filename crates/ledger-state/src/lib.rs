//! Ledger State - the unspent-output set
//!
//! This crate holds the authoritative mapping from output identity to
//! output content, and the state root computed over it.

pub mod error;
pub mod merkle;
pub mod pool;

pub use error::StateError;
pub use merkle::compute_state_root;
pub use pool::{UtxoEntry, UtxoPool};
