//! Ledger Engine - transaction validation and batch commit
//!
//! Validation decides whether a single transaction may consume the outputs
//! it claims. The handler applies a batch of candidates greedily, in the
//! order given, against a pool it owns.

pub mod error;
pub mod handler;
pub mod validation;
pub mod verifier;

pub use error::TxRejection;
pub use handler::{commit_batch, BatchOutcome, CommitEvent, CommitResult, TxHandler};
pub use validation::{is_valid_tx, validate_transaction, ValidationResult};
pub use verifier::{Ed25519Verifier, SignatureVerifier};
