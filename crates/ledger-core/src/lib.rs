//! Ledger Core - Core types, cryptography, and serialization
//!
//! This crate provides the transaction record format, output identities and
//! the ed25519/Blake3 primitives the ledger engine is built on.

pub mod crypto;
pub mod error;
pub mod serialize;
pub mod types;

pub use crypto::{hash_blake3, merkle_root, sign, verify, Hash, KeyPair, PublicKey, SecretKey, Sig};
pub use error::CoreError;
pub use types::*;
