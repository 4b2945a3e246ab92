use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid hash length")]
    InvalidHashLength,

    #[error("Invalid outpoint: {0}")]
    InvalidOutPoint(String),

    #[error("Input index {index} out of range ({len} inputs)")]
    InputIndexOutOfRange { index: usize, len: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
