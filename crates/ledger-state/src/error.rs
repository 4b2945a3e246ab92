use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Value overflow while summing outputs")]
    Overflow,

    #[error("Core error: {0}")]
    Core(#[from] ledger_core::CoreError),
}
