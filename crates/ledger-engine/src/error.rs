use ledger_core::{Amount, Hash, OutPoint};
use thiserror::Error;

/// Why a candidate transaction was not admitted.
///
/// Rejections are data: the handler records them and moves on, it never
/// propagates one as a failure.
#[derive(Debug, Error)]
pub enum TxRejection {
    #[error("Output {0} claimed more than once")]
    DuplicateClaim(OutPoint),

    #[error("Output {0} is not in the unspent set")]
    UnknownOutput(OutPoint),

    #[error("Signature for input {index} does not verify")]
    SignatureMismatch { index: usize },

    #[error("Output {index} has negative value {value}")]
    NegativeOutput { index: usize, value: Amount },

    #[error("Value deficit: inputs {inputs}, outputs {outputs}")]
    ValueDeficit { inputs: i128, outputs: i128 },

    #[error("Transaction {0} already accepted in this batch")]
    AlreadyAccepted(Hash),

    #[error("Value overflow")]
    Overflow,

    #[error("Core error: {0}")]
    Core(#[from] ledger_core::CoreError),
}
