pub mod outpoint;
pub mod transaction;

pub use outpoint::OutPoint;
pub use transaction::{Amount, Transaction, TxInput, TxOutput};
