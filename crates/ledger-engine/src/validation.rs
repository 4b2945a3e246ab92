use std::collections::HashSet;

use ledger_core::{Transaction, TxOutput};
use ledger_state::UtxoPool;
use tracing::debug;

use crate::error::TxRejection;
use crate::verifier::SignatureVerifier;

/// Transaction validation result
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<TxRejection>,
    /// Value of the claimed outputs, as recorded in the pool
    pub input_total: i128,
    /// Value declared by the transaction's outputs
    pub output_total: i128,
}

impl ValidationResult {
    pub fn ok(input_total: i128, output_total: i128) -> Self {
        ValidationResult {
            is_valid: true,
            error: None,
            input_total,
            output_total,
        }
    }

    pub fn err(error: TxRejection) -> Self {
        ValidationResult {
            is_valid: false,
            error: Some(error),
            input_total: 0,
            output_total: 0,
        }
    }

    /// Value discarded by the transaction. Zero for rejected transactions.
    pub fn fee(&self) -> i128 {
        self.input_total - self.output_total
    }
}

/// Validate a transaction against the pool without modifying it.
///
/// Checks run in a fixed order and stop at the first failure:
/// claim uniqueness, existence, authorization, non-negative outputs,
/// value conservation.
pub fn validate_transaction<V: SignatureVerifier + ?Sized>(
    tx: &Transaction,
    pool: &UtxoPool,
    verifier: &V,
) -> ValidationResult {
    // 1. No output claimed twice
    let mut seen = HashSet::with_capacity(tx.inputs.len());
    for outpoint in tx.claimed_outpoints() {
        if !seen.insert(outpoint) {
            return ValidationResult::err(TxRejection::DuplicateClaim(outpoint));
        }
    }

    // 2. Every claimed output is unspent
    let mut claimed: Vec<&TxOutput> = Vec::with_capacity(tx.inputs.len());
    for outpoint in tx.claimed_outpoints() {
        match pool.get(&outpoint) {
            Some(output) => claimed.push(output),
            None => return ValidationResult::err(TxRejection::UnknownOutput(outpoint)),
        }
    }

    // 3. Each input signed by the owner of the output it claims
    for (index, (input, output)) in tx.inputs.iter().zip(&claimed).enumerate() {
        let Some(signature) = input.signature.as_ref() else {
            return ValidationResult::err(TxRejection::SignatureMismatch { index });
        };
        let message = match tx.signing_bytes(index) {
            Ok(message) => message,
            Err(e) => return ValidationResult::err(e.into()),
        };
        if !verifier.verify(&output.owner, &message, signature) {
            return ValidationResult::err(TxRejection::SignatureMismatch { index });
        }
    }

    // 4. No negative outputs
    for (index, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return ValidationResult::err(TxRejection::NegativeOutput {
                index,
                value: output.value,
            });
        }
    }

    // 5. Inputs cover outputs
    let (input_total, output_total) = match (
        sum_values(claimed.iter().copied()),
        sum_values(tx.outputs.iter()),
    ) {
        (Some(inputs), Some(outputs)) => (inputs, outputs),
        _ => return ValidationResult::err(TxRejection::Overflow),
    };

    if input_total < output_total {
        return ValidationResult::err(TxRejection::ValueDeficit {
            inputs: input_total,
            outputs: output_total,
        });
    }

    debug!(
        "Transaction valid: {} inputs ({}), {} outputs ({})",
        tx.inputs.len(),
        input_total,
        tx.outputs.len(),
        output_total
    );

    ValidationResult::ok(input_total, output_total)
}

/// Boolean projection of `validate_transaction`
pub fn is_valid_tx<V: SignatureVerifier + ?Sized>(
    tx: &Transaction,
    pool: &UtxoPool,
    verifier: &V,
) -> bool {
    validate_transaction(tx, pool, verifier).is_valid
}

fn sum_values<'a, I>(outputs: I) -> Option<i128>
where
    I: IntoIterator<Item = &'a TxOutput>,
{
    outputs
        .into_iter()
        .try_fold(0i128, |total, output| total.checked_add(i128::from(output.value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{hash_blake3, KeyPair, OutPoint, PublicKey, Sig};

    use crate::verifier::Ed25519Verifier;

    /// Accepts every signature, so tests can isolate the other checks
    struct AcceptAll;

    impl SignatureVerifier for AcceptAll {
        fn verify(&self, _: &PublicKey, _: &[u8], _: &Sig) -> bool {
            true
        }
    }

    fn setup_pool(owner: &KeyPair, values: &[i64]) -> (UtxoPool, Transaction) {
        let genesis = Transaction::coinbase(
            values
                .iter()
                .map(|value| TxOutput::new(*value, owner.public))
                .collect(),
        );
        (UtxoPool::from_genesis(&genesis).unwrap(), genesis)
    }

    fn spend(origin: &Transaction, indexes: &[u32], outputs: &[(i64, PublicKey)]) -> Transaction {
        let origin_hash = origin.hash().unwrap();
        let mut tx = Transaction::new();
        for index in indexes {
            tx.add_input(origin_hash, *index);
        }
        for (value, owner) in outputs {
            tx.add_output(*value, *owner);
        }
        tx
    }

    #[test]
    fn test_validate_valid_transaction() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10, 5]);

        let mut tx = spend(&genesis, &[0, 1], &[(12, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(result.is_valid);
        assert_eq!(result.input_total, 15);
        assert_eq!(result.output_total, 12);
        assert_eq!(result.fee(), 3);
    }

    #[test]
    fn test_validate_duplicate_claim() {
        let alice = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0, 0], &[(1, alice.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(!result.is_valid);
        assert!(matches!(result.error, Some(TxRejection::DuplicateClaim(_))));
    }

    #[test]
    fn test_duplicate_claim_checked_before_existence() {
        let pool = UtxoPool::new();
        let missing = hash_blake3(b"missing");

        let mut tx = Transaction::new();
        tx.add_input(missing, 3);
        tx.add_input(missing, 3);

        let result = validate_transaction(&tx, &pool, &AcceptAll);
        assert!(matches!(
            result.error,
            Some(TxRejection::DuplicateClaim(op)) if op == OutPoint::new(missing, 3)
        ));
    }

    #[test]
    fn test_validate_unknown_output() {
        let alice = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0, 4], &[(1, alice.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(matches!(
            result.error,
            Some(TxRejection::UnknownOutput(op)) if op.index == 4
        ));
    }

    #[test]
    fn test_validate_wrong_signer() {
        let alice = KeyPair::generate();
        let mallory = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0], &[(10, mallory.public)]);
        tx.sign_all(&mallory.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(matches!(
            result.error,
            Some(TxRejection::SignatureMismatch { index: 0 })
        ));
    }

    #[test]
    fn test_validate_missing_signature() {
        let alice = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10, 10]);

        let mut tx = spend(&genesis, &[0, 1], &[(20, alice.public)]);
        tx.sign_input(0, &alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(matches!(
            result.error,
            Some(TxRejection::SignatureMismatch { index: 1 })
        ));
    }

    #[test]
    fn test_signature_bound_to_outputs() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0], &[(10, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();
        // Redirect the output after signing
        tx.outputs[0].owner = alice.public;

        assert!(!is_valid_tx(&tx, &pool, &Ed25519Verifier));
    }

    #[test]
    fn test_validate_negative_output() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        // Sum is conserved (15 - 5 = 10) but one output is negative
        let mut tx = spend(&genesis, &[0], &[(15, bob.public), (-5, alice.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(matches!(
            result.error,
            Some(TxRejection::NegativeOutput { index: 1, value: -5 })
        ));
    }

    #[test]
    fn test_validate_value_deficit() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0], &[(15, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(matches!(
            result.error,
            Some(TxRejection::ValueDeficit { inputs: 10, outputs: 15 })
        ));
    }

    #[test]
    fn test_exact_conservation_is_valid() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[i64::MAX, i64::MAX]);

        let mut tx = spend(&genesis, &[0, 1], &[(i64::MAX, bob.public), (i64::MAX, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let result = validate_transaction(&tx, &pool, &Ed25519Verifier);
        assert!(result.is_valid);
        assert_eq!(result.fee(), 0);
    }

    #[test]
    fn test_input_values_come_from_pool() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (mut pool, genesis) = setup_pool(&alice, &[10]);

        let mut tx = spend(&genesis, &[0], &[(8, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();
        assert!(is_valid_tx(&tx, &pool, &Ed25519Verifier));

        // Same claim, smaller recorded value
        let outpoint = genesis.output_outpoint(0).unwrap();
        pool.insert(outpoint, TxOutput::new(7, alice.public));
        assert!(!is_valid_tx(&tx, &pool, &Ed25519Verifier));
    }

    #[test]
    fn test_validation_is_pure() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, genesis) = setup_pool(&alice, &[10]);
        let before = pool.clone();

        let mut tx = spend(&genesis, &[0], &[(10, bob.public)]);
        tx.sign_all(&alice.secret).unwrap();

        let first = is_valid_tx(&tx, &pool, &Ed25519Verifier);
        let second = is_valid_tx(&tx, &pool, &Ed25519Verifier);
        assert!(first);
        assert_eq!(first, second);
        assert_eq!(pool, before);
    }

    #[test]
    fn test_empty_transaction_is_valid() {
        let pool = UtxoPool::new();
        let result = validate_transaction(&Transaction::new(), &pool, &Ed25519Verifier);
        assert!(result.is_valid);
        assert_eq!(result.fee(), 0);
    }
}
