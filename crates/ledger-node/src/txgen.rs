use anyhow::{anyhow, bail, Result};
use ledger_core::{OutPoint, PublicKey, SecretKey, Transaction};
use ledger_state::UtxoPool;
use tracing::warn;

/// What a generated spend pays out
pub struct SpendRequest<'a> {
    pub from_secret: &'a SecretKey,
    pub outpoints: &'a [OutPoint],
    pub to: PublicKey,
    pub value: i64,
    pub change: Option<i64>,
}

/// Build a transaction spending `outpoints`, signed on every input by
/// `from_secret`.
///
/// The pool is only consulted to warn early about inputs that would not
/// validate; the transaction is built either way.
pub fn build_spend(pool: &UtxoPool, request: &SpendRequest<'_>) -> Result<Transaction> {
    if request.outpoints.is_empty() {
        bail!("At least one outpoint is required");
    }

    let sender = request.from_secret.public_key();
    let mut tx = Transaction::new();

    for outpoint in request.outpoints {
        match pool.get(outpoint) {
            None => warn!("Outpoint {} is not in the snapshot", outpoint),
            Some(output) if output.owner != sender => {
                warn!("Outpoint {} is owned by {}, not the signer", outpoint, output.owner)
            }
            Some(_) => {}
        }
        tx.add_input(outpoint.tx_hash, outpoint.index);
    }

    tx.add_output(request.value, request.to);
    if let Some(change) = request.change {
        tx.add_output(change, sender);
    }

    tx.sign_all(request.from_secret)?;
    Ok(tx)
}

pub fn parse_secret(hex_str: &str) -> Result<SecretKey> {
    SecretKey::from_hex(hex_str).map_err(|e| anyhow!(e))
}

pub fn parse_pubkey(hex_str: &str) -> Result<PublicKey> {
    PublicKey::from_hex(hex_str).map_err(|e| anyhow!(e))
}

pub fn parse_outpoints(items: &[String]) -> Result<Vec<OutPoint>> {
    items
        .iter()
        .map(|item| {
            item.trim()
                .parse::<OutPoint>()
                .map_err(|e| anyhow!("Bad outpoint '{}': {}", item, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{KeyPair, TxOutput};
    use ledger_engine::TxHandler;

    fn funded(owner: &KeyPair) -> (UtxoPool, Vec<OutPoint>) {
        let genesis = Transaction::coinbase(vec![
            TxOutput::new(60, owner.public),
            TxOutput::new(40, owner.public),
        ]);
        let pool = UtxoPool::from_genesis(&genesis).unwrap();
        let outpoints = pool.outpoints();
        (pool, outpoints)
    }

    #[test]
    fn test_generated_spend_validates() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let (pool, outpoints) = funded(&alice);

        let tx = build_spend(
            &pool,
            &SpendRequest {
                from_secret: &alice.secret,
                outpoints: &outpoints,
                to: bob.public,
                value: 70,
                change: Some(25),
            },
        )
        .unwrap();

        assert_eq!(tx.inputs.len(), 2);
        assert_eq!(tx.outputs[1], TxOutput::new(25, alice.public));
        assert!(TxHandler::new(&pool).is_valid_tx(&tx));
    }

    #[test]
    fn test_spend_signed_by_stranger_is_built_but_invalid() {
        let alice = KeyPair::generate();
        let mallory = KeyPair::generate();
        let (pool, outpoints) = funded(&alice);

        let tx = build_spend(
            &pool,
            &SpendRequest {
                from_secret: &mallory.secret,
                outpoints: &outpoints[..1],
                to: mallory.public,
                value: 60,
                change: None,
            },
        )
        .unwrap();

        assert!(!TxHandler::new(&pool).is_valid_tx(&tx));
    }

    #[test]
    fn test_empty_outpoints_rejected() {
        let alice = KeyPair::generate();
        let result = build_spend(
            &UtxoPool::new(),
            &SpendRequest {
                from_secret: &alice.secret,
                outpoints: &[],
                to: alice.public,
                value: 1,
                change: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_outpoints() {
        let alice = KeyPair::generate();
        let (_, outpoints) = funded(&alice);
        let items: Vec<String> = outpoints.iter().map(|o| o.to_string()).collect();

        assert_eq!(parse_outpoints(&items).unwrap(), outpoints);
        assert!(parse_outpoints(&["nope".to_string()]).is_err());
    }
}
