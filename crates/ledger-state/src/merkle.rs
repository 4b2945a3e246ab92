use ledger_core::{hash_blake3, merkle_root, Hash};

/// Compute state root from key-value pairs.
/// Keys are sorted first, so insertion order does not matter.
pub fn compute_state_root<'a, I>(entries: I) -> Hash
where
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let mut sorted: Vec<_> = entries.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let leaves: Vec<Hash> = sorted
        .iter()
        .map(|(k, v)| {
            let mut data = Vec::with_capacity(k.len() + v.len());
            data.extend_from_slice(k);
            data.extend_from_slice(v);
            hash_blake3(&data)
        })
        .collect();

    merkle_root(&leaves)
}
