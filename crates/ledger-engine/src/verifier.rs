use ledger_core::{verify, PublicKey, Sig};

/// Signature check used for input authorization.
///
/// Implementations must be free of side effects. Any failure, whether a
/// malformed key or a signature by the wrong key, is just `false`.
pub trait SignatureVerifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &Sig) -> bool;
}

/// Ed25519 verification through `ledger_core::verify`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &Sig) -> bool {
        verify(owner, message, signature).is_ok()
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &Sig) -> bool {
        (**self).verify(owner, message, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{sign, KeyPair};

    #[test]
    fn test_ed25519_verifier() {
        let owner = KeyPair::generate();
        let other = KeyPair::generate();
        let sig = sign(&owner.secret, b"payload");

        assert!(Ed25519Verifier.verify(&owner.public, b"payload", &sig));
        assert!(!Ed25519Verifier.verify(&other.public, b"payload", &sig));
        assert!(!Ed25519Verifier.verify(&owner.public, b"other", &sig));
    }
}
