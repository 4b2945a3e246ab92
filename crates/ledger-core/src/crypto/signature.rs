use ed25519_dalek::{Signature as DalekSignature, Signer, Verifier};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_big_array::BigArray;
use std::fmt;

use crate::crypto::keys::{PublicKey, SecretKey};
use crate::error::CoreError;

/// Ed25519 signature (64 bytes)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sig(pub [u8; 64]);

impl Sig {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 64] = slice.try_into().ok()?;
        Some(Sig(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes).ok_or(CoreError::InvalidSignature)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sig({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Sig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            <[u8; 64] as BigArray<'_, u8>>::serialize(&self.0, serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Sig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Sig::from_hex(&s).map_err(D::Error::custom)
        } else {
            <[u8; 64] as BigArray<'de, u8>>::deserialize(deserializer).map(Sig)
        }
    }
}

/// Sign a message with a secret key
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Sig {
    Sig(secret_key.signing_key().sign(message).to_bytes())
}

/// Verify a signature against a public key and message
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Sig) -> Result<(), CoreError> {
    let verifying_key = public_key.to_verifying_key()?;
    let dalek_sig = DalekSignature::from_bytes(&signature.0);
    verifying_key
        .verify(message, &dalek_sig)
        .map_err(|_| CoreError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;
    use crate::serialize;

    #[test]
    fn test_sign_and_verify() {
        let kp = KeyPair::generate();
        let sig = sign(&kp.secret, b"spend");
        assert!(verify(&kp.public, b"spend", &sig).is_ok());
    }

    #[test]
    fn test_verify_wrong_message() {
        let kp = KeyPair::generate();
        let sig = sign(&kp.secret, b"spend");
        assert!(verify(&kp.public, b"spend twice", &sig).is_err());
    }

    #[test]
    fn test_verify_wrong_key() {
        let owner = KeyPair::generate();
        let thief = KeyPair::generate();
        let sig = sign(&thief.secret, b"spend");
        assert!(matches!(
            verify(&owner.public, b"spend", &sig),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_sig_survives_bincode() {
        let kp = KeyPair::generate();
        let sig = sign(&kp.secret, b"encoded");
        let bytes = serialize::to_bytes(&sig).unwrap();
        assert_eq!(bytes.len(), 64);
        let recovered: Sig = serialize::from_bytes(&bytes).unwrap();
        assert_eq!(sig, recovered);
    }
}
