//! Registry-backed ed25519 verification.
//!
//! For deployments without an EVM-side signer. Ed25519 keys cannot be
//! recovered from a signature, so resolvers register their verifying key
//! up front; each key is bound to the address `keccak256(pubkey)[12..]`,
//! which is what games store as their resolver.
//!
//! Signed payload: `"stakematch:resolver:v1:" ‖ keccak256(message)`.

use std::collections::HashMap;

use ed25519_dalek::{Signature, VerifyingKey};
use stakematch_types::{
    Address, Result, StakematchError,
    constants::{ED25519_RESOLVER_DOMAIN, ED25519_SIGNATURE_LEN},
};

use crate::{hash::keccak256, verifier::SignatureVerifier};

/// Address bound to an ed25519 verifying key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let hash = keccak256(key.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address(bytes)
}

/// The bytes an ed25519 resolver actually signs for `message`.
#[must_use]
pub fn signing_payload(message: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(ED25519_RESOLVER_DOMAIN.len() + 32);
    payload.extend_from_slice(ED25519_RESOLVER_DOMAIN);
    payload.extend_from_slice(&keccak256(message));
    payload
}

/// Verifies ed25519 signatures against a registry of known keys.
#[derive(Debug, Clone, Default)]
pub struct Ed25519Verifier {
    keys: HashMap<Address, VerifyingKey>,
}

impl Ed25519Verifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verifying key and return the address it signs as.
    pub fn register(&mut self, key: VerifyingKey) -> Address {
        let address = address_of(&key);
        self.keys.insert(address, key);
        address
    }

    /// Whether a key is registered for `address`.
    #[must_use]
    pub fn is_registered(&self, address: &Address) -> bool {
        self.keys.contains_key(address)
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()> {
        let invalid = || StakematchError::InvalidSignature {
            expected: *expected_signer,
        };
        let Some(key) = self.keys.get(expected_signer) else {
            tracing::debug!(expected = %expected_signer, "No ed25519 key registered");
            return Err(invalid());
        };
        if signature.len() != ED25519_SIGNATURE_LEN {
            return Err(invalid());
        }
        let sig = Signature::from_slice(signature).map_err(|_| invalid())?;
        key.verify_strict(&signing_payload(message), &sig)
            .map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Ed25519TestSigner;

    #[test]
    fn registered_key_verifies() {
        let signer = Ed25519TestSigner::from_seed(3);
        let mut verifier = Ed25519Verifier::new();
        let address = verifier.register(signer.verifying_key());
        assert_eq!(address, signer.address());
        assert!(verifier.is_registered(&address));

        let sig = signer.sign_message(b"cancel game");
        assert_eq!(sig.len(), 64);
        assert!(verifier.verify(&address, b"cancel game", &sig).is_ok());
    }

    #[test]
    fn unregistered_signer_rejected() {
        let signer = Ed25519TestSigner::from_seed(3);
        let verifier = Ed25519Verifier::new();
        let sig = signer.sign_message(b"msg");
        assert!(!verifier.is_valid(&signer.address(), b"msg", &sig));
    }

    #[test]
    fn other_key_rejected() {
        let signer = Ed25519TestSigner::from_seed(3);
        let imposter = Ed25519TestSigner::from_seed(4);
        let mut verifier = Ed25519Verifier::new();
        let address = verifier.register(signer.verifying_key());
        verifier.register(imposter.verifying_key());
        assert_eq!(verifier.len(), 2);

        let sig = imposter.sign_message(b"msg");
        assert!(!verifier.is_valid(&address, b"msg", &sig));
    }

    #[test]
    fn tampered_message_rejected() {
        let signer = Ed25519TestSigner::from_seed(5);
        let mut verifier = Ed25519Verifier::new();
        let address = verifier.register(signer.verifying_key());
        let sig = signer.sign_message(b"msg");
        assert!(!verifier.is_valid(&address, b"msg!", &sig));
        assert!(!verifier.is_valid(&address, b"msg", &sig[..63]));
    }
}
