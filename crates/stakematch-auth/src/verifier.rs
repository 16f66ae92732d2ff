//! The pluggable verification contract.

use std::sync::Arc;

use stakematch_types::{Address, Result};

/// Decides whether `signature` over `message` was produced by `expected_signer`.
///
/// `message` is the raw canonical encoding (see [`crate::message`]); any
/// hashing or domain separation is the verifier's business.
pub trait SignatureVerifier {
    /// # Errors
    /// Returns `InvalidSignature` if the signature is malformed or was not
    /// produced by `expected_signer`.
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()>;

    /// Boolean form of [`SignatureVerifier::verify`].
    fn is_valid(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> bool {
        self.verify(expected_signer, message, signature).is_ok()
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()> {
        (**self).verify(expected_signer, message, signature)
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for Box<V> {
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()> {
        (**self).verify(expected_signer, message, signature)
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for Arc<V> {
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()> {
        (**self).verify(expected_signer, message, signature)
    }
}
