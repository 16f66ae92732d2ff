//! Recoverable secp256k1 ECDSA, compatible with existing off-line signers.
//!
//! Signature: 65 bytes, `r (32) ‖ s (32) ‖ v (1)`, `v ∈ {27, 28}` (or the
//! raw recovery id `{0, 1}`). The signer key is recovered from the
//! personal-message digest of the message and reduced to its address
//! (`keccak256(uncompressed pubkey)[12..]`), which must equal the expected
//! signer.
//!
//! Signatures whose `s` lies in the upper half of the curve order are
//! rejected, so every (message, signer) pair has exactly one accepted
//! signature.

use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use stakematch_types::{Address, Result, StakematchError, constants::RECOVERABLE_SIGNATURE_LEN};

use crate::{
    hash::{eth_signed_message_digest, keccak256},
    verifier::SignatureVerifier,
};

/// `n / 2` for secp256k1, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Address of a secp256k1 public key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address(bytes)
}

/// Stateless recoverable-signature verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl Secp256k1Verifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Recover the address that signed `message`, or `None` if the
    /// signature is malformed, malleable, or does not recover.
    #[must_use]
    pub fn recover(message: &[u8], signature: &[u8]) -> Option<Address> {
        if signature.len() != RECOVERABLE_SIGNATURE_LEN {
            return None;
        }
        let (rs, v) = signature.split_at(64);
        if rs[32..] > HALF_ORDER[..] {
            return None;
        }
        let v = match v[0] {
            27 | 28 => v[0] - 27,
            0 | 1 => v[0],
            _ => return None,
        };
        let recovery_id = RecoveryId::from_byte(v)?;
        let sig = Signature::from_slice(rs).ok()?;
        let digest = eth_signed_message_digest(message);
        let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id).ok()?;
        Some(address_of(&key))
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, expected_signer: &Address, message: &[u8], signature: &[u8]) -> Result<()> {
        let invalid = || StakematchError::InvalidSignature {
            expected: *expected_signer,
        };
        if expected_signer.is_zero() {
            return Err(invalid());
        }
        match Self::recover(message, signature) {
            Some(signer) if signer == *expected_signer => Ok(()),
            Some(signer) => {
                tracing::debug!(
                    expected = %expected_signer,
                    recovered = %signer,
                    "Signature recovered to a different signer"
                );
                Err(invalid())
            }
            None => {
                tracing::debug!(
                    expected = %expected_signer,
                    len = signature.len(),
                    "Malformed or unrecoverable signature"
                );
                Err(invalid())
            }
        }
    }
}
