//! Keccak-256 and the personal-message digest.

use sha3::{Digest, Keccak256};
use stakematch_types::constants::ETH_SIGNED_MESSAGE_PREFIX;

/// Keccak-256 (the pre-standard SHA-3 padding used by EVM tooling).
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Digest an off-line signer produces for `message`:
/// `keccak256("\x19Ethereum Signed Message:\n32" ‖ keccak256(message))`.
#[must_use]
pub fn eth_signed_message_digest(message: &[u8]) -> [u8; 32] {
    let inner = keccak256(message);
    let mut hasher = Keccak256::new();
    hasher.update(ETH_SIGNED_MESSAGE_PREFIX);
    hasher.update(inner);
    hasher.finalize().into()
}
