//! # stakematch-auth
//!
//! **Signature Authority Verifier**: decides whether a byte message was
//! signed by a claimed identity.
//!
//! ## Components
//!
//! 1. **abi**: Solidity `abi.encode` for the handful of types StakeMatch signs
//! 2. **message**: canonical encodings of resolve, duel, cancel and permit
//!    instructions
//! 3. **hash**: Keccak-256 and the personal-message digest
//! 4. **SignatureVerifier**: the pluggable `verify(expected, message, sig)` contract
//! 5. **Secp256k1Verifier**: 65-byte recoverable ECDSA, bit-compatible with
//!    existing off-line signers
//! 6. **Ed25519Verifier**: registry-backed ed25519 for non-blockchain deployments
//!
//! The settlement path depends only on [`SignatureVerifier`].

pub mod abi;
pub mod ed25519;
pub mod hash;
pub mod message;
pub mod secp256k1;
pub mod verifier;

#[cfg(any(test, feature = "test-helpers"))]
pub mod signer;

pub use ed25519::Ed25519Verifier;
pub use hash::{eth_signed_message_digest, keccak256};
pub use secp256k1::Secp256k1Verifier;
pub use verifier::SignatureVerifier;

#[cfg(any(test, feature = "test-helpers"))]
pub use signer::{Ed25519TestSigner, TestSigner};
