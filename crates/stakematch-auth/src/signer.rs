//! Deterministic test signers. **Never use in production.**
//!
//! Keys are derived from a single seed byte so tests can name their actors
//! (`TestSigner::from_seed(1)` is always the same resolver).

use ed25519_dalek::Signer as _;
use k256::ecdsa::SigningKey;
use rust_decimal::Decimal;
use stakematch_types::{Address, DuelOutcome, GameId, PermitTransferFrom};

use crate::{ed25519, hash::eth_signed_message_digest, message, secp256k1};

/// A secp256k1 key that signs like an off-line resolver or permit owner.
#[derive(Debug, Clone)]
pub struct TestSigner {
    key: SigningKey,
    address: Address,
}

impl TestSigner {
    /// Key with every byte equal to `seed`. `seed` must be non-zero.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("seed must be a valid scalar");
        let address = secp256k1::address_of(key.verifying_key());
        Self { key, address }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// 65-byte `r ‖ s ‖ v` signature with `v ∈ {27, 28}`.
    #[must_use]
    pub fn sign_message(&self, message: &[u8]) -> Vec<u8> {
        let digest = eth_signed_message_digest(message);
        let (sig, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .expect("signing a 32-byte prehash cannot fail");
        let mut out = sig.to_bytes().to_vec();
        out.push(recovery_id.to_byte() + 27);
        out
    }

    #[must_use]
    pub fn sign_resolve(&self, game_id: &GameId, winners: &[Address], payouts: &[Decimal]) -> Vec<u8> {
        let msg = message::resolve_message(game_id, winners, payouts).expect("whole payouts");
        self.sign_message(&msg)
    }

    #[must_use]
    pub fn sign_duel(&self, game_id: &GameId, outcome: DuelOutcome) -> Vec<u8> {
        self.sign_message(&message::duel_message(game_id, outcome))
    }

    #[must_use]
    pub fn sign_cancel(&self, game_id: &GameId) -> Vec<u8> {
        self.sign_message(&message::cancel_message(game_id))
    }

    #[must_use]
    pub fn sign_permit(&self, permit: &PermitTransferFrom, spender: &Address) -> Vec<u8> {
        let msg = message::permit_message(permit, spender).expect("whole permit amount");
        self.sign_message(&msg)
    }
}

/// An ed25519 resolver key.
#[derive(Debug, Clone)]
pub struct Ed25519TestSigner {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519TestSigner {
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(&[seed; 32]),
        }
    }

    #[must_use]
    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.key.verifying_key()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        ed25519::address_of(&self.verifying_key())
    }

    /// 64-byte signature over the domain-separated payload.
    #[must_use]
    pub fn sign_message(&self, message: &[u8]) -> Vec<u8> {
        self.key
            .sign(&ed25519::signing_payload(message))
            .to_bytes()
            .to_vec()
    }

    #[must_use]
    pub fn sign_cancel(&self, game_id: &GameId) -> Vec<u8> {
        self.sign_message(&message::cancel_message(game_id))
    }

    #[must_use]
    pub fn sign_resolve(&self, game_id: &GameId, winners: &[Address], payouts: &[Decimal]) -> Vec<u8> {
        let msg = message::resolve_message(game_id, winners, payouts).expect("whole payouts");
        self.sign_message(&msg)
    }
}
