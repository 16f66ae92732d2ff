//! System-wide constants for the StakeMatch engine.

/// Capacity of a two-party duel game.
pub const DUEL_CAPACITY: u32 = 2;

/// Smallest capacity any game may have.
pub const MIN_CAPACITY: u32 = 2;

/// Default upper bound on game capacity.
pub const MAX_CAPACITY: u32 = 64;

/// Tag bound into every cancellation message.
pub const CANCEL_TAG: &str = "CANCEL";

/// Tag bound into every permit message.
pub const PERMIT_TAG: &str = "PERMIT";

/// Length of a recoverable secp256k1 signature: `r (32) ‖ s (32) ‖ v (1)`.
pub const RECOVERABLE_SIGNATURE_LEN: usize = 65;

/// Length of an ed25519 signature.
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Prefix of the personal-message digest used by off-line signers.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Domain prefix for ed25519 resolver signatures.
pub const ED25519_RESOLVER_DOMAIN: &[u8] = b"stakematch:resolver:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "StakeMatch";
