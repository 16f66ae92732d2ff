//! # stakematch-engine
//!
//! The public face of StakeMatch. An [`Engine`] owns the lobby and game
//! stores, a token ledger, a signature verifier and an event sink, and
//! runs every operation atomically:
//!
//! ```text
//! join:     validate → plan → ledger debit → seat → notify
//! resolve:  validate → verify signature → commit settled → ledger credit → notify
//!                                                    └─ credit fails → restore snapshot
//! ```
//!
//! Operations are serialized by a per-engine [`ReentrancyGuard`]. A second
//! thread waits its turn; a ledger or sink that calls back into the engine
//! from inside an operation is refused with `ReentrantCall`.

pub mod engine;
pub mod events;
pub mod reentrancy;

pub use engine::{Engine, PermitDeposit};
pub use events::{EventSink, NoopSink, RecordingSink};
pub use reentrancy::{Entered, ReentrancyGuard};
