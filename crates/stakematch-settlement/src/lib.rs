//! # stakematch-settlement
//!
//! **Settlement Engine**: turns resolver-signed instructions into committed
//! settlements and the payouts that follow from them.
//!
//! ## Flow
//!
//! For every operation the [`Settler`]:
//! 1. Checks preconditions in a fixed order (existence, state, mode,
//!    payout bounds, oldest-open ordering)
//! 2. Verifies the resolver's signature over the canonical message
//! 3. Commits: marks the game settled and advances the lobby
//! 4. Returns a [`Settlement`] holding the transfers still to be paid and
//!    a snapshot for rollback
//!
//! The settler never touches the ledger. Paying out is the caller's job and
//! happens strictly after step 3, so a re-entrant or retried settlement of
//! the same game always sees it settled.

pub mod payout;
pub mod settler;

pub use payout::{duel_transfers, refund_transfers, royale_transfers, validate_payouts};
pub use settler::{Settlement, Settler};
