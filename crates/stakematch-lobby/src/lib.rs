//! # stakematch-lobby
//!
//! **Deterministic matchmaking for StakeMatch.**
//!
//! Everything here is pure bookkeeping: no ledger calls, no signatures.
//! The engine facade wraps it with custody and atomicity.
//!
//! - **identity**: `lobbyId = H(terms)`, `gameId = H(lobbyId, cursor)`
//! - **LobbyIndex**: per-lobby `closedCount` and per-participant `lastCursor`
//! - **GameRegistry**: game id → game state, never shrinks
//! - **MatchStore**: both stores plus the retired-prefix bookkeeping
//! - **Matchmaker**: validates join terms and assigns participants to games

pub mod game_registry;
pub mod identity;
pub mod lobby_index;
pub mod matchmaker;
pub mod store;

pub use game_registry::GameRegistry;
pub use identity::{game_id, lobby_id};
pub use lobby_index::{LobbyIndex, LobbyProgress};
pub use matchmaker::{JoinPlan, Matchmaker};
pub use store::{MatchStore, StoreSnapshot};
