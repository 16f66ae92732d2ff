//! # stakematch-types
//!
//! Shared types, errors, and configuration for the **StakeMatch** escrow
//! matchmaking engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`LobbyId`], [`GameId`]
//! - **Amounts**: [`Amount`] and base-unit helpers
//! - **Game model**: [`Game`], [`GameMode`], [`GameStatus`], [`LobbyTerms`]
//! - **Settlement instructions**: [`SettlementInstruction`], [`DuelOutcome`]
//! - **Permits**: [`PermitTransferFrom`], [`TransferDetails`]
//! - **Collaborators**: [`TokenLedger`], [`PermitTransferAuthorizer`]
//! - **Notifications**: [`GameEvent`]
//! - **Configuration**: [`EngineConfig`], [`RemainderPolicy`]
//! - **Errors**: [`StakematchError`] with `SM_ERR_` prefix codes
//! - **Constants**: system-wide limits, tags and defaults

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod game;
pub mod ids;
pub mod instruction;
pub mod ledger;
pub mod lobby;
pub mod permit;

// Re-export all primary types at crate root for ergonomic imports:
//   use stakematch_types::{Address, Game, GameId, StakematchError, ...};

pub use amount::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use game::*;
pub use ids::*;
pub use instruction::*;
pub use ledger::*;
pub use lobby::*;
pub use permit::*;

// Constants are accessed via `stakematch_types::constants::FOO`
// (not re-exported to avoid name collisions).
