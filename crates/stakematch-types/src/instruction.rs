//! Settlement instructions signed by a game's resolver.
//!
//! Instructions are ephemeral: they are submitted together with a detached
//! signature over their canonical encoding and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, GameId};

/// N-party settlement: `payouts[i]` is credited to `winners[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    pub game_id: GameId,
    pub winners: Vec<Address>,
    pub payouts: Vec<Decimal>,
}

impl SettlementInstruction {
    #[must_use]
    pub fn new(game_id: GameId, winners: Vec<Address>, payouts: Vec<Decimal>) -> Self {
        Self {
            game_id,
            winners,
            payouts,
        }
    }
}

/// Outcome of a two-party game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelOutcome {
    /// A single member takes the pot minus the fee.
    Winner(Address),
    /// Both members are refunded their stake.
    Draw,
}

impl DuelOutcome {
    /// Encode to the wire form signed by the resolver.
    #[must_use]
    pub fn to_address(self) -> Address {
        match self {
            Self::Winner(winner) => winner,
            Self::Draw => Address::ZERO,
        }
    }
}
