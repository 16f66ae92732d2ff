//! Lobby terms: the parameters every game of a lobby shares.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, constants};

/// How a game is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameMode {
    /// N-party game settled with explicit `(winners, payouts)` vectors.
    Royale,
    /// Two-party game settled with a single winner (or a draw), with a
    /// protocol fee taken from a decisive result.
    Duel {
        /// Fee credited to the resolver on a decisive result.
        fee: Decimal,
    },
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Royale => write!(f, "ROYALE"),
            Self::Duel { fee } => write!(f, "DUEL(fee={fee})"),
        }
    }
}

/// The shared terms of a lobby. Two joins land in the same lobby exactly
/// when resolver, asset, stake and capacity are equal; the mode is fixed
/// by the lobby's first game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyTerms {
    /// Identity authorized to settle and cancel games of this lobby.
    pub resolver: Address,
    /// The custodied asset.
    pub asset: Address,
    /// Stake each member deposits, in whole base units.
    pub stake: Decimal,
    /// Number of members that fills a game.
    pub capacity: u32,
    /// Settlement mode.
    pub mode: GameMode,
}

impl LobbyTerms {
    /// Terms of an N-party royale lobby.
    #[must_use]
    pub fn royale(resolver: Address, asset: Address, stake: Decimal, capacity: u32) -> Self {
        Self {
            resolver,
            asset,
            stake,
            capacity,
            mode: GameMode::Royale,
        }
    }

    /// Terms of a two-party, fee-bearing duel lobby.
    #[must_use]
    pub fn duel(resolver: Address, asset: Address, stake: Decimal, fee: Decimal) -> Self {
        Self {
            resolver,
            asset,
            stake,
            capacity: constants::DUEL_CAPACITY,
            mode: GameMode::Duel { fee },
        }
    }

    /// The fee of a duel lobby, `None` for royale lobbies.
    #[must_use]
    pub fn fee(&self) -> Option<Decimal> {
        match self.mode {
            GameMode::Royale => None,
            GameMode::Duel { fee } => Some(fee),
        }
    }
}
