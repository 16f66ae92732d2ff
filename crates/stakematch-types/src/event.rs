//! Notifications emitted by the engine.
//!
//! Events are observable facts about committed state transitions. The
//! engine does not store them; it hands each one to its `EventSink`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, GameId};

/// A committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A join created a new game with the joiner as its sole member.
    Created {
        game_id: GameId,
        creator: Address,
        resolver: Address,
        asset: Address,
        stake: Decimal,
        capacity: u32,
    },
    /// A join appended a member to an existing game.
    Joined {
        game_id: GameId,
        creator: Address,
        joiner: Address,
        member_count: usize,
    },
    /// A game was settled with the given payouts.
    Resolved {
        game_id: GameId,
        winners: Vec<Address>,
        payouts: Vec<Decimal>,
    },
    /// A game was cancelled and every member refunded.
    Cancelled { game_id: GameId },
}

impl GameEvent {
    /// The game this event concerns.
    #[must_use]
    pub fn game_id(&self) -> GameId {
        match self {
            Self::Created { game_id, .. }
            | Self::Joined { game_id, .. }
            | Self::Resolved { game_id, .. }
            | Self::Cancelled { game_id } => *game_id,
        }
    }

    /// Short event name for log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "CREATED",
            Self::Joined { .. } => "JOINED",
            Self::Resolved { .. } => "RESOLVED",
            Self::Cancelled { .. } => "CANCELLED",
        }
    }
}
