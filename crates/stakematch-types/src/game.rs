//! # Game: the unit of custody and settlement
//!
//! A `Game` is created by the first join that targets its cursor and is
//! retained forever as settlement history.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  join fills   ┌──────┐
//!   │ OPEN ├──────────────▶│ FULL │
//!   └──┬───┘               └──┬───┘
//!      │ resolve/cancel       │ resolve/cancel
//!      ▼                      ▼
//!   ┌─────────────────────────────┐
//!   │           SETTLED           │
//!   └─────────────────────────────┘
//! ```
//!
//! `SETTLED` is terminal: no operation may mutate a settled game.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, GameId, GameMode, LobbyId, LobbyTerms, Result, StakematchError, amount};

/// Lifecycle state of a game, derived from membership and the settled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Fewer members than capacity; still accepting joins.
    Open,
    /// Member count equals capacity; awaiting settlement.
    Full,
    /// Resolved or cancelled. **Irreversible.**
    Settled,
}

impl GameStatus {
    /// Can a game in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Full | Self::Settled) | (Self::Full, Self::Settled)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Full => write!(f, "FULL"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// A stake-backed game and its custody terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Deterministic id: `H(lobby_id, cursor)`.
    pub id: GameId,
    /// The lobby this game belongs to.
    pub lobby_id: LobbyId,
    /// Position of this game within its lobby (strictly positive).
    pub cursor: u64,
    /// Members in join order. Never longer than `capacity`, never duplicated.
    pub members: Vec<Address>,
    /// Identity whose signature settles this game.
    pub resolver: Address,
    /// The custodied asset.
    pub asset: Address,
    /// Stake each member deposited.
    pub stake: Decimal,
    /// Member count at which the game is full.
    pub capacity: u32,
    /// Settlement mode.
    pub mode: GameMode,
    /// Set once by resolve/cancel/force-cancel.
    pub settled: bool,
}

impl Game {
    /// Create a game with `creator` as its sole member.
    #[must_use]
    pub fn new(id: GameId, lobby_id: LobbyId, cursor: u64, terms: &LobbyTerms, creator: Address) -> Self {
        Self {
            id,
            lobby_id,
            cursor,
            members: vec![creator],
            resolver: terms.resolver,
            asset: terms.asset,
            stake: terms.stake,
            capacity: terms.capacity,
            mode: terms.mode,
            settled: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.settled {
            GameStatus::Settled
        } else if self.is_full() {
            GameStatus::Full
        } else {
            GameStatus::Open
        }
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity as usize
    }

    /// Full or settled: no longer contends for "oldest open game".
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.settled || self.is_full()
    }

    #[must_use]
    pub fn is_member(&self, participant: &Address) -> bool {
        self.members.contains(participant)
    }

    /// The member that created the game.
    #[must_use]
    pub fn creator(&self) -> Option<Address> {
        self.members.first().copied()
    }

    /// Custodied total: `stake × member_count`.
    pub fn pot(&self) -> Result<Decimal> {
        amount::checked_pot(self.stake, self.members.len())
    }

    /// Append a member. Returns the new member count.
    ///
    /// # Errors
    /// - `AlreadySettled` if the game is settled
    /// - `AlreadyMember` if the participant already holds a slot
    /// - `Internal` if the game is already full
    pub fn add_member(&mut self, participant: Address) -> Result<usize> {
        if self.settled {
            return Err(StakematchError::AlreadySettled(self.id));
        }
        if self.is_member(&participant) {
            return Err(StakematchError::AlreadyMember {
                game_id: self.id,
                participant,
            });
        }
        if self.is_full() {
            return Err(StakematchError::Internal(format!(
                "join routed into full game {}",
                self.id
            )));
        }
        self.members.push(participant);
        Ok(self.members.len())
    }

    /// Transition to SETTLED.
    ///
    /// # Errors
    /// Returns `AlreadySettled` if the game is already settled.
    pub fn mark_settled(&mut self) -> Result<()> {
        if !self.status().can_transition_to(GameStatus::Settled) {
            return Err(StakematchError::AlreadySettled(self.id));
        }
        self.settled = true;
        Ok(())
    }
}
