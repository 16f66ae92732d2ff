//! The join algorithm.
//!
//! ```text
//! lobby  = H(terms)
//! cursor = max(closed_count[lobby], last_cursor[participant, lobby]) + 1
//!          then skip forward past any full or settled game
//! game   = H(lobby, cursor)
//! ```
//!
//! Joining is split into [`Matchmaker::plan`] (read-only, may fail) and
//! [`Matchmaker::apply`] (mutates), so the caller can pull custody funds in
//! between and abort without touching the stores.
//!
//! Because `last_cursor` only grows and every join lands strictly beyond
//! it, a participant can never hold two seats in the same game, and a
//! participant who keeps joining a lobby is spread over successive games.

use rust_decimal::Decimal;
use stakematch_types::{
    Address, EngineConfig, Game, GameEvent, GameId, GameMode, LobbyId, LobbyTerms, Result,
    StakematchError, amount, constants,
};

use crate::{MatchStore, identity};

/// Where a join will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub participant: Address,
    pub terms: LobbyTerms,
    pub lobby_id: LobbyId,
    pub game_id: GameId,
    pub cursor: u64,
    /// `true` if the join creates the game.
    pub creates: bool,
}

/// Validates join terms and assigns participants to games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchmaker {
    max_capacity: u32,
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new(constants::MAX_CAPACITY)
    }
}

impl Matchmaker {
    #[must_use]
    pub fn new(max_capacity: u32) -> Self {
        Self { max_capacity }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_capacity)
    }

    /// Validated terms of an N-party lobby.
    ///
    /// # Errors
    /// `InvalidResolver`, `InvalidCapacity`, `InvalidAmount`, in that order.
    pub fn royale_terms(&self, resolver: Address, asset: Address, stake: Decimal, capacity: u32) -> Result<LobbyTerms> {
        let terms = LobbyTerms::royale(resolver, asset, stake, capacity);
        self.validate(&terms)?;
        Ok(terms)
    }

    /// Validated terms of a two-party lobby.
    ///
    /// # Errors
    /// `InvalidResolver`, `InsufficientValue`, `InvalidAmount`, in that order.
    pub fn duel_terms(&self, resolver: Address, asset: Address, stake: Decimal, fee: Decimal) -> Result<LobbyTerms> {
        let terms = LobbyTerms::duel(resolver, asset, stake, fee);
        self.validate(&terms)?;
        Ok(terms)
    }

    /// Check terms against the join preconditions.
    pub fn validate(&self, terms: &LobbyTerms) -> Result<()> {
        if terms.resolver.is_zero() {
            return Err(StakematchError::InvalidResolver);
        }
        match terms.mode {
            GameMode::Royale => {
                if terms.capacity < constants::MIN_CAPACITY || terms.capacity > self.max_capacity {
                    return Err(StakematchError::InvalidCapacity {
                        capacity: terms.capacity,
                        max: self.max_capacity,
                    });
                }
            }
            GameMode::Duel { fee } => {
                if terms.capacity != constants::DUEL_CAPACITY {
                    return Err(StakematchError::InvalidCapacity {
                        capacity: terms.capacity,
                        max: constants::DUEL_CAPACITY,
                    });
                }
                if terms.stake <= fee {
                    return Err(StakematchError::InsufficientValue {
                        stake: terms.stake,
                        fee,
                    });
                }
                amount::ensure_whole(fee, "fee")?;
            }
        }
        amount::ensure_stake(terms.stake)
    }

    /// Decide where `participant` lands. Does not mutate anything.
    ///
    /// # Errors
    /// Any validation error, `LobbyModeConflict` if the lobby id already
    /// holds games of another mode, or `AlreadyMember` if the chosen game
    /// already seats the participant.
    pub fn plan(&self, store: &MatchStore, participant: Address, terms: LobbyTerms) -> Result<JoinPlan> {
        self.validate(&terms)?;
        let lobby_id = identity::lobby_id(&terms)?;
        if let Some(existing) = store.index.mode(&lobby_id).filter(|m| *m != terms.mode) {
            return Err(StakematchError::LobbyModeConflict {
                lobby_id,
                existing: existing.to_string(),
            });
        }
        let closed = store.closed_count(&lobby_id);
        let last = store.last_cursor(&participant, &lobby_id);

        let mut cursor = closed.max(last) + 1;
        let mut game_id = identity::game_id(&lobby_id, cursor);
        while store.game(&game_id).is_some_and(Game::is_retired) {
            cursor += 1;
            game_id = identity::game_id(&lobby_id, cursor);
        }

        let existing = store.game(&game_id);
        if existing.is_some_and(|g| g.is_member(&participant)) {
            return Err(StakematchError::AlreadyMember {
                game_id,
                participant,
            });
        }

        tracing::debug!(
            lobby = %lobby_id,
            participant = %participant,
            closed,
            last,
            cursor,
            "Join cursor chosen"
        );

        Ok(JoinPlan {
            participant,
            terms,
            lobby_id,
            game_id,
            cursor,
            creates: existing.is_none(),
        })
    }

    /// Seat the participant as planned.
    ///
    /// Creates the game or appends to it, records the participant's cursor
    /// and advances the lobby past the game if this join filled it. On error
    /// the store is unchanged.
    pub fn apply(&self, store: &mut MatchStore, plan: &JoinPlan) -> Result<GameEvent> {
        let (event, filled) = match store.registry.get_mut(&plan.game_id) {
            Some(game) => {
                let member_count = game.add_member(plan.participant)?;
                let creator = game.creator().ok_or_else(|| {
                    StakematchError::Internal(format!("game {} has no creator", plan.game_id))
                })?;
                let event = GameEvent::Joined {
                    game_id: plan.game_id,
                    creator,
                    joiner: plan.participant,
                    member_count,
                };
                (event, game.is_full())
            }
            None => {
                let game = Game::new(plan.game_id, plan.lobby_id, plan.cursor, &plan.terms, plan.participant);
                let filled = game.is_full();
                store.registry.insert(game)?;
                let event = GameEvent::Created {
                    game_id: plan.game_id,
                    creator: plan.participant,
                    resolver: plan.terms.resolver,
                    asset: plan.terms.asset,
                    stake: plan.terms.stake,
                    capacity: plan.terms.capacity,
                };
                (event, filled)
            }
        };

        store.index.bind_mode(plan.lobby_id, plan.terms.mode);
        store
            .index
            .record_join(plan.participant, plan.lobby_id, plan.cursor);
        if filled {
            store.advance_closed(&plan.lobby_id);
        }
        Ok(event)
    }

    /// Plan and apply in one step, for callers without a custody leg.
    pub fn join(&self, store: &mut MatchStore, participant: Address, terms: LobbyTerms) -> Result<(GameId, GameEvent)> {
        let plan = self.plan(store, participant, terms)?;
        let event = self.apply(store, &plan)?;
        Ok((plan.game_id, event))
    }
}
