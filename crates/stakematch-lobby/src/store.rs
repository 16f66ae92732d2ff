//! [`MatchStore`]: the Lobby Index and Game Registry, kept consistent.
//!
//! Owns the retired-prefix rule. After any game of a lobby becomes full or
//! settled, [`MatchStore::advance_closed`] walks `closed_count` forward past
//! every retired game at the front of the lobby:
//!
//! ```text
//! cursor:     1      2      3      4
//! state:   SETTLED  FULL  OPEN    -
//!                         ▲
//!                closed_count = 2, oldest open game = 3
//! ```

use stakematch_types::{Address, Game, GameId, LobbyId, Result, StakematchError};

use crate::{GameRegistry, LobbyIndex, identity};

/// Pre-mutation copy of one game and its lobby counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub game: Game,
    pub closed_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    pub index: LobbyIndex,
    pub registry: GameRegistry,
}

impl MatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn game(&self, id: &GameId) -> Option<&Game> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn closed_count(&self, lobby: &LobbyId) -> u64 {
        self.index.closed_count(lobby)
    }

    #[must_use]
    pub fn last_cursor(&self, participant: &Address, lobby: &LobbyId) -> u64 {
        self.index.last_cursor(participant, lobby)
    }

    /// Id of the game at cursor `closed_count + 1`. It may not exist yet.
    #[must_use]
    pub fn oldest_open_game(&self, lobby: &LobbyId) -> GameId {
        identity::game_id(lobby, self.index.closed_count(lobby) + 1)
    }

    #[must_use]
    pub fn is_member(&self, game: &GameId, participant: &Address) -> bool {
        self.registry
            .get(game)
            .is_some_and(|g| g.is_member(participant))
    }

    /// Advance `closed_count` past the retired prefix of `lobby`. Returns
    /// the new count.
    pub fn advance_closed(&mut self, lobby: &LobbyId) -> u64 {
        let before = self.index.closed_count(lobby);
        let mut closed = before;
        while self
            .registry
            .get(&identity::game_id(lobby, closed + 1))
            .is_some_and(Game::is_retired)
        {
            closed += 1;
        }
        if closed != before {
            self.index.raise_closed_count(*lobby, closed);
            tracing::debug!(lobby = %lobby, from = before, to = closed, "Lobby closed count advanced");
        }
        closed
    }

    /// Copy a game and its lobby counter before mutating them.
    ///
    /// # Errors
    /// Returns `NotStarted` if the game does not exist.
    pub fn snapshot(&self, id: &GameId) -> Result<StoreSnapshot> {
        let game = self
            .registry
            .get(id)
            .cloned()
            .ok_or(StakematchError::NotStarted(*id))?;
        let closed_count = self.index.closed_count(&game.lobby_id);
        Ok(StoreSnapshot { game, closed_count })
    }

    /// Put back a snapshot taken by [`MatchStore::snapshot`].
    pub fn restore(&mut self, snapshot: StoreSnapshot) {
        self.index
            .restore_closed_count(snapshot.game.lobby_id, snapshot.closed_count);
        self.registry.replace(snapshot.game);
    }
}
