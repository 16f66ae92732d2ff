//! Game Registry: game id → game state.
//!
//! Games are inserted once and never removed; settled games stay as
//! history.

use std::collections::HashMap;

use stakematch_types::{Game, GameId, Result, StakematchError};

#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    games: HashMap<GameId, Game>,
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &GameId) -> Option<&Game> {
        self.games.get(id)
    }

    pub fn get_mut(&mut self, id: &GameId) -> Option<&mut Game> {
        self.games.get_mut(id)
    }

    /// Look up a game that has at least one member.
    ///
    /// # Errors
    /// Returns `NotStarted` otherwise.
    pub fn started(&self, id: &GameId) -> Result<&Game> {
        self.games
            .get(id)
            .filter(|g| g.member_count() > 0)
            .ok_or(StakematchError::NotStarted(*id))
    }

    /// Insert a new game.
    ///
    /// # Errors
    /// Returns `Internal` if the id is already taken.
    pub fn insert(&mut self, game: Game) -> Result<()> {
        if self.games.contains_key(&game.id) {
            return Err(StakematchError::Internal(format!(
                "game {} already registered",
                game.id
            )));
        }
        self.games.insert(game.id, game);
        Ok(())
    }

    /// Overwrite a game with a snapshot of itself.
    pub(crate) fn replace(&mut self, game: Game) {
        self.games.insert(game.id, game);
    }

    #[must_use]
    pub fn contains(&self, id: &GameId) -> bool {
        self.games.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
