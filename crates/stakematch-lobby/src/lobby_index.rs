//! Lobby Index: per-lobby progress counters.
//!
//! Both counters only ever move forward:
//! - `closed_count`: length of the lobby's retired prefix. Every game at
//!   cursor `1..=closed_count` is full or settled.
//! - `last_cursor[participant]`: the cursor of the participant's most
//!   recent join into the lobby.
//!
//! A lobby is also bound, once, to the [`GameMode`] of its first game.

use std::collections::HashMap;

use stakematch_types::{Address, GameMode, LobbyId};

/// Progress of a single lobby.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LobbyProgress {
    pub closed_count: u64,
    pub last_cursor: HashMap<Address, u64>,
    /// Mode of the lobby's games, set by the first join.
    pub mode: Option<GameMode>,
}

/// `lobby → progress`. Lobbies come into existence on first touch.
#[derive(Debug, Clone, Default)]
pub struct LobbyIndex {
    lobbies: HashMap<LobbyId, LobbyProgress>,
}

impl LobbyIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn closed_count(&self, lobby: &LobbyId) -> u64 {
        self.lobbies.get(lobby).map_or(0, |p| p.closed_count)
    }

    /// Cursor of `participant`'s last join into `lobby`, 0 if none.
    #[must_use]
    pub fn last_cursor(&self, participant: &Address, lobby: &LobbyId) -> u64 {
        self.lobbies
            .get(lobby)
            .and_then(|p| p.last_cursor.get(participant))
            .copied()
            .unwrap_or(0)
    }

    /// Mode the lobby is bound to, if any game was ever opened in it.
    #[must_use]
    pub fn mode(&self, lobby: &LobbyId) -> Option<GameMode> {
        self.lobbies.get(lobby).and_then(|p| p.mode)
    }

    /// Bind `lobby` to `mode` unless it is already bound.
    pub fn bind_mode(&mut self, lobby: LobbyId, mode: GameMode) {
        let progress = self.lobbies.entry(lobby).or_default();
        if progress.mode.is_none() {
            progress.mode = Some(mode);
        }
    }

    /// Record a join at `cursor`. Never moves the cursor backwards.
    pub fn record_join(&mut self, participant: Address, lobby: LobbyId, cursor: u64) {
        let slot = self
            .lobbies
            .entry(lobby)
            .or_default()
            .last_cursor
            .entry(participant)
            .or_default();
        *slot = (*slot).max(cursor);
    }

    /// Raise `closed_count`. Never lowers it.
    pub fn raise_closed_count(&mut self, lobby: LobbyId, closed_count: u64) {
        let progress = self.lobbies.entry(lobby).or_default();
        progress.closed_count = progress.closed_count.max(closed_count);
    }

    /// Force `closed_count` back to a snapshotted value. Only for rolling
    /// back an operation that never completed.
    pub(crate) fn restore_closed_count(&mut self, lobby: LobbyId, closed_count: u64) {
        self.lobbies.entry(lobby).or_default().closed_count = closed_count;
    }

    #[must_use]
    pub fn progress(&self, lobby: &LobbyId) -> Option<&LobbyProgress> {
        self.lobbies.get(lobby)
    }

    /// Number of lobbies ever touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOBBY: LobbyId = LobbyId([7; 32]);
    const ALICE: Address = Address([1; 20]);

    #[test]
    fn unknown_lobby_reads_zero() {
        let index = LobbyIndex::new();
        assert_eq!(index.closed_count(&LOBBY), 0);
        assert_eq!(index.last_cursor(&ALICE, &LOBBY), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn counters_never_decrease() {
        let mut index = LobbyIndex::new();
        index.record_join(ALICE, LOBBY, 3);
        index.record_join(ALICE, LOBBY, 2);
        assert_eq!(index.last_cursor(&ALICE, &LOBBY), 3);

        index.raise_closed_count(LOBBY, 2);
        index.raise_closed_count(LOBBY, 1);
        assert_eq!(index.closed_count(&LOBBY), 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn first_mode_sticks() {
        let mut index = LobbyIndex::new();
        assert_eq!(index.mode(&LOBBY), None);
        index.bind_mode(LOBBY, GameMode::Royale);
        index.bind_mode(LOBBY, GameMode::Duel { fee: rust_decimal::Decimal::ONE });
        assert_eq!(index.mode(&LOBBY), Some(GameMode::Royale));
    }

    #[test]
    fn restore_rewinds_closed_count() {
        let mut index = LobbyIndex::new();
        index.raise_closed_count(LOBBY, 2);
        index.restore_closed_count(LOBBY, 1);
        assert_eq!(index.closed_count(&LOBBY), 1);
    }
}
