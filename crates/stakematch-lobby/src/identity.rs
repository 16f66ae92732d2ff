//! Deterministic lobby and game identity.
//!
//! ```text
//! lobby = keccak256(abi.encode(resolver, asset, stake, capacity))
//! game  = keccak256(abi.encode(lobbyId, cursor))
//! ```
//!
//! The mode is not part of the preimage: a duel lobby hashes like a royale
//! lobby of capacity two. [`crate::LobbyIndex`] binds each lobby to the mode
//! of its first game so the two never share games.

use stakematch_auth::{
    abi::{self, Token},
    keccak256,
};
use stakematch_types::{GameId, LobbyId, LobbyTerms, Result, amount};

/// Identity of the lobby with these terms.
///
/// # Errors
/// Returns `InvalidAmount` if the stake is not a whole amount.
pub fn lobby_id(terms: &LobbyTerms) -> Result<LobbyId> {
    let stake = amount::to_base_units(terms.stake)?;
    Ok(LobbyId(keccak256(&abi::encode(&[
        Token::Address(terms.resolver),
        Token::Address(terms.asset),
        Token::Uint(stake),
        Token::Uint(u128::from(terms.capacity)),
    ]))))
}

/// Identity of the game at `cursor` within `lobby`.
#[must_use]
pub fn game_id(lobby: &LobbyId, cursor: u64) -> GameId {
    GameId(keccak256(&abi::encode(&[
        Token::FixedBytes(lobby.0),
        Token::Uint(u128::from(cursor)),
    ])))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use stakematch_types::Address;

    use super::*;

    fn terms(capacity: u32) -> LobbyTerms {
        LobbyTerms::royale(Address([1; 20]), Address([2; 20]), Decimal::new(1000, 0), capacity)
    }

    #[test]
    fn lobby_id_is_deterministic() {
        assert_eq!(lobby_id(&terms(3)).unwrap(), lobby_id(&terms(3)).unwrap());
    }

    #[test]
    fn every_term_separates_lobbies() {
        let base = lobby_id(&terms(3)).unwrap();
        assert_ne!(base, lobby_id(&terms(4)).unwrap());

        let mut other = terms(3);
        other.stake = Decimal::new(1001, 0);
        assert_ne!(base, lobby_id(&other).unwrap());

        let mut other = terms(3);
        other.resolver = Address([9; 20]);
        assert_ne!(base, lobby_id(&other).unwrap());

        let mut other = terms(3);
        other.asset = Address([9; 20]);
        assert_ne!(base, lobby_id(&other).unwrap());
    }

    #[test]
    fn duel_lobby_hashes_four_terms() {
        let duel = LobbyTerms::duel(Address([1; 20]), Address([2; 20]), Decimal::new(1000, 0), Decimal::new(100, 0));
        let free = LobbyTerms::duel(Address([1; 20]), Address([2; 20]), Decimal::new(1000, 0), Decimal::ZERO);
        assert_eq!(lobby_id(&duel).unwrap(), lobby_id(&terms(2)).unwrap());
        assert_eq!(lobby_id(&duel).unwrap(), lobby_id(&free).unwrap());

        // abi.encode(address, address, uint256 1000, uint256 2)
        let mut preimage = [0u8; 128];
        preimage[12..32].copy_from_slice(&[1; 20]);
        preimage[44..64].copy_from_slice(&[2; 20]);
        preimage[94..96].copy_from_slice(&1000u16.to_be_bytes());
        preimage[127] = 2;
        assert_eq!(lobby_id(&duel).unwrap().0, keccak256(&preimage));
    }

    #[test]
    fn scaled_stake_hashes_like_whole_stake() {
        let mut scaled = terms(3);
        scaled.stake = Decimal::new(100_000, 2);
        assert_eq!(lobby_id(&scaled).unwrap(), lobby_id(&terms(3)).unwrap());
    }

    #[test]
    fn game_id_depends_on_cursor() {
        let lobby = lobby_id(&terms(3)).unwrap();
        assert_ne!(game_id(&lobby, 1), game_id(&lobby, 2));
        assert_eq!(game_id(&lobby, 1), game_id(&lobby, 1));
    }

    #[test]
    fn game_id_matches_abi_layout() {
        let lobby = LobbyId([0u8; 32]);
        let mut preimage = [0u8; 64];
        preimage[63] = 1;
        assert_eq!(game_id(&lobby, 1).0, keccak256(&preimage));
    }
}
