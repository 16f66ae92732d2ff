//! Identifiers used throughout StakeMatch.
//!
//! Participants, resolvers, assets and the custody account are all 20-byte
//! [`Address`]es. Lobbies and games are identified by 32-byte Keccak-256
//! digests ([`LobbyId`], [`GameId`]) derived deterministically from their
//! terms, so every party computes the same id for the same game.
//!
//! All ids render and parse as `0x`-prefixed lowercase hex, which is also
//! their serde representation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::StakematchError;

fn parse_hex<const N: usize>(s: &str, what: &str) -> Result<[u8; N], StakematchError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits)
        .map_err(|e| StakematchError::Serialization(format!("{what} {s:?}: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        StakematchError::Serialization(format!(
            "{what} {s:?}: expected {N} bytes, got {}",
            b.len()
        ))
    })
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account identity (participant, resolver, asset, custody).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address. Never a valid resolver; used as the draw sentinel
    /// and as the burn sink.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = StakematchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex::<20>(s, "address").map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// A random address for unit tests. **Never use in production.**
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 20]>())
    }
}

// ---------------------------------------------------------------------------
// LobbyId / GameId
// ---------------------------------------------------------------------------

macro_rules! digest_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// First four bytes in hex, for compact log fields.
            #[must_use]
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = StakematchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex::<32>(s, $what).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

digest_id!(
    /// Deterministic lobby identifier: Keccak-256 over the lobby terms.
    LobbyId,
    "lobby id"
);

digest_id!(
    /// Deterministic game identifier: Keccak-256 over `(lobby_id, cursor)`.
    GameId,
    "game id"
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_and_parse() {
        let addr = Address([0xab; 20]);
        let text = addr.to_string();
        assert_eq!(text, format!("0x{}", "ab".repeat(20)));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_parse_without_prefix() {
        let addr: Address = "11".repeat(20).parse().unwrap();
        assert_eq!(addr, Address([0x11; 20]));
    }

    #[test]
    fn address_parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert!(matches!(err, StakematchError::Serialization(_)));
    }

    #[test]
    fn zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn game_id_parse_roundtrip() {
        let id = GameId([0x5a; 32]);
        let back: GameId = id.to_string().parse().unwrap();
        assert_eq!(id, back);
        assert_eq!(id.short(), "5a5a5a5a");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let addr = Address([0x01; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);

        let lobby = LobbyId([0xff; 32]);
        let json = serde_json::to_string(&lobby).unwrap();
        let back: LobbyId = serde_json::from_str(&json).unwrap();
        assert_eq!(lobby, back);
    }
}
