//! Minimal Solidity `abi.encode`.
//!
//! Only the token kinds StakeMatch actually signs or hashes are supported.
//! The output is bit-identical to `abi.encode(...)` for the same argument
//! list, which is what off-line signers hash.
//!
//! Layout: a head of one 32-byte word per argument, followed by a tail
//! holding dynamic data. Static arguments sit in the head directly; dynamic
//! arguments (strings, arrays) place a byte offset (relative to the start
//! of the encoding) in the head and their payload in the tail.

use stakematch_types::Address;

/// One ABI word.
pub type Word = [u8; 32];

/// An argument to [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `address`, left-padded to 32 bytes.
    Address(Address),
    /// `uint256` holding a value that fits in 128 bits.
    Uint(u128),
    /// `bytes32`.
    FixedBytes([u8; 32]),
    /// `string`.
    String(&'a str),
    /// `address[]`.
    AddressArray(&'a [Address]),
    /// `uint256[]`.
    UintArray(Vec<u128>),
}

impl Token<'_> {
    fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Self::String(_) | Self::AddressArray(_) | Self::UintArray(_)
        )
    }
}

#[must_use]
pub fn address_word(address: &Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

#[must_use]
pub fn uint_word(value: u128) -> Word {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn usize_word(value: usize) -> Word {
    uint_word(value as u128)
}

fn encode_tail(token: &Token<'_>, out: &mut Vec<u8>) {
    match token {
        Token::String(s) => {
            let bytes = s.as_bytes();
            out.extend_from_slice(&usize_word(bytes.len()));
            out.extend_from_slice(bytes);
            let padding = (32 - bytes.len() % 32) % 32;
            out.extend(std::iter::repeat_n(0u8, padding));
        }
        Token::AddressArray(items) => {
            out.extend_from_slice(&usize_word(items.len()));
            for item in *items {
                out.extend_from_slice(&address_word(item));
            }
        }
        Token::UintArray(items) => {
            out.extend_from_slice(&usize_word(items.len()));
            for item in items {
                out.extend_from_slice(&uint_word(*item));
            }
        }
        Token::Address(_) | Token::Uint(_) | Token::FixedBytes(_) => {}
    }
}

/// `abi.encode(tokens...)`.
#[must_use]
pub fn encode(tokens: &[Token<'_>]) -> Vec<u8> {
    let head_len = tokens.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(address) => head.extend_from_slice(&address_word(address)),
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::FixedBytes(bytes) => head.extend_from_slice(bytes),
            dynamic => {
                debug_assert!(dynamic.is_dynamic());
                head.extend_from_slice(&usize_word(head_len + tail.len()));
                encode_tail(dynamic, &mut tail);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hex(encoded: &[u8], index: usize) -> String {
        hex::encode(&encoded[index * 32..(index + 1) * 32])
    }

    #[test]
    fn static_words_are_left_padded() {
        let addr = Address([0xaa; 20]);
        let encoded = encode(&[Token::Address(addr), Token::Uint(1)]);
        assert_eq!(encoded.len(), 64);
        assert_eq!(word_hex(&encoded, 0), format!("{}{}", "00".repeat(12), "aa".repeat(20)));
        assert_eq!(word_hex(&encoded, 1), format!("{}01", "00".repeat(31)));
    }

    #[test]
    fn string_layout() {
        // abi.encode(bytes32(0x11..), "CANCEL")
        let encoded = encode(&[Token::FixedBytes([0x11; 32]), Token::String("CANCEL")]);
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(word_hex(&encoded, 0), "11".repeat(32));
        // Offset to the string payload: two head words.
        assert_eq!(word_hex(&encoded, 1), format!("{}40", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 2), format!("{}06", "00".repeat(31)));
        assert_eq!(
            word_hex(&encoded, 3),
            format!("{}{}", hex::encode("CANCEL"), "00".repeat(26))
        );
    }

    #[test]
    fn two_arrays_layout() {
        // abi.encode(bytes32, address[1], uint256[1])
        let winners = [Address([0x01; 20])];
        let encoded = encode(&[
            Token::FixedBytes([0u8; 32]),
            Token::AddressArray(&winners),
            Token::UintArray(vec![3000]),
        ]);
        // head (3) + winners (len + 1) + payouts (len + 1)
        assert_eq!(encoded.len(), 7 * 32);
        assert_eq!(word_hex(&encoded, 1), format!("{}60", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 2), format!("{}a0", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 3), format!("{}01", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 5), format!("{}01", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 6), format!("{}0bb8", "00".repeat(30)));
    }

    #[test]
    fn empty_arrays() {
        let encoded = encode(&[Token::AddressArray(&[]), Token::UintArray(Vec::new())]);
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(word_hex(&encoded, 0), format!("{}40", "00".repeat(31)));
        assert_eq!(word_hex(&encoded, 1), format!("{}60", "00".repeat(31)));
    }
}
