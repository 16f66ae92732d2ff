//! Canonical encodings of everything a resolver or participant signs.
//!
//! | Instruction | Encoding                                                       |
//! |-------------|----------------------------------------------------------------|
//! | resolve     | `abi.encode(bytes32 gameId, address[] winners, uint256[] payouts)` |
//! | duel        | `abi.encode(bytes32 gameId, address winner)` (zero = draw)     |
//! | cancel      | `abi.encode(bytes32 gameId, string "CANCEL")`                  |
//! | permit      | `abi.encode(string "PERMIT", address token, uint256 amount, uint256 nonce, uint256 deadline, address spender)` |
//!
//! Verifiers hash these bytes themselves; callers pass the raw encoding.

use rust_decimal::Decimal;
use stakematch_types::{
    Address, DuelOutcome, GameId, PermitTransferFrom, Result, SettlementInstruction, amount,
    constants::{CANCEL_TAG, PERMIT_TAG},
};

use crate::abi::{self, Token};

/// Encoding of a royale settlement instruction.
///
/// # Errors
/// Returns `InvalidAmount` if a payout is negative or fractional.
pub fn resolve_message(game_id: &GameId, winners: &[Address], payouts: &[Decimal]) -> Result<Vec<u8>> {
    let payouts = payouts
        .iter()
        .map(|p| amount::to_base_units(*p))
        .collect::<Result<Vec<u128>>>()?;
    Ok(abi::encode(&[
        Token::FixedBytes(game_id.0),
        Token::AddressArray(winners),
        Token::UintArray(payouts),
    ]))
}

/// Encoding of a [`SettlementInstruction`].
pub fn instruction_message(instruction: &SettlementInstruction) -> Result<Vec<u8>> {
    resolve_message(&instruction.game_id, &instruction.winners, &instruction.payouts)
}

/// Encoding of a duel outcome.
#[must_use]
pub fn duel_message(game_id: &GameId, outcome: DuelOutcome) -> Vec<u8> {
    abi::encode(&[
        Token::FixedBytes(game_id.0),
        Token::Address(outcome.to_address()),
    ])
}

/// Encoding of a cancellation.
#[must_use]
pub fn cancel_message(game_id: &GameId) -> Vec<u8> {
    abi::encode(&[Token::FixedBytes(game_id.0), Token::String(CANCEL_TAG)])
}

/// Encoding of a permit as signed by its owner for a given spender.
///
/// Deadlines before the UNIX epoch encode as zero.
pub fn permit_message(permit: &PermitTransferFrom, spender: &Address) -> Result<Vec<u8>> {
    let amount = amount::to_base_units(permit.amount)?;
    let deadline = u128::try_from(permit.deadline.timestamp()).unwrap_or(0);
    Ok(abi::encode(&[
        Token::String(PERMIT_TAG),
        Token::Address(permit.token),
        Token::Uint(amount),
        Token::Uint(u128::from(permit.nonce)),
        Token::Uint(deadline),
        Token::Address(*spender),
    ]))
}
