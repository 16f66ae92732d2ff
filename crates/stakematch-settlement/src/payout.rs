//! Payout validation and transfer computation.
//!
//! Every function here preserves the pot:
//!
//! ```text
//! Σ transfers == stake × member_count
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;
use stakematch_types::{
    Address, DuelOutcome, Game, GameMode, RemainderPolicy, Result, StakematchError, Transfer, amount,
};

/// Check a royale payout vector against a game. Returns `Σ payouts`.
///
/// # Errors
/// In order:
/// - `InvalidPayouts` if the vectors differ in length
/// - `InvalidWinner` if a winner is not a member or is listed twice
/// - `InvalidAmount` if a payout is negative or fractional
/// - `InvalidPayouts` if the sum exceeds the pot
pub fn validate_payouts(game: &Game, winners: &[Address], payouts: &[Decimal]) -> Result<Decimal> {
    if winners.len() != payouts.len() {
        return Err(StakematchError::InvalidPayouts {
            reason: format!(
                "{} winners but {} payouts",
                winners.len(),
                payouts.len()
            ),
        });
    }

    let mut seen = HashSet::with_capacity(winners.len());
    for winner in winners {
        if !game.is_member(winner) || !seen.insert(*winner) {
            return Err(StakematchError::InvalidWinner {
                game_id: game.id,
                winner: *winner,
            });
        }
    }

    for payout in payouts {
        amount::ensure_whole(*payout, "payout")?;
    }
    let total = amount::checked_sum(payouts)?;
    let pot = game.pot()?;
    if total > pot {
        return Err(StakematchError::InvalidPayouts {
            reason: format!("payouts {total} exceed pot {pot}"),
        });
    }
    Ok(total)
}

/// Transfers for a validated royale settlement, remainder included.
pub fn royale_transfers(
    game: &Game,
    winners: &[Address],
    payouts: &[Decimal],
    policy: RemainderPolicy,
) -> Result<Vec<Transfer>> {
    let total = amount::checked_sum(payouts)?;
    let remainder = game.pot()? - total;

    let mut transfers: Vec<Transfer> = winners
        .iter()
        .zip(payouts)
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(winner, amount)| Transfer::new(*winner, *amount))
        .collect();
    transfers.extend(remainder_transfers(game, winners, remainder, policy)?);
    Ok(transfers)
}

fn remainder_transfers(
    game: &Game,
    winners: &[Address],
    remainder: Decimal,
    policy: RemainderPolicy,
) -> Result<Vec<Transfer>> {
    if remainder.is_zero() {
        return Ok(Vec::new());
    }
    match policy {
        RemainderPolicy::ToResolver => Ok(vec![Transfer::new(game.resolver, remainder)]),
        RemainderPolicy::Burn => Ok(vec![Transfer::new(Address::ZERO, remainder)]),
        RemainderPolicy::ReturnToLosers => {
            let losers: Vec<Address> = game
                .members
                .iter()
                .filter(|m| !winners.contains(*m))
                .copied()
                .collect();
            let share = remainder
                .checked_div(Decimal::from(losers.len()))
                .map_or(Decimal::ZERO, |s| s.floor());
            if share.is_zero() {
                return Ok(vec![Transfer::new(game.resolver, remainder)]);
            }
            let mut transfers: Vec<Transfer> =
                losers.iter().map(|l| Transfer::new(*l, share)).collect();
            let dust = remainder - share * Decimal::from(losers.len());
            if !dust.is_zero() {
                transfers.push(Transfer::new(game.resolver, dust));
            }
            Ok(transfers)
        }
    }
}

/// Transfers for a duel outcome.
///
/// # Errors
/// - `WrongGameMode` on a royale game
/// - `InvalidWinner` if a decisive winner is not a member
/// - `InvalidPayouts` if a decisive result is declared on an unfilled game
pub fn duel_transfers(game: &Game, outcome: DuelOutcome) -> Result<Vec<Transfer>> {
    let GameMode::Duel { fee } = game.mode else {
        return Err(StakematchError::WrongGameMode {
            game_id: game.id,
            actual: game.mode.to_string(),
        });
    };
    match outcome {
        DuelOutcome::Draw => Ok(refund_transfers(game)),
        DuelOutcome::Winner(winner) => {
            if !game.is_member(&winner) {
                return Err(StakematchError::InvalidWinner {
                    game_id: game.id,
                    winner,
                });
            }
            if !game.is_full() {
                return Err(StakematchError::InvalidPayouts {
                    reason: format!(
                        "decisive result needs {} members, game has {}",
                        game.capacity,
                        game.member_count()
                    ),
                });
            }
            let prize = game.pot()? - fee;
            let mut transfers = vec![Transfer::new(winner, prize)];
            if !fee.is_zero() {
                transfers.push(Transfer::new(game.resolver, fee));
            }
            Ok(transfers)
        }
    }
}

/// One stake back to every member.
#[must_use]
pub fn refund_transfers(game: &Game) -> Vec<Transfer> {
    game.members
        .iter()
        .map(|m| Transfer::new(*m, game.stake))
        .collect()
}
