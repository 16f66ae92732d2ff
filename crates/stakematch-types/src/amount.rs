//! Amount handling.
//!
//! Stakes and payouts are [`Decimal`] values denominated in whole base units
//! of the asset (wei-like). Fractional or negative amounts are rejected at
//! the engine boundary, so everything downstream can convert losslessly to
//! a 256-bit ABI word.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{Result, StakematchError};

/// Type alias for asset amounts in whole base units.
pub type Amount = Decimal;

/// Require a non-negative whole amount.
pub fn ensure_whole(amount: Decimal, what: &str) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(StakematchError::InvalidAmount {
            reason: format!("{what} {amount} is negative"),
        });
    }
    if !amount.fract().is_zero() {
        return Err(StakematchError::InvalidAmount {
            reason: format!("{what} {amount} is not a whole number of base units"),
        });
    }
    Ok(())
}

/// Require a strictly positive whole stake.
pub fn ensure_stake(stake: Decimal) -> Result<()> {
    ensure_whole(stake, "stake")?;
    if stake.is_zero() {
        return Err(StakematchError::InvalidAmount {
            reason: "stake must be greater than zero".into(),
        });
    }
    Ok(())
}

/// Convert a whole, non-negative amount to base units.
pub fn to_base_units(amount: Decimal) -> Result<u128> {
    ensure_whole(amount, "amount")?;
    amount
        .trunc()
        .to_u128()
        .ok_or_else(|| StakematchError::InvalidAmount {
            reason: format!("{amount} does not fit in 128 bits"),
        })
}

/// Overflow-checked sum.
pub fn checked_sum(amounts: &[Decimal]) -> Result<Decimal> {
    amounts.iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(*a)
            .ok_or_else(|| StakematchError::ArithmeticOverflow("payout sum".into()))
    })
}

/// The pot of a game: `stake × member_count`.
pub fn checked_pot(stake: Decimal, member_count: usize) -> Result<Decimal> {
    stake
        .checked_mul(Decimal::from(member_count))
        .ok_or_else(|| StakematchError::ArithmeticOverflow("pot".into()))
}
