//! Supply conservation invariant checker.
//!
//! ```text
//! ∀ asset: Σ balances == Σ minted
//! ```
//!
//! Transfers only move value between accounts, so the invariant must hold
//! after every debit, credit and permit transfer. Custody escrow and the
//! burn sink are ordinary accounts and stay inside the sum.

use std::collections::HashMap;

use rust_decimal::Decimal;
use stakematch_types::{Address, Result, StakematchError};

/// Per-asset mint totals.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    minted: HashMap<Address, Decimal>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `ArithmeticOverflow` if the mint total would exceed
    /// `Decimal::MAX`. The total is unchanged in that case.
    pub fn record_mint(&mut self, asset: &Address, amount: Decimal) -> Result<()> {
        let total = self.minted.entry(*asset).or_default();
        *total = total
            .checked_add(amount)
            .ok_or_else(|| StakematchError::ArithmeticOverflow(format!("supply of {asset}")))?;
        Ok(())
    }

    #[must_use]
    pub fn expected_supply(&self, asset: &Address) -> Decimal {
        self.minted.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Compare the actual supply (sum of all balances) against the mint total.
    ///
    /// # Errors
    /// Returns [`StakematchError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, asset: &Address, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            return Err(StakematchError::SupplyInvariantViolation {
                reason: format!("asset {asset}: actual supply {actual_supply} != minted {expected}"),
            });
        }
        Ok(())
    }
}
