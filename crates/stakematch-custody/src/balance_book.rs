//! Balance and allowance bookkeeping.
//!
//! Tracks per-(account, asset) balances and per-(owner, spender, asset)
//! allowances. All mutations are atomic: either the full operation
//! succeeds or the book is unchanged.

use std::collections::HashMap;

use rust_decimal::Decimal;
use stakematch_types::{Address, Result, StakematchError, Transfer};

/// Source of truth for who holds what.
#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    /// Per-(account, asset) balances.
    balances: HashMap<(Address, Address), Decimal>,
    /// Per-(owner, spender, asset) allowances.
    allowances: HashMap<(Address, Address, Address), Decimal>,
}

impl BalanceBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to an account's balance.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would exceed `Decimal::MAX`.
    pub fn deposit(&mut self, account: Address, asset: Address, amount: Decimal) -> Result<()> {
        let slot = self.balances.entry((account, asset)).or_default();
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| StakematchError::ArithmeticOverflow(format!("balance of {account}")))?;
        Ok(())
    }

    /// Set the allowance `owner` grants `spender` over `asset`.
    pub fn approve(&mut self, owner: Address, spender: Address, asset: Address, amount: Decimal) {
        self.allowances.insert((owner, spender, asset), amount);
    }

    #[must_use]
    pub fn balance(&self, account: &Address, asset: &Address) -> Decimal {
        self.balances
            .get(&(*account, *asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address, asset: &Address) -> Decimal {
        self.allowances
            .get(&(*owner, *spender, *asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn ensure_balance(&self, account: &Address, asset: &Address, needed: Decimal) -> Result<()> {
        let available = self.balance(account, asset);
        if available < needed {
            return Err(StakematchError::InsufficientBalance {
                account: *account,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn transfer(&mut self, asset: &Address, from: &Address, to: &Address, amount: Decimal) -> Result<()> {
        self.ensure_balance(from, asset, amount)?;
        *self.balances.entry((*from, *asset)).or_default() -= amount;
        *self.balances.entry((*to, *asset)).or_default() += amount;
        Ok(())
    }

    /// Move `amount` from `owner` to `spender`, consuming allowance.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if the allowance is below `amount`
    /// - `InsufficientBalance` if `owner` holds less than `amount`
    pub fn transfer_from(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: Decimal,
    ) -> Result<()> {
        let approved = self.allowance(owner, spender, asset);
        if approved < amount {
            return Err(StakematchError::InsufficientAllowance {
                owner: *owner,
                needed: amount,
                approved,
            });
        }
        self.transfer(asset, owner, spender, amount)?;
        self.allowances
            .insert((*owner, *spender, *asset), approved - amount);
        Ok(())
    }

    /// Pay out several transfers from `from`. Either every transfer is
    /// applied or none is.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` cannot cover the batch total.
    pub fn transfer_batch(&mut self, asset: &Address, from: &Address, transfers: &[Transfer]) -> Result<()> {
        let total = transfers.iter().try_fold(Decimal::ZERO, |acc, t| {
            acc.checked_add(t.amount)
                .ok_or_else(|| StakematchError::ArithmeticOverflow("batch total".into()))
        })?;
        self.ensure_balance(from, asset, total)?;
        for t in transfers {
            *self.balances.entry((*from, *asset)).or_default() -= t.amount;
            *self.balances.entry((t.recipient, *asset)).or_default() += t.amount;
        }
        Ok(())
    }

    /// Sum of every account's balance of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: &Address) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}
