//! [`CustodyLedger`]: a synchronized in-memory ledger.
//!
//! Implements both collaborator traits the engine needs. State lives behind
//! a single `parking_lot::Mutex`, so each ledger call is atomic with
//! respect to the others and a failed call leaves the state untouched.
//!
//! Permit transfers are checked in this order:
//!
//! ```text
//! deadline → requested ≤ permitted → owner signature → nonce unused
//!          → balance → move funds → consume nonce
//! ```

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use stakematch_auth::{Secp256k1Verifier, SignatureVerifier, message};
use stakematch_types::{
    Address, PermitTransferAuthorizer, PermitTransferFrom, Result, StakematchError, TokenLedger,
    Transfer, TransferDetails, amount,
};

use crate::{BalanceBook, PermitNonces, SupplyConservation};

#[derive(Debug, Default)]
struct CustodyState {
    book: BalanceBook,
    nonces: PermitNonces,
    supply: SupplyConservation,
}

/// In-memory token ledger with allowance and permit support.
///
/// `V` verifies permit signatures; owners sign like any off-line wallet,
/// so the default is [`Secp256k1Verifier`].
#[derive(Debug, Default)]
pub struct CustodyLedger<V = Secp256k1Verifier> {
    state: Mutex<CustodyState>,
    verifier: V,
}

impl CustodyLedger<Secp256k1Verifier> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_verifier(Secp256k1Verifier::new())
    }
}

impl<V: SignatureVerifier> CustodyLedger<V> {
    #[must_use]
    pub fn with_verifier(verifier: V) -> Self {
        Self {
            state: Mutex::new(CustodyState::default()),
            verifier,
        }
    }

    /// Create `amount` of `asset` in `account`.
    ///
    /// # Errors
    /// `InvalidAmount` for a negative or fractional amount,
    /// `ArithmeticOverflow` if the asset's supply would exceed `Decimal::MAX`.
    pub fn mint(&self, account: Address, asset: Address, amount: Decimal) -> Result<()> {
        amount::ensure_whole(amount, "mint")?;
        let mut state = self.state.lock();
        // Balances never exceed supply.
        state.supply.record_mint(&asset, amount)?;
        state.book.deposit(account, asset, amount)?;
        tracing::debug!(account = %account, asset = %asset, amount = %amount, "Minted");
        Ok(())
    }

    /// Set the standing allowance `owner` grants `spender`.
    pub fn approve(&self, owner: Address, spender: Address, asset: Address, amount: Decimal) -> Result<()> {
        amount::ensure_whole(amount, "allowance")?;
        self.state.lock().book.approve(owner, spender, asset, amount);
        Ok(())
    }

    #[must_use]
    pub fn balance(&self, account: &Address, asset: &Address) -> Decimal {
        self.state.lock().book.balance(account, asset)
    }

    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address, asset: &Address) -> Decimal {
        self.state.lock().book.allowance(owner, spender, asset)
    }

    #[must_use]
    pub fn is_nonce_used(&self, owner: &Address, nonce: u64) -> bool {
        self.state.lock().nonces.is_used(owner, nonce)
    }

    /// Check `Σ balances == Σ minted` for `asset`.
    pub fn verify_supply(&self, asset: &Address) -> Result<()> {
        let state = self.state.lock();
        state.supply.verify(asset, state.book.total_supply(asset))
    }

    /// [`PermitTransferAuthorizer::permit_transfer_from`] evaluated at `now`.
    pub fn permit_transfer_from_at(
        &self,
        now: DateTime<Utc>,
        spender: &Address,
        permit: &PermitTransferFrom,
        details: &TransferDetails,
        owner: &Address,
        signature: &[u8],
    ) -> Result<()> {
        if permit.is_expired_at(now) {
            return Err(StakematchError::PermitExpired);
        }
        amount::ensure_whole(details.requested_amount, "requested amount")?;
        if details.requested_amount > permit.amount {
            return Err(StakematchError::PermitAmountExceeded {
                requested: details.requested_amount,
                permitted: permit.amount,
            });
        }
        let signed = message::permit_message(permit, spender)?;
        self.verifier.verify(owner, &signed, signature)?;

        let mut state = self.state.lock();
        state.nonces.ensure_unused(owner, permit.nonce)?;
        state
            .book
            .transfer(&permit.token, owner, &details.to, details.requested_amount)?;
        state.nonces.consume(owner, permit.nonce)?;
        tracing::debug!(
            owner = %owner,
            to = %details.to,
            amount = %details.requested_amount,
            nonce = permit.nonce,
            "Permit transfer executed"
        );
        Ok(())
    }
}

impl<V: SignatureVerifier> TokenLedger for CustodyLedger<V> {
    fn debit(&self, asset: &Address, payer: &Address, custody: &Address, amount: Decimal) -> Result<()> {
        amount::ensure_whole(amount, "debit")?;
        self.state.lock().book.transfer_from(asset, payer, custody, amount)
    }

    fn credit(&self, asset: &Address, custody: &Address, recipient: &Address, amount: Decimal) -> Result<()> {
        amount::ensure_whole(amount, "credit")?;
        self.state.lock().book.transfer(asset, custody, recipient, amount)
    }

    fn credit_batch(&self, asset: &Address, custody: &Address, transfers: &[Transfer]) -> Result<()> {
        for t in transfers {
            amount::ensure_whole(t.amount, "credit")?;
        }
        self.state.lock().book.transfer_batch(asset, custody, transfers)
    }
}

impl<V: SignatureVerifier> PermitTransferAuthorizer for CustodyLedger<V> {
    fn permit_transfer_from(
        &self,
        spender: &Address,
        permit: &PermitTransferFrom,
        details: &TransferDetails,
        owner: &Address,
        signature: &[u8],
    ) -> Result<()> {
        self.permit_transfer_from_at(Utc::now(), spender, permit, details, owner, signature)
    }
}
