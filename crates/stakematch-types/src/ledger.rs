//! Collaborator interfaces: the token ledger and the permit authorizer.
//!
//! The engine never moves funds itself. It issues debit/credit
//! instructions to a [`TokenLedger`] and, for delegated deposits, hands a
//! signed permit to a [`PermitTransferAuthorizer`]. Both take `&self`: a
//! ledger is shared infrastructure and is expected to synchronize
//! internally.
//!
//! Every failure is a hard error. A ledger that would "return false" on
//! insufficient funds must map that to an `Err`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, PermitTransferFrom, Result, TransferDetails};

/// One outbound payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub recipient: Address,
    pub amount: Decimal,
}

impl Transfer {
    #[must_use]
    pub fn new(recipient: Address, amount: Decimal) -> Self {
        Self { recipient, amount }
    }
}

/// Custody and payout of a fungible asset.
pub trait TokenLedger {
    /// Pull `amount` of `asset` from `payer` into `custody`, consuming a
    /// previously granted allowance.
    fn debit(&self, asset: &Address, payer: &Address, custody: &Address, amount: Decimal) -> Result<()>;

    /// Push `amount` of `asset` from `custody` to `recipient`.
    fn credit(&self, asset: &Address, custody: &Address, recipient: &Address, amount: Decimal) -> Result<()>;

    /// Push several payouts.
    ///
    /// The default issues one `credit` per transfer, which is only
    /// all-or-nothing if individual credits cannot fail part-way through a
    /// batch. Ledgers that can fail mid-batch must override this and apply
    /// the batch atomically.
    fn credit_batch(&self, asset: &Address, custody: &Address, transfers: &[Transfer]) -> Result<()> {
        for transfer in transfers {
            self.credit(asset, custody, &transfer.recipient, transfer.amount)?;
        }
        Ok(())
    }
}

/// Executes signed one-shot transfers on behalf of an owner.
pub trait PermitTransferAuthorizer {
    /// Move `details.requested_amount` of `permit.token` from `owner` to
    /// `details.to`, authorized by `signature` over the permit and `spender`.
    fn permit_transfer_from(
        &self,
        spender: &Address,
        permit: &PermitTransferFrom,
        details: &TransferDetails,
        owner: &Address,
        signature: &[u8],
    ) -> Result<()>;
}
