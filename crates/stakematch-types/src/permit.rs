//! Delegated one-shot deposit authorization.
//!
//! A permit lets the engine pull a specific amount of a participant's asset
//! without a standing allowance. The participant signs the permit; the
//! engine supplies the transfer details and must name its own custody
//! account as the destination.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Address;

/// The signed part of a permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitTransferFrom {
    /// Asset the permit covers.
    pub token: Address,
    /// Maximum amount that may be moved.
    pub amount: Decimal,
    /// Single-use nonce, scoped to the permit owner.
    pub nonce: u64,
    /// The permit is void after this instant.
    pub deadline: DateTime<Utc>,
}

impl PermitTransferFrom {
    /// Returns `true` if the deadline has passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}

/// Where the permitted funds go and how much is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    /// Destination account.
    pub to: Address,
    /// Amount to move (≤ permitted amount).
    pub requested_amount: Decimal,
}
