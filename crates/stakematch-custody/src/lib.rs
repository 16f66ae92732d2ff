//! # stakematch-custody
//!
//! An in-memory token ledger the engine can run against: per-account
//! balances, standing allowances, signed one-shot permits and a supply
//! conservation check.
//!
//! ## Components
//!
//! 1. **BalanceBook**: per-(account, asset) balances and per-(owner, spender,
//!    asset) allowances. Every mutation is all-or-nothing.
//! 2. **PermitNonces**: per-owner single-use permit nonces
//! 3. **SupplyConservation**: `Σ balances == Σ minted` per asset
//! 4. **CustodyLedger**: implements `TokenLedger` and
//!    `PermitTransferAuthorizer` on top of the three

pub mod balance_book;
pub mod ledger;
pub mod nonces;
pub mod supply;

pub use balance_book::BalanceBook;
pub use ledger::CustodyLedger;
pub use nonces::PermitNonces;
pub use supply::SupplyConservation;
