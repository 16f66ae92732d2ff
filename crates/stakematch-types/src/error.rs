//! Error types for the StakeMatch engine.
//!
//! All errors use the `SM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by category:
//! - 1xx: Configuration errors (invalid game parameters)
//! - 2xx: State errors (operation invalid for the game's lifecycle state)
//! - 3xx: Authorization errors (missing or bad proof)
//! - 4xx: Payout errors (membership or pot bounds violated)
//! - 5xx: Ordering errors (fairness ordering violated)
//! - 6xx: Ledger / custody errors
//! - 7xx: Concurrency errors
//! - 9xx: General / internal errors

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, GameId, LobbyId};

/// Coarse classification of a [`StakematchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller supplied invalid game parameters.
    Configuration,
    /// Operation invalid given the game's current lifecycle state.
    State,
    /// Caller or instruction lacks the required proof.
    Authorization,
    /// Settlement instruction violates membership or pot bounds.
    Payout,
    /// Settlement instruction violates the under-capacity ordering rule.
    Ordering,
    /// The custody ledger or permit authorizer refused the transfer.
    Ledger,
    /// Another operation is already in flight on this thread.
    Concurrency,
    /// Unrecoverable internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::State => write!(f, "STATE"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Payout => write!(f, "PAYOUT"),
            Self::Ordering => write!(f, "ORDERING"),
            Self::Ledger => write!(f, "LEDGER"),
            Self::Concurrency => write!(f, "CONCURRENCY"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all StakeMatch operations.
#[derive(Debug, Error)]
pub enum StakematchError {
    // =================================================================
    // Configuration Errors (1xx)
    // =================================================================
    /// The resolver identity is the null address.
    #[error("SM_ERR_100: Invalid resolver: the null address cannot resolve games")]
    InvalidResolver,

    /// Capacity is below two or above the configured maximum.
    #[error("SM_ERR_101: Invalid capacity {capacity}: must be between 2 and {max}")]
    InvalidCapacity { capacity: u32, max: u32 },

    /// A two-party stake does not exceed the protocol fee.
    #[error("SM_ERR_102: Insufficient value: stake {stake} must exceed fee {fee}")]
    InsufficientValue { stake: Decimal, fee: Decimal },

    /// An amount is negative, fractional, or zero where a stake is required.
    #[error("SM_ERR_103: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Engine configuration failed validation.
    #[error("SM_ERR_104: Invalid configuration: {0}")]
    InvalidConfig(String),

    // =================================================================
    // State Errors (2xx)
    // =================================================================
    /// The game does not exist or has no members yet.
    #[error("SM_ERR_200: Game not started: {0}")]
    NotStarted(GameId),

    /// The game was already resolved or cancelled.
    #[error("SM_ERR_201: Game already settled: {0}")]
    AlreadySettled(GameId),

    /// Cancellation was attempted on a game that is already settled.
    #[error("SM_ERR_202: Game already resolved: {0}")]
    AlreadyResolved(GameId),

    /// The participant already occupies a slot in this game.
    #[error("SM_ERR_203: {participant} is already a member of game {game_id}")]
    AlreadyMember {
        game_id: GameId,
        participant: Address,
    },

    /// The settlement call does not match the game's mode
    /// (royale payouts on a duel, or the reverse).
    #[error("SM_ERR_204: Wrong game mode for {game_id}: game is {actual}")]
    WrongGameMode { game_id: GameId, actual: String },

    /// The lobby id is already bound to games of another mode (a royale
    /// lobby of capacity two and a duel lobby with the same terms, or a
    /// duel lobby opened at a different fee).
    #[error("SM_ERR_205: Lobby {lobby_id} is bound to {existing} games")]
    LobbyModeConflict { lobby_id: LobbyId, existing: String },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The signature does not recover to (or verify against) the expected signer.
    #[error("SM_ERR_300: Invalid signature for expected signer {expected}")]
    InvalidSignature { expected: Address },

    /// `force_cancel` was called by someone other than the game's resolver.
    #[error("SM_ERR_301: Caller {caller} is not the resolver of game {game_id}")]
    NotResolver { game_id: GameId, caller: Address },

    /// The permit transfer does not target this engine's custody terms.
    #[error("SM_ERR_302: Invalid permit transfer: {reason}")]
    InvalidPermitTransfer { reason: String },

    // =================================================================
    // Payout Errors (4xx)
    // =================================================================
    /// A listed winner is not a member of the game (or is listed twice).
    #[error("SM_ERR_400: Invalid winner {winner} for game {game_id}")]
    InvalidWinner { game_id: GameId, winner: Address },

    /// Payout vector is malformed or exceeds the pot.
    #[error("SM_ERR_401: Invalid payouts: {reason}")]
    InvalidPayouts { reason: String },

    // =================================================================
    // Ordering Errors (5xx)
    // =================================================================
    /// An under-capacity game was submitted while an older game of the same
    /// lobby is still open.
    #[error("SM_ERR_500: Game {game_id} is not the oldest open game (expected {expected})")]
    NotOldestOpenGame { game_id: GameId, expected: GameId },

    // =================================================================
    // Ledger Errors (6xx)
    // =================================================================
    /// Not enough balance to perform the transfer.
    #[error("SM_ERR_600: Insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: Decimal,
        available: Decimal,
    },

    /// The payer has not approved enough allowance for the custody account.
    #[error("SM_ERR_601: Insufficient allowance for {owner}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        owner: Address,
        needed: Decimal,
        approved: Decimal,
    },

    /// The permit deadline has passed.
    #[error("SM_ERR_602: Permit expired")]
    PermitExpired,

    /// The permit nonce was already consumed (replay attempt).
    #[error("SM_ERR_603: Permit nonce {nonce} already used by {owner}")]
    PermitNonceReused { owner: Address, nonce: u64 },

    /// The requested amount exceeds the permitted amount.
    #[error("SM_ERR_604: Permit amount exceeded: requested {requested}, permitted {permitted}")]
    PermitAmountExceeded {
        requested: Decimal,
        permitted: Decimal,
    },

    /// Supply conservation invariant violated. Critical safety alert.
    #[error("SM_ERR_605: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Concurrency Errors (7xx)
    // =================================================================
    /// A state-mutating operation was re-entered from inside another one.
    #[error("SM_ERR_700: Reentrant call rejected: an operation is already in flight")]
    ReentrantCall,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Checked arithmetic overflowed.
    #[error("SM_ERR_900: Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Unrecoverable internal error.
    #[error("SM_ERR_901: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization / parse error.
    #[error("SM_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (reading configuration).
    #[error("SM_ERR_903: I/O error: {0}")]
    Io(String),
}

impl StakematchError {
    /// The category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidResolver
            | Self::InvalidCapacity { .. }
            | Self::InsufficientValue { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidConfig(_) => ErrorCategory::Configuration,
            Self::NotStarted(_)
            | Self::AlreadySettled(_)
            | Self::AlreadyResolved(_)
            | Self::AlreadyMember { .. }
            | Self::WrongGameMode { .. }
            | Self::LobbyModeConflict { .. } => ErrorCategory::State,
            Self::InvalidSignature { .. }
            | Self::NotResolver { .. }
            | Self::InvalidPermitTransfer { .. } => ErrorCategory::Authorization,
            Self::InvalidWinner { .. } | Self::InvalidPayouts { .. } => ErrorCategory::Payout,
            Self::NotOldestOpenGame { .. } => ErrorCategory::Ordering,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::PermitExpired
            | Self::PermitNonceReused { .. }
            | Self::PermitAmountExceeded { .. }
            | Self::SupplyInvariantViolation { .. } => ErrorCategory::Ledger,
            Self::ReentrantCall => ErrorCategory::Concurrency,
            Self::ArithmeticOverflow(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Io(_) => ErrorCategory::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, StakematchError>;

impl From<std::io::Error> for StakematchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StakematchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
