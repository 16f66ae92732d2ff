//! Resolve, duel resolution and cancellation over a [`MatchStore`].
//!
//! Precondition order for `resolve`:
//!
//! ```text
//! NotStarted → AlreadySettled → WrongGameMode → InvalidPayouts (length)
//!   → InvalidWinner → InvalidPayouts (pot) → NotOldestOpenGame
//!   → InvalidSignature → commit
//! ```
//!
//! `resolve_duel` follows the same order with a single winner.
//! `cancel` and `force_cancel` skip payout and ordering checks: any unsettled
//! game may be cancelled at any time.

use rust_decimal::Decimal;
use stakematch_auth::{SignatureVerifier, message};
use stakematch_lobby::{MatchStore, StoreSnapshot};
use stakematch_types::{
    Address, DuelOutcome, EngineConfig, Game, GameEvent, GameId, GameMode, RemainderPolicy,
    Result, SettlementInstruction, StakematchError, Transfer,
};

use crate::payout;

/// A committed settlement whose transfers are still owed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub game_id: GameId,
    pub asset: Address,
    pub transfers: Vec<Transfer>,
    pub event: GameEvent,
    /// The game and lobby counter as they were before the commit.
    pub snapshot: StoreSnapshot,
}

impl Settlement {
    /// Total owed across all transfers.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Validates signed instructions and commits settlements.
#[derive(Debug, Clone)]
pub struct Settler<V> {
    verifier: V,
    remainder_policy: RemainderPolicy,
}

impl<V: SignatureVerifier> Settler<V> {
    #[must_use]
    pub fn new(verifier: V, remainder_policy: RemainderPolicy) -> Self {
        Self {
            verifier,
            remainder_policy,
        }
    }

    #[must_use]
    pub fn from_config(verifier: V, config: &EngineConfig) -> Self {
        Self::new(verifier, config.remainder_policy)
    }

    #[must_use]
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    #[must_use]
    pub fn remainder_policy(&self) -> RemainderPolicy {
        self.remainder_policy
    }

    /// Settle a royale game with explicit payouts.
    pub fn resolve(
        &self,
        store: &mut MatchStore,
        instruction: &SettlementInstruction,
        signature: &[u8],
    ) -> Result<Settlement> {
        let game = unsettled(store, &instruction.game_id, AlreadyVariant::Settled)?;
        if game.mode != GameMode::Royale {
            return Err(wrong_mode(game));
        }
        payout::validate_payouts(game, &instruction.winners, &instruction.payouts)?;
        ensure_oldest_open(store, game)?;

        let signed = message::instruction_message(instruction)?;
        self.verifier.verify(&game.resolver, &signed, signature)?;

        let transfers = payout::royale_transfers(
            game,
            &instruction.winners,
            &instruction.payouts,
            self.remainder_policy,
        )?;
        let event = GameEvent::Resolved {
            game_id: game.id,
            winners: instruction.winners.clone(),
            payouts: instruction.payouts.clone(),
        };
        commit(store, &instruction.game_id, transfers, event)
    }

    /// Settle a duel with a single winner or a draw.
    pub fn resolve_duel(
        &self,
        store: &mut MatchStore,
        game_id: &GameId,
        outcome: DuelOutcome,
        signature: &[u8],
    ) -> Result<Settlement> {
        let game = unsettled(store, game_id, AlreadyVariant::Settled)?;
        let transfers = payout::duel_transfers(game, outcome)?;
        ensure_oldest_open(store, game)?;

        let signed = message::duel_message(game_id, outcome);
        self.verifier.verify(&game.resolver, &signed, signature)?;

        let (winners, payouts) = match outcome {
            DuelOutcome::Winner(winner) => (vec![winner], vec![transfers[0].amount]),
            DuelOutcome::Draw => (
                game.members.clone(),
                vec![game.stake; game.member_count()],
            ),
        };
        let event = GameEvent::Resolved {
            game_id: *game_id,
            winners,
            payouts,
        };
        commit(store, game_id, transfers, event)
    }

    /// Cancel an unsettled game on the resolver's signature and refund
    /// every member.
    pub fn cancel(&self, store: &mut MatchStore, game_id: &GameId, signature: &[u8]) -> Result<Settlement> {
        let game = unsettled(store, game_id, AlreadyVariant::Resolved)?;
        self.verifier
            .verify(&game.resolver, &message::cancel_message(game_id), signature)?;
        let transfers = payout::refund_transfers(game);
        commit(store, game_id, transfers, GameEvent::Cancelled { game_id: *game_id })
    }

    /// Cancel on the resolver's direct authority.
    ///
    /// # Errors
    /// `NotStarted`, then `NotResolver` if `caller` is not the game's
    /// resolver, then `AlreadyResolved`.
    pub fn force_cancel(&self, store: &mut MatchStore, caller: &Address, game_id: &GameId) -> Result<Settlement> {
        let game = store.registry.started(game_id)?;
        if game.resolver != *caller {
            return Err(StakematchError::NotResolver {
                game_id: *game_id,
                caller: *caller,
            });
        }
        let game = unsettled(store, game_id, AlreadyVariant::Resolved)?;
        let transfers = payout::refund_transfers(game);
        commit(store, game_id, transfers, GameEvent::Cancelled { game_id: *game_id })
    }
}

/// Which error a settled game reports.
#[derive(Clone, Copy)]
enum AlreadyVariant {
    Settled,
    Resolved,
}

fn unsettled<'a>(store: &'a MatchStore, game_id: &GameId, variant: AlreadyVariant) -> Result<&'a Game> {
    let game = store.registry.started(game_id)?;
    if game.settled {
        return Err(match variant {
            AlreadyVariant::Settled => StakematchError::AlreadySettled(*game_id),
            AlreadyVariant::Resolved => StakematchError::AlreadyResolved(*game_id),
        });
    }
    Ok(game)
}

fn wrong_mode(game: &Game) -> StakematchError {
    StakematchError::WrongGameMode {
        game_id: game.id,
        actual: game.mode.to_string(),
    }
}

/// An under-capacity game may only be resolved while it is the lobby's
/// oldest open game.
fn ensure_oldest_open(store: &MatchStore, game: &Game) -> Result<()> {
    if game.is_full() {
        return Ok(());
    }
    let expected = store.oldest_open_game(&game.lobby_id);
    if game.id != expected {
        return Err(StakematchError::NotOldestOpenGame {
            game_id: game.id,
            expected,
        });
    }
    Ok(())
}

fn commit(store: &mut MatchStore, game_id: &GameId, transfers: Vec<Transfer>, event: GameEvent) -> Result<Settlement> {
    let snapshot = store.snapshot(game_id)?;
    let game = store
        .registry
        .get_mut(game_id)
        .ok_or(StakematchError::NotStarted(*game_id))?;
    game.mark_settled()?;
    let lobby = game.lobby_id;
    let asset = game.asset;
    store.advance_closed(&lobby);

    tracing::debug!(game = %game_id, event = event.name(), transfers = transfers.len(), "Settlement committed");
    Ok(Settlement {
        game_id: *game_id,
        asset,
        transfers,
        event,
        snapshot,
    })
}
