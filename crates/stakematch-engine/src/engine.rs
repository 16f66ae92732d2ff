//! The [`Engine`] facade.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use stakematch_auth::SignatureVerifier;
use stakematch_lobby::{JoinPlan, MatchStore, Matchmaker, identity};
use stakematch_settlement::{Settlement, Settler};
use stakematch_types::{
    Address, DuelOutcome, EngineConfig, Game, GameEvent, GameId, LobbyId, LobbyTerms,
    PermitTransferAuthorizer, PermitTransferFrom, Result, SettlementInstruction, StakematchError,
    TokenLedger, TransferDetails, constants,
};

use crate::{EventSink, NoopSink, ReentrancyGuard};

/// A signed permit submitted with a join instead of a standing allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitDeposit {
    pub permit: PermitTransferFrom,
    pub details: TransferDetails,
    pub signature: Vec<u8>,
}

/// Escrow matchmaking and settlement engine.
///
/// `L` holds custody, `V` checks resolver signatures, `S` receives
/// notifications. All operations take `&self`; share the engine behind an
/// `Arc` to use it from several threads.
pub struct Engine<L, V, S = NoopSink> {
    config: EngineConfig,
    matchmaker: Matchmaker,
    settler: Settler<V>,
    ledger: L,
    sink: S,
    store: Mutex<MatchStore>,
    guard: ReentrancyGuard,
}

impl<L: TokenLedger, V: SignatureVerifier> Engine<L, V, NoopSink> {
    /// Build an engine that discards notifications.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: EngineConfig, ledger: L, verifier: V) -> Result<Self> {
        Self::with_sink(config, ledger, verifier, NoopSink)
    }
}

impl<L: TokenLedger, V: SignatureVerifier, S: EventSink> Engine<L, V, S> {
    /// Build an engine that delivers notifications to `sink`.
    pub fn with_sink(config: EngineConfig, ledger: L, verifier: V, sink: S) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            custody = %config.custody_account,
            duel_fee = %config.duel_fee,
            remainder_policy = ?config.remainder_policy,
            max_capacity = config.max_capacity,
            "Engine started"
        );
        Ok(Self {
            matchmaker: Matchmaker::from_config(&config),
            settler: Settler::from_config(verifier, &config),
            config,
            ledger,
            sink,
            store: Mutex::new(MatchStore::new()),
            guard: ReentrancyGuard::new(),
        })
    }

    // =========================================================================
    // Matchmaking
    // =========================================================================

    /// Join the royale lobby `(resolver, asset, stake, capacity)`, paying the
    /// stake from a standing allowance. Returns the game joined.
    pub fn join(
        &self,
        participant: Address,
        resolver: Address,
        asset: Address,
        stake: Decimal,
        capacity: u32,
    ) -> Result<GameId> {
        let _entered = self.guard.enter()?;
        let terms = self.matchmaker.royale_terms(resolver, asset, stake, capacity)?;
        self.join_inner(participant, terms, |plan| self.debit_stake(plan))
    }

    /// Join the two-party lobby `(resolver, asset, stake)` at the configured
    /// duel fee.
    pub fn join_duel(&self, participant: Address, resolver: Address, asset: Address, stake: Decimal) -> Result<GameId> {
        let _entered = self.guard.enter()?;
        let terms = self
            .matchmaker
            .duel_terms(resolver, asset, stake, self.config.duel_fee)?;
        self.join_inner(participant, terms, |plan| self.debit_stake(plan))
    }

    /// Plan, take the stake into custody through `deposit`, then seat.
    /// Nothing is mutated unless the deposit succeeds.
    fn join_inner(
        &self,
        participant: Address,
        terms: LobbyTerms,
        deposit: impl FnOnce(&JoinPlan) -> Result<()>,
    ) -> Result<GameId> {
        let plan = self.matchmaker.plan(&self.store.lock(), participant, terms)?;
        deposit(&plan)?;

        let applied = self.matchmaker.apply(&mut self.store.lock(), &plan);
        let event = match applied {
            Ok(event) => event,
            Err(err) => return Err(self.refund_unseated(&plan, err)),
        };

        match &event {
            GameEvent::Created { game_id, capacity, .. } => tracing::info!(
                game = %game_id,
                lobby = %plan.lobby_id,
                cursor = plan.cursor,
                creator = %participant,
                capacity,
                "Game created"
            ),
            GameEvent::Joined { game_id, member_count, .. } => tracing::info!(
                game = %game_id,
                joiner = %participant,
                members = member_count,
                "Player joined"
            ),
            GameEvent::Resolved { .. } | GameEvent::Cancelled { .. } => {}
        }
        self.sink.emit(&event);
        Ok(plan.game_id)
    }

    /// Return the stake of a participant who paid but could not be seated.
    /// The seat error is what the caller sees; a failed refund is logged
    /// alongside it.
    fn refund_unseated(&self, plan: &JoinPlan, err: StakematchError) -> StakematchError {
        tracing::warn!(game = %plan.game_id, participant = %plan.participant, error = %err, "Join failed after deposit; refunding");
        let refund = self.ledger.credit(
            &plan.terms.asset,
            &self.config.custody_account,
            &plan.participant,
            plan.terms.stake,
        );
        if let Err(refund_err) = refund {
            tracing::error!(
                game = %plan.game_id,
                participant = %plan.participant,
                stake = %plan.terms.stake,
                error = %err,
                refund_error = %refund_err,
                "Stake refund failed; funds remain in custody"
            );
        }
        err
    }

    fn debit_stake(&self, plan: &JoinPlan) -> Result<()> {
        self.ledger.debit(
            &plan.terms.asset,
            &plan.participant,
            &self.config.custody_account,
            plan.terms.stake,
        )
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Settle a royale game with resolver-signed payouts.
    pub fn resolve(&self, instruction: &SettlementInstruction, signature: &[u8]) -> Result<()> {
        let _entered = self.guard.enter()?;
        let settlement = self.commit(&instruction.game_id, |store| {
            self.settler.resolve(store, instruction, signature)
        })?;
        self.pay_out(settlement)
    }

    /// Settle a duel with a resolver-signed winner or draw.
    pub fn resolve_duel(&self, game_id: &GameId, outcome: DuelOutcome, signature: &[u8]) -> Result<()> {
        let _entered = self.guard.enter()?;
        let settlement = self.commit(game_id, |store| {
            self.settler.resolve_duel(store, game_id, outcome, signature)
        })?;
        self.pay_out(settlement)
    }

    /// Cancel a game on a resolver-signed cancellation and refund every member.
    pub fn cancel(&self, game_id: &GameId, signature: &[u8]) -> Result<()> {
        let _entered = self.guard.enter()?;
        let settlement = self.commit(game_id, |store| self.settler.cancel(store, game_id, signature))?;
        self.pay_out(settlement)
    }

    /// Cancel a game on the resolver's own authority.
    pub fn force_cancel(&self, caller: &Address, game_id: &GameId) -> Result<()> {
        let _entered = self.guard.enter()?;
        let settlement = self.commit(game_id, |store| self.settler.force_cancel(store, caller, game_id))?;
        self.pay_out(settlement)
    }

    fn commit(&self, game_id: &GameId, op: impl FnOnce(&mut MatchStore) -> Result<Settlement>) -> Result<Settlement> {
        let result = op(&mut self.store.lock());
        if let Err(err) = &result {
            tracing::warn!(game = %game_id, error = %err, "Settlement rejected");
        }
        result
    }

    /// Credit a committed settlement. On ledger failure the commit is undone.
    fn pay_out(&self, settlement: Settlement) -> Result<()> {
        let credited = self.ledger.credit_batch(
            &settlement.asset,
            &self.config.custody_account,
            &settlement.transfers,
        );
        if let Err(err) = credited {
            tracing::warn!(game = %settlement.game_id, error = %err, "Payout failed; settlement rolled back");
            self.store.lock().restore(settlement.snapshot);
            return Err(err);
        }

        match &settlement.event {
            GameEvent::Resolved { winners, .. } => tracing::info!(
                game = %settlement.game_id,
                winners = winners.len(),
                paid = %settlement.total(),
                "Game resolved"
            ),
            GameEvent::Cancelled { .. } => tracing::info!(
                game = %settlement.game_id,
                refunded = %settlement.total(),
                "Game cancelled"
            ),
            GameEvent::Created { .. } | GameEvent::Joined { .. } => {}
        }
        self.sink.emit(&settlement.event);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of a game.
    #[must_use]
    pub fn game(&self, game_id: &GameId) -> Option<Game> {
        self.store.lock().game(game_id).cloned()
    }

    #[must_use]
    pub fn closed_count(&self, lobby: &LobbyId) -> u64 {
        self.store.lock().closed_count(lobby)
    }

    #[must_use]
    pub fn last_cursor(&self, participant: &Address, lobby: &LobbyId) -> u64 {
        self.store.lock().last_cursor(participant, lobby)
    }

    /// Id of the game at `closed_count + 1`, whether or not it exists yet.
    #[must_use]
    pub fn oldest_open_game(&self, lobby: &LobbyId) -> GameId {
        self.store.lock().oldest_open_game(lobby)
    }

    #[must_use]
    pub fn is_member(&self, game_id: &GameId, participant: &Address) -> bool {
        self.store.lock().is_member(game_id, participant)
    }

    /// Id of the royale lobby with these terms.
    pub fn lobby_id(&self, resolver: Address, asset: Address, stake: Decimal, capacity: u32) -> Result<LobbyId> {
        identity::lobby_id(&LobbyTerms::royale(resolver, asset, stake, capacity))
    }

    /// Id of the duel lobby with these terms. Equal to the id of the royale
    /// lobby of capacity two.
    pub fn duel_lobby_id(&self, resolver: Address, asset: Address, stake: Decimal) -> Result<LobbyId> {
        identity::lobby_id(&LobbyTerms::duel(resolver, asset, stake, self.config.duel_fee))
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<L, V, S> Engine<L, V, S>
where
    L: TokenLedger + PermitTransferAuthorizer,
    V: SignatureVerifier,
    S: EventSink,
{
    /// Join a royale lobby, paying the stake with a signed permit.
    pub fn join_with_permit(
        &self,
        participant: Address,
        resolver: Address,
        asset: Address,
        stake: Decimal,
        capacity: u32,
        deposit: &PermitDeposit,
    ) -> Result<GameId> {
        let _entered = self.guard.enter()?;
        let terms = self.matchmaker.royale_terms(resolver, asset, stake, capacity)?;
        self.join_permitted(participant, terms, deposit)
    }

    /// Join a duel lobby, paying the stake with a signed permit.
    pub fn join_duel_with_permit(
        &self,
        participant: Address,
        resolver: Address,
        asset: Address,
        stake: Decimal,
        deposit: &PermitDeposit,
    ) -> Result<GameId> {
        let _entered = self.guard.enter()?;
        let terms = self
            .matchmaker
            .duel_terms(resolver, asset, stake, self.config.duel_fee)?;
        self.join_permitted(participant, terms, deposit)
    }

    fn join_permitted(&self, participant: Address, terms: LobbyTerms, deposit: &PermitDeposit) -> Result<GameId> {
        self.check_permit(&terms, deposit)?;
        self.join_inner(participant, terms, |_| {
            self.ledger.permit_transfer_from(
                &self.config.custody_account,
                &deposit.permit,
                &deposit.details,
                &participant,
                &deposit.signature,
            )
        })
    }

    /// The permit must pay exactly the stake, in the lobby's asset, into
    /// this engine's custody.
    fn check_permit(&self, terms: &LobbyTerms, deposit: &PermitDeposit) -> Result<()> {
        let invalid = |reason: String| Err(StakematchError::InvalidPermitTransfer { reason });
        if deposit.details.to != self.config.custody_account {
            return invalid(format!(
                "destination {} is not custody {}",
                deposit.details.to, self.config.custody_account
            ));
        }
        if deposit.permit.token != terms.asset {
            return invalid(format!(
                "permit token {} does not match asset {}",
                deposit.permit.token, terms.asset
            ));
        }
        if deposit.details.requested_amount != terms.stake {
            return invalid(format!(
                "requested {} does not match stake {}",
                deposit.details.requested_amount, terms.stake
            ));
        }
        Ok(())
    }
}
