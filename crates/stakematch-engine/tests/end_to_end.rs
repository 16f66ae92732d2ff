//! # End-to-End Engine Tests
//!
//! Full join → resolve/cancel cycles through the engine facade, with an
//! in-memory custody ledger holding real balances.
//!
//! ## Flow Under Test
//!
//! ```text
//! fund + approve → join (debit) → Created/Joined
//!               → resolve / resolve_duel / cancel (credit) → Resolved/Cancelled
//! ```

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use stakematch_auth::{
    Secp256k1Verifier, TestSigner,
    abi::{self, Token},
    keccak256,
};
use stakematch_custody::CustodyLedger;
use stakematch_engine::{Engine, PermitDeposit, RecordingSink};
use stakematch_types::{
    Address, DuelOutcome, EngineConfig, GameEvent, GameId, GameStatus, PermitTransferFrom,
    RemainderPolicy, SettlementInstruction, StakematchError, TransferDetails,
};

const USDC: Address = Address([0xaa; 20]);
const VAULT: Address = Address([0xcc; 20]);

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn player(n: u8) -> Address {
    Address([n; 20])
}

struct Harness {
    engine: Engine<CustodyLedger, Secp256k1Verifier, RecordingSink>,
    resolver: TestSigner,
}

impl Harness {
    fn new(config: EngineConfig) -> Self {
        let engine = Engine::with_sink(config, CustodyLedger::new(), Secp256k1Verifier::new(), RecordingSink::new())
            .unwrap();
        Self {
            engine,
            resolver: TestSigner::from_seed(0x42),
        }
    }

    fn royale() -> Self {
        Self::new(EngineConfig::new(VAULT))
    }

    fn duel(fee: i64) -> Self {
        Self::new(EngineConfig::new(VAULT).with_duel_fee(dec(fee)))
    }

    fn fund(&self, who: Address, amount: i64) {
        self.engine.ledger().mint(who, USDC, dec(amount)).unwrap();
        self.engine.ledger().approve(who, VAULT, USDC, dec(amount)).unwrap();
    }

    fn balance(&self, who: &Address) -> Decimal {
        self.engine.ledger().balance(who, &USDC)
    }

    fn join(&self, who: Address, capacity: u32) -> GameId {
        self.engine
            .join(who, self.resolver.address(), USDC, dec(1000), capacity)
            .unwrap()
    }

    fn join_duel(&self, who: Address) -> GameId {
        self.engine
            .join_duel(who, self.resolver.address(), USDC, dec(1000))
            .unwrap()
    }

    fn resolve(&self, game: GameId, winners: Vec<Address>, payouts: Vec<Decimal>) -> Result<(), StakematchError> {
        let sig = self.resolver.sign_resolve(&game, &winners, &payouts);
        self.engine
            .resolve(&SettlementInstruction::new(game, winners, payouts), &sig)
    }
}

// =============================================================================
// Scenario 1: three-player royale, winner takes the pot
// =============================================================================

#[test]
fn royale_capacity_three_winner_takes_all() {
    let h = Harness::royale();
    let (p1, p2, p3) = (player(1), player(2), player(3));
    for p in [p1, p2, p3] {
        h.fund(p, 1000);
    }

    let g1 = h.join(p1, 3);
    assert_eq!(h.join(p2, 3), g1);
    assert_eq!(h.join(p3, 3), g1);

    let lobby = h.engine.lobby_id(h.resolver.address(), USDC, dec(1000), 3).unwrap();
    assert_eq!(g1, stakematch_lobby::game_id(&lobby, 1));
    assert_eq!(h.engine.closed_count(&lobby), 1);
    assert_eq!(h.engine.game(&g1).unwrap().members, vec![p1, p2, p3]);
    assert_eq!(h.balance(&VAULT), dec(3000));

    h.resolve(g1, vec![p1], vec![dec(3000)]).unwrap();

    assert_eq!(h.balance(&p1), dec(3000));
    assert_eq!(h.balance(&p2), Decimal::ZERO);
    assert_eq!(h.balance(&h.resolver.address()), Decimal::ZERO);
    assert_eq!(h.balance(&VAULT), Decimal::ZERO);
    assert_eq!(h.engine.game(&g1).unwrap().status(), GameStatus::Settled);

    let events = h.engine.sink().events();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], GameEvent::Created { game_id, creator, capacity: 3, .. } if game_id == g1 && creator == p1));
    assert_eq!(
        events[1],
        GameEvent::Joined { game_id: g1, creator: p1, joiner: p2, member_count: 2 }
    );
    assert_eq!(
        events[2],
        GameEvent::Joined { game_id: g1, creator: p1, joiner: p3, member_count: 3 }
    );
    assert_eq!(
        events[3],
        GameEvent::Resolved { game_id: g1, winners: vec![p1], payouts: vec![dec(3000)] }
    );
    h.engine.ledger().verify_supply(&USDC).unwrap();
}

// =============================================================================
// Scenario 2: duel with a fee, replay rejected
// =============================================================================

#[test]
fn duel_with_fee_pays_winner_and_resolver_once() {
    let h = Harness::duel(100);
    let (p1, p2) = (player(1), player(2));
    h.fund(p1, 1000);
    h.fund(p2, 1000);

    let g1 = h.join_duel(p1);
    assert_eq!(h.join_duel(p2), g1);

    let sig = h.resolver.sign_duel(&g1, DuelOutcome::Winner(p1));
    h.engine.resolve_duel(&g1, DuelOutcome::Winner(p1), &sig).unwrap();
    assert_eq!(h.balance(&p1), dec(1900));
    assert_eq!(h.balance(&h.resolver.address()), dec(100));

    let err = h
        .engine
        .resolve_duel(&g1, DuelOutcome::Winner(p1), &sig)
        .unwrap_err();
    assert!(matches!(err, StakematchError::AlreadySettled(id) if id == g1));
    assert_eq!(h.balance(&p1), dec(1900));
}

// =============================================================================
// Scenario 3: duel draw
// =============================================================================

#[test]
fn duel_draw_refunds_both_players() {
    let h = Harness::duel(100);
    let (p1, p2) = (player(1), player(2));
    h.fund(p1, 1000);
    h.fund(p2, 1000);
    let g1 = h.join_duel(p1);
    h.join_duel(p2);

    let sig = h.resolver.sign_duel(&g1, DuelOutcome::Draw);
    h.engine.resolve_duel(&g1, DuelOutcome::Draw, &sig).unwrap();
    assert_eq!(h.balance(&p1), dec(1000));
    assert_eq!(h.balance(&p2), dec(1000));
    assert_eq!(h.balance(&h.resolver.address()), Decimal::ZERO);

    let last = h.engine.sink().events().pop().unwrap();
    assert_eq!(
        last,
        GameEvent::Resolved { game_id: g1, winners: vec![p1, p2], payouts: vec![dec(1000), dec(1000)] }
    );
}

// =============================================================================
// Scenario 4: under-capacity games settle oldest first
// =============================================================================

#[test]
fn under_capacity_games_resolve_in_cursor_order() {
    let h = Harness::royale();
    let p1 = player(1);
    h.fund(p1, 2000);

    let g1 = h.join(p1, 3);
    let g2 = h.join(p1, 3);
    assert_ne!(g1, g2);
    let lobby = h.engine.lobby_id(h.resolver.address(), USDC, dec(1000), 3).unwrap();
    assert_eq!(h.engine.last_cursor(&p1, &lobby), 2);
    assert_eq!(h.engine.oldest_open_game(&lobby), g1);

    let err = h.resolve(g2, vec![p1], vec![dec(1000)]).unwrap_err();
    assert!(matches!(err, StakematchError::NotOldestOpenGame { game_id, expected } if game_id == g2 && expected == g1));

    h.resolve(g1, vec![p1], vec![dec(1000)]).unwrap();
    assert_eq!(h.engine.closed_count(&lobby), 1);
    assert_eq!(h.engine.oldest_open_game(&lobby), g2);

    h.resolve(g2, vec![p1], vec![dec(1000)]).unwrap();
    assert_eq!(h.engine.closed_count(&lobby), 2);
    assert_eq!(h.balance(&p1), dec(2000));
}

#[test]
fn duel_lobby_id_is_the_four_term_hash() {
    let h = Harness::duel(100);
    let lobby = h.engine.duel_lobby_id(h.resolver.address(), USDC, dec(1000)).unwrap();
    let expected = keccak256(&abi::encode(&[
        Token::Address(h.resolver.address()),
        Token::Address(USDC),
        Token::Uint(1000),
        Token::Uint(2),
    ]));
    assert_eq!(lobby.0, expected);
    assert_eq!(lobby, h.engine.lobby_id(h.resolver.address(), USDC, dec(1000), 2).unwrap());

    // The game id an external resolver derives is the one it must sign.
    h.fund(player(1), 1000);
    h.fund(player(2), 1000);
    let game = h.join_duel(player(1));
    h.join_duel(player(2));
    assert_eq!(game, stakematch_lobby::game_id(&lobby, 1));
    let sig = h.resolver.sign_duel(&game, DuelOutcome::Winner(player(2)));
    h.engine.resolve_duel(&game, DuelOutcome::Winner(player(2)), &sig).unwrap();
    assert_eq!(h.balance(&player(2)), dec(1900));
}

#[test]
fn duel_refused_in_royale_lobby_with_same_terms() {
    let h = Harness::duel(100);
    h.fund(player(1), 1000);
    h.fund(player(2), 1000);
    let game = h.join(player(1), 2);

    let err = h
        .engine
        .join_duel(player(2), h.resolver.address(), USDC, dec(1000))
        .unwrap_err();
    assert!(matches!(err, StakematchError::LobbyModeConflict { .. }));
    assert_eq!(h.balance(&player(2)), dec(1000));
    assert_eq!(h.engine.game(&game).unwrap().member_count(), 1);
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn signed_cancel_refunds_every_member() {
    let h = Harness::royale();
    for n in 1..=3 {
        h.fund(player(n), 1000);
    }
    let g1 = h.join(player(1), 4);
    h.join(player(2), 4);
    h.join(player(3), 4);

    let sig = h.resolver.sign_cancel(&g1);
    h.engine.cancel(&g1, &sig).unwrap();
    for n in 1..=3 {
        assert_eq!(h.balance(&player(n)), dec(1000));
    }
    assert_eq!(h.engine.sink().events().last().unwrap(), &GameEvent::Cancelled { game_id: g1 });

    let err = h.engine.cancel(&g1, &sig).unwrap_err();
    assert!(matches!(err, StakematchError::AlreadyResolved(_)));
}

#[test]
fn cancel_signed_by_stranger_rejected() {
    let h = Harness::royale();
    h.fund(player(1), 1000);
    let g1 = h.join(player(1), 2);
    let sig = TestSigner::from_seed(7).sign_cancel(&g1);
    let err = h.engine.cancel(&g1, &sig).unwrap_err();
    assert!(matches!(err, StakematchError::InvalidSignature { .. }));
    assert_eq!(h.balance(&VAULT), dec(1000));
}

#[test]
fn force_cancel_by_resolver_only() {
    let h = Harness::royale();
    h.fund(player(1), 1000);
    let g1 = h.join(player(1), 2);

    let err = h.engine.force_cancel(&player(1), &g1).unwrap_err();
    assert!(matches!(err, StakematchError::NotResolver { .. }));

    h.engine.force_cancel(&h.resolver.address(), &g1).unwrap();
    assert_eq!(h.balance(&player(1)), dec(1000));
    let err = h.engine.force_cancel(&h.resolver.address(), &g1).unwrap_err();
    assert!(matches!(err, StakematchError::AlreadyResolved(_)));
}

#[test]
fn cancelled_middle_game_does_not_stall_lobby() {
    let h = Harness::royale();
    h.fund(player(1), 3000);
    h.fund(player(2), 1000);
    let lobby = h.engine.lobby_id(h.resolver.address(), USDC, dec(1000), 3).unwrap();

    let g1 = h.join(player(1), 3);
    let g2 = h.join(player(1), 3);
    h.engine.force_cancel(&h.resolver.address(), &g2).unwrap();
    assert_eq!(h.engine.closed_count(&lobby), 0);

    h.resolve(g1, vec![player(1)], vec![dec(1000)]).unwrap();
    assert_eq!(h.engine.closed_count(&lobby), 2);

    let g3 = h.join(player(2), 3);
    assert_eq!(g3, stakematch_lobby::game_id(&lobby, 3));
}

// =============================================================================
// Remainder policies
// =============================================================================

#[test]
fn remainder_routing_follows_policy() {
    for (policy, resolver_gets, burned, loser_gets) in [
        (RemainderPolicy::ToResolver, 1000, 0, 0),
        (RemainderPolicy::Burn, 0, 1000, 0),
        (RemainderPolicy::ReturnToLosers, 0, 0, 500),
    ] {
        let h = Harness::new(EngineConfig::new(VAULT).with_remainder_policy(policy));
        for n in 1..=3 {
            h.fund(player(n), 1000);
        }
        let g1 = h.join(player(1), 3);
        h.join(player(2), 3);
        h.join(player(3), 3);

        h.resolve(g1, vec![player(1)], vec![dec(2000)]).unwrap();
        assert_eq!(h.balance(&player(1)), dec(2000), "{policy:?}");
        assert_eq!(h.balance(&h.resolver.address()), dec(resolver_gets), "{policy:?}");
        assert_eq!(h.balance(&Address::ZERO), dec(burned), "{policy:?}");
        assert_eq!(h.balance(&player(2)), dec(loser_gets), "{policy:?}");
        assert_eq!(h.balance(&VAULT), Decimal::ZERO, "{policy:?}");
        h.engine.ledger().verify_supply(&USDC).unwrap();
    }
}

// =============================================================================
// Permit deposits
// =============================================================================

#[test]
fn permit_join_without_allowance() {
    let h = Harness::royale();
    let alice = TestSigner::from_seed(9);
    h.engine.ledger().mint(alice.address(), USDC, dec(1000)).unwrap();

    let permit = PermitTransferFrom {
        token: USDC,
        amount: dec(1000),
        nonce: 1,
        deadline: Utc::now() + Duration::minutes(10),
    };
    let deposit = PermitDeposit {
        signature: alice.sign_permit(&permit, &VAULT),
        permit,
        details: TransferDetails { to: VAULT, requested_amount: dec(1000) },
    };

    let g1 = h
        .engine
        .join_with_permit(alice.address(), h.resolver.address(), USDC, dec(1000), 2, &deposit)
        .unwrap();
    assert!(h.engine.is_member(&g1, &alice.address()));
    assert_eq!(h.balance(&VAULT), dec(1000));

    h.engine.ledger().mint(alice.address(), USDC, dec(1000)).unwrap();
    let err = h
        .engine
        .join_with_permit(alice.address(), h.resolver.address(), USDC, dec(1000), 2, &deposit)
        .unwrap_err();
    assert!(matches!(err, StakematchError::PermitNonceReused { .. }));
}

#[test]
fn permit_duel_join() {
    let h = Harness::duel(50);
    let alice = TestSigner::from_seed(9);
    h.engine.ledger().mint(alice.address(), USDC, dec(1000)).unwrap();
    let permit = PermitTransferFrom {
        token: USDC,
        amount: dec(1000),
        nonce: 3,
        deadline: Utc::now() + Duration::minutes(10),
    };
    let deposit = PermitDeposit {
        signature: alice.sign_permit(&permit, &VAULT),
        permit,
        details: TransferDetails { to: VAULT, requested_amount: dec(1000) },
    };
    let g1 = h
        .engine
        .join_duel_with_permit(alice.address(), h.resolver.address(), USDC, dec(1000), &deposit)
        .unwrap();
    let lobby = h.engine.duel_lobby_id(h.resolver.address(), USDC, dec(1000)).unwrap();
    assert_eq!(g1, stakematch_lobby::game_id(&lobby, 1));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn engine_from_json_config() {
    let json = format!(
        r#"{{"custody_account":"{VAULT}","duel_fee":"25","remainder_policy":"burn"}}"#
    );
    let config = EngineConfig::from_json(&json).unwrap();
    let engine = Engine::new(config, CustodyLedger::new(), Secp256k1Verifier::new()).unwrap();
    assert_eq!(engine.config().duel_fee, dec(25));
    assert_eq!(engine.config().remainder_policy, RemainderPolicy::Burn);
}

#[test]
fn invalid_config_refused() {
    let err = Engine::new(EngineConfig::new(Address::ZERO), CustodyLedger::new(), Secp256k1Verifier::new())
        .err()
        .unwrap();
    assert!(matches!(err, StakematchError::InvalidConfig(_)));
}

#[test]
fn insufficient_allowance_leaves_no_trace() {
    let h = Harness::royale();
    h.engine.ledger().mint(player(1), USDC, dec(1000)).unwrap();
    let err = h
        .engine
        .join(player(1), h.resolver.address(), USDC, dec(1000), 2)
        .unwrap_err();
    assert!(matches!(err, StakematchError::InsufficientAllowance { .. }));
    let lobby = h.engine.lobby_id(h.resolver.address(), USDC, dec(1000), 2).unwrap();
    assert_eq!(h.engine.last_cursor(&player(1), &lobby), 0);
    assert!(h.engine.game(&stakematch_lobby::game_id(&lobby, 1)).is_none());
    assert!(h.engine.sink().is_empty());
}
