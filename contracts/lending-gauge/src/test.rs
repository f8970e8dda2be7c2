#![cfg(test)]

use super::*;
use crate::phases::{evaluate, validate_phases};
use lending_math::{RAY, WAD};
use proptest::prelude::*;
use scaled_token::{ScaledToken, ScaledTokenClient, TokenKind, WEEK};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contractimpl, contracttype, vec, Address, Env, String, Vec};

#[contract]
pub struct MockController;

#[contracttype]
enum MockControllerKey {
    Weight,
}

#[contractimpl]
impl MockController {
    pub fn set_weight(env: Env, weight: u128) {
        env.storage()
            .persistent()
            .set(&MockControllerKey::Weight, &weight);
    }

    pub fn gauge_relative_weight(env: Env, _gauge: Address, _time: u64) -> u128 {
        env.storage()
            .persistent()
            .get(&MockControllerKey::Weight)
            .unwrap_or(WAD)
    }
}

/// Full weight for the first epoch, nothing afterwards.
#[contract]
pub struct FirstEpochController;

#[contractimpl]
impl FirstEpochController {
    pub fn gauge_relative_weight(_env: Env, _gauge: Address, time: u64) -> u128 {
        if time < WEEK {
            WAD
        } else {
            0
        }
    }
}

fn ray_pct(pct: u128) -> u128 {
    RAY / 100 * pct
}

pub(crate) fn default_phases(env: &Env) -> Vec<Phase> {
    vec![
        env,
        Phase {
            start: 0,
            end: ray_pct(35),
            k: 2 * RAY as i128,
            b: 0,
        },
        Phase {
            start: ray_pct(35),
            end: ray_pct(65),
            k: 0,
            b: (RAY / 10 * 7) as i128,
        },
        Phase {
            start: ray_pct(65),
            end: ray_pct(80),
            k: -4_666_666_666_666_667_000_000_000_000,
            b: 3_733_333_333_333_333_400_000_000_000,
        },
        Phase {
            start: ray_pct(80),
            end: RAY,
            k: 0,
            b: 0,
        },
    ]
}

struct Setup<'a> {
    env: Env,
    admin: Address,
    pool: Address,
    gauge: LendingGaugeClient<'a>,
    h_token: ScaledTokenClient<'a>,
    debt_token: ScaledTokenClient<'a>,
}

fn token<'a>(env: &Env, pool: &Address, kind: TokenKind, symbol: &str) -> ScaledTokenClient<'a> {
    let id = env.register(ScaledToken, ());
    let client = ScaledTokenClient::new(env, &id);
    client.initialize(
        pool,
        &Address::generate(env),
        &kind,
        &7u32,
        &String::from_str(env, symbol),
        &String::from_str(env, symbol),
    );
    client
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|l| l.timestamp = 1_000);
    let admin = Address::generate(&env);
    let pool = Address::generate(&env);
    let h_token = token(&env, &pool, TokenKind::Supply, "hDAI");
    let debt_token = token(&env, &pool, TokenKind::VariableDebt, "vdDAI");
    let controller = env.register(MockController, ());

    let id = env.register(LendingGauge, ());
    let gauge = LendingGaugeClient::new(&env, &id);
    gauge.initialize(
        &admin,
        &pool,
        &h_token.address,
        &debt_token.address,
        &controller,
    );
    h_token.set_lending_gauge(&pool, &id);
    debt_token.set_lending_gauge(&pool, &id);
    gauge.add_phases(&admin, &default_phases(&env));
    Setup {
        env,
        admin,
        pool,
        gauge,
        h_token,
        debt_token,
    }
}

#[test]
fn test_initialize_once() {
    let s = setup();
    let res = s.gauge.try_initialize(
        &s.admin,
        &s.pool,
        &s.h_token.address,
        &s.debt_token.address,
        &Address::generate(&s.env),
    );
    assert_eq!(res, Err(Ok(Error::AlreadyInitialized)));
    assert_eq!(s.gauge.pool(), s.pool);
}

#[test]
fn test_add_phases_requires_admin() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let res = s.gauge.try_add_phases(&stranger, &default_phases(&s.env));
    assert_eq!(res, Err(Ok(Error::CallerNotPoolAdmin)));
}

#[test]
fn test_add_phases_rejects_wrong_length() {
    let s = setup();
    let phases = default_phases(&s.env);
    let two = phases.slice(0..2);
    assert_eq!(
        s.gauge.try_add_phases(&s.admin, &two),
        Err(Ok(Error::InvalidPhasesLength))
    );
    let mut eight = phases.clone();
    eight.append(&phases);
    assert_eq!(
        s.gauge.try_add_phases(&s.admin, &eight),
        Err(Ok(Error::InvalidPhasesLength))
    );
}

#[test]
fn test_add_phases_rejects_gaps() {
    let s = setup();
    let mut phases = default_phases(&s.env);
    let mut first = phases.get(0).unwrap();
    first.start = ray_pct(35);
    first.end = 0;
    phases.set(0, first);
    assert_eq!(
        s.gauge.try_add_phases(&s.admin, &phases),
        Err(Ok(Error::PercentageNotMatch))
    );

    let mut short = default_phases(&s.env);
    let mut last = short.get(3).unwrap();
    last.end = ray_pct(90);
    short.set(3, last);
    assert_eq!(
        s.gauge.try_add_phases(&s.admin, &short),
        Err(Ok(Error::PercentageNotMatch))
    );
    assert_eq!(s.gauge.get_phases().len(), PHASES_LENGTH);
}

#[test]
fn test_evaluate_follows_phases() {
    let s = setup();
    assert_eq!(s.gauge.evaluate(&0), 0);
    assert_eq!(s.gauge.evaluate(&ray_pct(10)), ray_pct(20));
    // Boundary belongs to the phase it starts.
    assert_eq!(s.gauge.evaluate(&ray_pct(35)), ray_pct(70));
    assert_eq!(s.gauge.evaluate(&ray_pct(36)), ray_pct(70));
    assert_eq!(
        s.gauge.evaluate(&ray_pct(66)),
        653_333_333_333_333_180_000_000_000
    );
    assert_eq!(s.gauge.evaluate(&(RAY / 1000 * 801)), 0);
    assert_eq!(s.gauge.evaluate(&RAY), 0);
}

#[test]
fn test_evaluate_clamps_negative_values() {
    let s = setup();
    let phases = vec![
        &s.env,
        Phase {
            start: 0,
            end: ray_pct(50),
            k: 4 * RAY as i128,
            b: 0,
        },
        Phase {
            start: ray_pct(50),
            end: ray_pct(60),
            k: -(RAY as i128),
            b: -(RAY as i128),
        },
        Phase {
            start: ray_pct(60),
            end: ray_pct(70),
            k: 0,
            b: (RAY / 2) as i128,
        },
        Phase {
            start: ray_pct(70),
            end: RAY,
            k: 0,
            b: (RAY / 2) as i128,
        },
    ];
    s.gauge.add_phases(&s.admin, &phases);
    assert_eq!(s.gauge.evaluate(&ray_pct(40)), RAY);
    assert_eq!(s.gauge.evaluate(&ray_pct(55)), 0);
}

#[test]
fn test_update_allocation_only_pool() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let res = s.gauge.try_update_allocation(&stranger, &100, &1_000);
    assert_eq!(res, Err(Ok(Error::CallerMustBePool)));
}

#[test]
fn test_update_allocation_tracks_utilization() {
    let s = setup();
    s.gauge.update_allocation(&s.pool, &0, &1_000);
    assert_eq!(s.gauge.borrow_allocation(), 0);
    s.gauge.update_allocation(&s.pool, &100, &1_000);
    assert_eq!(s.gauge.borrow_allocation(), ray_pct(20));
    s.gauge.update_allocation(&s.pool, &360, &1_000);
    assert_eq!(s.gauge.borrow_allocation(), ray_pct(70));
    s.gauge.update_allocation(&s.pool, &801, &1_000);
    assert_eq!(s.gauge.borrow_allocation(), 0);
    s.gauge.update_allocation(&s.pool, &5, &0);
    assert_eq!(s.gauge.borrow_allocation(), 0);
}

#[test]
fn test_set_emission_rate_requires_admin() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    assert_eq!(
        s.gauge.try_set_emission_rate(&stranger, &10),
        Err(Ok(Error::CallerNotPoolAdmin))
    );
    s.gauge.set_emission_rate(&s.admin, &10);
    assert_eq!(s.gauge.emission_rate(), 10);
    assert_eq!(s.h_token.side_rate(), 10 * WAD);
    assert_eq!(s.debt_token.side_rate(), 0);
}

#[test]
fn test_rewards_split_between_suppliers_and_borrowers() {
    let s = setup();
    let bob = Address::generate(&s.env);
    let alice = Address::generate(&s.env);
    s.gauge.set_emission_rate(&s.admin, &10);
    s.h_token.mint(&s.pool, &bob, &bob, &1_000, &RAY);
    s.debt_token.mint(&s.pool, &alice, &alice, &100, &RAY);
    s.gauge.update_allocation(&s.pool, &100, &1_000);
    assert_eq!(s.debt_token.side_rate(), 2 * WAD);
    assert_eq!(s.h_token.side_rate(), 8 * WAD);

    s.env.ledger().with_mut(|l| l.timestamp += 100);
    s.gauge.user_checkpoint(&bob);
    s.gauge.user_checkpoint(&alice);
    assert_eq!(s.gauge.integrate_fraction(&bob), 800);
    assert_eq!(s.gauge.integrate_fraction(&alice), 200);
}

#[test]
fn test_rewards_scale_with_controller_weight() {
    let s = setup();
    let bob = Address::generate(&s.env);
    s.h_token.mint(&s.pool, &bob, &bob, &1_000, &RAY);
    let controller = {
        let id = s.env.register(MockController, ());
        MockControllerClient::new(&s.env, &id).set_weight(&(WAD / 2));
        id
    };
    let gauge_id = s.env.register(LendingGauge, ());
    let gauge = LendingGaugeClient::new(&s.env, &gauge_id);
    gauge.initialize(
        &s.admin,
        &s.pool,
        &s.h_token.address,
        &s.debt_token.address,
        &controller,
    );
    s.h_token.set_lending_gauge(&s.pool, &gauge_id);
    s.debt_token.set_lending_gauge(&s.pool, &gauge_id);
    gauge.set_emission_rate(&s.admin, &10);

    s.env.ledger().with_mut(|l| l.timestamp += 100);
    gauge.user_checkpoint(&bob);
    assert_eq!(gauge.integrate_fraction(&bob), 500);
}

#[test]
fn test_weight_is_read_per_epoch() {
    let s = setup();
    let bob = Address::generate(&s.env);
    let controller = s.env.register(FirstEpochController, ());
    let gauge_id = s.env.register(LendingGauge, ());
    let gauge = LendingGaugeClient::new(&s.env, &gauge_id);
    gauge.initialize(
        &s.admin,
        &s.pool,
        &s.h_token.address,
        &s.debt_token.address,
        &controller,
    );
    s.h_token.set_lending_gauge(&s.pool, &gauge_id);
    s.debt_token.set_lending_gauge(&s.pool, &gauge_id);
    gauge.set_emission_rate(&s.admin, &10);
    s.h_token.mint(&s.pool, &bob, &bob, &1_000, &RAY);

    // Nobody touches the reserve across the epoch boundary.
    s.env.ledger().with_mut(|l| l.timestamp = WEEK + 5_000);
    gauge.user_checkpoint(&bob);
    assert_eq!(gauge.integrate_fraction(&bob), 10 * (WEEK as u128 - 1_000));

    s.env.ledger().with_mut(|l| l.timestamp = 2 * WEEK);
    gauge.user_checkpoint(&bob);
    assert_eq!(gauge.integrate_fraction(&bob), 10 * (WEEK as u128 - 1_000));
}

#[test]
fn test_phase_continuity_at_boundaries() {
    let env = Env::default();
    let phases = vec![
        &env,
        Phase {
            start: 0,
            end: ray_pct(25),
            k: 2 * RAY as i128,
            b: 0,
        },
        Phase {
            start: ray_pct(25),
            end: ray_pct(50),
            k: 0,
            b: (RAY / 2) as i128,
        },
        Phase {
            start: ray_pct(50),
            end: ray_pct(75),
            k: -2 * RAY as i128,
            b: (RAY / 2 * 3) as i128,
        },
        Phase {
            start: ray_pct(75),
            end: RAY,
            k: 0,
            b: 0,
        },
    ];
    validate_phases(&phases).unwrap();
    for i in 1..phases.len() {
        let left = phases.get(i - 1).unwrap();
        let boundary = left.end;
        let from_left = lending_math::signed_ray_mul(&env, left.k, boundary).unwrap() + left.b;
        let at = evaluate(&env, &phases, boundary).unwrap();
        assert_eq!(at as i128, from_left.max(0));
    }
    assert_eq!(evaluate(&env, &phases, 0).unwrap(), 0);
    assert_eq!(evaluate(&env, &phases, RAY).unwrap(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn allocation_stays_within_ray(utilization in 0u128..=RAY) {
        let env = Env::default();
        let value = evaluate(&env, &default_phases(&env), utilization).unwrap();
        prop_assert!(value <= RAY);
    }
}
