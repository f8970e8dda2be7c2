#![cfg(test)]

use super::*;
use lending_gauge::{LendingGauge, LendingGaugeClient};
use lending_math::{RAY, WAD};
use scaled_token::{ScaledToken, ScaledTokenClient, TokenKind};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, String};

#[contract]
pub struct MockController;

#[contractimpl]
impl MockController {
    pub fn gauge_relative_weight(_env: Env, _gauge: Address, _time: u64) -> u128 {
        WAD
    }
}

/// Claims an arbitrary reward total for anyone.
#[contract]
pub struct InflatedGauge;

#[contractimpl]
impl InflatedGauge {
    pub fn user_checkpoint(_env: Env, _user: Address) {}

    pub fn integrate_fraction(_env: Env, _user: Address) -> u128 {
        1_000_000_000_000_000
    }
}

struct Market<'a> {
    h_token: ScaledTokenClient<'a>,
    gauge: LendingGaugeClient<'a>,
}

struct Setup<'a> {
    env: Env,
    admin: Address,
    pool: Address,
    controller: Address,
    minter: MinterClient<'a>,
    reward: token::Client<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|l| l.timestamp = 1_000);
    let admin = Address::generate(&env);
    let pool = Address::generate(&env);
    let controller = env.register(MockController, ());

    let minter = MinterClient::new(&env, &env.register(Minter, ()));
    let reward = env
        .register_stellar_asset_contract_v2(minter.address.clone())
        .address();
    minter.initialize(&admin, &reward);
    Setup {
        reward: token::Client::new(&env, &reward),
        env,
        admin,
        pool,
        controller,
        minter,
    }
}

impl Setup<'_> {
    /// A supply and debt token pair wired to a gauge emitting `rate` per second.
    fn market(&self, rate: u128) -> Market<'_> {
        let env = &self.env;
        let token = |kind: TokenKind| {
            let client = ScaledTokenClient::new(env, &env.register(ScaledToken, ()));
            client.initialize(
                &self.pool,
                &Address::generate(env),
                &kind,
                &7u32,
                &String::from_str(env, "hDAI"),
                &String::from_str(env, "hDAI"),
            );
            client
        };
        let h_token = token(TokenKind::Supply);
        let debt_token = token(TokenKind::VariableDebt);
        let gauge = LendingGaugeClient::new(env, &env.register(LendingGauge, ()));
        gauge.initialize(
            &self.admin,
            &self.pool,
            &h_token.address,
            &debt_token.address,
            &self.controller,
        );
        h_token.set_lending_gauge(&self.pool, &gauge.address);
        debt_token.set_lending_gauge(&self.pool, &gauge.address);
        gauge.set_emission_rate(&self.admin, &rate);
        self.minter.set_gauge(&self.admin, &gauge.address, &true);
        Market { h_token, gauge }
    }

    fn deposit(&self, market: &Market, user: &Address, amount: u128) {
        market.h_token.mint(&self.pool, user, user, &amount, &RAY);
    }

    fn advance(&self, seconds: u64) {
        self.env.ledger().with_mut(|l| l.timestamp += seconds);
    }
}

#[test]
fn test_initialize_once() {
    let s = setup();
    assert_eq!(s.minter.reward_token(), s.reward.address);
    assert_eq!(s.minter.admin(), s.admin);
    assert_eq!(
        s.minter.try_initialize(&s.admin, &s.reward.address),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_requires_initialization() {
    let env = Env::default();
    env.mock_all_auths();
    let minter = MinterClient::new(&env, &env.register(Minter, ()));
    let user = Address::generate(&env);
    assert_eq!(
        minter.try_mint(&user, &Address::generate(&env)),
        Err(Ok(Error::NotInitialized))
    );
}

#[test]
fn test_mint_pays_only_new_rewards() {
    let s = setup();
    let market = s.market(10);
    let bob = Address::generate(&s.env);
    s.deposit(&market, &bob, 1_000);

    s.advance(100);
    assert_eq!(s.minter.mint(&bob, &market.gauge.address), 1_000);
    assert_eq!(s.reward.balance(&bob), 1_000);
    assert_eq!(s.minter.minted(&bob, &market.gauge.address), 1_000);

    // Nothing new in the same ledger.
    assert_eq!(s.minter.mint(&bob, &market.gauge.address), 0);
    assert_eq!(s.reward.balance(&bob), 1_000);

    s.advance(50);
    assert_eq!(s.minter.mint(&bob, &market.gauge.address), 500);
    assert_eq!(s.reward.balance(&bob), 1_500);
    assert_eq!(s.minter.minted(&bob, &market.gauge.address), 1_500);
}

#[test]
fn test_rewards_shared_by_balance() {
    let s = setup();
    let market = s.market(10);
    let bob = Address::generate(&s.env);
    let alice = Address::generate(&s.env);
    s.deposit(&market, &bob, 3_000);
    s.deposit(&market, &alice, 1_000);

    s.advance(100);
    s.minter.mint(&bob, &market.gauge.address);
    s.minter.mint(&alice, &market.gauge.address);
    assert_eq!(s.reward.balance(&bob), 750);
    assert_eq!(s.reward.balance(&alice), 250);
}

#[test]
fn test_mint_many() {
    let s = setup();
    let first = s.market(10);
    let second = s.market(4);
    let bob = Address::generate(&s.env);
    s.deposit(&first, &bob, 1_000);
    s.deposit(&second, &bob, 1_000);

    s.advance(100);
    let gauges = vec![&s.env, first.gauge.address.clone(), second.gauge.address.clone()];
    assert_eq!(s.minter.mint_many(&bob, &gauges), 1_400);
    assert_eq!(s.minter.minted(&bob, &first.gauge.address), 1_000);
    assert_eq!(s.minter.minted(&bob, &second.gauge.address), 400);
    assert_eq!(s.minter.mint_many(&bob, &gauges), 0);
}

#[test]
fn test_mint_for_requires_approval() {
    let s = setup();
    let market = s.market(10);
    let bob = Address::generate(&s.env);
    let keeper = Address::generate(&s.env);
    s.deposit(&market, &bob, 1_000);
    s.advance(100);

    assert_eq!(
        s.minter.try_mint_for(&keeper, &bob, &market.gauge.address),
        Err(Ok(Error::MintNotAllowed))
    );
    assert!(s.minter.toggle_approve_mint(&bob, &keeper));
    assert!(s.minter.is_mint_approved(&keeper, &bob));

    assert_eq!(s.minter.mint_for(&keeper, &bob, &market.gauge.address), 1_000);
    assert_eq!(s.reward.balance(&bob), 1_000);
    assert_eq!(s.reward.balance(&keeper), 0);

    assert!(!s.minter.toggle_approve_mint(&bob, &keeper));
    assert_eq!(
        s.minter.try_mint_for(&keeper, &bob, &market.gauge.address),
        Err(Ok(Error::MintNotAllowed))
    );
}

#[test]
fn test_only_listed_gauges_are_paid() {
    let s = setup();
    let attacker = Address::generate(&s.env);
    let fake = s.env.register(InflatedGauge, ());
    assert!(!s.minter.is_gauge_listed(&fake));
    assert_eq!(
        s.minter.try_mint(&attacker, &fake),
        Err(Ok(Error::GaugeNotAdded))
    );
    assert_eq!(
        s.minter.try_mint_many(&attacker, &vec![&s.env, fake.clone()]),
        Err(Ok(Error::GaugeNotAdded))
    );
    assert_eq!(s.reward.balance(&attacker), 0);

    assert_eq!(
        s.minter.try_set_gauge(&attacker, &fake, &true),
        Err(Ok(Error::CallerNotAdmin))
    );

    // Delisting stops further payouts from a real gauge.
    let market = s.market(10);
    let bob = Address::generate(&s.env);
    s.deposit(&market, &bob, 1_000);
    s.advance(100);
    assert!(s.minter.is_gauge_listed(&market.gauge.address));
    s.minter.set_gauge(&s.admin, &market.gauge.address, &false);
    assert_eq!(
        s.minter.try_mint(&bob, &market.gauge.address),
        Err(Ok(Error::GaugeNotAdded))
    );
    assert_eq!(s.reward.balance(&bob), 0);
}
