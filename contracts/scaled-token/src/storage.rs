use soroban_sdk::{contracttype, Address, Env, String};

use crate::errors::Error;

#[contracttype]
pub enum DataKey {
    Pool,
    Underlying,
    Kind,
    Metadata,
    TotalScaled,
    Position(Address),       // ScaledPosition
    StablePosition(Address), // StablePosition
    StableTotals,
    Allowance(Address, Address),       // (owner, spender)
    BorrowAllowance(Address, Address), // (delegator, delegatee)
    LendingGauge,
    GaugeController,
    GaugeState,
    UserGauge(Address),
}

pub(crate) const TTL_THRESHOLD: u32 = 100_000;
pub(crate) const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Supply = 0,
    VariableDebt = 1,
    StableDebt = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

/// `index` is the reserve index at the holder's last balance update.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScaledPosition {
    pub scaled_balance: u128,
    pub index: u128,
}

/// `rate` is the holder's locked stable rate, not a shared index.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StablePosition {
    pub principal: u128,
    pub rate: u128,
    pub last_update: u64,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StableTotals {
    pub principal_supply: u128,
    pub average_rate: u128,
    pub last_update: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableSupplyData {
    pub principal_supply: u128,
    pub total_supply: u128,
    pub average_rate: u128,
    pub last_update: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableMintResult {
    pub is_first: bool,
    pub total_supply: u128,
    pub average_rate: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableBurnResult {
    pub total_supply: u128,
    pub average_rate: u128,
}

/// Reward integral shared by all holders. `side_rate` is unweighted reward
/// units per second scaled by 1e18; the controller weight of each epoch is
/// applied on accrual. `integrate_inv_supply` is reward per working unit
/// scaled by 1e18.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GaugeState {
    pub side_rate: u128,
    pub integrate_inv_supply: u128,
    pub last_checkpoint: u64,
    pub working_supply: u128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserGaugeState {
    pub working_balance: u128,
    pub integrate_inv_supply_of: u128,
    pub integrate_fraction: u128,
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    bump(env, &DataKey::Pool);
    bump(env, &DataKey::Underlying);
    bump(env, &DataKey::Kind);
    bump(env, &DataKey::Metadata);
    bump(env, &DataKey::TotalScaled);
    bump(env, &DataKey::StableTotals);
    bump(env, &DataKey::LendingGauge);
    bump(env, &DataKey::GaugeController);
    bump(env, &DataKey::GaugeState);
}

pub fn pool(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Pool)
        .ok_or(Error::NotInitialized)
}

pub fn underlying(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Underlying)
        .ok_or(Error::NotInitialized)
}

pub fn kind(env: &Env) -> Result<TokenKind, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Kind)
        .ok_or(Error::NotInitialized)
}

pub fn metadata(env: &Env) -> Result<TokenMetadata, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Metadata)
        .ok_or(Error::NotInitialized)
}

pub fn total_scaled(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::TotalScaled)
        .unwrap_or(0)
}

pub fn set_total_scaled(env: &Env, total: u128) {
    env.storage().persistent().set(&DataKey::TotalScaled, &total);
}

pub fn position(env: &Env, user: &Address) -> ScaledPosition {
    let key = DataKey::Position(user.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or_default()
}

pub fn set_position(env: &Env, user: &Address, position: &ScaledPosition) {
    let key = DataKey::Position(user.clone());
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn stable_position(env: &Env, user: &Address) -> StablePosition {
    let key = DataKey::StablePosition(user.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or_default()
}

pub fn set_stable_position(env: &Env, user: &Address, position: &StablePosition) {
    let key = DataKey::StablePosition(user.clone());
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn stable_totals(env: &Env) -> StableTotals {
    env.storage()
        .persistent()
        .get(&DataKey::StableTotals)
        .unwrap_or_default()
}

pub fn set_stable_totals(env: &Env, totals: &StableTotals) {
    env.storage().persistent().set(&DataKey::StableTotals, totals);
}

pub fn allowance(env: &Env, owner: &Address, spender: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::Allowance(owner.clone(), spender.clone()))
        .unwrap_or(0)
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, amount: u128) {
    env.storage().persistent().set(
        &DataKey::Allowance(owner.clone(), spender.clone()),
        &amount,
    );
}

pub fn borrow_allowance(env: &Env, delegator: &Address, delegatee: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::BorrowAllowance(delegator.clone(), delegatee.clone()))
        .unwrap_or(0)
}

pub fn set_borrow_allowance(env: &Env, delegator: &Address, delegatee: &Address, amount: u128) {
    env.storage().persistent().set(
        &DataKey::BorrowAllowance(delegator.clone(), delegatee.clone()),
        &amount,
    );
}

pub fn lending_gauge(env: &Env) -> Option<Address> {
    env.storage().persistent().get(&DataKey::LendingGauge)
}

pub fn gauge_controller(env: &Env) -> Option<Address> {
    env.storage().persistent().get(&DataKey::GaugeController)
}

pub fn set_gauge_controller(env: &Env, controller: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::GaugeController, controller);
}

pub fn gauge_state(env: &Env) -> GaugeState {
    env.storage()
        .persistent()
        .get(&DataKey::GaugeState)
        .unwrap_or_default()
}

pub fn set_gauge_state(env: &Env, state: &GaugeState) {
    env.storage().persistent().set(&DataKey::GaugeState, state);
}

pub fn user_gauge(env: &Env, user: &Address) -> UserGaugeState {
    let key = DataKey::UserGauge(user.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or_default()
}

pub fn set_user_gauge(env: &Env, user: &Address, state: &UserGaugeState) {
    let key = DataKey::UserGauge(user.clone());
    env.storage().persistent().set(&key, state);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn require_pool(env: &Env, caller: &Address) -> Result<(), Error> {
    let pool = pool(env)?;
    if *caller != pool {
        return Err(Error::CallerMustBePool);
    }
    caller.require_auth();
    bump_core_ttl(env);
    Ok(())
}
