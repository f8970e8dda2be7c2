use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::Error;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Admin,             // Address
    Pool,              // Address
    HToken,            // Address
    VariableDebtToken, // Address
    Controller,        // Address
    EmissionRate,      // u128 reward units per second
    Phases,            // Vec<Phase>
    BorrowAllocation,  // u128 ray
}

/// One linear segment `k * utilization + b` over `[start, end)`. All four
/// values are rays; slopes and intercepts may be negative.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Phase {
    pub start: u128,
    pub end: u128,
    pub k: i128,
    pub b: i128,
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    for key in [
        DataKey::Admin,
        DataKey::Pool,
        DataKey::HToken,
        DataKey::VariableDebtToken,
        DataKey::Controller,
        DataKey::EmissionRate,
        DataKey::Phases,
        DataKey::BorrowAllocation,
    ] {
        bump(env, &key);
    }
}

fn address(env: &Env, key: &DataKey) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(key)
        .ok_or(Error::NotInitialized)
}

pub fn admin(env: &Env) -> Result<Address, Error> {
    address(env, &DataKey::Admin)
}

pub fn pool(env: &Env) -> Result<Address, Error> {
    address(env, &DataKey::Pool)
}

pub fn h_token(env: &Env) -> Result<Address, Error> {
    address(env, &DataKey::HToken)
}

pub fn variable_debt_token(env: &Env) -> Result<Address, Error> {
    address(env, &DataKey::VariableDebtToken)
}

pub fn controller(env: &Env) -> Result<Address, Error> {
    address(env, &DataKey::Controller)
}

pub fn emission_rate(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::EmissionRate)
        .unwrap_or(0)
}

pub fn set_emission_rate(env: &Env, rate: u128) {
    env.storage().persistent().set(&DataKey::EmissionRate, &rate);
}

pub fn phases(env: &Env) -> Vec<Phase> {
    env.storage()
        .persistent()
        .get(&DataKey::Phases)
        .unwrap_or(Vec::new(env))
}

pub fn set_phases(env: &Env, phases: &Vec<Phase>) {
    env.storage().persistent().set(&DataKey::Phases, phases);
}

pub fn borrow_allocation(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::BorrowAllocation)
        .unwrap_or(0)
}

pub fn set_borrow_allocation(env: &Env, allocation: u128) {
    env.storage()
        .persistent()
        .set(&DataKey::BorrowAllocation, &allocation);
}
