use soroban_sdk::{contracttype, Address, Env};

use crate::errors::Error;

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Admin,                          // Address
    RewardToken,                    // Address, minter is its asset admin
    Minted(Address, Address),       // (user, gauge) -> u128
    MintApproval(Address, Address), // (minter, user) -> bool
    Gauge(Address),                 // bool, present while listed
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_core_ttl(env: &Env) {
    bump(env, &DataKey::Admin);
    bump(env, &DataKey::RewardToken);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Admin)
}

pub fn admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn reward_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::RewardToken)
        .ok_or(Error::NotInitialized)
}

pub fn minted(env: &Env, user: &Address, gauge: &Address) -> u128 {
    let key = DataKey::Minted(user.clone(), gauge.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_minted(env: &Env, user: &Address, gauge: &Address, total: u128) {
    env.storage()
        .persistent()
        .set(&DataKey::Minted(user.clone(), gauge.clone()), &total);
}

pub fn is_mint_approved(env: &Env, minter: &Address, user: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::MintApproval(minter.clone(), user.clone()))
        .unwrap_or(false)
}

pub fn set_mint_approved(env: &Env, minter: &Address, user: &Address, approved: bool) {
    let key = DataKey::MintApproval(minter.clone(), user.clone());
    if approved {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn is_gauge_listed(env: &Env, gauge: &Address) -> bool {
    let key = DataKey::Gauge(gauge.clone());
    bump(env, &key);
    env.storage().persistent().has(&key)
}

pub fn set_gauge_listed(env: &Env, gauge: &Address, listed: bool) {
    let key = DataKey::Gauge(gauge.clone());
    if listed {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}
