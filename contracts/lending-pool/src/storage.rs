use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::constants::*;
use crate::errors::Error;

#[contracttype]
pub enum DataKey {
    Admin,                      // Address
    Oracle,                     // Address
    Treasury,                   // Address
    RiskAdmin(Address),         // bool
    FlashBorrower(Address),     // bool
    FlashLoanPremiumTotal,      // u32 bps
    FlashLoanPremiumToProtocol, // u32 bps of the premium
    LiquidationPolicy,          // LiquidationPolicy
    ReservesList,               // Vec<Address>, position = reserve id
    Reserve(Address),           // ReserveData
    UserConfig(Address),        // UserConfiguration
}

/// Risk parameters of one reserve. Percentages are basis points; the debt
/// ceiling carries two decimals; caps are whole tokens with 0 meaning none.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConfig {
    pub decimals: u32,
    pub ltv: u32,
    pub liquidation_threshold: u32,
    pub liquidation_bonus: u32,
    pub liquidation_protocol_fee: u32,
    pub reserve_factor: u32,
    pub debt_ceiling: u128,
    pub borrowable_in_isolation: bool,
    pub borrowing_enabled: bool,
    pub stable_borrowing_enabled: bool,
    pub flash_loan_enabled: bool,
    pub is_active: bool,
    pub is_frozen: bool,
    pub is_paused: bool,
    pub supply_cap: u128,
    pub borrow_cap: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveData {
    pub id: u32,
    pub configuration: ReserveConfig,
    pub liquidity_index: u128,
    pub variable_borrow_index: u128,
    pub current_liquidity_rate: u128,
    pub current_variable_borrow_rate: u128,
    pub current_stable_borrow_rate: u128,
    pub last_update_timestamp: u64,
    /// Scaled by the liquidity index.
    pub accrued_to_treasury: u128,
    pub isolation_mode_total_debt: u128,
    pub h_token: Address,
    pub stable_debt_token: Address,
    pub variable_debt_token: Address,
    pub interest_rate_strategy: Address,
    pub lending_gauge: Option<Address>,
}

/// Bit `id` of each mask refers to the reserve with that id.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserConfiguration {
    pub collateral: u128,
    pub borrowing: u128,
}

/// A position may be closed in full when its health factor is below
/// `full_liquidation_hf` (ray) or its collateral is worth less than
/// `dust_collateral_base` in base currency.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidationPolicy {
    pub full_liquidation_hf: u128,
    pub dust_collateral_base: u128,
}

impl Default for LiquidationPolicy {
    fn default() -> Self {
        Self {
            full_liquidation_hf: DEFAULT_FULL_LIQUIDATION_HF,
            dust_collateral_base: 0,
        }
    }
}

/// Base-currency totals for one user. Thresholds are basis points and the
/// health factor is a ray (`u128::MAX` without debt).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserAccountData {
    pub total_collateral_base: u128,
    pub total_debt_base: u128,
    pub available_borrows_base: u128,
    pub current_liquidation_threshold: u128,
    pub ltv: u128,
    pub health_factor: u128,
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
        DataKey::Oracle,
        DataKey::Treasury,
        DataKey::FlashLoanPremiumTotal,
        DataKey::FlashLoanPremiumToProtocol,
        DataKey::LiquidationPolicy,
        DataKey::ReservesList,
    ] {
        bump(env, &key);
    }
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

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().persistent().set(&DataKey::Admin, admin);
}

pub fn require_pool_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    if admin(env)? != *caller {
        return Err(Error::CallerNotPoolAdmin);
    }
    caller.require_auth();
    Ok(())
}

pub fn is_risk_admin(env: &Env, account: &Address) -> bool {
    let key = DataKey::RiskAdmin(account.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or(false)
}

pub fn set_risk_admin(env: &Env, account: &Address, enabled: bool) {
    let key = DataKey::RiskAdmin(account.clone());
    if enabled {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn require_risk_or_pool_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    if admin(env)? != *caller && !is_risk_admin(env, caller) {
        return Err(Error::CallerNotRiskOrPoolAdmin);
    }
    caller.require_auth();
    Ok(())
}

pub fn is_flash_borrower(env: &Env, account: &Address) -> bool {
    let key = DataKey::FlashBorrower(account.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or(false)
}

pub fn set_flash_borrower(env: &Env, account: &Address, enabled: bool) {
    let key = DataKey::FlashBorrower(account.clone());
    if enabled {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn oracle(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Oracle)
        .ok_or(Error::NotInitialized)
}

pub fn set_oracle(env: &Env, oracle: &Address) {
    env.storage().persistent().set(&DataKey::Oracle, oracle);
}

pub fn treasury(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Treasury)
        .ok_or(Error::NotInitialized)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().persistent().set(&DataKey::Treasury, treasury);
}

/// (total, to_protocol) in basis points.
pub fn flash_loan_premiums(env: &Env) -> (u32, u32) {
    let storage = env.storage().persistent();
    (
        storage
            .get(&DataKey::FlashLoanPremiumTotal)
            .unwrap_or(DEFAULT_FLASH_LOAN_PREMIUM_TOTAL),
        storage
            .get(&DataKey::FlashLoanPremiumToProtocol)
            .unwrap_or(DEFAULT_FLASH_LOAN_PREMIUM_TO_PROTOCOL),
    )
}

pub fn set_flash_loan_premiums(env: &Env, total: u32, to_protocol: u32) {
    let storage = env.storage().persistent();
    storage.set(&DataKey::FlashLoanPremiumTotal, &total);
    storage.set(&DataKey::FlashLoanPremiumToProtocol, &to_protocol);
}

pub fn liquidation_policy(env: &Env) -> LiquidationPolicy {
    env.storage()
        .persistent()
        .get(&DataKey::LiquidationPolicy)
        .unwrap_or_default()
}

pub fn set_liquidation_policy(env: &Env, policy: &LiquidationPolicy) {
    env.storage()
        .persistent()
        .set(&DataKey::LiquidationPolicy, policy);
}

pub fn reserves_list(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::ReservesList)
        .unwrap_or(Vec::new(env))
}

pub fn set_reserves_list(env: &Env, list: &Vec<Address>) {
    env.storage().persistent().set(&DataKey::ReservesList, list);
}

pub fn has_reserve(env: &Env, asset: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Reserve(asset.clone()))
}

pub fn reserve(env: &Env, asset: &Address) -> Result<ReserveData, Error> {
    let key = DataKey::Reserve(asset.clone());
    let data = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ReserveNotListed)?;
    bump(env, &key);
    Ok(data)
}

pub fn set_reserve(env: &Env, asset: &Address, data: &ReserveData) {
    let key = DataKey::Reserve(asset.clone());
    env.storage().persistent().set(&key, data);
    bump(env, &key);
}

pub fn user_config(env: &Env, user: &Address) -> UserConfiguration {
    let key = DataKey::UserConfig(user.clone());
    bump(env, &key);
    env.storage().persistent().get(&key).unwrap_or_default()
}

pub fn set_user_config(env: &Env, user: &Address, config: &UserConfiguration) {
    let key = DataKey::UserConfig(user.clone());
    if config.collateral == 0 && config.borrowing == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, config);
        bump(env, &key);
    }
}
