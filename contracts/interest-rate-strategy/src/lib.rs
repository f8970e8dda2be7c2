#![no_std]
use lending_math::{
    percent_mul, ray_div, ray_mul, wad_to_ray, MathError, PERCENTAGE_FACTOR, RAY,
};
use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, BytesN, Env,
};

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contracttype]
pub enum DataKey {
    Params, // RateStrategyParams
    Admin,  // Address
}

/// Two-slope utilization curve. Every field is a ray.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateStrategyParams {
    pub optimal_usage_ratio: u128,
    pub base_variable_borrow_rate: u128,
    pub variable_rate_slope1: u128,
    pub variable_rate_slope2: u128,
    pub stable_rate_slope1: u128,
    pub stable_rate_slope2: u128,
    pub base_stable_rate_offset: u128,
    pub stable_rate_excess_offset: u128,
    pub optimal_stable_debt_ratio: u128,
}

/// `available_liquidity` is the reserve balance before the operation that
/// triggers the update; `reserve_factor` is in basis points.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateInputs {
    pub available_liquidity: u128,
    pub liquidity_added: u128,
    pub liquidity_taken: u128,
    pub total_stable_debt: u128,
    pub total_variable_debt: u128,
    pub average_stable_borrow_rate: u128,
    pub reserve_factor: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestRates {
    pub liquidity_rate: u128,
    pub stable_borrow_rate: u128,
    pub variable_borrow_rate: u128,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 400,
    NotInitialized = 401,
    NotAdmin = 402,
    InvalidOptimalUsageRatio = 403,
    InvalidOptimalStableToTotalDebtRatio = 404,
    Overflow = 405,
    DivisionByZero = 406,
}

impl From<MathError> for Error {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow => Error::Overflow,
            MathError::DivisionByZero => Error::DivisionByZero,
        }
    }
}

#[contract]
pub struct InterestRateStrategy;

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyParamsUpdated {
    pub optimal_usage_ratio: u128,
    pub base_variable_borrow_rate: u128,
    pub variable_rate_slope1: u128,
    pub variable_rate_slope2: u128,
    pub stable_rate_slope1: u128,
    pub stable_rate_slope2: u128,
}

#[contractimpl]
impl InterestRateStrategy {
    pub fn initialize(env: Env, admin: Address, params: RateStrategyParams) -> Result<(), Error> {
        if env.storage().persistent().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().persistent().set(&DataKey::Admin, &admin);
        store_params(&env, &params)
    }

    pub fn update_params(
        env: Env,
        admin: Address,
        params: RateStrategyParams,
    ) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        store_params(&env, &params)
    }

    pub fn get_params(env: Env) -> Result<RateStrategyParams, Error> {
        load_params(&env)
    }

    /// Base stable rate before any utilization premium.
    pub fn get_base_stable_borrow_rate(env: Env) -> Result<u128, Error> {
        let params = load_params(&env)?;
        params
            .variable_rate_slope1
            .checked_add(params.base_stable_rate_offset)
            .ok_or(Error::Overflow)
    }

    pub fn calculate_interest_rates(env: Env, inputs: RateInputs) -> Result<InterestRates, Error> {
        let p = load_params(&env)?;
        bump_ttl(&env);
        let total_debt = inputs
            .total_stable_debt
            .checked_add(inputs.total_variable_debt)
            .ok_or(Error::Overflow)?;

        let mut variable_rate = p.base_variable_borrow_rate;
        let mut stable_rate = p
            .variable_rate_slope1
            .checked_add(p.base_stable_rate_offset)
            .ok_or(Error::Overflow)?;
        let mut usage = 0u128;
        let mut stable_to_total = 0u128;

        if total_debt != 0 {
            stable_to_total = ray_div(&env, inputs.total_stable_debt, total_debt)?;
            let available = inputs
                .available_liquidity
                .checked_add(inputs.liquidity_added)
                .ok_or(Error::Overflow)?
                .saturating_sub(inputs.liquidity_taken);
            let denominator = available.checked_add(total_debt).ok_or(Error::Overflow)?;
            usage = ray_div(&env, total_debt, denominator)?;
        }

        if usage > p.optimal_usage_ratio {
            let excess = ray_div(
                &env,
                usage - p.optimal_usage_ratio,
                RAY - p.optimal_usage_ratio,
            )?;
            variable_rate = add(
                variable_rate,
                add(p.variable_rate_slope1, ray_mul(&env, p.variable_rate_slope2, excess)?)?,
            )?;
            stable_rate = add(
                stable_rate,
                add(p.stable_rate_slope1, ray_mul(&env, p.stable_rate_slope2, excess)?)?,
            )?;
        } else {
            variable_rate = add(
                variable_rate,
                ray_div(
                    &env,
                    ray_mul(&env, p.variable_rate_slope1, usage)?,
                    p.optimal_usage_ratio,
                )?,
            )?;
            stable_rate = add(
                stable_rate,
                ray_div(
                    &env,
                    ray_mul(&env, p.stable_rate_slope1, usage)?,
                    p.optimal_usage_ratio,
                )?,
            )?;
        }

        if stable_to_total > p.optimal_stable_debt_ratio {
            let excess = ray_div(
                &env,
                stable_to_total - p.optimal_stable_debt_ratio,
                RAY - p.optimal_stable_debt_ratio,
            )?;
            stable_rate = add(stable_rate, ray_mul(&env, p.stable_rate_excess_offset, excess)?)?;
        }

        let overall = overall_borrow_rate(
            &env,
            inputs.total_stable_debt,
            inputs.total_variable_debt,
            variable_rate,
            inputs.average_stable_borrow_rate,
        )?;
        let liquidity_rate = percent_mul(
            &env,
            ray_mul(&env, overall, usage)?,
            PERCENTAGE_FACTOR.saturating_sub(inputs.reserve_factor as u128),
        )?;

        Ok(InterestRates {
            liquidity_rate,
            stable_borrow_rate: stable_rate,
            variable_borrow_rate: variable_rate,
        })
    }

    pub fn upgrade_wasm(env: Env, admin: Address, new_wasm_hash: BytesN<32>) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }
}

fn add(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_add(b).ok_or(Error::Overflow)
}

/// Debt-weighted mean of the variable rate and the stable average.
fn overall_borrow_rate(
    env: &Env,
    total_stable_debt: u128,
    total_variable_debt: u128,
    variable_rate: u128,
    average_stable_rate: u128,
) -> Result<u128, Error> {
    let total_debt = add(total_stable_debt, total_variable_debt)?;
    if total_debt == 0 {
        return Ok(0);
    }
    let weighted_variable = ray_mul(env, wad_to_ray(total_variable_debt)?, variable_rate)?;
    let weighted_stable = ray_mul(env, wad_to_ray(total_stable_debt)?, average_stable_rate)?;
    Ok(ray_div(
        env,
        add(weighted_variable, weighted_stable)?,
        wad_to_ray(total_debt)?,
    )?)
}

fn store_params(env: &Env, params: &RateStrategyParams) -> Result<(), Error> {
    if params.optimal_usage_ratio == 0 || params.optimal_usage_ratio > RAY {
        return Err(Error::InvalidOptimalUsageRatio);
    }
    if params.optimal_stable_debt_ratio > RAY {
        return Err(Error::InvalidOptimalStableToTotalDebtRatio);
    }
    env.storage().persistent().set(&DataKey::Params, params);
    bump_ttl(env);
    StrategyParamsUpdated {
        optimal_usage_ratio: params.optimal_usage_ratio,
        base_variable_borrow_rate: params.base_variable_borrow_rate,
        variable_rate_slope1: params.variable_rate_slope1,
        variable_rate_slope2: params.variable_rate_slope2,
        stable_rate_slope1: params.stable_rate_slope1,
        stable_rate_slope2: params.stable_rate_slope2,
    }
    .publish(env);
    Ok(())
}

fn load_params(env: &Env) -> Result<RateStrategyParams, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Params)
        .ok_or(Error::NotInitialized)
}

fn require_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    let stored: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)?;
    bump_ttl(env);
    if stored != *admin {
        return Err(Error::NotAdmin);
    }
    admin.require_auth();
    Ok(())
}

fn bump_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&DataKey::Admin) {
        persistent.extend_ttl(&DataKey::Admin, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::Params) {
        persistent.extend_ttl(&DataKey::Params, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
