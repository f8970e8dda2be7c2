use lending_math::{
    calculate_compounded_interest, calculate_linear_interest, percent_mul, ray_div, ray_mul, RAY,
};
use soroban_sdk::{token, Address, Env};

use crate::clients::{RateInputs, RateStrategyClient, ReserveTokenClient};
use crate::errors::Error;
use crate::events::ReserveDataUpdated;
use crate::storage::{reserve, set_reserve, ReserveData};

/// Working copy of a reserve for the length of one operation. `data` is
/// mutated in place and written back by [`ReserveCache::store`].
pub(crate) struct ReserveCache {
    pub asset: Address,
    pub data: ReserveData,
    pub curr_liquidity_index: u128,
    pub next_liquidity_index: u128,
    pub curr_variable_borrow_index: u128,
    pub next_variable_borrow_index: u128,
    pub curr_scaled_variable_debt: u128,
    pub next_scaled_variable_debt: u128,
    pub curr_principal_stable_debt: u128,
    pub curr_total_stable_debt: u128,
    pub curr_avg_stable_rate: u128,
    pub stable_debt_last_update: u64,
    pub next_total_stable_debt: u128,
    pub next_avg_stable_rate: u128,
}

impl ReserveCache {
    pub fn load(env: &Env, asset: &Address) -> Result<Self, Error> {
        let data = reserve(env, asset)?;
        let scaled_variable_debt =
            ReserveTokenClient::new(env, &data.variable_debt_token).scaled_total_supply();
        let stable = ReserveTokenClient::new(env, &data.stable_debt_token).get_supply_data();
        Ok(Self {
            asset: asset.clone(),
            curr_liquidity_index: data.liquidity_index,
            next_liquidity_index: data.liquidity_index,
            curr_variable_borrow_index: data.variable_borrow_index,
            next_variable_borrow_index: data.variable_borrow_index,
            curr_scaled_variable_debt: scaled_variable_debt,
            next_scaled_variable_debt: scaled_variable_debt,
            curr_principal_stable_debt: stable.principal_supply,
            curr_total_stable_debt: stable.total_supply,
            curr_avg_stable_rate: stable.average_rate,
            stable_debt_last_update: stable.last_update,
            next_total_stable_debt: stable.total_supply,
            next_avg_stable_rate: stable.average_rate,
            data,
        })
    }

    pub fn store(&self, env: &Env) {
        set_reserve(env, &self.asset, &self.data);
    }

    pub fn refresh_scaled_variable_debt(&mut self, env: &Env) {
        self.next_scaled_variable_debt =
            ReserveTokenClient::new(env, &self.data.variable_debt_token).scaled_total_supply();
    }

    pub fn total_variable_debt(&self, env: &Env) -> Result<u128, Error> {
        Ok(ray_mul(
            env,
            self.next_scaled_variable_debt,
            self.next_variable_borrow_index,
        )?)
    }

    pub fn total_debt(&self, env: &Env) -> Result<u128, Error> {
        self.total_variable_debt(env)?
            .checked_add(self.next_total_stable_debt)
            .ok_or(Error::Overflow)
    }
}

/// Accrues both indexes and the treasury share up to the current ledger
/// time. Calling it twice in the same ledger is a no-op.
pub(crate) fn update_state(env: &Env, cache: &mut ReserveCache) -> Result<(), Error> {
    let now = env.ledger().timestamp();
    let last = cache.data.last_update_timestamp;
    if now == last {
        return Ok(());
    }

    if cache.data.current_liquidity_rate != 0 {
        let factor = calculate_linear_interest(env, cache.data.current_liquidity_rate, last, now)?;
        cache.next_liquidity_index = ray_mul(env, factor, cache.curr_liquidity_index)?;
        cache.data.liquidity_index = cache.next_liquidity_index;
    }
    if cache.curr_scaled_variable_debt != 0 {
        let factor =
            calculate_linear_interest(env, cache.data.current_variable_borrow_rate, last, now)?;
        cache.next_variable_borrow_index = ray_mul(env, factor, cache.curr_variable_borrow_index)?;
        cache.data.variable_borrow_index = cache.next_variable_borrow_index;
    }

    accrue_to_treasury(env, cache)?;
    cache.data.last_update_timestamp = now;
    Ok(())
}

/// Books `reserve_factor` of the debt interest accrued since the last
/// update as scaled supply owed to the treasury.
fn accrue_to_treasury(env: &Env, cache: &mut ReserveCache) -> Result<(), Error> {
    let reserve_factor = cache.data.configuration.reserve_factor;
    if reserve_factor == 0 {
        return Ok(());
    }

    let prev_total_variable = ray_mul(
        env,
        cache.curr_scaled_variable_debt,
        cache.curr_variable_borrow_index,
    )?;
    let curr_total_variable = ray_mul(
        env,
        cache.curr_scaled_variable_debt,
        cache.next_variable_borrow_index,
    )?;
    let cumulated_stable = calculate_compounded_interest(
        env,
        cache.curr_avg_stable_rate,
        cache.stable_debt_last_update,
        cache.data.last_update_timestamp,
    )?;
    let prev_total_stable = ray_mul(env, cache.curr_principal_stable_debt, cumulated_stable)?;

    let accrued = curr_total_variable
        .checked_add(cache.curr_total_stable_debt)
        .ok_or(Error::Overflow)?
        .saturating_sub(prev_total_variable)
        .saturating_sub(prev_total_stable);
    let to_mint = percent_mul(env, accrued, reserve_factor as u128)?;
    if to_mint != 0 {
        let scaled = ray_div(env, to_mint, cache.next_liquidity_index)?;
        cache.data.accrued_to_treasury = cache
            .data
            .accrued_to_treasury
            .checked_add(scaled)
            .ok_or(Error::Overflow)?;
    }
    Ok(())
}

/// Recomputes the reserve rates from the strategy. The pool balance read
/// here must be the balance before the triggering transfer happens.
pub(crate) fn update_interest_rates(
    env: &Env,
    cache: &mut ReserveCache,
    liquidity_added: u128,
    liquidity_taken: u128,
) -> Result<(), Error> {
    let total_variable_debt = cache.total_variable_debt(env)?;
    let available = token::Client::new(env, &cache.asset).balance(&env.current_contract_address());
    let rates = RateStrategyClient::new(env, &cache.data.interest_rate_strategy)
        .calculate_interest_rates(&RateInputs {
            available_liquidity: available.max(0) as u128,
            liquidity_added,
            liquidity_taken,
            total_stable_debt: cache.next_total_stable_debt,
            total_variable_debt,
            average_stable_borrow_rate: cache.next_avg_stable_rate,
            reserve_factor: cache.data.configuration.reserve_factor,
        });

    cache.data.current_liquidity_rate = rates.liquidity_rate;
    cache.data.current_stable_borrow_rate = rates.stable_borrow_rate;
    cache.data.current_variable_borrow_rate = rates.variable_borrow_rate;

    ReserveDataUpdated {
        reserve: cache.asset.clone(),
        liquidity_rate: rates.liquidity_rate,
        stable_borrow_rate: rates.stable_borrow_rate,
        variable_borrow_rate: rates.variable_borrow_rate,
        liquidity_index: cache.next_liquidity_index,
        variable_borrow_index: cache.next_variable_borrow_index,
    }
    .publish(env);
    Ok(())
}

/// Spreads `amount` over current suppliers by bumping the liquidity index.
pub(crate) fn cumulate_to_liquidity_index(
    env: &Env,
    cache: &mut ReserveCache,
    total_liquidity: u128,
    amount: u128,
) -> Result<(), Error> {
    if total_liquidity == 0 || amount == 0 {
        return Ok(());
    }
    let amount_to_liquidity = ray_div(env, amount, total_liquidity)?;
    let factor = amount_to_liquidity
        .checked_add(RAY)
        .ok_or(Error::Overflow)?;
    cache.next_liquidity_index = ray_mul(env, factor, cache.next_liquidity_index)?;
    cache.data.liquidity_index = cache.next_liquidity_index;
    Ok(())
}

pub(crate) fn normalized_income(env: &Env, data: &ReserveData) -> Result<u128, Error> {
    let now = env.ledger().timestamp();
    if data.last_update_timestamp == now {
        return Ok(data.liquidity_index);
    }
    let factor = calculate_linear_interest(
        env,
        data.current_liquidity_rate,
        data.last_update_timestamp,
        now,
    )?;
    Ok(ray_mul(env, factor, data.liquidity_index)?)
}

pub(crate) fn normalized_debt(env: &Env, data: &ReserveData) -> Result<u128, Error> {
    let now = env.ledger().timestamp();
    if data.last_update_timestamp == now {
        return Ok(data.variable_borrow_index);
    }
    let factor = calculate_linear_interest(
        env,
        data.current_variable_borrow_rate,
        data.last_update_timestamp,
        now,
    )?;
    Ok(ray_mul(env, factor, data.variable_borrow_index)?)
}
