use lending_math::ray_mul;
use soroban_sdk::{token, Address, Env};

use crate::clients::{LendingGaugeClient, PriceOracleClient, ReserveTokenClient};
use crate::errors::Error;
use crate::reserve::ReserveCache;
use crate::storage::oracle;

pub(crate) fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::Overflow)
}

pub(crate) fn asset_unit(decimals: u32) -> Result<u128, Error> {
    10u128.checked_pow(decimals).ok_or(Error::Overflow)
}

pub(crate) fn asset_price(env: &Env, asset: &Address) -> Result<u128, Error> {
    let oracle = oracle(env)?;
    match PriceOracleClient::new(env, &oracle).try_get_asset_price(asset) {
        Ok(Ok(price)) if price > 0 => Ok(price),
        _ => Err(Error::PriceNotAvailable),
    }
}

pub(crate) fn pool_balance(env: &Env, asset: &Address) -> u128 {
    let balance = token::Client::new(env, asset).balance(&env.current_contract_address());
    balance.max(0) as u128
}

pub(crate) fn pull_underlying(
    env: &Env,
    asset: &Address,
    from: &Address,
    amount: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    token::Client::new(env, asset).transfer(
        from,
        &env.current_contract_address(),
        &to_i128(amount)?,
    );
    Ok(())
}

pub(crate) fn push_underlying(
    env: &Env,
    asset: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    token::Client::new(env, asset).transfer(
        &env.current_contract_address(),
        to,
        &to_i128(amount)?,
    );
    Ok(())
}

/// Real supply-token balance at the cache's index. Reading the token's own
/// `balance_of` would call back into the pool.
pub(crate) fn h_token_balance(
    env: &Env,
    cache: &ReserveCache,
    user: &Address,
) -> Result<u128, Error> {
    let scaled = ReserveTokenClient::new(env, &cache.data.h_token).scaled_balance_of(user);
    Ok(ray_mul(env, scaled, cache.next_liquidity_index)?)
}

/// (stable, variable) debt of `user` at the cache's index.
pub(crate) fn user_debt(
    env: &Env,
    cache: &ReserveCache,
    user: &Address,
) -> Result<(u128, u128), Error> {
    let stable = ReserveTokenClient::new(env, &cache.data.stable_debt_token).balance_of(user);
    let scaled =
        ReserveTokenClient::new(env, &cache.data.variable_debt_token).scaled_balance_of(user);
    Ok((stable, ray_mul(env, scaled, cache.next_variable_borrow_index)?))
}

/// Pushes the reserve's fresh utilization to its lending gauge, if wired.
pub(crate) fn notify_gauge(env: &Env, cache: &ReserveCache) -> Result<(), Error> {
    let Some(gauge) = cache.data.lending_gauge.clone() else {
        return Ok(());
    };
    let total_debt = cache.total_debt(env)?;
    let scaled_supply = ReserveTokenClient::new(env, &cache.data.h_token).scaled_total_supply();
    let total_supply = ray_mul(env, scaled_supply, cache.next_liquidity_index)?;
    LendingGaugeClient::new(env, &gauge).update_allocation(
        &env.current_contract_address(),
        &total_debt,
        &total_supply,
    );
    Ok(())
}
