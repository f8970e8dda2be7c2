use lending_math::ray_mul;
use soroban_sdk::{Address, Env, Vec};

use crate::clients::ReserveTokenClient;
use crate::errors::Error;
use crate::events::*;
use crate::helpers::*;
use crate::reserve::{normalized_income, update_interest_rates, update_state, ReserveCache};
use crate::storage::*;
use crate::validation::*;

fn enable_collateral(
    env: &Env,
    config: &mut UserConfiguration,
    id: u32,
    asset: &Address,
    user: &Address,
) {
    config.set_using_as_collateral(id, true);
    CollateralEnabled {
        reserve: asset.clone(),
        user: user.clone(),
    }
    .publish(env);
}

fn disable_collateral(
    env: &Env,
    config: &mut UserConfiguration,
    id: u32,
    asset: &Address,
    user: &Address,
) {
    config.set_using_as_collateral(id, false);
    CollateralDisabled {
        reserve: asset.clone(),
        user: user.clone(),
    }
    .publish(env);
}

pub(crate) fn execute_supply(
    env: &Env,
    from: &Address,
    asset: &Address,
    amount: u128,
    on_behalf_of: &Address,
) -> Result<(), Error> {
    let mut cache = ReserveCache::load(env, asset)?;
    update_state(env, &mut cache)?;
    validate_supply(env, &cache, amount)?;
    update_interest_rates(env, &mut cache, amount, 0)?;

    pull_underlying(env, asset, from, amount)?;
    let pool = env.current_contract_address();
    let is_first = ReserveTokenClient::new(env, &cache.data.h_token).mint(
        &pool,
        from,
        on_behalf_of,
        &amount,
        &cache.next_liquidity_index,
    );
    cache.store(env);

    if is_first {
        let mut user_config = user_config(env, on_behalf_of);
        if validate_automatic_use_as_collateral(env, &user_config, &cache.data.configuration)? {
            enable_collateral(env, &mut user_config, cache.data.id, asset, on_behalf_of);
            set_user_config(env, on_behalf_of, &user_config);
        }
    }

    Supply {
        reserve: asset.clone(),
        on_behalf_of: on_behalf_of.clone(),
        user: from.clone(),
        amount,
    }
    .publish(env);
    notify_gauge(env, &cache)
}

pub(crate) fn execute_withdraw(
    env: &Env,
    from: &Address,
    asset: &Address,
    amount: u128,
    to: &Address,
) -> Result<u128, Error> {
    let mut cache = ReserveCache::load(env, asset)?;
    update_state(env, &mut cache)?;

    let user_balance = h_token_balance(env, &cache, from)?;
    let amount = if amount == u128::MAX { user_balance } else { amount };
    validate_withdraw(&cache, amount, user_balance)?;
    update_interest_rates(env, &mut cache, 0, amount)?;

    let pool = env.current_contract_address();
    ReserveTokenClient::new(env, &cache.data.h_token).burn(
        &pool,
        from,
        &amount,
        &cache.next_liquidity_index,
    );
    cache.store(env);

    let mut user_config = user_config(env, from);
    if user_config.is_using_as_collateral(cache.data.id) {
        if amount == user_balance {
            disable_collateral(env, &mut user_config, cache.data.id, asset, from);
            set_user_config(env, from, &user_config);
        }
        validate_health_factor(env, from, &user_config)?;
    }

    push_underlying(env, asset, to, amount)?;
    Withdraw {
        reserve: asset.clone(),
        user: from.clone(),
        to: to.clone(),
        amount,
    }
    .publish(env);
    notify_gauge(env, &cache)?;
    Ok(amount)
}

pub(crate) fn execute_set_use_as_collateral(
    env: &Env,
    user: &Address,
    asset: &Address,
    enabled: bool,
) -> Result<(), Error> {
    let cache = ReserveCache::load(env, asset)?;
    let balance = h_token_balance(env, &cache, user)?;
    validate_set_use_as_collateral(&cache, balance)?;

    let mut user_config = user_config(env, user);
    let id = cache.data.id;
    if enabled == user_config.is_using_as_collateral(id) {
        return Ok(());
    }
    if enabled {
        if cache.data.configuration.ltv == 0 {
            return Err(Error::LtvValidationFailed);
        }
        if !validate_use_as_collateral(env, &user_config, &cache.data.configuration)? {
            return Err(Error::UserInIsolationMode);
        }
        enable_collateral(env, &mut user_config, id, asset, user);
        set_user_config(env, user, &user_config);
    } else {
        disable_collateral(env, &mut user_config, id, asset, user);
        set_user_config(env, user, &user_config);
        validate_health_factor(env, user, &user_config)?;
    }
    Ok(())
}

/// Moves supply tokens between users and keeps both collateral masks and
/// the sender's health factor consistent.
pub(crate) fn execute_transfer(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), Error> {
    let data = reserve(env, asset)?;
    if data.configuration.is_paused {
        return Err(Error::ReservePaused);
    }
    let index = normalized_income(env, &data)?;
    let token = ReserveTokenClient::new(env, &data.h_token);
    let balance_from_before = ray_mul(env, token.scaled_balance_of(from), index)?;
    let balance_to_before = ray_mul(env, token.scaled_balance_of(to), index)?;
    if amount > balance_from_before {
        return Err(Error::NotEnoughAvailableUserBalance);
    }
    token.transfer(&env.current_contract_address(), from, to, &amount, &index);

    if from == to || amount == 0 {
        return Ok(());
    }
    let id = data.id;
    let mut from_config = user_config(env, from);
    if from_config.is_using_as_collateral(id) {
        if balance_from_before == amount {
            disable_collateral(env, &mut from_config, id, asset, from);
            set_user_config(env, from, &from_config);
        }
        validate_health_factor(env, from, &from_config)?;
    }
    if balance_to_before == 0 {
        let mut to_config = user_config(env, to);
        if validate_automatic_use_as_collateral(env, &to_config, &data.configuration)? {
            enable_collateral(env, &mut to_config, id, asset, to);
            set_user_config(env, to, &to_config);
        }
    }
    Ok(())
}

/// Mints the treasury's accrued share of every listed asset in `assets`.
pub(crate) fn execute_mint_to_treasury(env: &Env, assets: &Vec<Address>) -> Result<(), Error> {
    let treasury = treasury(env)?;
    let pool = env.current_contract_address();
    for asset in assets.iter() {
        let Ok(mut data) = reserve(env, &asset) else {
            continue;
        };
        if !data.configuration.is_active || data.accrued_to_treasury == 0 {
            continue;
        }
        let index = normalized_income(env, &data)?;
        let amount = ray_mul(env, data.accrued_to_treasury, index)?;
        data.accrued_to_treasury = 0;
        set_reserve(env, &asset, &data);
        ReserveTokenClient::new(env, &data.h_token)
            .mint_to_treasury(&pool, &treasury, &amount, &index);
        MintedToTreasury {
            reserve: asset.clone(),
            amount_minted: amount,
        }
        .publish(env);
    }
    Ok(())
}

