use soroban_sdk::{Address, Env};

use crate::clients::ReserveTokenClient;
use crate::constants::*;
use crate::errors::Error;
use crate::events::{Borrow, CollateralDisabled, Repay};
use crate::helpers::*;
use crate::isolation::{decrease_isolated_debt, increase_isolated_debt};
use crate::reserve::{update_interest_rates, update_state, ReserveCache};
use crate::storage::{reserves_list, set_user_config, user_config};
use crate::validation::{validate_borrow, validate_repay, BorrowCheck};

pub(crate) struct BorrowParams {
    pub user: Address,
    pub asset: Address,
    pub amount: u128,
    pub rate_mode: u32,
    pub on_behalf_of: Address,
    /// False when a flash loan already handed the funds out.
    pub release_underlying: bool,
}

pub(crate) fn execute_borrow(env: &Env, params: &BorrowParams) -> Result<(), Error> {
    let mut cache = ReserveCache::load(env, &params.asset)?;
    update_state(env, &mut cache)?;

    let mut config = user_config(env, &params.on_behalf_of);
    let isolation = config.isolation_state(env, &reserves_list(env))?;
    validate_borrow(
        env,
        &cache,
        &BorrowCheck {
            user: &params.on_behalf_of,
            amount: params.amount,
            rate_mode: params.rate_mode,
            user_config: &config,
            isolation: &isolation,
        },
    )?;

    let pool = env.current_contract_address();
    let borrow_rate = if params.rate_mode == RATE_MODE_STABLE {
        let rate = cache.data.current_stable_borrow_rate;
        let minted = ReserveTokenClient::new(env, &cache.data.stable_debt_token).mint_stable(
            &pool,
            &params.user,
            &params.on_behalf_of,
            &params.amount,
            &rate,
        );
        cache.next_total_stable_debt = minted.total_supply;
        cache.next_avg_stable_rate = minted.average_rate;
        rate
    } else {
        ReserveTokenClient::new(env, &cache.data.variable_debt_token).mint(
            &pool,
            &params.user,
            &params.on_behalf_of,
            &params.amount,
            &cache.next_variable_borrow_index,
        );
        cache.refresh_scaled_variable_debt(env);
        cache.data.current_variable_borrow_rate
    };

    config.set_borrowing(cache.data.id, true);
    set_user_config(env, &params.on_behalf_of, &config);

    let taken = if params.release_underlying { params.amount } else { 0 };
    update_interest_rates(env, &mut cache, 0, taken)?;
    cache.store(env);
    increase_isolated_debt(env, &isolation, params.amount, cache.data.configuration.decimals)?;

    if params.release_underlying {
        push_underlying(env, &params.asset, &params.user, params.amount)?;
    }
    Borrow {
        reserve: params.asset.clone(),
        on_behalf_of: params.on_behalf_of.clone(),
        user: params.user.clone(),
        amount: params.amount,
        interest_rate_mode: params.rate_mode,
        borrow_rate,
    }
    .publish(env);
    notify_gauge(env, &cache)
}

pub(crate) struct RepayParams {
    pub payer: Address,
    pub asset: Address,
    pub amount: u128,
    pub rate_mode: u32,
    pub on_behalf_of: Address,
    pub use_h_tokens: bool,
}

/// Returns the amount actually repaid, capped at the outstanding debt of
/// the selected mode.
pub(crate) fn execute_repay(env: &Env, params: &RepayParams) -> Result<u128, Error> {
    let mut cache = ReserveCache::load(env, &params.asset)?;
    update_state(env, &mut cache)?;

    let (stable_debt, variable_debt) = user_debt(env, &cache, &params.on_behalf_of)?;
    validate_repay(
        &cache,
        &params.payer,
        &params.on_behalf_of,
        params.amount,
        params.rate_mode,
        stable_debt,
        variable_debt,
    )?;

    let mut payback = if params.rate_mode == RATE_MODE_STABLE {
        stable_debt
    } else {
        variable_debt
    };
    let amount = if params.use_h_tokens && params.amount == u128::MAX {
        h_token_balance(env, &cache, &params.payer)?
    } else {
        params.amount
    };
    if amount < payback {
        payback = amount;
    }
    if payback == 0 {
        return Err(Error::InvalidAmount);
    }

    let pool = env.current_contract_address();
    if params.rate_mode == RATE_MODE_STABLE {
        let burned = ReserveTokenClient::new(env, &cache.data.stable_debt_token).burn_stable(
            &pool,
            &params.on_behalf_of,
            &payback,
        );
        cache.next_total_stable_debt = burned.total_supply;
        cache.next_avg_stable_rate = burned.average_rate;
    } else {
        ReserveTokenClient::new(env, &cache.data.variable_debt_token).burn(
            &pool,
            &params.on_behalf_of,
            &payback,
            &cache.next_variable_borrow_index,
        );
        cache.refresh_scaled_variable_debt(env);
    }

    let added = if params.use_h_tokens { 0 } else { payback };
    update_interest_rates(env, &mut cache, added, 0)?;
    cache.store(env);

    let id = cache.data.id;
    let mut config = user_config(env, &params.on_behalf_of);
    let isolation = config.isolation_state(env, &reserves_list(env))?;
    if stable_debt.saturating_add(variable_debt) == payback {
        config.set_borrowing(id, false);
        set_user_config(env, &params.on_behalf_of, &config);
    }
    decrease_isolated_debt(env, &isolation, payback, cache.data.configuration.decimals)?;

    if params.use_h_tokens {
        let now_empty = ReserveTokenClient::new(env, &cache.data.h_token).burn(
            &pool,
            &params.payer,
            &payback,
            &cache.next_liquidity_index,
        );
        let mut payer_config = user_config(env, &params.payer);
        if now_empty && payer_config.is_using_as_collateral(id) {
            payer_config.set_using_as_collateral(id, false);
            set_user_config(env, &params.payer, &payer_config);
            CollateralDisabled {
                reserve: params.asset.clone(),
                user: params.payer.clone(),
            }
            .publish(env);
        }
    } else {
        pull_underlying(env, &params.asset, &params.payer, payback)?;
    }

    Repay {
        reserve: params.asset.clone(),
        user: params.on_behalf_of.clone(),
        repayer: params.payer.clone(),
        amount: payback,
        use_h_tokens: params.use_h_tokens,
    }
    .publish(env);
    notify_gauge(env, &cache)?;
    Ok(payback)
}
