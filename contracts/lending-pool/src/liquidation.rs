use lending_math::{mul_div, percent_div, percent_mul, RAY};
use soroban_sdk::{log, Address, Env};

use crate::clients::ReserveTokenClient;
use crate::constants::*;
use crate::errors::Error;
use crate::events::*;
use crate::generic::calculate_user_account_data;
use crate::helpers::*;
use crate::isolation::decrease_isolated_debt;
use crate::reserve::{update_interest_rates, update_state, ReserveCache};
use crate::storage::*;
use crate::validation::{require_active, validate_automatic_use_as_collateral};

pub(crate) struct LiquidationParams {
    pub liquidator: Address,
    pub collateral_asset: Address,
    pub debt_asset: Address,
    pub user: Address,
    pub debt_to_cover: u128,
    pub receive_h_token: bool,
}

pub(crate) struct SeizeQuote {
    pub collateral_amount: u128,
    pub debt_amount: u128,
    pub protocol_fee: u128,
}

pub(crate) struct SeizeInputs {
    pub debt_to_cover: u128,
    pub user_collateral_balance: u128,
    pub collateral_price: u128,
    pub debt_price: u128,
    pub collateral_unit: u128,
    pub debt_unit: u128,
    pub liquidation_bonus: u32,
    pub protocol_fee_bps: u32,
}

/// Collateral seized for `debt_to_cover`, shrinking the covered debt when
/// the user holds less collateral than the bonus-inflated amount. The
/// protocol fee is taken out of the bonus part only.
pub(crate) fn calculate_seize(env: &Env, inputs: &SeizeInputs) -> Result<SeizeQuote, Error> {
    let debt_base = mul_div(env, inputs.debt_to_cover, inputs.debt_price, inputs.debt_unit)?;
    let base_collateral = mul_div(env, debt_base, inputs.collateral_unit, inputs.collateral_price)?;
    let max_collateral = percent_mul(env, base_collateral, inputs.liquidation_bonus as u128)?;

    let (collateral_amount, debt_amount) = if max_collateral > inputs.user_collateral_balance {
        let collateral_base = mul_div(
            env,
            inputs.user_collateral_balance,
            inputs.collateral_price,
            inputs.collateral_unit,
        )?;
        let debt_needed = mul_div(env, collateral_base, inputs.debt_unit, inputs.debt_price)?;
        (
            inputs.user_collateral_balance,
            percent_div(env, debt_needed, inputs.liquidation_bonus as u128)?,
        )
    } else {
        (max_collateral, inputs.debt_to_cover)
    };

    if inputs.protocol_fee_bps == 0 {
        return Ok(SeizeQuote {
            collateral_amount,
            debt_amount,
            protocol_fee: 0,
        });
    }
    let bonus = collateral_amount
        - percent_div(env, collateral_amount, inputs.liquidation_bonus as u128)?
            .min(collateral_amount);
    let protocol_fee = percent_mul(env, bonus, inputs.protocol_fee_bps as u128)?;
    Ok(SeizeQuote {
        collateral_amount: collateral_amount - protocol_fee,
        debt_amount,
        protocol_fee,
    })
}

pub(crate) fn execute_liquidation_call(env: &Env, params: &LiquidationParams) -> Result<(), Error> {
    let mut debt_cache = ReserveCache::load(env, &params.debt_asset)?;
    update_state(env, &mut debt_cache)?;
    debt_cache.store(env);
    let mut collateral_cache = ReserveCache::load(env, &params.collateral_asset)?;
    update_state(env, &mut collateral_cache)?;
    collateral_cache.store(env);

    let mut config = user_config(env, &params.user);
    let account = calculate_user_account_data(env, &params.user, &config)?;
    let (stable_debt, variable_debt) = user_debt(env, &debt_cache, &params.user)?;
    let total_debt = stable_debt.checked_add(variable_debt).ok_or(Error::Overflow)?;

    require_active(&collateral_cache.data.configuration)?;
    require_active(&debt_cache.data.configuration)?;
    if account.health_factor >= RAY {
        return Err(Error::HealthFactorNotBelowThreshold);
    }
    let collateral_id = collateral_cache.data.id;
    if collateral_cache.data.configuration.liquidation_threshold == 0
        || !config.is_using_as_collateral(collateral_id)
    {
        return Err(Error::CollateralCannotBeLiquidated);
    }
    if total_debt == 0 {
        return Err(Error::SpecifiedCurrencyNotBorrowedByUser);
    }

    // The collateral bit may be cleared below, so the isolation state is
    // taken from the position as it was before the liquidation.
    let isolation = config.isolation_state(env, &reserves_list(env))?;

    let policy = liquidation_policy(env);
    let close_factor = if account.health_factor < policy.full_liquidation_hf
        || account.total_collateral_base < policy.dust_collateral_base
    {
        log!(env, "full liquidation", params.user.clone(), account.health_factor);
        MAX_LIQUIDATION_CLOSE_FACTOR
    } else {
        DEFAULT_LIQUIDATION_CLOSE_FACTOR
    };
    let max_debt = percent_mul(env, total_debt, close_factor as u128)?;
    let debt_to_cover = params.debt_to_cover.min(max_debt);

    let user_collateral_balance = h_token_balance(env, &collateral_cache, &params.user)?;
    let collateral_config = &collateral_cache.data.configuration;
    let quote = calculate_seize(
        env,
        &SeizeInputs {
            debt_to_cover,
            user_collateral_balance,
            collateral_price: asset_price(env, &params.collateral_asset)?,
            debt_price: asset_price(env, &params.debt_asset)?,
            collateral_unit: asset_unit(collateral_config.decimals)?,
            debt_unit: asset_unit(debt_cache.data.configuration.decimals)?,
            liquidation_bonus: collateral_config.liquidation_bonus,
            protocol_fee_bps: collateral_config.liquidation_protocol_fee,
        },
    )?;
    if quote.debt_amount == 0 {
        return Err(Error::InvalidAmount);
    }

    if total_debt == quote.debt_amount {
        config.set_borrowing(debt_cache.data.id, false);
    }
    if quote.collateral_amount + quote.protocol_fee == user_collateral_balance {
        config.set_using_as_collateral(collateral_id, false);
        CollateralDisabled {
            reserve: params.collateral_asset.clone(),
            user: params.user.clone(),
        }
        .publish(env);
    }
    set_user_config(env, &params.user, &config);

    burn_debt(env, &mut debt_cache, &params.user, quote.debt_amount, variable_debt)?;
    update_interest_rates(env, &mut debt_cache, quote.debt_amount, 0)?;
    debt_cache.store(env);

    decrease_isolated_debt(
        env,
        &isolation,
        quote.debt_amount,
        debt_cache.data.configuration.decimals,
    )?;

    // Reload: the debt side may have touched the same reserve.
    let mut collateral_cache = ReserveCache::load(env, &params.collateral_asset)?;
    let pool = env.current_contract_address();
    let h_token = ReserveTokenClient::new(env, &collateral_cache.data.h_token);
    if quote.protocol_fee != 0 {
        h_token.transfer(
            &pool,
            &params.user,
            &treasury(env)?,
            &quote.protocol_fee,
            &collateral_cache.next_liquidity_index,
        );
    }
    // Scaled rounding on the fee leg must not leave the last unit short.
    let seized = quote
        .collateral_amount
        .min(h_token_balance(env, &collateral_cache, &params.user)?);

    if params.receive_h_token {
        let liquidator_balance = h_token_balance(env, &collateral_cache, &params.liquidator)?;
        h_token.transfer(
            &pool,
            &params.user,
            &params.liquidator,
            &seized,
            &collateral_cache.next_liquidity_index,
        );
        if liquidator_balance == 0 {
            let mut liquidator_config = user_config(env, &params.liquidator);
            if validate_automatic_use_as_collateral(
                env,
                &liquidator_config,
                &collateral_cache.data.configuration,
            )? {
                liquidator_config.set_using_as_collateral(collateral_id, true);
                set_user_config(env, &params.liquidator, &liquidator_config);
                CollateralEnabled {
                    reserve: params.collateral_asset.clone(),
                    user: params.liquidator.clone(),
                }
                .publish(env);
            }
        }
    } else {
        update_interest_rates(env, &mut collateral_cache, 0, seized)?;
        h_token.burn(
            &pool,
            &params.user,
            &seized,
            &collateral_cache.next_liquidity_index,
        );
        collateral_cache.store(env);
        push_underlying(
            env,
            &params.collateral_asset,
            &params.liquidator,
            seized,
        )?;
    }

    pull_underlying(env, &params.debt_asset, &params.liquidator, quote.debt_amount)?;

    LiquidationCall {
        collateral_asset: params.collateral_asset.clone(),
        debt_asset: params.debt_asset.clone(),
        user: params.user.clone(),
        debt_to_cover: quote.debt_amount,
        liquidated_collateral_amount: seized,
        protocol_fee_amount: quote.protocol_fee,
        liquidator: params.liquidator.clone(),
        receive_h_token: params.receive_h_token,
    }
    .publish(env);

    notify_gauge(env, &debt_cache)?;
    if params.collateral_asset != params.debt_asset {
        notify_gauge(env, &collateral_cache)?;
    }
    Ok(())
}

/// Variable debt is repaid first, the remainder comes out of stable debt.
fn burn_debt(
    env: &Env,
    cache: &mut ReserveCache,
    user: &Address,
    amount: u128,
    variable_debt: u128,
) -> Result<(), Error> {
    let pool = env.current_contract_address();
    let variable_part = amount.min(variable_debt);
    if variable_part != 0 {
        ReserveTokenClient::new(env, &cache.data.variable_debt_token).burn(
            &pool,
            user,
            &variable_part,
            &cache.next_variable_borrow_index,
        );
        cache.refresh_scaled_variable_debt(env);
    }
    let stable_part = amount - variable_part;
    if stable_part != 0 {
        let burned = ReserveTokenClient::new(env, &cache.data.stable_debt_token).burn_stable(
            &pool,
            user,
            &stable_part,
        );
        cache.next_total_stable_debt = burned.total_supply;
        cache.next_avg_stable_rate = burned.average_rate;
    }
    Ok(())
}
