use lending_math::{mul_div_up, percent_div, percent_mul, ray_mul, RAY};
use soroban_sdk::{Address, Env, Vec};

use crate::clients::ReserveTokenClient;
use crate::constants::*;
use crate::errors::Error;
use crate::generic::calculate_user_account_data;
use crate::helpers::{asset_price, asset_unit, h_token_balance, pool_balance};
use crate::reserve::ReserveCache;
use crate::storage::{reserve, reserves_list, ReserveConfig, UserConfiguration};
use crate::user_config::IsolationState;

pub(crate) fn require_active(config: &ReserveConfig) -> Result<(), Error> {
    if !config.is_active {
        return Err(Error::ReserveInactive);
    }
    if config.is_paused {
        return Err(Error::ReservePaused);
    }
    Ok(())
}

fn require_not_frozen(config: &ReserveConfig) -> Result<(), Error> {
    if config.is_frozen {
        return Err(Error::ReserveFrozen);
    }
    Ok(())
}

/// Listing-time sanity of the risk parameters.
pub(crate) fn validate_reserve_config(config: &ReserveConfig) -> Result<(), Error> {
    let pct = PERCENTAGE_FACTOR_BPS;
    if config.decimals < DEBT_CEILING_DECIMALS || config.decimals > MAX_DECIMALS {
        return Err(Error::InvalidReserveParams);
    }
    if config.ltv > config.liquidation_threshold
        || config.reserve_factor > pct
        || config.liquidation_protocol_fee > pct
    {
        return Err(Error::InvalidReserveParams);
    }
    if config.liquidation_threshold != 0 {
        // Seizing threshold * bonus must stay within the collateral.
        let seized = (config.liquidation_threshold as u64) * (config.liquidation_bonus as u64);
        if config.liquidation_bonus <= pct || seized > (pct as u64) * (pct as u64) {
            return Err(Error::InvalidReserveParams);
        }
    } else if config.liquidation_bonus != 0 {
        return Err(Error::InvalidReserveParams);
    }
    Ok(())
}

pub(crate) fn validate_supply(env: &Env, cache: &ReserveCache, amount: u128) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    let config = &cache.data.configuration;
    require_active(config)?;
    require_not_frozen(config)?;

    if config.supply_cap != 0 {
        let scaled = ReserveTokenClient::new(env, &cache.data.h_token)
            .scaled_total_supply()
            .checked_add(cache.data.accrued_to_treasury)
            .ok_or(Error::Overflow)?;
        let supplied = ray_mul(env, scaled, cache.next_liquidity_index)?
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let cap = config
            .supply_cap
            .checked_mul(asset_unit(config.decimals)?)
            .ok_or(Error::Overflow)?;
        if supplied > cap {
            return Err(Error::SupplyCapExceeded);
        }
    }
    Ok(())
}

pub(crate) fn validate_withdraw(
    cache: &ReserveCache,
    amount: u128,
    user_balance: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if amount > user_balance {
        return Err(Error::NotEnoughAvailableUserBalance);
    }
    require_active(&cache.data.configuration)
}

pub(crate) struct BorrowCheck<'a> {
    pub user: &'a Address,
    pub amount: u128,
    pub rate_mode: u32,
    pub user_config: &'a UserConfiguration,
    pub isolation: &'a IsolationState,
}

pub(crate) fn validate_borrow(
    env: &Env,
    cache: &ReserveCache,
    check: &BorrowCheck,
) -> Result<(), Error> {
    if check.amount == 0 {
        return Err(Error::InvalidAmount);
    }
    let config = &cache.data.configuration;
    require_active(config)?;
    require_not_frozen(config)?;
    if !config.borrowing_enabled {
        return Err(Error::BorrowingNotEnabled);
    }
    if check.rate_mode != RATE_MODE_STABLE && check.rate_mode != RATE_MODE_VARIABLE {
        return Err(Error::InvalidInterestRateModeSelected);
    }

    let unit = asset_unit(config.decimals)?;
    if config.borrow_cap != 0 {
        let total_debt = cache
            .total_debt(env)?
            .checked_add(check.amount)
            .ok_or(Error::Overflow)?;
        let cap = config.borrow_cap.checked_mul(unit).ok_or(Error::Overflow)?;
        if total_debt > cap {
            return Err(Error::BorrowCapExceeded);
        }
    }

    if check.isolation.active {
        if !config.borrowable_in_isolation {
            return Err(Error::AssetNotBorrowableInIsolation);
        }
        if let Some(collateral) = &check.isolation.collateral {
            let total = reserve(env, collateral)?
                .isolation_mode_total_debt
                .checked_add(isolated_amount(check.amount, config.decimals)?)
                .ok_or(Error::Overflow)?;
            if total > check.isolation.debt_ceiling {
                return Err(Error::DebtCeilingExceeded);
            }
        }
    }

    let account = calculate_user_account_data(env, check.user, check.user_config)?;
    if account.total_collateral_base == 0 {
        return Err(Error::CollateralBalanceIsZero);
    }
    if account.ltv == 0 {
        return Err(Error::LtvValidationFailed);
    }
    if account.health_factor <= RAY {
        return Err(Error::HealthFactorLowerThanLiquidationThreshold);
    }
    let price = asset_price(env, &cache.asset)?;
    let amount_base = mul_div_up(env, check.amount, price, unit)?;
    let needed = percent_div(
        env,
        account
            .total_debt_base
            .checked_add(amount_base)
            .ok_or(Error::Overflow)?,
        account.ltv,
    )?;
    if needed > account.total_collateral_base {
        return Err(Error::CollateralCannotCoverNewBorrow);
    }

    if check.rate_mode == RATE_MODE_STABLE {
        if !config.stable_borrowing_enabled {
            return Err(Error::StableBorrowingNotEnabled);
        }
        if check.user_config.is_using_as_collateral(cache.data.id)
            && config.ltv != 0
            && check.amount <= h_token_balance(env, cache, check.user)?
        {
            return Err(Error::CollateralSameAsBorrowingCurrency);
        }
        let max_loan = percent_mul(
            env,
            pool_balance(env, &cache.asset),
            MAX_STABLE_RATE_BORROW_SIZE_PERCENT as u128,
        )?;
        if check.amount > max_loan {
            return Err(Error::AmountBiggerThanMaxLoanSizeStable);
        }
    }
    Ok(())
}

pub(crate) fn validate_repay(
    cache: &ReserveCache,
    caller: &Address,
    on_behalf_of: &Address,
    amount: u128,
    rate_mode: u32,
    stable_debt: u128,
    variable_debt: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if amount == u128::MAX && caller != on_behalf_of {
        return Err(Error::NoExplicitAmountToRepayOnBehalf);
    }
    require_active(&cache.data.configuration)?;
    let has_debt = match rate_mode {
        RATE_MODE_STABLE => stable_debt > 0,
        RATE_MODE_VARIABLE => variable_debt > 0,
        _ => return Err(Error::InvalidInterestRateModeSelected),
    };
    if !has_debt {
        return Err(Error::NoDebtOfSelectedType);
    }
    Ok(())
}

pub(crate) fn validate_set_use_as_collateral(
    cache: &ReserveCache,
    user_balance: u128,
) -> Result<(), Error> {
    if user_balance == 0 {
        return Err(Error::UnderlyingBalanceZero);
    }
    require_active(&cache.data.configuration)
}

/// Fails unless the user's health factor is at least one.
pub(crate) fn validate_health_factor(
    env: &Env,
    user: &Address,
    config: &UserConfiguration,
) -> Result<(), Error> {
    if !config.is_borrowing_any() {
        return Ok(());
    }
    let account = calculate_user_account_data(env, user, config)?;
    if account.health_factor < RAY {
        return Err(Error::HealthFactorLowerThanLiquidationThreshold);
    }
    Ok(())
}

/// Whether a fresh supply position should count as collateral without an
/// explicit opt-in.
pub(crate) fn validate_automatic_use_as_collateral(
    env: &Env,
    user_config: &UserConfiguration,
    config: &ReserveConfig,
) -> Result<bool, Error> {
    if config.ltv == 0 {
        return Ok(false);
    }
    validate_use_as_collateral(env, user_config, config)
}

pub(crate) fn validate_use_as_collateral(
    env: &Env,
    user_config: &UserConfiguration,
    config: &ReserveConfig,
) -> Result<bool, Error> {
    if !user_config.is_using_as_collateral_any() {
        return Ok(true);
    }
    let state = user_config.isolation_state(env, &reserves_list(env))?;
    Ok(!state.active && config.debt_ceiling == 0)
}

pub(crate) fn validate_flash_loan(
    env: &Env,
    assets: &Vec<Address>,
    amounts: &Vec<u128>,
    modes: &Vec<u32>,
) -> Result<(), Error> {
    if assets.is_empty() || assets.len() != amounts.len() || assets.len() != modes.len() {
        return Err(Error::InconsistentFlashloanParams);
    }
    for (i, asset) in assets.iter().enumerate() {
        // Each leg is settled against its own balance snapshot.
        if assets.iter().skip(i + 1).any(|other| other == asset) {
            return Err(Error::InconsistentFlashloanParams);
        }
        let config = reserve(env, &asset)?.configuration;
        require_active(&config)?;
        if !config.flash_loan_enabled {
            return Err(Error::FlashloanDisabled);
        }
    }
    Ok(())
}

/// Debt amount expressed in the two-decimal precision of debt ceilings.
pub(crate) fn isolated_amount(amount: u128, decimals: u32) -> Result<u128, Error> {
    Ok(amount / asset_unit(decimals.saturating_sub(DEBT_CEILING_DECIMALS))?)
}
