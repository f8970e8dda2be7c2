use soroban_sdk::{Address, Env};

use crate::clients::ReserveTokenClient;
use crate::errors::Error;
use crate::events::{DebtCeilingChanged, IsolatedDebtUpdated};
use crate::storage::{reserve, set_reserve};
use crate::user_config::IsolationState;
use crate::validation::isolated_amount;

fn write_total(env: &Env, collateral: &Address, total: u128) -> Result<(), Error> {
    let mut data = reserve(env, collateral)?;
    data.isolation_mode_total_debt = total;
    set_reserve(env, collateral, &data);
    IsolatedDebtUpdated {
        asset: collateral.clone(),
        total_debt: total,
    }
    .publish(env);
    Ok(())
}

/// Books a new borrow against the isolated collateral, failing past the
/// debt ceiling.
pub(crate) fn increase_isolated_debt(
    env: &Env,
    state: &IsolationState,
    amount: u128,
    debt_decimals: u32,
) -> Result<(), Error> {
    let (true, Some(collateral)) = (state.active, &state.collateral) else {
        return Ok(());
    };
    let total = reserve(env, collateral)?
        .isolation_mode_total_debt
        .checked_add(isolated_amount(amount, debt_decimals)?)
        .ok_or(Error::Overflow)?;
    if total > state.debt_ceiling {
        return Err(Error::DebtCeilingExceeded);
    }
    write_total(env, collateral, total)
}

/// Releases repaid debt. Rounding dust from partial repayments can push
/// the decrement past the tracked total, so it clamps at zero.
pub(crate) fn decrease_isolated_debt(
    env: &Env,
    state: &IsolationState,
    amount: u128,
    debt_decimals: u32,
) -> Result<(), Error> {
    let (true, Some(collateral)) = (state.active, &state.collateral) else {
        return Ok(());
    };
    let repaid = isolated_amount(amount, debt_decimals)?;
    let total = reserve(env, collateral)?
        .isolation_mode_total_debt
        .saturating_sub(repaid);
    write_total(env, collateral, total)
}

/// Switching isolation on for an asset that already has suppliers would
/// retroactively isolate their positions.
pub(crate) fn set_debt_ceiling(env: &Env, asset: &Address, new_ceiling: u128) -> Result<(), Error> {
    let mut data = reserve(env, asset)?;
    let old_ceiling = data.configuration.debt_ceiling;
    if old_ceiling == 0 && new_ceiling != 0 {
        let supplied = ReserveTokenClient::new(env, &data.h_token).scaled_total_supply();
        if supplied != 0 || data.accrued_to_treasury != 0 {
            return Err(Error::ReserveLiquidityNotZero);
        }
    }
    data.configuration.debt_ceiling = new_ceiling;
    set_reserve(env, asset, &data);
    DebtCeilingChanged {
        asset: asset.clone(),
        old_debt_ceiling: old_ceiling,
        new_debt_ceiling: new_ceiling,
    }
    .publish(env);
    if new_ceiling == 0 {
        write_total(env, asset, 0)?;
    }
    Ok(())
}
