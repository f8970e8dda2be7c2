use lending_math::{mul_div, WAD};
use soroban_sdk::{Address, Env};

use crate::errors::Error;
use crate::events::UpdateLiquidityLimit;
use crate::storage::*;
use crate::GaugeControllerClient;

pub(crate) fn require_lending_gauge(env: &Env, caller: &Address) -> Result<(), Error> {
    match lending_gauge(env) {
        Some(gauge) if gauge == *caller => {
            caller.require_auth();
            Ok(())
        }
        _ => Err(Error::CallerMustBeLendingGauge),
    }
}

/// Reward weights change at most once per epoch.
pub const WEEK: u64 = 7 * 24 * 60 * 60;
/// Epochs walked by one checkpoint; time beyond this accrues at the last
/// weight read.
const MAX_EPOCHS: u32 = 500;

/// Emissions of `side_rate` between `from` and `to`, each epoch weighted by
/// the controller's relative weight at the epoch start.
fn weighted_emission(env: &Env, side_rate: u128, from: u64, to: u64) -> Result<u128, Error> {
    let Some(controller) = gauge_controller(env) else {
        return Ok(0);
    };
    let Some(gauge) = lending_gauge(env) else {
        return Ok(0);
    };
    let controller = GaugeControllerClient::new(env, &controller);
    let mut emitted: u128 = 0;
    let mut t = from;
    let mut weight = 0u128;
    for _ in 0..MAX_EPOCHS {
        if t >= to {
            break;
        }
        let epoch_start = t / WEEK * WEEK;
        let epoch_end = epoch_start.saturating_add(WEEK).min(to);
        weight = controller.gauge_relative_weight(&gauge, &epoch_start);
        emitted = emitted
            .checked_add(segment(env, side_rate, weight, epoch_end - t)?)
            .ok_or(Error::Overflow)?;
        t = epoch_end;
    }
    if t < to {
        emitted = emitted
            .checked_add(segment(env, side_rate, weight, to - t)?)
            .ok_or(Error::Overflow)?;
    }
    Ok(emitted)
}

fn segment(env: &Env, side_rate: u128, weight: u128, elapsed: u64) -> Result<u128, Error> {
    let raw = side_rate
        .checked_mul(elapsed as u128)
        .ok_or(Error::Overflow)?;
    Ok(mul_div(env, raw, weight, WAD)?)
}

pub(crate) fn checkpoint_global(env: &Env) -> Result<GaugeState, Error> {
    let mut state = gauge_state(env);
    let now = env.ledger().timestamp();
    if now > state.last_checkpoint {
        if state.working_supply > 0 && state.side_rate > 0 {
            let emitted = weighted_emission(env, state.side_rate, state.last_checkpoint, now)?;
            let delta = emitted / state.working_supply;
            state.integrate_inv_supply = state
                .integrate_inv_supply
                .checked_add(delta)
                .ok_or(Error::Overflow)?;
        }
        state.last_checkpoint = now;
        set_gauge_state(env, &state);
    }
    Ok(state)
}

/// Accrues the user's share of emissions since their last checkpoint, using
/// the working balance they held over that period.
pub(crate) fn checkpoint_user(env: &Env, user: &Address) -> Result<(), Error> {
    let state = checkpoint_global(env)?;
    let mut user_state = user_gauge(env, user);
    let pending = state
        .integrate_inv_supply
        .saturating_sub(user_state.integrate_inv_supply_of);
    if pending > 0 && user_state.working_balance > 0 {
        let earned = mul_div(env, user_state.working_balance, pending, WAD)?;
        user_state.integrate_fraction = user_state
            .integrate_fraction
            .checked_add(earned)
            .ok_or(Error::Overflow)?;
    }
    user_state.integrate_inv_supply_of = state.integrate_inv_supply;
    set_user_gauge(env, user, &user_state);
    Ok(())
}

/// Replaces the user's working balance with their current scaled balance.
pub(crate) fn update_liquidity_limit(env: &Env, user: &Address) -> Result<(), Error> {
    let balance = position(env, user).scaled_balance;
    let mut state = gauge_state(env);
    let mut user_state = user_gauge(env, user);
    let original_balance = user_state.working_balance;
    let original_supply = state.working_supply;
    state.working_supply = state
        .working_supply
        .saturating_sub(original_balance)
        .checked_add(balance)
        .ok_or(Error::Overflow)?;
    user_state.working_balance = balance;
    set_gauge_state(env, &state);
    set_user_gauge(env, user, &user_state);
    UpdateLiquidityLimit {
        user: user.clone(),
        original_balance,
        original_supply,
        working_balance: balance,
        working_supply: state.working_supply,
    }
    .publish(env);
    Ok(())
}

pub(crate) fn set_side_rate(
    env: &Env,
    controller: &Address,
    side_rate: u128,
) -> Result<(), Error> {
    let mut state = checkpoint_global(env)?;
    set_gauge_controller(env, controller);
    state.side_rate = side_rate;
    set_gauge_state(env, &state);
    Ok(())
}
