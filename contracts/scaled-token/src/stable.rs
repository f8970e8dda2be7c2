use lending_math::{calculate_compounded_interest, ray_div, ray_mul, wad_to_ray};
use soroban_sdk::{Address, Env};

use crate::errors::Error;
use crate::events::{StableBurn, StableMint};
use crate::storage::*;

pub(crate) fn balance_of(env: &Env, user: &Address) -> Result<u128, Error> {
    let position = stable_position(env, user);
    if position.principal == 0 {
        return Ok(0);
    }
    let factor = calculate_compounded_interest(
        env,
        position.rate,
        position.last_update,
        env.ledger().timestamp(),
    )?;
    Ok(ray_mul(env, position.principal, factor)?)
}

pub(crate) fn total_supply(env: &Env, totals: &StableTotals) -> Result<u128, Error> {
    if totals.principal_supply == 0 {
        return Ok(0);
    }
    let factor = calculate_compounded_interest(
        env,
        totals.average_rate,
        totals.last_update,
        env.ledger().timestamp(),
    )?;
    Ok(ray_mul(env, totals.principal_supply, factor)?)
}

pub(crate) fn mint(
    env: &Env,
    user: &Address,
    on_behalf_of: &Address,
    amount: u128,
    rate: u128,
) -> Result<StableMintResult, Error> {
    if amount == 0 {
        return Err(Error::InvalidMintAmount);
    }
    let now = env.ledger().timestamp();
    let position = stable_position(env, on_behalf_of);
    let current_balance = balance_of(env, on_behalf_of)?;
    let balance_increase = current_balance.saturating_sub(position.principal);

    let totals = stable_totals(env);
    let previous_supply = total_supply(env, &totals)?;
    let next_supply = previous_supply.checked_add(amount).ok_or(Error::Overflow)?;
    let next_balance = current_balance.checked_add(amount).ok_or(Error::Overflow)?;

    let weighted_new = ray_mul(env, rate, wad_to_ray(amount)?)?;
    let weighted_user = ray_mul(env, position.rate, wad_to_ray(current_balance)?)?;
    let new_rate = ray_div(
        env,
        weighted_user.checked_add(weighted_new).ok_or(Error::Overflow)?,
        wad_to_ray(next_balance)?,
    )?;
    let weighted_total = ray_mul(env, totals.average_rate, wad_to_ray(previous_supply)?)?;
    let average_rate = ray_div(
        env,
        weighted_total.checked_add(weighted_new).ok_or(Error::Overflow)?,
        wad_to_ray(next_supply)?,
    )?;

    set_stable_position(
        env,
        on_behalf_of,
        &StablePosition {
            principal: next_balance,
            rate: new_rate,
            last_update: now,
        },
    );
    set_stable_totals(
        env,
        &StableTotals {
            principal_supply: next_supply,
            average_rate,
            last_update: now,
        },
    );

    StableMint {
        user: user.clone(),
        on_behalf_of: on_behalf_of.clone(),
        amount,
        current_balance,
        balance_increase,
        new_rate,
        avg_stable_rate: average_rate,
        new_total_supply: next_supply,
    }
    .publish(env);

    Ok(StableMintResult {
        is_first: current_balance == 0,
        total_supply: next_supply,
        average_rate,
    })
}

pub(crate) fn burn(env: &Env, from: &Address, amount: u128) -> Result<StableBurnResult, Error> {
    if amount == 0 {
        return Err(Error::InvalidBurnAmount);
    }
    let now = env.ledger().timestamp();
    let mut position = stable_position(env, from);
    let current_balance = balance_of(env, from)?;
    if amount > current_balance {
        return Err(Error::NotEnoughBalance);
    }
    let balance_increase = current_balance.saturating_sub(position.principal);

    let totals = stable_totals(env);
    let previous_supply = total_supply(env, &totals)?;
    let (next_supply, average_rate) = if previous_supply <= amount {
        (0, 0)
    } else {
        let next_supply = previous_supply - amount;
        let first_term = ray_mul(env, totals.average_rate, wad_to_ray(previous_supply)?)?;
        let second_term = ray_mul(env, position.rate, wad_to_ray(amount)?)?;
        // Rounding across many users can leave the user term above the aggregate.
        if second_term >= first_term {
            (0, 0)
        } else {
            let average = ray_div(env, first_term - second_term, wad_to_ray(next_supply)?)?;
            (next_supply, average)
        }
    };

    if amount == current_balance {
        position = StablePosition::default();
    } else {
        position.principal = current_balance - amount;
        position.last_update = now;
    }
    set_stable_position(env, from, &position);
    set_stable_totals(
        env,
        &StableTotals {
            principal_supply: next_supply,
            average_rate,
            last_update: now,
        },
    );

    StableBurn {
        from: from.clone(),
        amount,
        current_balance,
        balance_increase,
        avg_stable_rate: average_rate,
        new_total_supply: next_supply,
    }
    .publish(env);

    Ok(StableBurnResult {
        total_supply: next_supply,
        average_rate,
    })
}
