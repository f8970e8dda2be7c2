use lending_math::{mul_div, mul_div_up, percent_mul, ray_div, ray_mul, MathError};
use soroban_sdk::{Address, Env};

use crate::clients::ReserveTokenClient;
use crate::errors::Error;
use crate::helpers::{asset_price, asset_unit};
use crate::reserve::{normalized_debt, normalized_income};
use crate::storage::{reserve, reserves_list, UserAccountData, UserConfiguration};

/// Aggregates every collateral and debt position of `user` in base
/// currency. Collateral values round down and debt values round up.
pub(crate) fn calculate_user_account_data(
    env: &Env,
    user: &Address,
    config: &UserConfiguration,
) -> Result<UserAccountData, Error> {
    if config.is_empty() {
        return Ok(UserAccountData {
            total_collateral_base: 0,
            total_debt_base: 0,
            available_borrows_base: 0,
            current_liquidation_threshold: 0,
            ltv: 0,
            health_factor: u128::MAX,
        });
    }

    let reserves = reserves_list(env);
    let mut total_collateral: u128 = 0;
    let mut total_debt: u128 = 0;
    let mut weighted_ltv: u128 = 0;
    let mut weighted_threshold: u128 = 0;

    for (id, asset) in reserves.iter().enumerate() {
        let id = id as u32;
        if !config.is_using_as_collateral_or_borrowing(id) {
            continue;
        }
        let data = reserve(env, &asset)?;
        let unit = asset_unit(data.configuration.decimals)?;
        let price = asset_price(env, &asset)?;

        if config.is_using_as_collateral(id) && data.configuration.liquidation_threshold != 0 {
            let scaled = ReserveTokenClient::new(env, &data.h_token).scaled_balance_of(user);
            let balance = ray_mul(env, scaled, normalized_income(env, &data)?)?;
            let value = mul_div(env, balance, price, unit)?;
            total_collateral = total_collateral.checked_add(value).ok_or(Error::Overflow)?;
            if data.configuration.ltv != 0 {
                weighted_ltv = value
                    .checked_mul(data.configuration.ltv as u128)
                    .and_then(|v| v.checked_add(weighted_ltv))
                    .ok_or(Error::Overflow)?;
            }
            weighted_threshold = value
                .checked_mul(data.configuration.liquidation_threshold as u128)
                .and_then(|v| v.checked_add(weighted_threshold))
                .ok_or(Error::Overflow)?;
        }

        if config.is_borrowing(id) {
            let scaled =
                ReserveTokenClient::new(env, &data.variable_debt_token).scaled_balance_of(user);
            let variable = ray_mul(env, scaled, normalized_debt(env, &data)?)?;
            let stable = ReserveTokenClient::new(env, &data.stable_debt_token).balance_of(user);
            let debt = variable.checked_add(stable).ok_or(Error::Overflow)?;
            let value = mul_div_up(env, debt, price, unit)?;
            total_debt = total_debt.checked_add(value).ok_or(Error::Overflow)?;
        }
    }

    let (ltv, threshold) = if total_collateral == 0 {
        (0, 0)
    } else {
        (weighted_ltv / total_collateral, weighted_threshold / total_collateral)
    };
    let health_factor = if total_debt == 0 {
        u128::MAX
    } else {
        // Dust debt against large collateral exceeds the ray range.
        match ray_div(env, percent_mul(env, total_collateral, threshold)?, total_debt) {
            Err(MathError::Overflow) => u128::MAX,
            other => other?,
        }
    };
    let available_borrows_base =
        percent_mul(env, total_collateral, ltv)?.saturating_sub(total_debt);

    Ok(UserAccountData {
        total_collateral_base: total_collateral,
        total_debt_base: total_debt,
        available_borrows_base,
        current_liquidation_threshold: threshold,
        ltv,
        health_factor,
    })
}
