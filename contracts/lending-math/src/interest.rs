use soroban_sdk::Env;

use crate::{mul_div, ray_mul, MathError, RAY, SECONDS_PER_YEAR};

/// Simple interest over `[last_update, now]` as a ray multiplier.
pub fn calculate_linear_interest(
    env: &Env,
    rate: u128,
    last_update: u64,
    now: u64,
) -> Result<u128, MathError> {
    let elapsed = now.saturating_sub(last_update) as u128;
    let accrued = mul_div(env, rate, elapsed, SECONDS_PER_YEAR as u128)?;
    RAY.checked_add(accrued).ok_or(MathError::Overflow)
}

/// Per-second compounding approximated by the first three terms of the
/// binomial expansion of `(1 + rate / year)^elapsed`.
pub fn calculate_compounded_interest(
    env: &Env,
    rate: u128,
    last_update: u64,
    now: u64,
) -> Result<u128, MathError> {
    let exp = now.saturating_sub(last_update) as u128;
    if exp == 0 {
        return Ok(RAY);
    }
    let exp_minus_one = exp - 1;
    let exp_minus_two = exp.saturating_sub(2);
    let year = SECONDS_PER_YEAR as u128;

    let base_power_two = ray_mul(env, rate, rate)? / (year * year);
    let base_power_three = ray_mul(env, base_power_two, rate)? / year;

    let second_term = exp
        .checked_mul(exp_minus_one)
        .and_then(|v| v.checked_mul(base_power_two))
        .ok_or(MathError::Overflow)?
        / 2;
    let third_term = exp
        .checked_mul(exp_minus_one)
        .and_then(|v| v.checked_mul(exp_minus_two))
        .and_then(|v| v.checked_mul(base_power_three))
        .ok_or(MathError::Overflow)?
        / 6;

    let first_term = mul_div(env, rate, exp, year)?;
    RAY.checked_add(first_term)
        .and_then(|v| v.checked_add(second_term))
        .and_then(|v| v.checked_add(third_term))
        .ok_or(MathError::Overflow)
}
