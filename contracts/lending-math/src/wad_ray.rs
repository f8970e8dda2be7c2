use soroban_sdk::{Env, U256};

use crate::{
    MathError, HALF_PERCENTAGE_FACTOR, HALF_RAY, HALF_WAD, PERCENTAGE_FACTOR, RAY, WAD,
    WAD_RAY_RATIO,
};

/// (a * b + addend) / denom, widened to 256 bits when the product overflows.
pub fn mul_add_div(
    env: &Env,
    a: u128,
    b: u128,
    addend: u128,
    denom: u128,
) -> Result<u128, MathError> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    if let Some(product) = a.checked_mul(b) {
        if let Some(sum) = product.checked_add(addend) {
            return Ok(sum / denom);
        }
    }
    let wide = U256::from_u128(env, a)
        .mul(&U256::from_u128(env, b))
        .add(&U256::from_u128(env, addend))
        .div(&U256::from_u128(env, denom));
    wide.to_u128().ok_or(MathError::Overflow)
}

pub fn mul_div(env: &Env, a: u128, b: u128, denom: u128) -> Result<u128, MathError> {
    mul_add_div(env, a, b, 0, denom)
}

pub fn mul_div_up(env: &Env, a: u128, b: u128, denom: u128) -> Result<u128, MathError> {
    if denom == 0 {
        return Err(MathError::DivisionByZero);
    }
    mul_add_div(env, a, b, denom - 1, denom)
}

pub fn ray_mul(env: &Env, a: u128, b: u128) -> Result<u128, MathError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    mul_add_div(env, a, b, HALF_RAY, RAY)
}

pub fn ray_div(env: &Env, a: u128, b: u128) -> Result<u128, MathError> {
    if b == 0 {
        return Err(MathError::DivisionByZero);
    }
    mul_add_div(env, a, RAY, b / 2, b)
}

pub fn wad_mul(env: &Env, a: u128, b: u128) -> Result<u128, MathError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    mul_add_div(env, a, b, HALF_WAD, WAD)
}

pub fn wad_div(env: &Env, a: u128, b: u128) -> Result<u128, MathError> {
    if b == 0 {
        return Err(MathError::DivisionByZero);
    }
    mul_add_div(env, a, WAD, b / 2, b)
}

pub fn ray_to_wad(a: u128) -> Result<u128, MathError> {
    a.checked_add(WAD_RAY_RATIO / 2)
        .map(|v| v / WAD_RAY_RATIO)
        .ok_or(MathError::Overflow)
}

pub fn wad_to_ray(a: u128) -> Result<u128, MathError> {
    a.checked_mul(WAD_RAY_RATIO).ok_or(MathError::Overflow)
}

/// `percentage` is in basis points (10_000 = 100%).
pub fn percent_mul(env: &Env, value: u128, percentage: u128) -> Result<u128, MathError> {
    if value == 0 || percentage == 0 {
        return Ok(0);
    }
    mul_add_div(env, value, percentage, HALF_PERCENTAGE_FACTOR, PERCENTAGE_FACTOR)
}

pub fn percent_div(env: &Env, value: u128, percentage: u128) -> Result<u128, MathError> {
    if percentage == 0 {
        return Err(MathError::DivisionByZero);
    }
    mul_add_div(env, value, PERCENTAGE_FACTOR, percentage / 2, percentage)
}

/// Signed ray multiply used by piecewise-linear curves. Rounds half up on
/// the magnitude and reapplies the sign.
pub fn signed_ray_mul(env: &Env, a: i128, b: u128) -> Result<i128, MathError> {
    let magnitude = ray_mul(env, a.unsigned_abs(), b)?;
    let signed = i128::try_from(magnitude).map_err(|_| MathError::Overflow)?;
    Ok(if a < 0 { -signed } else { signed })
}
