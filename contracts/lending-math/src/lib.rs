#![no_std]
//! Fixed-point helpers shared by the lending contracts.
//!
//! Ray values carry 27 decimals, wad values 18 and percentages are basis
//! points. Every multiply-divide widens to `U256` once the `u128` product
//! would overflow, and rounds half up on the magnitude.

mod interest;
mod wad_ray;

pub use interest::{calculate_compounded_interest, calculate_linear_interest};
pub use wad_ray::*;

pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const HALF_WAD: u128 = WAD / 2;
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const HALF_RAY: u128 = RAY / 2;
pub const WAD_RAY_RATIO: u128 = 1_000_000_000;
pub const PERCENTAGE_FACTOR: u128 = 10_000;
pub const HALF_PERCENTAGE_FACTOR: u128 = PERCENTAGE_FACTOR / 2;
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MathError {
    Overflow,
    DivisionByZero,
}

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test;
