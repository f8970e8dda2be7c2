#![no_std]
//! Index-rebasing balances for the lending pool.
//!
//! One contract serves the three balance kinds. `Supply` and `VariableDebt`
//! store principal divided by the reserve index at the time of each update;
//! `StableDebt` stores a principal per user compounded at the user's own
//! rate. Every mutation is gated on the pool.

use soroban_sdk::{Address, Env};

mod contract;
mod errors;
mod events;
mod gauge;
mod stable;
mod storage;

pub use contract::*;
pub use errors::Error;
pub use gauge::WEEK;
pub use storage::{StableBurnResult, StableMintResult, StableSupplyData, TokenKind};

#[soroban_sdk::contractclient(name = "PoolIndexClient")]
pub trait PoolIndexView {
    fn get_normalized_income(env: Env, asset: Address) -> u128;
    fn get_normalized_debt(env: Env, asset: Address) -> u128;
}

/// Relative weight of a gauge for the epoch starting at `time`, as a wad.
#[soroban_sdk::contractclient(name = "GaugeControllerClient")]
pub trait GaugeController {
    fn gauge_relative_weight(env: Env, gauge: Address, time: u64) -> u128;
}
