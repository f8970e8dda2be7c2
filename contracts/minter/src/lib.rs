#![no_std]
//! Pays out lending-gauge rewards in a Stellar asset.
//!
//! Gauges only keep a running total of what each user has earned. The minter
//! remembers how much of that total it already paid per (user, gauge) pair
//! and mints the difference on claim. Only gauges listed by the admin are
//! paid.

use soroban_sdk::{Address, Env};

mod contract;
mod errors;
mod events;
mod storage;

pub use contract::*;
pub use errors::Error;

#[soroban_sdk::contractclient(name = "RewardGaugeClient")]
pub trait RewardGauge {
    fn user_checkpoint(env: Env, user: Address);
    fn integrate_fraction(env: Env, user: Address) -> u128;
}

mod test;
