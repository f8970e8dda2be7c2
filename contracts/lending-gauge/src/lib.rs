#![no_std]
//! Splits a reserve's reward emissions between its suppliers and borrowers.
//!
//! The borrow share follows a piecewise-linear curve of utilization. The
//! pool reports utilization after every balance change; the gauge turns it
//! into per-second side rates that the supply and variable-debt tokens
//! integrate per user.

use soroban_sdk::{Address, Env};

mod contract;
mod errors;
mod events;
mod phases;
mod storage;

pub use contract::*;
pub use errors::Error;
pub use phases::PHASES_LENGTH;
pub use storage::Phase;

#[soroban_sdk::contractclient(name = "GaugedTokenClient")]
pub trait GaugedToken {
    fn update_rate(env: Env, caller: Address, controller: Address, side_rate: u128);
    fn checkpoint(env: Env, caller: Address, user: Address);
    fn update_liquidity_limit(env: Env, caller: Address, user: Address);
    fn integrate_fraction(env: Env, user: Address) -> u128;
}

mod test;
