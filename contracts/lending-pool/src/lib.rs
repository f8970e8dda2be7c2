#![no_std]
//! Over-collateralized lending pool.
//!
//! The pool is the single writer of reserve state: it accrues indexes,
//! drives the scaled balance tokens, enforces isolation mode and health
//! factors, and settles liquidations and flash loans. Collaborators are
//! reached through the client traits in [`clients`].

mod borrow;
pub mod clients;
mod constants;
mod contract;
mod errors;
mod events;
mod flashloan;
mod generic;
mod helpers;
mod isolation;
mod liquidation;
mod reserve;
mod storage;
mod supply;
mod user_config;
mod validation;

pub use contract::*;
pub use errors::Error;
pub use storage::{
    LiquidationPolicy, ReserveConfig, ReserveData, UserAccountData, UserConfiguration,
};
