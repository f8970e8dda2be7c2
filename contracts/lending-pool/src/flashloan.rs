use lending_math::{percent_mul, ray_div, ray_mul};
use soroban_sdk::{log, Address, Bytes, Env, Vec};

use crate::borrow::{execute_borrow, BorrowParams};
use crate::clients::{FlashLoanReceiverClient, ReserveTokenClient};
use crate::constants::*;
use crate::errors::Error;
use crate::events::FlashLoan;
use crate::helpers::*;
use crate::reserve::{
    cumulate_to_liquidity_index, update_interest_rates, update_state, ReserveCache,
};
use crate::storage::{flash_loan_premiums, is_flash_borrower};
use crate::validation::validate_flash_loan;

pub(crate) struct FlashLoanParams {
    pub initiator: Address,
    pub receiver: Address,
    pub assets: Vec<Address>,
    pub amounts: Vec<u128>,
    pub modes: Vec<u32>,
    pub on_behalf_of: Address,
    pub params: Bytes,
}

/// Lends every asset to `receiver`, runs its callback and then settles each
/// leg: mode 0 must come back with the premium, modes 1 and 2 stay out as
/// debt of `on_behalf_of`.
pub(crate) fn execute_flash_loan(env: &Env, p: &FlashLoanParams) -> Result<(), Error> {
    validate_flash_loan(env, &p.assets, &p.amounts, &p.modes)?;
    for mode in p.modes.iter() {
        if mode != RATE_MODE_NONE && mode != RATE_MODE_STABLE && mode != RATE_MODE_VARIABLE {
            return Err(Error::InvalidInterestRateModeSelected);
        }
    }

    let (premium_total, premium_to_protocol) = if is_flash_borrower(env, &p.initiator) {
        (0, 0)
    } else {
        flash_loan_premiums(env)
    };

    let mut premiums = Vec::new(env);
    let mut balances_before = Vec::new(env);
    for i in 0..p.assets.len() {
        let asset = p.assets.get_unchecked(i);
        let amount = p.amounts.get_unchecked(i);
        let premium = if p.modes.get_unchecked(i) == RATE_MODE_NONE {
            percent_mul(env, amount, premium_total as u128)?
        } else {
            0
        };
        premiums.push_back(premium);
        balances_before.push_back(pool_balance(env, &asset));
        push_underlying(env, &asset, &p.receiver, amount)?;
    }

    let ok = FlashLoanReceiverClient::new(env, &p.receiver).execute_operation(
        &p.assets,
        &p.amounts,
        &premiums,
        &p.initiator,
        &p.params,
    );
    if !ok {
        return Err(Error::InvalidFlashloanExecutorReturn);
    }

    for i in 0..p.assets.len() {
        let asset = p.assets.get_unchecked(i);
        let amount = p.amounts.get_unchecked(i);
        let mode = p.modes.get_unchecked(i);
        let premium = premiums.get_unchecked(i);
        if mode == RATE_MODE_NONE {
            let expected = balances_before
                .get_unchecked(i)
                .checked_add(premium)
                .ok_or(Error::Overflow)?;
            let balance_after = pool_balance(env, &asset);
            if balance_after < expected {
                log!(env, "flash loan shortfall", asset.clone(), expected - balance_after);
                return Err(Error::FlashLoanNotRepaid);
            }
            settle_repayment(env, &asset, premium, premium_to_protocol)?;
        } else {
            execute_borrow(
                env,
                &BorrowParams {
                    user: p.initiator.clone(),
                    asset: asset.clone(),
                    amount,
                    rate_mode: mode,
                    on_behalf_of: p.on_behalf_of.clone(),
                    release_underlying: false,
                },
            )?;
        }
        FlashLoan {
            target: p.receiver.clone(),
            asset,
            initiator: p.initiator.clone(),
            amount,
            interest_rate_mode: mode,
            premium,
        }
        .publish(env);
    }
    Ok(())
}

/// The LP share of the premium raises the liquidity index; the protocol
/// share is booked for the treasury.
fn settle_repayment(
    env: &Env,
    asset: &Address,
    premium: u128,
    premium_to_protocol_bps: u32,
) -> Result<(), Error> {
    let mut cache = ReserveCache::load(env, asset)?;
    update_state(env, &mut cache)?;

    let to_protocol = percent_mul(env, premium, premium_to_protocol_bps as u128)?;
    let to_lp = premium - to_protocol;
    let scaled_supply = ReserveTokenClient::new(env, &cache.data.h_token).scaled_total_supply();
    let total_liquidity = ray_mul(env, scaled_supply, cache.next_liquidity_index)?
        .checked_add(ray_mul(
            env,
            cache.data.accrued_to_treasury,
            cache.next_liquidity_index,
        )?)
        .ok_or(Error::Overflow)?;
    cumulate_to_liquidity_index(env, &mut cache, total_liquidity, to_lp)?;

    if to_protocol != 0 {
        cache.data.accrued_to_treasury = cache
            .data
            .accrued_to_treasury
            .checked_add(ray_div(env, to_protocol, cache.next_liquidity_index)?)
            .ok_or(Error::Overflow)?;
    }
    // The repayment is already in the pool balance.
    update_interest_rates(env, &mut cache, 0, 0)?;
    cache.store(env);
    notify_gauge(env, &cache)
}
