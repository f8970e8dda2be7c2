use lending_math::{ray_div, ray_mul, RAY, WAD};
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use crate::errors::Error;
use crate::events::*;
use crate::phases::{evaluate, validate_phases};
use crate::storage::*;
use crate::GaugedTokenClient;

#[contract]
pub struct LendingGauge;

fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    if admin(env)? != *caller {
        return Err(Error::CallerNotPoolAdmin);
    }
    caller.require_auth();
    Ok(())
}

/// Splits the emission rate between the two tokens by the stored
/// allocation. The tokens apply the controller weight per epoch themselves.
fn push_rates(env: &Env) -> Result<(), Error> {
    let gauge = env.current_contract_address();
    let controller = controller(env)?;
    let total = emission_rate(env)
        .checked_mul(WAD)
        .ok_or(Error::Overflow)?;
    let borrow_side = ray_mul(env, total, borrow_allocation(env))?;
    let supply_side = total - borrow_side.min(total);
    GaugedTokenClient::new(env, &h_token(env)?).update_rate(&gauge, &controller, &supply_side);
    GaugedTokenClient::new(env, &variable_debt_token(env)?).update_rate(
        &gauge,
        &controller,
        &borrow_side,
    );
    Ok(())
}

#[contractimpl]
impl LendingGauge {
    pub fn initialize(
        env: Env,
        admin: Address,
        pool: Address,
        h_token: Address,
        variable_debt_token: Address,
        controller: Address,
    ) -> Result<(), Error> {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Pool, &pool);
        storage.set(&DataKey::HToken, &h_token);
        storage.set(&DataKey::VariableDebtToken, &variable_debt_token);
        storage.set(&DataKey::Controller, &controller);
        set_emission_rate(&env, 0);
        set_borrow_allocation(&env, 0);
        bump_core_ttl(&env);
        Ok(())
    }

    /// Reward units per second before weighting. Accrual up to now uses
    /// the previous rate.
    pub fn set_emission_rate(env: Env, admin: Address, rate_per_second: u128) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        set_emission_rate(&env, rate_per_second);
        push_rates(&env)?;
        EmissionRateUpdated { rate_per_second }.publish(&env);
        Ok(())
    }

    pub fn add_phases(env: Env, admin: Address, phases: Vec<Phase>) -> Result<(), Error> {
        require_admin(&env, &admin)?;
        validate_phases(&phases)?;
        set_phases(&env, &phases);
        AddPhases { phases }.publish(&env);
        Ok(())
    }

    pub fn get_phases(env: Env) -> Vec<Phase> {
        phases(&env)
    }

    pub fn borrow_allocation(env: Env) -> u128 {
        borrow_allocation(&env)
    }

    pub fn evaluate(env: Env, utilization: u128) -> Result<u128, Error> {
        evaluate(&env, &phases(&env), utilization)
    }

    /// Pool hook, called after every balance change of the reserve.
    pub fn update_allocation(
        env: Env,
        caller: Address,
        total_debt: u128,
        total_supply: u128,
    ) -> Result<(), Error> {
        if pool(&env)? != caller {
            return Err(Error::CallerMustBePool);
        }
        caller.require_auth();
        bump_core_ttl(&env);
        let utilization = if total_supply == 0 {
            0
        } else {
            ray_div(&env, total_debt, total_supply)?.min(RAY)
        };
        let allocation = evaluate(&env, &phases(&env), utilization)?;
        set_borrow_allocation(&env, allocation);
        push_rates(&env)?;
        UpdateAllocation {
            total_debt,
            total_supply,
            utilization,
            borrow_allocation: allocation,
        }
        .publish(&env);
        Ok(())
    }

    /// Settles `user`'s rewards on both sides up to now and refreshes their
    /// working balances.
    pub fn user_checkpoint(env: Env, user: Address) -> Result<(), Error> {
        bump_core_ttl(&env);
        push_rates(&env)?;
        let gauge = env.current_contract_address();
        let mut total = 0u128;
        for token in [h_token(&env)?, variable_debt_token(&env)?] {
            let client = GaugedTokenClient::new(&env, &token);
            client.checkpoint(&gauge, &user);
            client.update_liquidity_limit(&gauge, &user);
            total = total
                .checked_add(client.integrate_fraction(&user))
                .ok_or(Error::Overflow)?;
        }
        UserCheckpoint {
            user,
            integrate_fraction: total,
        }
        .publish(&env);
        Ok(())
    }

    /// Cumulative rewards earned by `user` as of their last checkpoint.
    pub fn integrate_fraction(env: Env, user: Address) -> Result<u128, Error> {
        let supply = GaugedTokenClient::new(&env, &h_token(&env)?).integrate_fraction(&user);
        let borrow =
            GaugedTokenClient::new(&env, &variable_debt_token(&env)?).integrate_fraction(&user);
        supply.checked_add(borrow).ok_or(Error::Overflow)
    }

    pub fn emission_rate(env: Env) -> u128 {
        emission_rate(&env)
    }

    pub fn pool(env: Env) -> Result<Address, Error> {
        pool(&env)
    }
}
