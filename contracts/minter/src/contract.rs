use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

use crate::errors::Error;
use crate::events::{GaugeListed, MintApprovalToggled, Minted};
use crate::storage::*;
use crate::RewardGaugeClient;

#[contract]
pub struct Minter;

fn ensure_initialized(env: &Env) -> Result<(), Error> {
    if !is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    bump_core_ttl(env);
    Ok(())
}

/// Checkpoints `user` on `gauge` and mints whatever they earned since the
/// last payout. Returns the amount minted now. Only listed gauges are paid.
fn mint_for_user(env: &Env, user: &Address, gauge: &Address) -> Result<u128, Error> {
    if !is_gauge_listed(env, gauge) {
        return Err(Error::GaugeNotAdded);
    }
    let client = RewardGaugeClient::new(env, gauge);
    client.user_checkpoint(user);
    let total = client.integrate_fraction(user);
    let already = minted(env, user, gauge);
    let to_mint = total.saturating_sub(already);
    if to_mint == 0 {
        return Ok(0);
    }

    let amount = i128::try_from(to_mint).map_err(|_| Error::Overflow)?;
    token::StellarAssetClient::new(env, &reward_token(env)?).mint(user, &amount);
    set_minted(env, user, gauge, total);
    Minted {
        user: user.clone(),
        gauge: gauge.clone(),
        minted: total,
    }
    .publish(env);
    Ok(to_mint)
}

#[contractimpl]
impl Minter {
    pub fn initialize(env: Env, admin: Address, reward_token: Address) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        let storage = env.storage().persistent();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::RewardToken, &reward_token);
        bump_core_ttl(&env);
        Ok(())
    }

    /// Adds or removes `gauge` from the set whose rewards may be minted.
    pub fn set_gauge(env: Env, admin: Address, gauge: Address, listed: bool) -> Result<(), Error> {
        ensure_initialized(&env)?;
        if crate::storage::admin(&env)? != admin {
            return Err(Error::CallerNotAdmin);
        }
        admin.require_auth();
        set_gauge_listed(&env, &gauge, listed);
        GaugeListed { gauge, listed }.publish(&env);
        Ok(())
    }

    pub fn is_gauge_listed(env: Env, gauge: Address) -> bool {
        is_gauge_listed(&env, &gauge)
    }

    pub fn mint(env: Env, user: Address, gauge: Address) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        mint_for_user(&env, &user, &gauge)
    }

    pub fn mint_many(env: Env, user: Address, gauges: Vec<Address>) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let mut total = 0u128;
        for gauge in gauges.iter() {
            total = total
                .checked_add(mint_for_user(&env, &user, &gauge)?)
                .ok_or(Error::Overflow)?;
        }
        Ok(total)
    }

    /// Claims on behalf of `user`; the rewards still go to `user`.
    pub fn mint_for(
        env: Env,
        minter: Address,
        user: Address,
        gauge: Address,
    ) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        minter.require_auth();
        if !is_mint_approved(&env, &minter, &user) {
            return Err(Error::MintNotAllowed);
        }
        mint_for_user(&env, &user, &gauge)
    }

    pub fn toggle_approve_mint(env: Env, user: Address, minter: Address) -> Result<bool, Error> {
        ensure_initialized(&env)?;
        user.require_auth();
        let approved = !is_mint_approved(&env, &minter, &user);
        set_mint_approved(&env, &minter, &user, approved);
        MintApprovalToggled {
            user,
            minter,
            approved,
        }
        .publish(&env);
        Ok(approved)
    }

    pub fn is_mint_approved(env: Env, minter: Address, user: Address) -> bool {
        is_mint_approved(&env, &minter, &user)
    }

    pub fn minted(env: Env, user: Address, gauge: Address) -> u128 {
        minted(&env, &user, &gauge)
    }

    pub fn reward_token(env: Env) -> Result<Address, Error> {
        reward_token(&env)
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        admin(&env)
    }
}
