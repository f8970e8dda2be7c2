use lending_math::{ray_div, ray_mul};
use soroban_sdk::{contract, contractimpl, Address, Env, String};

use crate::errors::Error;
use crate::events::*;
use crate::gauge;
use crate::stable;
use crate::storage::*;
use crate::PoolIndexClient;

#[contract]
pub struct ScaledToken;

#[contractimpl]
impl ScaledToken {
    pub fn initialize(
        env: Env,
        pool: Address,
        underlying: Address,
        kind: TokenKind,
        decimals: u32,
        name: String,
        symbol: String,
    ) -> Result<(), Error> {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Pool) {
            return Err(Error::AlreadyInitialized);
        }
        storage.set(&DataKey::Pool, &pool);
        storage.set(&DataKey::Underlying, &underlying);
        storage.set(&DataKey::Kind, &kind);
        storage.set(
            &DataKey::Metadata,
            &TokenMetadata {
                decimals,
                name,
                symbol,
            },
        );
        storage.set(&DataKey::TotalScaled, &0u128);
        bump_core_ttl(&env);
        Ok(())
    }

    /// Pool only. Returns true when `on_behalf_of` held no balance before.
    pub fn mint(
        env: Env,
        caller: Address,
        user: Address,
        on_behalf_of: Address,
        amount: u128,
        index: u128,
    ) -> Result<bool, Error> {
        require_pool(&env, &caller)?;
        let kind = kind(&env)?;
        if kind == TokenKind::StableDebt {
            return Err(Error::OperationNotSupported);
        }
        if kind == TokenKind::VariableDebt && user != on_behalf_of {
            decrease_borrow_allowance(&env, &on_behalf_of, &user, amount)?;
        }
        mint_scaled(&env, &user, &on_behalf_of, amount, index)
    }

    /// Pool only. Returns true when `from` holds nothing afterwards.
    pub fn burn(
        env: Env,
        caller: Address,
        from: Address,
        amount: u128,
        index: u128,
    ) -> Result<bool, Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? == TokenKind::StableDebt {
            return Err(Error::OperationNotSupported);
        }
        burn_scaled(&env, &from, amount, index)
    }

    pub fn mint_to_treasury(
        env: Env,
        caller: Address,
        treasury: Address,
        amount: u128,
        index: u128,
    ) -> Result<(), Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? != TokenKind::Supply {
            return Err(Error::OperationNotSupported);
        }
        if amount == 0 {
            return Ok(());
        }
        mint_scaled(&env, &treasury, &treasury, amount, index)?;
        Ok(())
    }

    /// Pool only. Moves `amount` of real balance at `index`; both sides
    /// realize their own accrued interest first.
    pub fn transfer(
        env: Env,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
        index: u128,
    ) -> Result<(), Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? != TokenKind::Supply {
            return Err(Error::OperationNotSupported);
        }
        transfer_scaled(&env, &from, &to, amount, index)
    }

    pub fn spend_allowance(
        env: Env,
        caller: Address,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), Error> {
        require_pool(&env, &caller)?;
        let current = allowance(&env, &owner, &spender);
        if current < amount {
            return Err(Error::InsufficientAllowance);
        }
        set_allowance(&env, &owner, &spender, current - amount);
        Ok(())
    }

    pub fn approve(env: Env, owner: Address, spender: Address, amount: u128) -> Result<(), Error> {
        owner.require_auth();
        if kind(&env)? != TokenKind::Supply {
            return Err(Error::OperationNotSupported);
        }
        set_allowance(&env, &owner, &spender, amount);
        Approval {
            owner,
            spender,
            amount,
        }
        .publish(&env);
        Ok(())
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> u128 {
        allowance(&env, &owner, &spender)
    }

    /// Lets `delegatee` open debt of this kind on behalf of `delegator`.
    pub fn approve_delegation(
        env: Env,
        delegator: Address,
        delegatee: Address,
        amount: u128,
    ) -> Result<(), Error> {
        delegator.require_auth();
        if kind(&env)? == TokenKind::Supply {
            return Err(Error::OperationNotSupported);
        }
        set_borrow_allowance(&env, &delegator, &delegatee, amount);
        BorrowAllowanceDelegated {
            from_user: delegator,
            to_user: delegatee,
            amount,
        }
        .publish(&env);
        Ok(())
    }

    pub fn borrow_allowance(env: Env, delegator: Address, delegatee: Address) -> u128 {
        borrow_allowance(&env, &delegator, &delegatee)
    }

    pub fn mint_stable(
        env: Env,
        caller: Address,
        user: Address,
        on_behalf_of: Address,
        amount: u128,
        rate: u128,
    ) -> Result<StableMintResult, Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? != TokenKind::StableDebt {
            return Err(Error::OperationNotSupported);
        }
        if user != on_behalf_of {
            decrease_borrow_allowance(&env, &on_behalf_of, &user, amount)?;
        }
        stable::mint(&env, &user, &on_behalf_of, amount, rate)
    }

    pub fn burn_stable(
        env: Env,
        caller: Address,
        from: Address,
        amount: u128,
    ) -> Result<StableBurnResult, Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? != TokenKind::StableDebt {
            return Err(Error::OperationNotSupported);
        }
        stable::burn(&env, &from, amount)
    }

    /// Real balance. Variable kinds read the live index from the pool, so the
    /// pool itself works with `scaled_balance_of` instead.
    pub fn balance_of(env: Env, user: Address) -> Result<u128, Error> {
        match kind(&env)? {
            TokenKind::StableDebt => stable::balance_of(&env, &user),
            other => {
                let index = current_index(&env, other)?;
                Ok(ray_mul(&env, position(&env, &user).scaled_balance, index)?)
            }
        }
    }

    pub fn total_supply(env: Env) -> Result<u128, Error> {
        match kind(&env)? {
            TokenKind::StableDebt => stable::total_supply(&env, &stable_totals(&env)),
            other => {
                let index = current_index(&env, other)?;
                Ok(ray_mul(&env, total_scaled(&env), index)?)
            }
        }
    }

    pub fn scaled_balance_of(env: Env, user: Address) -> u128 {
        position(&env, &user).scaled_balance
    }

    pub fn scaled_total_supply(env: Env) -> u128 {
        total_scaled(&env)
    }

    pub fn get_scaled_balance_and_supply(env: Env, user: Address) -> (u128, u128) {
        (position(&env, &user).scaled_balance, total_scaled(&env))
    }

    pub fn get_previous_index(env: Env, user: Address) -> u128 {
        position(&env, &user).index
    }

    pub fn get_supply_data(env: Env) -> Result<StableSupplyData, Error> {
        let totals = stable_totals(&env);
        Ok(StableSupplyData {
            principal_supply: totals.principal_supply,
            total_supply: stable::total_supply(&env, &totals)?,
            average_rate: totals.average_rate,
            last_update: totals.last_update,
        })
    }

    pub fn principal_balance_of(env: Env, user: Address) -> u128 {
        stable_position(&env, &user).principal
    }

    pub fn get_user_stable_rate(env: Env, user: Address) -> u128 {
        stable_position(&env, &user).rate
    }

    pub fn get_user_last_updated(env: Env, user: Address) -> u64 {
        stable_position(&env, &user).last_update
    }

    pub fn get_average_stable_rate(env: Env) -> u128 {
        stable_totals(&env).average_rate
    }

    pub fn underlying_asset(env: Env) -> Result<Address, Error> {
        underlying(&env)
    }

    pub fn pool(env: Env) -> Result<Address, Error> {
        pool(&env)
    }

    pub fn kind(env: Env) -> Result<TokenKind, Error> {
        kind(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(metadata(&env)?.decimals)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(metadata(&env)?.symbol)
    }

    // Reward integral

    pub fn set_lending_gauge(env: Env, caller: Address, gauge: Address) -> Result<(), Error> {
        require_pool(&env, &caller)?;
        if kind(&env)? == TokenKind::StableDebt {
            return Err(Error::OperationNotSupported);
        }
        env.storage().persistent().set(&DataKey::LendingGauge, &gauge);
        Ok(())
    }

    pub fn lending_gauge(env: Env) -> Option<Address> {
        lending_gauge(&env)
    }

    /// Lending gauge only. Settles emissions at the old rate, then applies
    /// `side_rate` from now on, weighted per epoch by `controller`.
    pub fn update_rate(
        env: Env,
        caller: Address,
        controller: Address,
        side_rate: u128,
    ) -> Result<(), Error> {
        gauge::require_lending_gauge(&env, &caller)?;
        gauge::set_side_rate(&env, &controller, side_rate)
    }

    pub fn checkpoint(env: Env, caller: Address, user: Address) -> Result<(), Error> {
        gauge::require_lending_gauge(&env, &caller)?;
        gauge::checkpoint_user(&env, &user)
    }

    pub fn update_liquidity_limit(env: Env, caller: Address, user: Address) -> Result<(), Error> {
        gauge::require_lending_gauge(&env, &caller)?;
        gauge::update_liquidity_limit(&env, &user)
    }

    pub fn integrate_fraction(env: Env, user: Address) -> u128 {
        user_gauge(&env, &user).integrate_fraction
    }

    pub fn working_balance(env: Env, user: Address) -> u128 {
        user_gauge(&env, &user).working_balance
    }

    pub fn working_supply(env: Env) -> u128 {
        gauge_state(&env).working_supply
    }

    pub fn side_rate(env: Env) -> u128 {
        gauge_state(&env).side_rate
    }
}

fn current_index(env: &Env, kind: TokenKind) -> Result<u128, Error> {
    let pool = PoolIndexClient::new(env, &pool(env)?);
    let asset = underlying(env)?;
    Ok(match kind {
        TokenKind::Supply => pool.get_normalized_income(&asset),
        _ => pool.get_normalized_debt(&asset),
    })
}

fn decrease_borrow_allowance(
    env: &Env,
    delegator: &Address,
    delegatee: &Address,
    amount: u128,
) -> Result<(), Error> {
    let current = borrow_allowance(env, delegator, delegatee);
    if current < amount {
        return Err(Error::InsufficientBorrowAllowance);
    }
    let remaining = current - amount;
    set_borrow_allowance(env, delegator, delegatee, remaining);
    BorrowAllowanceDelegated {
        from_user: delegator.clone(),
        to_user: delegatee.clone(),
        amount: remaining,
    }
    .publish(env);
    Ok(())
}

fn mint_scaled(
    env: &Env,
    caller: &Address,
    on_behalf_of: &Address,
    amount: u128,
    index: u128,
) -> Result<bool, Error> {
    let amount_scaled = ray_div(env, amount, index)?;
    if amount_scaled == 0 {
        return Err(Error::InvalidMintAmount);
    }
    gauge::checkpoint_user(env, on_behalf_of)?;

    let mut position = position(env, on_behalf_of);
    let previous_scaled = position.scaled_balance;
    let balance_increase = ray_mul(env, previous_scaled, index)?
        .saturating_sub(ray_mul(env, previous_scaled, position.index)?);

    position.index = index;
    position.scaled_balance = previous_scaled
        .checked_add(amount_scaled)
        .ok_or(Error::Overflow)?;
    set_position(env, on_behalf_of, &position);
    let total = total_scaled(env)
        .checked_add(amount_scaled)
        .ok_or(Error::Overflow)?;
    set_total_scaled(env, total);
    gauge::update_liquidity_limit(env, on_behalf_of)?;

    Mint {
        caller: caller.clone(),
        on_behalf_of: on_behalf_of.clone(),
        value: amount.checked_add(balance_increase).ok_or(Error::Overflow)?,
        balance_increase,
        index,
    }
    .publish(env);
    Ok(previous_scaled == 0)
}

fn burn_scaled(env: &Env, from: &Address, amount: u128, index: u128) -> Result<bool, Error> {
    let amount_scaled = ray_div(env, amount, index)?;
    if amount_scaled == 0 {
        return Err(Error::InvalidBurnAmount);
    }
    gauge::checkpoint_user(env, from)?;

    let mut position = position(env, from);
    let previous_scaled = position.scaled_balance;
    if amount_scaled > previous_scaled {
        return Err(Error::NotEnoughBalance);
    }
    let balance_increase = ray_mul(env, previous_scaled, index)?
        .saturating_sub(ray_mul(env, previous_scaled, position.index)?);

    position.index = index;
    position.scaled_balance = previous_scaled - amount_scaled;
    set_position(env, from, &position);
    set_total_scaled(env, total_scaled(env).saturating_sub(amount_scaled));
    gauge::update_liquidity_limit(env, from)?;

    if balance_increase > amount {
        let value = balance_increase - amount;
        Mint {
            caller: from.clone(),
            on_behalf_of: from.clone(),
            value,
            balance_increase,
            index,
        }
        .publish(env);
    } else {
        Burn {
            from: from.clone(),
            value: amount - balance_increase,
            balance_increase,
            index,
        }
        .publish(env);
    }
    Ok(position.scaled_balance == 0)
}

fn transfer_scaled(
    env: &Env,
    from: &Address,
    to: &Address,
    amount: u128,
    index: u128,
) -> Result<(), Error> {
    let amount_scaled = ray_div(env, amount, index)?;
    gauge::checkpoint_user(env, from)?;
    if from != to {
        gauge::checkpoint_user(env, to)?;
    }

    let mut sender = position(env, from);
    if amount_scaled > sender.scaled_balance {
        return Err(Error::NotEnoughBalance);
    }
    let sender_increase = ray_mul(env, sender.scaled_balance, index)?
        .saturating_sub(ray_mul(env, sender.scaled_balance, sender.index)?);
    sender.index = index;
    sender.scaled_balance -= amount_scaled;
    set_position(env, from, &sender);

    let mut recipient = position(env, to);
    let recipient_increase = if from != to {
        ray_mul(env, recipient.scaled_balance, index)?
            .saturating_sub(ray_mul(env, recipient.scaled_balance, recipient.index)?)
    } else {
        0
    };
    recipient.index = index;
    recipient.scaled_balance = recipient
        .scaled_balance
        .checked_add(amount_scaled)
        .ok_or(Error::Overflow)?;
    set_position(env, to, &recipient);

    gauge::update_liquidity_limit(env, from)?;
    if from != to {
        gauge::update_liquidity_limit(env, to)?;
    }

    if sender_increase > 0 {
        Mint {
            caller: from.clone(),
            on_behalf_of: from.clone(),
            value: sender_increase,
            balance_increase: sender_increase,
            index,
        }
        .publish(env);
    }
    if recipient_increase > 0 {
        Mint {
            caller: from.clone(),
            on_behalf_of: to.clone(),
            value: recipient_increase,
            balance_increase: recipient_increase,
            index,
        }
        .publish(env);
    }
    BalanceTransfer {
        from: from.clone(),
        to: to.clone(),
        value: amount,
        index,
    }
    .publish(env);
    Ok(())
}
