use lending_math::RAY;
use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, Vec};

use crate::borrow::{execute_borrow, execute_repay, BorrowParams, RepayParams};
use crate::clients::ReserveTokenClient;
use crate::constants::*;
use crate::errors::Error;
use crate::events::*;
use crate::flashloan::{execute_flash_loan, FlashLoanParams};
use crate::generic::calculate_user_account_data;
use crate::isolation;
use crate::liquidation::{execute_liquidation_call, LiquidationParams};
use crate::reserve::{
    normalized_debt, normalized_income, update_interest_rates, update_state, ReserveCache,
};
use crate::storage::*;
use crate::supply::*;
use crate::validation::validate_reserve_config;

#[contract]
pub struct LendingPool;

fn ensure_initialized(env: &Env) -> Result<(), Error> {
    if !is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    bump_core_ttl(env);
    Ok(())
}

fn publish_config(env: &Env, asset: &Address, config: &ReserveConfig) {
    ReserveConfigChanged {
        asset: asset.clone(),
        ltv: config.ltv,
        liquidation_threshold: config.liquidation_threshold,
        liquidation_bonus: config.liquidation_bonus,
        reserve_factor: config.reserve_factor,
        is_active: config.is_active,
        is_frozen: config.is_frozen,
        is_paused: config.is_paused,
    }
    .publish(env);
}

fn has_suppliers(env: &Env, data: &ReserveData) -> bool {
    data.accrued_to_treasury != 0
        || ReserveTokenClient::new(env, &data.h_token).scaled_total_supply() != 0
}

#[contractimpl]
impl LendingPool {
    pub fn initialize(
        env: Env,
        admin: Address,
        oracle: Address,
        treasury: Address,
    ) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        set_admin(&env, &admin);
        set_oracle(&env, &oracle);
        set_treasury(&env, &treasury);
        set_reserves_list(&env, &Vec::new(&env));
        set_flash_loan_premiums(
            &env,
            DEFAULT_FLASH_LOAN_PREMIUM_TOTAL,
            DEFAULT_FLASH_LOAN_PREMIUM_TO_PROTOCOL,
        );
        set_liquidation_policy(&env, &LiquidationPolicy::default());
        bump_core_ttl(&env);
        Ok(())
    }

    // ---- Reserve listing and risk configuration ----

    pub fn init_reserve(
        env: Env,
        admin: Address,
        asset: Address,
        h_token: Address,
        stable_debt_token: Address,
        variable_debt_token: Address,
        interest_rate_strategy: Address,
        config: ReserveConfig,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        if has_reserve(&env, &asset) {
            return Err(Error::ReserveAlreadyInitialized);
        }
        validate_reserve_config(&config)?;
        let mut list = reserves_list(&env);
        if list.len() >= MAX_RESERVES {
            return Err(Error::NoMoreReservesAllowed);
        }
        let id = list.len();
        list.push_back(asset.clone());
        set_reserves_list(&env, &list);

        let data = ReserveData {
            id,
            configuration: config.clone(),
            liquidity_index: RAY,
            variable_borrow_index: RAY,
            current_liquidity_rate: 0,
            current_variable_borrow_rate: 0,
            current_stable_borrow_rate: 0,
            last_update_timestamp: env.ledger().timestamp(),
            accrued_to_treasury: 0,
            isolation_mode_total_debt: 0,
            h_token: h_token.clone(),
            stable_debt_token: stable_debt_token.clone(),
            variable_debt_token: variable_debt_token.clone(),
            interest_rate_strategy: interest_rate_strategy.clone(),
            lending_gauge: None,
        };
        set_reserve(&env, &asset, &data);
        ReserveInitialized {
            asset: asset.clone(),
            id,
            h_token,
            stable_debt_token,
            variable_debt_token,
            interest_rate_strategy,
        }
        .publish(&env);
        publish_config(&env, &asset, &config);
        Ok(())
    }

    /// Replaces the risk parameters. The debt ceiling goes through the same
    /// checks as `set_debt_ceiling`.
    pub fn set_reserve_config(
        env: Env,
        caller: Address,
        asset: Address,
        config: ReserveConfig,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        validate_reserve_config(&config)?;
        let mut cache = ReserveCache::load(&env, &asset)?;
        update_state(&env, &mut cache)?;
        let old_ceiling = cache.data.configuration.debt_ceiling;
        cache.data.configuration = ReserveConfig {
            debt_ceiling: old_ceiling,
            ..config.clone()
        };
        update_interest_rates(&env, &mut cache, 0, 0)?;
        cache.store(&env);
        if config.debt_ceiling != old_ceiling {
            isolation::set_debt_ceiling(&env, &asset, config.debt_ceiling)?;
        }
        publish_config(&env, &asset, &config);
        Ok(())
    }

    /// Accrues at the old factor before switching.
    pub fn set_reserve_factor(
        env: Env,
        caller: Address,
        asset: Address,
        reserve_factor: u32,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        if reserve_factor > PERCENTAGE_FACTOR_BPS {
            return Err(Error::InvalidReserveParams);
        }
        let mut cache = ReserveCache::load(&env, &asset)?;
        update_state(&env, &mut cache)?;
        cache.data.configuration.reserve_factor = reserve_factor;
        update_interest_rates(&env, &mut cache, 0, 0)?;
        cache.store(&env);
        publish_config(&env, &asset, &cache.data.configuration);
        Ok(())
    }

    pub fn set_debt_ceiling(
        env: Env,
        caller: Address,
        asset: Address,
        debt_ceiling: u128,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        isolation::set_debt_ceiling(&env, &asset, debt_ceiling)
    }

    pub fn set_borrowable_in_isolation(
        env: Env,
        caller: Address,
        asset: Address,
        borrowable: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        let mut data = reserve(&env, &asset)?;
        data.configuration.borrowable_in_isolation = borrowable;
        set_reserve(&env, &asset, &data);
        publish_config(&env, &asset, &data.configuration);
        Ok(())
    }

    pub fn set_liquidation_protocol_fee(
        env: Env,
        caller: Address,
        asset: Address,
        fee: u32,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        if fee > PERCENTAGE_FACTOR_BPS {
            return Err(Error::InvalidReserveParams);
        }
        let mut data = reserve(&env, &asset)?;
        data.configuration.liquidation_protocol_fee = fee;
        set_reserve(&env, &asset, &data);
        publish_config(&env, &asset, &data.configuration);
        Ok(())
    }

    /// Deactivating a reserve requires that nobody supplies it.
    pub fn set_reserve_flags(
        env: Env,
        admin: Address,
        asset: Address,
        is_active: bool,
        is_frozen: bool,
        is_paused: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        let mut data = reserve(&env, &asset)?;
        if !is_active && data.configuration.is_active && has_suppliers(&env, &data) {
            return Err(Error::ReserveLiquidityNotZero);
        }
        data.configuration.is_active = is_active;
        data.configuration.is_frozen = is_frozen;
        data.configuration.is_paused = is_paused;
        set_reserve(&env, &asset, &data);
        publish_config(&env, &asset, &data.configuration);
        Ok(())
    }

    /// Wires a lending gauge to the reserve and its supply and variable
    /// debt tokens.
    pub fn set_lending_gauge(
        env: Env,
        admin: Address,
        asset: Address,
        gauge: Address,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        let mut data = reserve(&env, &asset)?;
        let pool = env.current_contract_address();
        ReserveTokenClient::new(&env, &data.h_token).set_lending_gauge(&pool, &gauge);
        ReserveTokenClient::new(&env, &data.variable_debt_token).set_lending_gauge(&pool, &gauge);
        data.lending_gauge = Some(gauge.clone());
        set_reserve(&env, &asset, &data);
        LendingGaugeSet { asset, gauge }.publish(&env);
        Ok(())
    }

    pub fn set_flash_loan_premiums(
        env: Env,
        admin: Address,
        premium_total: u32,
        premium_to_protocol: u32,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        if premium_total > PERCENTAGE_FACTOR_BPS || premium_to_protocol > PERCENTAGE_FACTOR_BPS {
            return Err(Error::InvalidPremium);
        }
        set_flash_loan_premiums(&env, premium_total, premium_to_protocol);
        FlashLoanPremiumsUpdated {
            premium_total,
            premium_to_protocol,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_liquidation_policy(
        env: Env,
        caller: Address,
        full_liquidation_hf: u128,
        dust_collateral_base: u128,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_risk_or_pool_admin(&env, &caller)?;
        if full_liquidation_hf > RAY {
            return Err(Error::InvalidLiquidationPolicy);
        }
        set_liquidation_policy(
            &env,
            &LiquidationPolicy {
                full_liquidation_hf,
                dust_collateral_base,
            },
        );
        LiquidationPolicyUpdated {
            full_liquidation_hf,
            dust_collateral_base,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_risk_admin(
        env: Env,
        admin: Address,
        account: Address,
        enabled: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        set_risk_admin(&env, &account, enabled);
        Ok(())
    }

    pub fn set_flash_borrower(
        env: Env,
        admin: Address,
        account: Address,
        enabled: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        set_flash_borrower(&env, &account, enabled);
        Ok(())
    }

    pub fn set_oracle(env: Env, admin: Address, oracle: Address) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        set_oracle(&env, &oracle);
        Ok(())
    }

    pub fn set_treasury(env: Env, admin: Address, treasury: Address) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        set_treasury(&env, &treasury);
        Ok(())
    }

    pub fn set_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), Error> {
        ensure_initialized(&env)?;
        require_pool_admin(&env, &admin)?;
        new_admin.require_auth();
        set_admin(&env, &new_admin);
        NewAdmin { admin: new_admin }.publish(&env);
        Ok(())
    }

    // ---- User actions ----

    pub fn supply(
        env: Env,
        from: Address,
        asset: Address,
        amount: u128,
        on_behalf_of: Address,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_supply(&env, &from, &asset, amount, &on_behalf_of)
    }

    /// `u128::MAX` withdraws the whole balance. Returns the amount sent.
    pub fn withdraw(
        env: Env,
        from: Address,
        asset: Address,
        amount: u128,
        to: Address,
    ) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_withdraw(&env, &from, &asset, amount, &to)
    }

    /// Rate mode 1 is stable, 2 is variable.
    pub fn borrow(
        env: Env,
        from: Address,
        asset: Address,
        amount: u128,
        rate_mode: u32,
        on_behalf_of: Address,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_borrow(
            &env,
            &BorrowParams {
                user: from,
                asset,
                amount,
                rate_mode,
                on_behalf_of,
                release_underlying: true,
            },
        )
    }

    pub fn repay(
        env: Env,
        from: Address,
        asset: Address,
        amount: u128,
        rate_mode: u32,
        on_behalf_of: Address,
    ) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_repay(
            &env,
            &RepayParams {
                payer: from,
                asset,
                amount,
                rate_mode,
                on_behalf_of,
                use_h_tokens: false,
            },
        )
    }

    /// Repays the caller's own debt by burning their supply tokens.
    pub fn repay_with_h_tokens(
        env: Env,
        from: Address,
        asset: Address,
        amount: u128,
        rate_mode: u32,
    ) -> Result<u128, Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_repay(
            &env,
            &RepayParams {
                payer: from.clone(),
                asset,
                amount,
                rate_mode,
                on_behalf_of: from,
                use_h_tokens: true,
            },
        )
    }

    pub fn set_use_reserve_as_collateral(
        env: Env,
        from: Address,
        asset: Address,
        enabled: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_set_use_as_collateral(&env, &from, &asset, enabled)
    }

    pub fn liquidation_call(
        env: Env,
        liquidator: Address,
        collateral_asset: Address,
        debt_asset: Address,
        user: Address,
        debt_to_cover: u128,
        receive_h_token: bool,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        liquidator.require_auth();
        execute_liquidation_call(
            &env,
            &LiquidationParams {
                liquidator,
                collateral_asset,
                debt_asset,
                user,
                debt_to_cover,
                receive_h_token,
            },
        )
    }

    /// Mode 0 legs must be repaid with the premium inside the callback;
    /// modes 1 and 2 open debt for `on_behalf_of` instead.
    pub fn flash_loan(
        env: Env,
        initiator: Address,
        receiver: Address,
        assets: Vec<Address>,
        amounts: Vec<u128>,
        modes: Vec<u32>,
        on_behalf_of: Address,
        params: Bytes,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        initiator.require_auth();
        execute_flash_loan(
            &env,
            &FlashLoanParams {
                initiator,
                receiver,
                assets,
                amounts,
                modes,
                on_behalf_of,
                params,
            },
        )
    }

    pub fn flash_loan_simple(
        env: Env,
        initiator: Address,
        receiver: Address,
        asset: Address,
        amount: u128,
        params: Bytes,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        initiator.require_auth();
        execute_flash_loan(
            &env,
            &FlashLoanParams {
                on_behalf_of: initiator.clone(),
                initiator,
                receiver,
                assets: Vec::from_array(&env, [asset]),
                amounts: Vec::from_array(&env, [amount]),
                modes: Vec::from_array(&env, [RATE_MODE_NONE]),
                params,
            },
        )
    }

    pub fn transfer_h_token(
        env: Env,
        from: Address,
        asset: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        from.require_auth();
        execute_transfer(&env, &asset, &from, &to, amount)
    }

    pub fn transfer_h_token_from(
        env: Env,
        spender: Address,
        from: Address,
        asset: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), Error> {
        ensure_initialized(&env)?;
        spender.require_auth();
        let data = reserve(&env, &asset)?;
        ReserveTokenClient::new(&env, &data.h_token).spend_allowance(
            &env.current_contract_address(),
            &from,
            &spender,
            &amount,
        );
        execute_transfer(&env, &asset, &from, &to, amount)
    }

    /// Permissionless: the proceeds always go to the stored treasury.
    pub fn mint_to_treasury(env: Env, assets: Vec<Address>) -> Result<(), Error> {
        ensure_initialized(&env)?;
        execute_mint_to_treasury(&env, &assets)
    }

    // ---- Views ----

    pub fn get_reserve_data(env: Env, asset: Address) -> Result<ReserveData, Error> {
        reserve(&env, &asset)
    }

    pub fn get_reserves_list(env: Env) -> Vec<Address> {
        reserves_list(&env)
    }

    pub fn get_user_configuration(env: Env, user: Address) -> UserConfiguration {
        user_config(&env, &user)
    }

    pub fn get_user_account_data(env: Env, user: Address) -> Result<UserAccountData, Error> {
        let config = user_config(&env, &user);
        calculate_user_account_data(&env, &user, &config)
    }

    pub fn get_normalized_income(env: Env, asset: Address) -> Result<u128, Error> {
        normalized_income(&env, &reserve(&env, &asset)?)
    }

    pub fn get_normalized_debt(env: Env, asset: Address) -> Result<u128, Error> {
        normalized_debt(&env, &reserve(&env, &asset)?)
    }

    /// (total, to_protocol) in basis points.
    pub fn get_flash_loan_premiums(env: Env) -> (u32, u32) {
        flash_loan_premiums(&env)
    }

    pub fn get_liquidation_policy(env: Env) -> LiquidationPolicy {
        liquidation_policy(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        admin(&env)
    }

    pub fn get_treasury(env: Env) -> Result<Address, Error> {
        treasury(&env)
    }

    pub fn get_oracle(env: Env) -> Result<Address, Error> {
        oracle(&env)
    }

    pub fn is_risk_admin(env: Env, account: Address) -> bool {
        is_risk_admin(&env, &account)
    }

    pub fn is_flash_borrower(env: Env, account: Address) -> bool {
        is_flash_borrower(&env, &account)
    }
}
