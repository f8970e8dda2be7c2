use soroban_sdk::{contractclient, contracttype, Address, Bytes, Env, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableSupplyData {
    pub principal_supply: u128,
    pub total_supply: u128,
    pub average_rate: u128,
    pub last_update: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableMintResult {
    pub is_first: bool,
    pub total_supply: u128,
    pub average_rate: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableBurnResult {
    pub total_supply: u128,
    pub average_rate: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateInputs {
    pub available_liquidity: u128,
    pub liquidity_added: u128,
    pub liquidity_taken: u128,
    pub total_stable_debt: u128,
    pub total_variable_debt: u128,
    pub average_stable_borrow_rate: u128,
    pub reserve_factor: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestRates {
    pub liquidity_rate: u128,
    pub stable_borrow_rate: u128,
    pub variable_borrow_rate: u128,
}

/// Supply, variable-debt and stable-debt tokens share this surface; the
/// pool only calls the subset that applies to each kind.
#[contractclient(name = "ReserveTokenClient")]
pub trait ReserveToken {
    fn mint(
        env: Env,
        caller: Address,
        user: Address,
        on_behalf_of: Address,
        amount: u128,
        index: u128,
    ) -> bool;
    fn burn(env: Env, caller: Address, from: Address, amount: u128, index: u128) -> bool;
    fn mint_to_treasury(env: Env, caller: Address, treasury: Address, amount: u128, index: u128);
    fn transfer(
        env: Env,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
        index: u128,
    );
    fn spend_allowance(env: Env, caller: Address, owner: Address, spender: Address, amount: u128);
    fn mint_stable(
        env: Env,
        caller: Address,
        user: Address,
        on_behalf_of: Address,
        amount: u128,
        rate: u128,
    ) -> StableMintResult;
    fn burn_stable(env: Env, caller: Address, from: Address, amount: u128) -> StableBurnResult;
    fn balance_of(env: Env, user: Address) -> u128;
    fn scaled_balance_of(env: Env, user: Address) -> u128;
    fn scaled_total_supply(env: Env) -> u128;
    fn get_supply_data(env: Env) -> StableSupplyData;
    fn set_lending_gauge(env: Env, caller: Address, gauge: Address);
}

#[contractclient(name = "RateStrategyClient")]
pub trait RateStrategy {
    fn calculate_interest_rates(env: Env, inputs: RateInputs) -> InterestRates;
}

/// Prices are in base currency with the oracle's fixed decimals.
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn get_asset_price(env: Env, asset: Address) -> u128;
    fn get_assets_prices(env: Env, assets: Vec<Address>) -> Vec<u128>;
}

#[contractclient(name = "LendingGaugeClient")]
pub trait LendingGaugeHook {
    fn update_allocation(env: Env, caller: Address, total_debt: u128, total_supply: u128);
}

/// Implemented by flash-loan receivers. The receiver must hand back
/// `amount + premium` of every asset before returning true.
#[contractclient(name = "FlashLoanReceiverClient")]
pub trait FlashLoanReceiver {
    fn execute_operation(
        env: Env,
        assets: Vec<Address>,
        amounts: Vec<u128>,
        premiums: Vec<u128>,
        initiator: Address,
        params: Bytes,
    ) -> bool;
}
