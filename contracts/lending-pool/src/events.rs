use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveInitialized {
    #[topic]
    pub asset: Address,
    pub id: u32,
    pub h_token: Address,
    pub stable_debt_token: Address,
    pub variable_debt_token: Address,
    pub interest_rate_strategy: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveConfigChanged {
    #[topic]
    pub asset: Address,
    pub ltv: u32,
    pub liquidation_threshold: u32,
    pub liquidation_bonus: u32,
    pub reserve_factor: u32,
    pub is_active: bool,
    pub is_frozen: bool,
    pub is_paused: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveDataUpdated {
    #[topic]
    pub reserve: Address,
    pub liquidity_rate: u128,
    pub stable_borrow_rate: u128,
    pub variable_borrow_rate: u128,
    pub liquidity_index: u128,
    pub variable_borrow_index: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Supply {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub on_behalf_of: Address,
    pub user: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdraw {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub user: Address,
    pub to: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Borrow {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub on_behalf_of: Address,
    pub user: Address,
    pub amount: u128,
    pub interest_rate_mode: u32,
    pub borrow_rate: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repay {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub user: Address,
    pub repayer: Address,
    pub amount: u128,
    pub use_h_tokens: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralEnabled {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub user: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralDisabled {
    #[topic]
    pub reserve: Address,
    #[topic]
    pub user: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidationCall {
    #[topic]
    pub collateral_asset: Address,
    #[topic]
    pub debt_asset: Address,
    #[topic]
    pub user: Address,
    pub debt_to_cover: u128,
    pub liquidated_collateral_amount: u128,
    pub protocol_fee_amount: u128,
    pub liquidator: Address,
    pub receive_h_token: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoan {
    #[topic]
    pub target: Address,
    #[topic]
    pub asset: Address,
    pub initiator: Address,
    pub amount: u128,
    pub interest_rate_mode: u32,
    pub premium: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintedToTreasury {
    #[topic]
    pub reserve: Address,
    pub amount_minted: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IsolatedDebtUpdated {
    #[topic]
    pub asset: Address,
    pub total_debt: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtCeilingChanged {
    #[topic]
    pub asset: Address,
    pub old_debt_ceiling: u128,
    pub new_debt_ceiling: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LendingGaugeSet {
    #[topic]
    pub asset: Address,
    pub gauge: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoanPremiumsUpdated {
    pub premium_total: u32,
    pub premium_to_protocol: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidationPolicyUpdated {
    pub full_liquidation_hf: u128,
    pub dust_collateral_base: u128,
}

/// Mirrors the admin handover event of the other contracts.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewAdmin {
    #[topic]
    pub admin: Address,
}
