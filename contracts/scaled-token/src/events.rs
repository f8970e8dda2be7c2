use soroban_sdk::{contractevent, Address};

/// Emitted when principal is minted, including interest realized since the
/// holder's previous snapshot.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    #[topic]
    pub caller: Address,
    #[topic]
    pub on_behalf_of: Address,
    pub value: u128,
    pub balance_increase: u128,
    pub index: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Burn {
    #[topic]
    pub from: Address,
    pub value: u128,
    pub balance_increase: u128,
    pub index: u128,
}

/// `value` is the real (unscaled) amount moved.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceTransfer {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub value: u128,
    pub index: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Approval {
    #[topic]
    pub owner: Address,
    #[topic]
    pub spender: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowAllowanceDelegated {
    #[topic]
    pub from_user: Address,
    #[topic]
    pub to_user: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableMint {
    #[topic]
    pub user: Address,
    #[topic]
    pub on_behalf_of: Address,
    pub amount: u128,
    pub current_balance: u128,
    pub balance_increase: u128,
    pub new_rate: u128,
    pub avg_stable_rate: u128,
    pub new_total_supply: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StableBurn {
    #[topic]
    pub from: Address,
    pub amount: u128,
    pub current_balance: u128,
    pub balance_increase: u128,
    pub avg_stable_rate: u128,
    pub new_total_supply: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateLiquidityLimit {
    #[topic]
    pub user: Address,
    pub original_balance: u128,
    pub original_supply: u128,
    pub working_balance: u128,
    pub working_supply: u128,
}
