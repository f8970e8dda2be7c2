use soroban_sdk::{contractevent, Address, Vec};

use crate::storage::Phase;

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddPhases {
    pub phases: Vec<Phase>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateAllocation {
    pub total_debt: u128,
    pub total_supply: u128,
    pub utilization: u128,
    pub borrow_allocation: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserCheckpoint {
    #[topic]
    pub user: Address,
    pub integrate_fraction: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateUpdated {
    pub rate_per_second: u128,
}
