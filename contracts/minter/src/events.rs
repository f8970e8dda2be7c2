use soroban_sdk::{contractevent, Address};

/// `minted` is the running total paid to `user` for `gauge`.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Minted {
    #[topic]
    pub user: Address,
    #[topic]
    pub gauge: Address,
    pub minted: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintApprovalToggled {
    #[topic]
    pub user: Address,
    pub minter: Address,
    pub approved: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GaugeListed {
    #[topic]
    pub gauge: Address,
    pub listed: bool,
}
