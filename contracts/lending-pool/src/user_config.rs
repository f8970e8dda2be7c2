use soroban_sdk::{Address, Env, Vec};

use crate::errors::Error;
use crate::storage::{reserve, UserConfiguration};

/// Isolation state derived from the collateral mask: the user is isolated
/// when their only collateral reserve has a debt ceiling.
pub(crate) struct IsolationState {
    pub active: bool,
    pub collateral: Option<Address>,
    pub debt_ceiling: u128,
}

impl UserConfiguration {
    pub fn is_using_as_collateral(&self, id: u32) -> bool {
        self.collateral & (1u128 << id) != 0
    }

    pub fn is_borrowing(&self, id: u32) -> bool {
        self.borrowing & (1u128 << id) != 0
    }

    pub fn is_using_as_collateral_or_borrowing(&self, id: u32) -> bool {
        self.is_using_as_collateral(id) || self.is_borrowing(id)
    }

    pub fn set_using_as_collateral(&mut self, id: u32, enabled: bool) {
        if enabled {
            self.collateral |= 1u128 << id;
        } else {
            self.collateral &= !(1u128 << id);
        }
    }

    pub fn set_borrowing(&mut self, id: u32, borrowing: bool) {
        if borrowing {
            self.borrowing |= 1u128 << id;
        } else {
            self.borrowing &= !(1u128 << id);
        }
    }

    pub fn is_borrowing_any(&self) -> bool {
        self.borrowing != 0
    }

    pub fn is_empty(&self) -> bool {
        self.collateral == 0 && self.borrowing == 0
    }

    pub fn is_using_as_collateral_any(&self) -> bool {
        self.collateral != 0
    }

    pub fn is_using_as_collateral_one(&self) -> bool {
        self.collateral != 0 && self.collateral & (self.collateral - 1) == 0
    }

    /// Id of the lowest collateral bit, if any.
    pub fn first_collateral_id(&self) -> Option<u32> {
        if self.collateral == 0 {
            None
        } else {
            Some(self.collateral.trailing_zeros())
        }
    }

    pub(crate) fn isolation_state(
        &self,
        env: &Env,
        reserves: &Vec<Address>,
    ) -> Result<IsolationState, Error> {
        if self.is_using_as_collateral_one() {
            if let Some(asset) = self.first_collateral_id().and_then(|id| reserves.get(id)) {
                let ceiling = reserve(env, &asset)?.configuration.debt_ceiling;
                if ceiling != 0 {
                    return Ok(IsolationState {
                        active: true,
                        collateral: Some(asset),
                        debt_ceiling: ceiling,
                    });
                }
            }
        }
        Ok(IsolationState {
            active: false,
            collateral: None,
            debt_ceiling: 0,
        })
    }
}
