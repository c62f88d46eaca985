use super::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::error::{Error, Result};

/// Checks `cost` against the allowed range [`MIN_COST`, `MAX_COST`].
pub fn validate_cost(cost: u32) -> Result<u32> {
    if cost < MIN_COST {
        return Err(Error::CostTooLow(cost));
    }
    if cost > MAX_COST {
        return Err(Error::CostTooHigh(cost));
    }
    Ok(cost)
}

/// A bcrypt cost factor that is known to satisfy the cost policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost(u32);

impl Default for Cost {
    fn default() -> Self {
        Self(DEFAULT_COST)
    }
}

impl Cost {
    pub fn new(cost: u32) -> Result<Self> {
        validate_cost(cost).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Cost {
    type Error = Error;

    fn try_from(cost: u32) -> Result<Self> {
        Self::new(cost)
    }
}

impl From<Cost> for u32 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}
