//! Tagged action records submitted by the policy each step.
//!
//! The environment's action space is a structured record, not a nested
//! string-keyed dictionary: each decision kind has its own type, so a typo
//! in a key is a compile error rather than a silent miss.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;

/// An index into the discrete set of sellable price levels.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PriceLevel(pub u32);

impl PriceLevel {
    /// Return the raw index value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PriceLevel {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// The sell component of a step action: offer inventory at a price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellDecision {
    /// The chosen price level.
    pub price: PriceLevel,
}

/// The movement component of a step action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDecision {
    /// The chosen direction.
    pub direction: Direction,
}

/// One agent's complete action for one step.
///
/// Components the policy did not exercise this step are `None`; the
/// pre-action hook records only the components that are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepAction {
    /// Sell decision, if the policy chose to sell.
    pub sell: Option<SellDecision>,
    /// Movement decision, if the policy chose to move.
    pub movement: Option<MoveDecision>,
}

impl StepAction {
    /// The chosen sell price, if any.
    pub const fn sell_price(&self) -> Option<PriceLevel> {
        match self.sell {
            Some(decision) => Some(decision.price),
            None => None,
        }
    }

    /// The chosen move direction, if any.
    pub const fn move_direction(&self) -> Option<Direction> {
        match self.movement {
            Some(decision) => Some(decision.direction),
            None => None,
        }
    }
}
