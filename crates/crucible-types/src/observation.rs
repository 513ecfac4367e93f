//! Typed observation records handed to the policy each step.
//!
//! Only the parts of the observation this subsystem rewrites are modeled:
//! the action-target masks. Everything else the environment emits (tile
//! grids, entity tables) passes through the wrapper untouched and is not
//! represented here.

use serde::{Deserialize, Serialize};

use crate::actions::PriceLevel;

/// A dense mask over the discrete sell-price levels.
///
/// Entry `i` gates price level `i`: 1.0 means selectable, 0.0 means masked
/// out. The environment emits an all-ones mask; the reward shaper zeroes
/// the agent's previously used price to force exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMask(Vec<f32>);

impl PriceMask {
    /// An all-ones mask over `levels` price levels.
    pub fn uniform(levels: usize) -> Self {
        Self(vec![1.0; levels])
    }

    /// Zero the entry for one price level.
    ///
    /// Returns `false` when the level is out of range for this mask (the
    /// mask is left unchanged).
    pub fn zero(&mut self, level: PriceLevel) -> bool {
        let Ok(index) = usize::try_from(level.into_inner()) else {
            return false;
        };
        match self.0.get_mut(index) {
            Some(entry) => {
                *entry = 0.0;
                true
            }
            None => false,
        }
    }

    /// The gate value for one price level, or `None` when out of range.
    pub fn gate(&self, level: PriceLevel) -> Option<f32> {
        let index = usize::try_from(level.into_inner()).ok()?;
        self.0.get(index).copied()
    }

    /// Number of price levels covered by this mask.
    pub fn levels(&self) -> usize {
        self.0.len()
    }
}

/// The action-target masks inside an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTargets {
    /// Mask over the sell-price choice set.
    pub sell_price: PriceMask,
}

/// One agent's observation for one step, reduced to the parts this
/// subsystem rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Action-target masks the policy samples against.
    pub action_targets: ActionTargets,
}

impl Observation {
    /// An observation with an all-ones price mask over `levels` levels.
    pub fn with_uniform_targets(levels: usize) -> Self {
        Self {
            action_targets: ActionTargets {
                sell_price: PriceMask::uniform(levels),
            },
        }
    }
}
