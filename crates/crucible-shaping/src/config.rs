//! Configurable parameters for the reward shaper.
//!
//! Weights are configuration, not runtime state: fixed when the shaper is
//! built and never mutated mid-run. A weight of 0 disables the bonus for
//! that resource (the default for every resource).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crucible_types::ResourceKind;

/// Per-resource bonus weights applied to resource deltas.
///
/// The key set is always exactly [`ResourceKind::ALL`]; kinds never given
/// an explicit weight read as 0 (disabled).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusWeights {
    /// Explicit weight per resource kind. Missing kinds weigh 0.
    weights: BTreeMap<ResourceKind, f64>,
}

impl BonusWeights {
    /// A table with every weight at 0 (all bonuses disabled).
    pub const fn disabled() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Builder-style: set the weight for one resource kind.
    #[must_use]
    pub fn with_weight(mut self, kind: ResourceKind, weight: f64) -> Self {
        self.weights.insert(kind, weight);
        self
    }

    /// The weight for one resource kind (0 when never set).
    pub fn weight(&self, kind: ResourceKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    /// Whether every weight is exactly 0 (shaping contributes nothing).
    pub fn all_disabled(&self) -> bool {
        ResourceKind::ALL
            .into_iter()
            .all(|kind| self.weight(kind).abs() < f64::EPSILON)
    }
}

/// Configuration for a [`RewardShaper`](crate::shaper::RewardShaper).
///
/// Fixed at construction; never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaperConfig {
    /// When false the shaper passes raw rewards through unchanged.
    /// Baselines still track current values so a later run with shaping
    /// enabled does not see a spurious spike.
    pub custom_reward_enabled: bool,

    /// Per-resource bonus weights.
    pub bonus_weights: BonusWeights,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            custom_reward_enabled: true,
            bonus_weights: BonusWeights::disabled(),
        }
    }
}
