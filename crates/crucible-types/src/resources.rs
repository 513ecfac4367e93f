//! Per-agent resource snapshots with a closed key set.
//!
//! A [`ResourceLevels`] holds one value per [`ResourceKind`] -- no extra
//! keys, no missing keys. The only constructors fill the whole set, and
//! there is no removal API, so the invariant holds by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::ResourceKind;

/// A snapshot of one agent's resource values, one entry per
/// [`ResourceKind`].
///
/// The reward shaper keeps one of these per agent as the "last recorded"
/// baseline, and receives a fresh one per step from the environment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLevels {
    /// Value per resource kind. Always holds exactly [`ResourceKind::ALL`].
    levels: BTreeMap<ResourceKind, f64>,
}

impl ResourceLevels {
    /// A snapshot at the episode baseline: vitals at 100, all else at 0.
    pub fn episode_baseline() -> Self {
        Self::from_fn(ResourceKind::episode_baseline)
    }

    /// Build a snapshot by evaluating `value` for every resource kind.
    pub fn from_fn(value: impl Fn(ResourceKind) -> f64) -> Self {
        let levels = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, value(kind)))
            .collect();
        Self { levels }
    }

    /// Current value of one resource.
    pub fn get(&self, kind: ResourceKind) -> f64 {
        // Every kind is inserted by construction; the fallback is the
        // episode baseline and is unreachable in practice.
        self.levels
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.episode_baseline())
    }

    /// Overwrite the value of one resource.
    pub fn set(&mut self, kind: ResourceKind, value: f64) {
        self.levels.insert(kind, value);
    }

    /// Iterate over `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        self.levels.iter().map(|(kind, value)| (*kind, *value))
    }
}

impl Default for ResourceLevels {
    fn default() -> Self {
        Self::episode_baseline()
    }
}
