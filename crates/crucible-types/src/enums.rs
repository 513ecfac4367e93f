//! Enumeration types for the Crucible subsystem.
//!
//! The resource set mirrors the environment's per-agent resource table:
//! survival vitals, currency, combat experience, and gathering experience.
//! The set is closed -- every per-agent snapshot carries exactly these keys.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// A per-agent resource tracked by the environment and consumed by the
/// reward shaper.
///
/// Resources fall into three groups:
/// - Vitals and currency: `Gold`, `Health`, `Food`, `Water`
/// - Combat experience: `MeleeExp`, `RangeExp`, `MageExp`
/// - Gathering experience: `FishingExp`, `HerbalismExp`, `ProspectingExp`,
///   `CarvingExp`, `AlchemyExp`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    // --- Vitals and currency ---
    /// Currency accumulated through trade.
    Gold,
    /// Hit points, depleted by combat and starvation.
    Health,
    /// Food reserve, depleted each tick and restored by foraging.
    Food,
    /// Water reserve, depleted each tick and restored by drinking.
    Water,

    // --- Combat experience ---
    /// Experience in melee combat.
    MeleeExp,
    /// Experience in ranged combat.
    RangeExp,
    /// Experience in mage combat.
    MageExp,

    // --- Gathering experience ---
    /// Experience in fishing.
    FishingExp,
    /// Experience in herbalism.
    HerbalismExp,
    /// Experience in prospecting.
    ProspectingExp,
    /// Experience in carving.
    CarvingExp,
    /// Experience in alchemy.
    AlchemyExp,
}

impl ResourceKind {
    /// Every resource kind, in canonical order.
    ///
    /// Per-agent snapshots and weight tables are keyed by exactly this set;
    /// iteration in this order keeps reward sums reproducible.
    pub const ALL: [Self; 12] = [
        Self::Gold,
        Self::Health,
        Self::Food,
        Self::Water,
        Self::MeleeExp,
        Self::RangeExp,
        Self::MageExp,
        Self::FishingExp,
        Self::HerbalismExp,
        Self::ProspectingExp,
        Self::CarvingExp,
        Self::AlchemyExp,
    ];

    /// The value this resource starts an episode at.
    ///
    /// Vitals (`Health`, `Food`, `Water`) start full at 100; everything
    /// else starts at 0.
    pub const fn episode_baseline(self) -> f64 {
        match self {
            Self::Health | Self::Food | Self::Water => 100.0,
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement directions
// ---------------------------------------------------------------------------

/// A movement direction on the environment's tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// One tile north.
    North,
    /// One tile south.
    South,
    /// One tile east.
    East,
    /// One tile west.
    West,
}

// ---------------------------------------------------------------------------
// Run modes
// ---------------------------------------------------------------------------

/// The mode a rollout worker is running in.
///
/// The mode selects the episode horizon (training vs. evaluation) and
/// whether the termination policy is active at all (render runs are
/// governed by an external stop condition, e.g. a UI close event).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Training rollout: episodes end at the training horizon.
    #[default]
    Train,
    /// Evaluation rollout: episodes end at the evaluation horizon.
    Evaluation,
    /// Rendering rollout: the termination policy never raises the flag.
    Render,
}
