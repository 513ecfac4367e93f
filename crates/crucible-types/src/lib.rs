//! Shared type definitions for the Crucible reward-shaping and
//! skill-rating subsystem.
//!
//! This crate is the single source of truth for the data model shared by
//! the shaping, rating, and orchestration crates.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agent and population identifiers
//! - [`enums`] -- Enumeration types (resources, directions, run modes)
//! - [`resources`] -- Per-agent resource snapshots with a closed key set
//! - [`actions`] -- Tagged action records submitted by the policy
//! - [`observation`] -- Typed observation records with action-target masks
//! - [`rank`] -- Competitor identities and per-episode rank reports

pub mod actions;
pub mod enums;
pub mod ids;
pub mod observation;
pub mod rank;
pub mod resources;

// Re-export all public types at crate root for convenience.
pub use actions::{MoveDecision, PriceLevel, SellDecision, StepAction};
pub use enums::{Direction, ResourceKind, RunMode};
pub use ids::{AgentId, PopulationId};
pub use observation::{ActionTargets, Observation, PriceMask};
pub use rank::{Competitor, CompetitorId, Placing, RankObservation};
pub use resources::ResourceLevels;
