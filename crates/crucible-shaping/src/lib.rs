//! Per-episode reward shaping and team reward pooling for the Crucible
//! subsystem.
//!
//! This crate is the logic layer between `crucible-types` (the data model)
//! and `crucible-core` (orchestration): everything here operates on
//! per-episode state without touching I/O. One instance of each component
//! lives in each rollout worker and is mutated only by that worker's step
//! loop.
//!
//! # Modules
//!
//! - [`config`] -- Shaper configuration ([`BonusWeights`], [`ShaperConfig`])
//! - [`error`] -- Error types for all shaping operations ([`ShapingError`])
//! - [`history`] -- Per-agent action history for one episode ([`HistoryStore`])
//! - [`shaper`] -- Resource-delta reward shaping and observation masking
//!   ([`RewardShaper`])
//! - [`team`] -- Team reward pooling and interpolation ([`TeamRewardBlender`])

pub mod config;
pub mod error;
pub mod history;
pub mod shaper;
pub mod team;

// Re-export primary types at crate root for convenience.
pub use config::{BonusWeights, ShaperConfig};
pub use error::ShapingError;
pub use history::{HistoryEntry, HistoryStore};
pub use shaper::{RewardShaper, ShapedStep};
pub use team::{TaskRewards, TeamRewardBlender};
