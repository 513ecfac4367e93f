//! Configuration, episode termination, and step orchestration for the
//! Crucible subsystem.
//!
//! This crate ties the shaping and rating layers together: it loads the
//! YAML configuration, builds the per-worker [`EpisodePipeline`] that
//! drives reward shaping, team pooling, and termination each step, and
//! hosts the evaluation-cycle hook that feeds rank metrics into the
//! process-wide skill tracker.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration loader ([`SimulationConfig`])
//! - [`pipeline`] -- Per-step orchestration ([`EpisodePipeline`],
//!   [`apply_evaluation_ratings`])
//! - [`termination`] -- Episode termination latching
//!   ([`EpisodeTerminationPolicy`])

pub mod config;
pub mod pipeline;
pub mod termination;

// Re-export primary types at crate root for convenience.
pub use config::{
    ConfigError, EpisodeConfig, RewardConfig, RosterEntry, SimulationConfig, SkillRatingConfig,
    TeamConfig, parse_mode, parse_resource,
};
pub use pipeline::{
    AgentStepInput, EpisodePipeline, PipelineError, StepOutcome, apply_evaluation_ratings,
};
pub use termination::{EpisodeTerminationPolicy, TerminationError};
