//! Episode termination policy: horizon and population-extinction latching.
//!
//! The policy samples two external signals once per step -- the monotonic
//! tick counter and the live agent count -- and raises a single global
//! "all agents done" flag when either the mode-specific horizon is reached
//! or the population has fallen to the configured floor. Once raised, the
//! flag stays raised for the remainder of the step batch: episodes do not
//! un-terminate. `reset` clears the latch at episode start.
//!
//! Render runs are deliberately never episode-bounded by this policy; an
//! external stop condition (e.g. a UI close event) governs them.

use tracing::info;

use crucible_types::RunMode;

use crate::config::{EpisodeConfig, parse_mode};

/// Errors that can occur when building a termination policy.
#[derive(Debug, thiserror::Error)]
pub enum TerminationError {
    /// Invalid episode configuration (e.g. a zero horizon).
    #[error("invalid termination configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Decides when the episode-wide all-done flag should be raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeTerminationPolicy {
    /// Horizon in ticks for training runs.
    train_horizon: u64,
    /// Horizon in ticks for evaluation runs.
    evaluation_horizon: u64,
    /// The episode ends once the live agent count drops to this value or
    /// below.
    early_stop_agent_count: u32,
    /// The run mode this worker operates in.
    mode: RunMode,
    /// Whether the all-done flag has been raised this episode.
    raised: bool,
}

impl EpisodeTerminationPolicy {
    /// Build a policy from the episode configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`TerminationError::InvalidConfig`] when either horizon is
    /// zero or the mode string is unknown.
    pub fn new(config: &EpisodeConfig) -> Result<Self, TerminationError> {
        if config.train_horizon == 0 {
            return Err(TerminationError::InvalidConfig {
                reason: "train_horizon must be at least 1".to_owned(),
            });
        }
        if config.evaluation_horizon == 0 {
            return Err(TerminationError::InvalidConfig {
                reason: "evaluation_horizon must be at least 1".to_owned(),
            });
        }
        let mode = parse_mode(&config.mode).map_err(|source| TerminationError::InvalidConfig {
            reason: source.to_string(),
        })?;

        Ok(Self {
            train_horizon: config.train_horizon,
            evaluation_horizon: config.evaluation_horizon,
            early_stop_agent_count: config.early_stop_agent_count,
            mode,
            raised: false,
        })
    }

    /// Build a policy from explicit parts (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`TerminationError::InvalidConfig`] when either horizon is
    /// zero.
    pub fn from_parts(
        train_horizon: u64,
        evaluation_horizon: u64,
        early_stop_agent_count: u32,
        mode: RunMode,
    ) -> Result<Self, TerminationError> {
        if train_horizon == 0 || evaluation_horizon == 0 {
            return Err(TerminationError::InvalidConfig {
                reason: "horizons must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            train_horizon,
            evaluation_horizon,
            early_stop_agent_count,
            mode,
            raised: false,
        })
    }

    /// The horizon in effect for this worker's mode.
    ///
    /// Evaluation runs use the evaluation horizon; training and render
    /// runs use the training horizon (the latter only nominally -- render
    /// runs never raise the flag).
    pub const fn horizon(&self) -> u64 {
        match self.mode {
            RunMode::Evaluation => self.evaluation_horizon,
            RunMode::Train | RunMode::Render => self.train_horizon,
        }
    }

    /// Sample the per-step signals and return the (possibly newly raised)
    /// all-done flag.
    ///
    /// The flag raises when `tick >= horizon` or the live agent count has
    /// fallen to the early-stop floor. In render mode it never raises.
    pub fn observe(&mut self, tick: u64, active_agent_count: u32) -> bool {
        if self.mode == RunMode::Render {
            return false;
        }
        if self.raised {
            return true;
        }

        let hit_horizon = tick >= self.horizon();
        let population_collapsed = active_agent_count <= self.early_stop_agent_count;
        if hit_horizon || population_collapsed {
            self.raised = true;
            info!(
                tick,
                active_agent_count,
                hit_horizon,
                population_collapsed,
                "episode all-done flag raised"
            );
        }
        self.raised
    }

    /// Whether the flag has been raised this episode.
    pub const fn is_raised(&self) -> bool {
        self.raised
    }

    /// Clear the latch at episode start.
    pub const fn reset(&mut self) {
        self.raised = false;
    }

    /// The run mode this policy operates in.
    pub const fn mode(&self) -> RunMode {
        self.mode
    }
}
