//! Error types for the crucible-shaping crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Most shaping operations are infallible by design; the errors here mark
//! wiring mistakes between the step loop and the episode lifecycle.

use crucible_types::AgentId;

/// Errors that can occur during reward-shaping operations.
#[derive(Debug, thiserror::Error)]
pub enum ShapingError {
    /// An action was recorded for an agent the episode was never reset
    /// with. The step loop must call `reset` before recording actions.
    #[error("agent not found in episode history: {0}")]
    UnknownAgent(AgentId),

    /// The team-spirit interpolation weight is outside `[0, 1]`.
    #[error("team_spirit must be within [0, 1], got {value}")]
    TeamSpiritOutOfRange {
        /// The rejected weight value.
        value: f64,
    },
}
