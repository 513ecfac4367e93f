//! Online skill rating for the Crucible subsystem.
//!
//! Maintains one Gaussian belief per competitor identity across a whole
//! training run, updating after every evaluation episode from rank
//! observations. The flattened `Rank_<name>` / `SR_<name>` metrics channel
//! used by the external trainer is confined to the boundary adapter in
//! [`metrics`]; everything else works with typed rank reports.
//!
//! # Modules
//!
//! - [`belief`] -- Gaussian skill beliefs ([`SkillBelief`])
//! - [`config`] -- Rating model parameters ([`RatingConfig`])
//! - [`error`] -- Error types for all rating operations ([`RatingError`])
//! - [`metrics`] -- Flat-metrics boundary adapter ([`MetricValue`],
//!   [`extract_ranks_from_metrics`], [`collapse_series_means`])
//! - [`tracker`] -- The roster-wide belief store ([`SkillRatingTracker`])
//! - [`update`] -- The pairwise Bayesian update rule ([`update::rate`])

pub mod belief;
pub mod config;
pub mod error;
pub mod metrics;
pub mod tracker;
pub mod update;

// Re-export primary types at crate root for convenience.
pub use belief::SkillBelief;
pub use config::RatingConfig;
pub use error::RatingError;
pub use metrics::{
    MetricValue, RANK_METRIC_PREFIX, SKILL_METRIC_PREFIX, collapse_series_means,
    extract_ranks_from_metrics,
};
pub use tracker::SkillRatingTracker;
pub use update::Participant;
