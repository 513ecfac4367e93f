//! Error types for the crucible-rating crate.
//!
//! Every error here marks a wiring or configuration mistake between the
//! tracker and its collaborators (the roster, the metrics channel). None
//! are retryable: the run should halt loudly rather than rate on bad data.

use crucible_types::CompetitorId;

/// Errors that can occur during skill-rating operations.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// A belief was constructed with a non-positive or non-finite spread,
    /// or a non-finite mean.
    #[error("invalid skill belief: mean {mean}, stddev {stddev} (stddev must be finite and > 0)")]
    InvalidBelief {
        /// The rejected mean.
        mean: f64,
        /// The rejected standard deviation.
        stddev: f64,
    },

    /// The rating configuration fails validation.
    #[error("invalid rating configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The evaluation roster is empty.
    #[error("evaluation roster must contain at least one competitor")]
    EmptyRoster,

    /// The same competitor appears twice in the evaluation roster.
    #[error("duplicate competitor in roster: {0}")]
    DuplicateCompetitor(CompetitorId),

    /// A rank observation placed a competitor the tracker was not
    /// constructed with.
    #[error("competitor not in roster: {0}")]
    UnknownCompetitor(CompetitorId),

    /// The metrics channel is missing the rank series for a roster
    /// competitor.
    #[error("metrics are missing rank series for competitor: {0}")]
    MissingRankMetric(CompetitorId),

    /// A rank metric resolved to a plain scalar instead of a per-instance
    /// series -- the metrics source is incompatible with batched
    /// evaluation.
    #[error("rank metric {key} is a scalar, expected a per-instance series")]
    ScalarRankMetric {
        /// The offending metric key.
        key: String,
    },

    /// Rank series for different competitors disagree on the number of
    /// episode instances.
    #[error(
        "rank metric {key} has {found} instances, expected {expected} from earlier series"
    )]
    MismatchedInstanceCount {
        /// The offending metric key.
        key: String,
        /// Instance count established by earlier series.
        expected: usize,
        /// Instance count found under this key.
        found: usize,
    },

    /// A rank value is not a non-negative integral number.
    #[error("rank metric {key} holds malformed rank value {value}")]
    MalformedRank {
        /// The offending metric key.
        key: String,
        /// The rejected value.
        value: f64,
    },
}
