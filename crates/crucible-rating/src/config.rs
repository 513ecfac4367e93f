//! Configurable parameters for the skill-rating model.
//!
//! The defaults put one unit of performance spread (`beta`) at a third of
//! the prior spread: a competitor one `beta` ahead wins about 76% of the
//! time, and three `beta` ahead wins almost always. Scripted baselines are
//! pinned to a separate low-uncertainty prior because their strength is
//! known and fixed.

use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Parameters of the Gaussian rating model. Fixed at construction; never
/// mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Prior mean skill for every competitor.
    #[serde(default = "default_prior_mean")]
    pub prior_mean: f64,

    /// Prior skill spread for learned competitors.
    #[serde(default = "default_prior_stddev")]
    pub prior_stddev: f64,

    /// Performance spread per episode: how noisy a single episode outcome
    /// is around latent skill.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Additive dynamics spread applied before every update, keeping
    /// ratings adaptive as policies keep training between evaluations.
    #[serde(default = "default_tau")]
    pub tau: f64,

    /// Prior mean pinned onto scripted baseline competitors.
    #[serde(default = "default_scripted_mean")]
    pub scripted_mean: f64,

    /// Prior spread pinned onto scripted baseline competitors. Much lower
    /// than `prior_stddev`: a scripted opponent's strength is known.
    #[serde(default = "default_scripted_stddev")]
    pub scripted_stddev: f64,
}

impl RatingConfig {
    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidConfig`] when any spread is not
    /// strictly positive, `tau` is negative, or any value is non-finite.
    pub fn validate(&self) -> Result<(), RatingError> {
        let all_finite = [
            self.prior_mean,
            self.prior_stddev,
            self.beta,
            self.tau,
            self.scripted_mean,
            self.scripted_stddev,
        ]
        .into_iter()
        .all(f64::is_finite);
        if !all_finite {
            return Err(RatingError::InvalidConfig {
                reason: "all rating parameters must be finite".to_owned(),
            });
        }
        if self.prior_stddev <= 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("prior_stddev must be > 0, got {}", self.prior_stddev),
            });
        }
        if self.scripted_stddev <= 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("scripted_stddev must be > 0, got {}", self.scripted_stddev),
            });
        }
        if self.beta <= 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("beta must be > 0, got {}", self.beta),
            });
        }
        if self.tau < 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("tau must be >= 0, got {}", self.tau),
            });
        }
        Ok(())
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            prior_mean: default_prior_mean(),
            prior_stddev: default_prior_stddev(),
            beta: default_beta(),
            tau: default_tau(),
            scripted_mean: default_scripted_mean(),
            scripted_stddev: default_scripted_stddev(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_prior_mean() -> f64 {
    1000.0
}

const fn default_prior_stddev() -> f64 {
    2.0 * 100.0 / 3.0
}

const fn default_beta() -> f64 {
    100.0 / 3.0
}

const fn default_tau() -> f64 {
    2.0 / 3.0
}

const fn default_scripted_mean() -> f64 {
    1500.0
}

const fn default_scripted_stddev() -> f64 {
    1.0
}
