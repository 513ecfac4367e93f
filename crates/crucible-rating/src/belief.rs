//! Gaussian skill beliefs.
//!
//! A belief is a Gaussian over a competitor's latent skill: a mean and a
//! strictly positive standard deviation. The fields are private so the
//! `stddev > 0` invariant can only be established through the checked
//! constructor and the update rule's clamped shrink.

use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Gaussian belief over one competitor's latent skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillBelief {
    /// Posterior mean skill.
    mean: f64,
    /// Posterior standard deviation. Invariant: finite and > 0.
    stddev: f64,
}

impl SkillBelief {
    /// Build a belief.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidBelief`] unless `mean` is finite and
    /// `stddev` is finite and strictly positive.
    pub fn new(mean: f64, stddev: f64) -> Result<Self, RatingError> {
        if !mean.is_finite() || !stddev.is_finite() || stddev <= 0.0 {
            return Err(RatingError::InvalidBelief { mean, stddev });
        }
        Ok(Self { mean, stddev })
    }

    /// The posterior mean skill.
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// The posterior standard deviation.
    pub const fn stddev(&self) -> f64 {
        self.stddev
    }

    /// The posterior variance (`stddev` squared).
    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }
}
