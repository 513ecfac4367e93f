//! The pairwise Bayesian rating update.
//!
//! One episode's ranking is absorbed into the Gaussian beliefs with a
//! Bradley-Terry full-pairing update (Weng & Lin's online approximation):
//! every participant is compared against every other, the win probability
//! implied by the two priors is contrasted with the observed rank order,
//! and the posterior mean shifts by the accumulated surprise scaled by the
//! prior variance. More uncertain beliefs move further on the same
//! evidence.
//!
//! Two departures from the textbook form, both deliberate:
//!
//! - An additive dynamics variance `tau^2` inflates every prior before the
//!   update, so ratings stay adaptive across a long training run.
//! - The multiplicative variance shrink is clamped from below, so a
//!   standard deviation can approach zero but never reach it.

use crucible_types::CompetitorId;

use crate::belief::SkillBelief;
use crate::config::RatingConfig;
use crate::error::RatingError;

/// Smallest fraction of prior variance a single update may retain.
///
/// Keeps `stddev` strictly positive no matter how decisive the outcome.
const VARIANCE_RETENTION_FLOOR: f64 = 1e-4;

/// One participant in a rating update: identity, prior belief, and the
/// ordinal rank it earned this episode (0 = best; equal ranks are draws).
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// The competitor being rated.
    pub id: CompetitorId,
    /// The prior belief going into the update.
    pub belief: SkillBelief,
    /// The rank earned this episode.
    pub rank: u32,
}

/// Rate one episode's participants, returning posterior beliefs in input
/// order.
///
/// All posteriors are computed from the priors and applied simultaneously,
/// so the update is symmetric: permuting the input permutes the output.
/// Fewer than two participants carry no pairwise information and are
/// returned unchanged.
///
/// # Errors
///
/// Returns [`RatingError::InvalidBelief`] only if a posterior fails the
/// belief invariant, which the variance clamp makes unreachable for valid
/// inputs; the result is surfaced rather than swallowed to keep the
/// invariant checked in one place.
pub fn rate(
    participants: &[Participant],
    config: &RatingConfig,
) -> Result<Vec<SkillBelief>, RatingError> {
    if participants.len() < 2 {
        return Ok(participants.iter().map(|p| p.belief).collect());
    }

    let tau_squared = config.tau * config.tau;
    let two_beta_squared = 2.0 * config.beta * config.beta;

    // Dynamics inflation: applied to every prior before pairing.
    let inflated: Vec<(f64, f64)> = participants
        .iter()
        .map(|p| (p.belief.mean(), p.belief.variance() + tau_squared))
        .collect();

    let mut posteriors = Vec::with_capacity(participants.len());
    for (index, (player, &(mean, variance))) in
        participants.iter().zip(inflated.iter()).enumerate()
    {
        let mut mean_shift = 0.0;
        let mut variance_decay = 0.0;
        for (other_index, (other, &(other_mean, other_variance))) in
            participants.iter().zip(inflated.iter()).enumerate()
        {
            if other_index == index {
                continue;
            }

            let c = (variance + other_variance + two_beta_squared).sqrt();
            // Implied win probability of `player` over `other`.
            let p_win = 1.0 / (1.0 + ((other_mean - mean) / c).exp());
            // Observed outcome: win 1, draw 1/2, loss 0.
            let outcome = match player.rank.cmp(&other.rank) {
                core::cmp::Ordering::Less => 1.0,
                core::cmp::Ordering::Equal => 0.5,
                core::cmp::Ordering::Greater => 0.0,
            };

            mean_shift += variance / c * (outcome - p_win);
            let gamma = variance.sqrt() / c;
            variance_decay += gamma * (variance / (c * c)) * p_win * (1.0 - p_win);
        }

        let posterior_mean = mean + mean_shift;
        let posterior_variance =
            variance * (1.0 - variance_decay).max(VARIANCE_RETENTION_FLOOR);
        posteriors.push(SkillBelief::new(posterior_mean, posterior_variance.sqrt())?);
    }

    Ok(posteriors)
}
