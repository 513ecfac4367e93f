//! Online skill-rating tracker over a fixed evaluation roster.
//!
//! The tracker is process-wide state: constructed once at trainer startup
//! and updated after every evaluation episode. Its belief set is fixed at
//! construction -- one entry per distinct competitor identity -- and never
//! grows or shrinks afterwards. Callers must funnel all `ingest_*` calls
//! through a single logical owner; the tracker itself does no locking.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crucible_types::{Competitor, CompetitorId, RankObservation};

use crate::belief::SkillBelief;
use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::metrics::SKILL_METRIC_PREFIX;
use crate::update::{self, Participant};

/// Maintains one Gaussian skill belief per competitor across a training
/// run.
#[derive(Debug, Clone)]
pub struct SkillRatingTracker {
    /// Model parameters, fixed at construction.
    config: RatingConfig,
    /// Current belief per competitor. Key set fixed at construction.
    beliefs: BTreeMap<CompetitorId, SkillBelief>,
    /// The competitors whose beliefs are pinned to the scripted prior.
    scripted: BTreeSet<CompetitorId>,
}

impl SkillRatingTracker {
    /// Build a tracker for the given evaluation roster.
    ///
    /// Every competitor starts at the shared prior; scripted baselines are
    /// immediately pinned to the scripted prior.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::EmptyRoster`] for an empty roster,
    /// [`RatingError::DuplicateCompetitor`] when an identity appears
    /// twice, or [`RatingError::InvalidConfig`] /
    /// [`RatingError::InvalidBelief`] when the configuration cannot seed
    /// valid priors.
    pub fn new(config: RatingConfig, roster: &[Competitor]) -> Result<Self, RatingError> {
        config.validate()?;
        if roster.is_empty() {
            return Err(RatingError::EmptyRoster);
        }

        let prior = SkillBelief::new(config.prior_mean, config.prior_stddev)?;
        let mut beliefs = BTreeMap::new();
        let mut scripted = BTreeSet::new();
        for competitor in roster {
            if beliefs.insert(competitor.id.clone(), prior).is_some() {
                return Err(RatingError::DuplicateCompetitor(competitor.id.clone()));
            }
            if competitor.scripted {
                scripted.insert(competitor.id.clone());
            }
        }

        let mut tracker = Self {
            config,
            beliefs,
            scripted,
        };
        tracker.reset_scripted()?;
        info!(
            competitors = tracker.beliefs.len(),
            scripted = tracker.scripted.len(),
            "skill rating tracker initialized"
        );
        Ok(tracker)
    }

    /// Pin every scripted competitor back to the scripted prior.
    ///
    /// Runs after every update so scripted baselines never drift.
    fn reset_scripted(&mut self) -> Result<(), RatingError> {
        if self.scripted.is_empty() {
            return Ok(());
        }
        let pinned = SkillBelief::new(self.config.scripted_mean, self.config.scripted_stddev)?;
        for id in &self.scripted {
            if let Some(belief) = self.beliefs.get_mut(id) {
                *belief = pinned;
            }
        }
        Ok(())
    }

    /// Absorb one episode instance's ranking into the beliefs.
    ///
    /// Validation runs before any mutation, so a failed call leaves every
    /// belief untouched. An empty observation is a defined no-op. After
    /// the update, scripted baselines are pinned back to their prior.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::UnknownCompetitor`] when the observation
    /// places an identity outside the construction roster.
    pub fn ingest_episode_ranks(
        &mut self,
        observation: &RankObservation,
    ) -> Result<(), RatingError> {
        // Validate the whole observation before touching any belief.
        let mut participants = Vec::with_capacity(observation.len());
        for placing in observation.placings() {
            let belief = self
                .beliefs
                .get(&placing.competitor)
                .copied()
                .ok_or_else(|| RatingError::UnknownCompetitor(placing.competitor.clone()))?;
            participants.push(Participant {
                id: placing.competitor.clone(),
                belief,
                rank: placing.rank,
            });
        }

        let posteriors = update::rate(&participants, &self.config)?;
        for (participant, posterior) in participants.iter().zip(posteriors) {
            self.beliefs.insert(participant.id.clone(), posterior);
            debug!(
                competitor = %participant.id,
                mean = posterior.mean(),
                stddev = posterior.stddev(),
                "belief updated"
            );
        }

        self.reset_scripted()
    }

    /// Absorb a batch of parallel episode instances, in index order.
    ///
    /// Order matters only for floating-point reproducibility; updates
    /// across independent instances commute up to rounding. Each instance
    /// is atomic: a failure mid-batch leaves earlier instances applied and
    /// the failing instance untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RatingError`] from an instance.
    pub fn ingest_evaluation_batch(
        &mut self,
        instances: &[RankObservation],
    ) -> Result<(), RatingError> {
        for observation in instances {
            self.ingest_episode_ranks(observation)?;
        }
        Ok(())
    }

    /// The current belief for a competitor, if it is on the roster.
    pub fn belief(&self, id: &CompetitorId) -> Option<&SkillBelief> {
        self.beliefs.get(id)
    }

    /// The roster, in identity order.
    pub fn roster(&self) -> impl Iterator<Item = &CompetitorId> + '_ {
        self.beliefs.keys()
    }

    /// Current mean skill per competitor as flat named metrics
    /// (`SR_<name>`), for downstream logging.
    pub fn report(&self) -> BTreeMap<String, f64> {
        self.report_with_prefix("")
    }

    /// Like [`report`](Self::report), with a prefix ahead of every key
    /// (for multi-tracker setups sharing one metrics sink).
    pub fn report_with_prefix(&self, prefix: &str) -> BTreeMap<String, f64> {
        self.beliefs
            .iter()
            .map(|(id, belief)| {
                (
                    format!("{prefix}{SKILL_METRIC_PREFIX}{id}"),
                    belief.mean(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn roster() -> Vec<Competitor> {
        vec![
            Competitor::learned("alpha"),
            Competitor::learned("beta"),
            Competitor::scripted("Combat"),
        ]
    }

    fn tracker() -> SkillRatingTracker {
        SkillRatingTracker::new(RatingConfig::default(), &roster()).unwrap()
    }

    #[test]
    fn construction_seeds_priors() {
        let tracker = tracker();
        let config = RatingConfig::default();

        let alpha = tracker.belief(&CompetitorId::from("alpha")).unwrap();
        assert!((alpha.mean() - config.prior_mean).abs() < f64::EPSILON);
        assert!((alpha.stddev() - config.prior_stddev).abs() < f64::EPSILON);

        let combat = tracker.belief(&CompetitorId::from("Combat")).unwrap();
        assert!((combat.mean() - config.scripted_mean).abs() < f64::EPSILON);
        assert!((combat.stddev() - config.scripted_stddev).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_roster_is_rejected() {
        let result = SkillRatingTracker::new(RatingConfig::default(), &[]);
        assert!(matches!(result, Err(RatingError::EmptyRoster)));
    }

    #[test]
    fn duplicate_competitor_is_rejected() {
        let result = SkillRatingTracker::new(
            RatingConfig::default(),
            &[Competitor::learned("twin"), Competitor::scripted("twin")],
        );
        assert!(matches!(result, Err(RatingError::DuplicateCompetitor(_))));
    }

    #[test]
    fn rank_order_orders_means() {
        let mut tracker = tracker();
        let observation = RankObservation::from_ordering([
            CompetitorId::from("alpha"),
            CompetitorId::from("beta"),
        ]);
        tracker.ingest_episode_ranks(&observation).unwrap();

        let alpha = tracker.belief(&CompetitorId::from("alpha")).unwrap().mean();
        let beta = tracker.belief(&CompetitorId::from("beta")).unwrap().mean();
        assert!(alpha > beta);
    }

    #[test]
    fn scripted_belief_never_drifts() {
        let mut tracker = tracker();
        let combat = CompetitorId::from("Combat");
        let before = *tracker.belief(&combat).unwrap();

        for _ in 0..5 {
            let observation = RankObservation::from_ordering([
                combat.clone(),
                CompetitorId::from("alpha"),
                CompetitorId::from("beta"),
            ]);
            tracker.ingest_episode_ranks(&observation).unwrap();
        }

        let after = *tracker.belief(&combat).unwrap();
        assert!((before.mean() - after.mean()).abs() < f64::EPSILON);
        assert!((before.stddev() - after.stddev()).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_competitor_fails_without_mutation() {
        let mut tracker = tracker();
        let before = tracker.report();

        let observation = RankObservation::from_ordering([
            CompetitorId::from("alpha"),
            CompetitorId::from("intruder"),
        ]);
        let result = tracker.ingest_episode_ranks(&observation);
        assert!(matches!(result, Err(RatingError::UnknownCompetitor(_))));
        assert_eq!(tracker.report(), before);
    }

    #[test]
    fn empty_observation_is_a_no_op() {
        let mut tracker = tracker();
        let before = tracker.report();
        tracker
            .ingest_episode_ranks(&RankObservation::default())
            .unwrap();
        assert_eq!(tracker.report(), before);
    }

    #[test]
    fn batch_applies_instances_in_order() {
        let mut batched = tracker();
        let instances = vec![
            RankObservation::from_ordering([
                CompetitorId::from("alpha"),
                CompetitorId::from("beta"),
            ]),
            RankObservation::from_ordering([
                CompetitorId::from("beta"),
                CompetitorId::from("alpha"),
            ]),
        ];
        batched.ingest_evaluation_batch(&instances).unwrap();

        let mut sequential = tracker();
        for observation in &instances {
            sequential.ingest_episode_ranks(observation).unwrap();
        }

        assert_eq!(batched.report(), sequential.report());
    }

    #[test]
    fn report_exposes_means_under_sr_keys() {
        let tracker = tracker();
        let report = tracker.report();
        assert_eq!(report.len(), 3);
        assert!(report.contains_key("SR_alpha"));
        assert!(report.contains_key("SR_beta"));
        assert!(
            (report.get("SR_Combat").copied().unwrap()
                - RatingConfig::default().scripted_mean)
                .abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn prefixed_report_prepends_prefix() {
        let tracker = tracker();
        let report = tracker.report_with_prefix("eval/");
        assert!(report.contains_key("eval/SR_alpha"));
    }
}
