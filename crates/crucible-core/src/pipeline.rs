//! Per-step orchestration of the shaping, pooling, and termination
//! components.
//!
//! Each rollout worker owns one [`EpisodePipeline`] and drives it through
//! the step cycle:
//!
//! 1. **Reset** -- `begin_episode` at episode start with the environment's
//!    full possible-agent roster.
//! 2. **Observation** -- `mask_observations` before observations reach the
//!    policy (previous sell prices are zeroed out of the price masks).
//! 3. **Action** -- `record_actions` before actions reach the environment
//!    (sell prices and move directions land in the history store).
//! 4. **Post-step** -- `shape_step` after the environment step: per-agent
//!    reward shaping, then team pooling when cooperative mode is on, then
//!    the termination policy's all-done decision.
//!
//! The evaluation-cycle hook [`apply_evaluation_ratings`] lives here too:
//! it is the one place where the flat metrics channel, the rating tracker,
//! and the typed rank reports meet.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crucible_rating::{
    MetricValue, RANK_METRIC_PREFIX, RatingError, SkillRatingTracker, extract_ranks_from_metrics,
};
use crucible_shaping::{
    RewardShaper, ShapedStep, ShapingError, TaskRewards, TeamRewardBlender,
};
use crucible_types::{AgentId, CompetitorId, Observation, PopulationId, ResourceLevels, StepAction};

use crate::config::{ConfigError, SimulationConfig};
use crate::termination::{EpisodeTerminationPolicy, TerminationError};

/// Errors that can occur while driving the step pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A shaping operation failed.
    #[error("shaping error: {source}")]
    Shaping {
        /// The underlying shaping error.
        #[from]
        source: ShapingError,
    },

    /// A rating operation failed.
    #[error("rating error: {source}")]
    Rating {
        /// The underlying rating error.
        #[from]
        source: RatingError,
    },

    /// Configuration could not be expressed in domain types.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The termination policy rejected its configuration.
    #[error("termination error: {source}")]
    Termination {
        /// The underlying termination error.
        #[from]
        source: TerminationError,
    },
}

/// Everything the step loop supplies for one agent after the environment
/// step.
#[derive(Debug, Clone)]
pub struct AgentStepInput {
    /// The agent this input belongs to.
    pub agent_id: AgentId,
    /// The agent's current resource values, queried from the environment.
    pub resources: ResourceLevels,
    /// The raw reward the environment produced.
    pub raw_reward: f64,
    /// Whether the agent's episode terminated this step.
    pub terminated: bool,
    /// Whether the agent's episode was truncated this step.
    pub truncated: bool,
    /// The agent's population (team), from the step info.
    pub population: Option<PopulationId>,
    /// The agent's per-task rewards, from the step info.
    pub task_rewards: TaskRewards,
}

/// The pipeline's output for one step batch.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Shaped (and, in cooperative mode, team-blended) results per agent.
    pub steps: BTreeMap<AgentId, ShapedStep>,
    /// The episode-wide all-done flag after this step.
    pub all_done: bool,
}

/// Drives the shaping, pooling, and termination components through one
/// episode at a time.
///
/// One instance per rollout worker; mutated only by that worker's step
/// loop.
#[derive(Debug, Clone)]
pub struct EpisodePipeline {
    /// Per-agent reward shaping and observation masking.
    shaper: RewardShaper,
    /// Team reward pooling.
    blender: TeamRewardBlender,
    /// Episode termination latching.
    termination: EpisodeTerminationPolicy,
}

impl EpisodePipeline {
    /// Assemble a pipeline from already-built components.
    pub const fn new(
        shaper: RewardShaper,
        blender: TeamRewardBlender,
        termination: EpisodeTerminationPolicy,
    ) -> Self {
        Self {
            shaper,
            blender,
            termination,
        }
    }

    /// Build a pipeline from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`], [`PipelineError::Shaping`], or
    /// [`PipelineError::Termination`] when a section cannot be expressed
    /// in domain types.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, PipelineError> {
        let shaper = RewardShaper::new(config.shaper_config()?);
        let blender = TeamRewardBlender::new(config.team.cooperative, config.team.team_spirit)?;
        let termination = EpisodeTerminationPolicy::new(&config.episode)?;
        Ok(Self::new(shaper, blender, termination))
    }

    /// Reset all per-episode state for a new episode.
    ///
    /// `possible_agents` is the environment's full identity list for this
    /// episode. Must run before any step of the episode.
    pub fn begin_episode(&mut self, possible_agents: &[AgentId]) {
        self.shaper.reset(possible_agents);
        self.termination.reset();
        info!(agents = possible_agents.len(), "episode started");
    }

    /// Rewrite observations before they reach the policy.
    pub fn mask_observations(&self, observations: &mut BTreeMap<AgentId, Observation>) {
        for (agent_id, observation) in observations.iter_mut() {
            self.shaper.mask_observation(*agent_id, observation);
        }
    }

    /// Record actions before they reach the environment.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Shaping`] when an action belongs to an
    /// agent the episode was never reset with.
    pub fn record_actions(
        &mut self,
        actions: &BTreeMap<AgentId, StepAction>,
    ) -> Result<(), PipelineError> {
        for (agent_id, action) in actions {
            self.shaper.record_action(*agent_id, action)?;
        }
        Ok(())
    }

    /// Run the post-step phase for one step batch.
    ///
    /// `tick` and `active_agent_count` are the environment's tick counter
    /// and live-agent-count signals, sampled once for the whole batch.
    pub fn shape_step(
        &mut self,
        tick: u64,
        active_agent_count: u32,
        inputs: &[AgentStepInput],
    ) -> StepOutcome {
        // Phase 1: per-agent reward shaping.
        let mut steps = BTreeMap::new();
        for input in inputs {
            let shaped = self.shaper.shape_reward(
                input.agent_id,
                &input.resources,
                input.raw_reward,
                input.terminated,
                input.truncated,
            );
            steps.insert(input.agent_id, shaped);
        }

        // Phase 2: team pooling (identity when cooperative mode is off).
        if self.blender.cooperative() {
            let rewards: BTreeMap<AgentId, f64> = steps
                .iter()
                .map(|(agent_id, step)| (*agent_id, step.reward))
                .collect();
            let task_rewards: BTreeMap<AgentId, TaskRewards> = inputs
                .iter()
                .map(|input| (input.agent_id, input.task_rewards.clone()))
                .collect();
            let populations: BTreeMap<AgentId, PopulationId> = inputs
                .iter()
                .filter_map(|input| input.population.map(|pop| (input.agent_id, pop)))
                .collect();

            let blended = self.blender.blend(&rewards, &task_rewards, &populations);
            for (agent_id, reward) in blended {
                if let Some(step) = steps.get_mut(&agent_id) {
                    step.reward = reward;
                }
            }
        }

        // Phase 3: episode termination.
        let all_done = self.termination.observe(tick, active_agent_count);
        debug!(tick, active_agent_count, all_done, "step batch shaped");

        StepOutcome { steps, all_done }
    }

    /// Read access to the termination policy.
    pub const fn termination(&self) -> &EpisodeTerminationPolicy {
        &self.termination
    }

    /// Read access to the reward shaper.
    pub const fn shaper(&self) -> &RewardShaper {
        &self.shaper
    }
}

/// Run one evaluation cycle's rating update against the trainer's custom
/// metrics, in place.
///
/// Mirrors the trainer's evaluation sequence: the flattened `Rank_<name>`
/// series are extracted and removed from the metrics, every episode
/// instance is ingested into the tracker in index order, and the tracker's
/// `SR_<name>` report is merged back into the metrics for downstream
/// logging.
///
/// # Errors
///
/// Returns [`PipelineError::Rating`] on any roster/metrics mismatch; the
/// metrics map is left unmodified in that case.
pub fn apply_evaluation_ratings(
    tracker: &mut SkillRatingTracker,
    metrics: &mut BTreeMap<String, MetricValue>,
) -> Result<(), PipelineError> {
    let roster: Vec<CompetitorId> = tracker.roster().cloned().collect();
    let observations = extract_ranks_from_metrics(metrics, &roster)?;

    tracker.ingest_evaluation_batch(&observations)?;

    // The flattened rank keys are consumed here; downstream metrics see
    // only the skill report.
    for competitor in &roster {
        metrics.remove(&format!("{RANK_METRIC_PREFIX}{competitor}"));
    }
    for (key, mean) in tracker.report() {
        metrics.insert(key, MetricValue::Scalar(mean));
    }

    info!(
        instances = observations.len(),
        competitors = roster.len(),
        "evaluation ratings applied"
    );
    Ok(())
}
