//! Team reward pooling and interpolation.
//!
//! In cooperative mode, each population's per-task rewards are pooled with
//! an element-wise maximum -- one member completing a task counts for the
//! whole team -- and every member's scalar reward is interpolated between
//! its own reward and the pooled team sum by the `team_spirit` weight.

use std::collections::BTreeMap;

use crucible_types::{AgentId, PopulationId};

use crate::error::ShapingError;

/// Per-agent task rewards as reported in the environment's step info.
pub type TaskRewards = BTreeMap<String, f64>;

/// Blends individual and team-pooled rewards by a fixed interpolation
/// weight.
///
/// Stateless across steps: populations and task rewards are taken fresh
/// from the current step's info and nothing persists across episodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamRewardBlender {
    /// Whether team mode (cooperative play) is enabled at all.
    cooperative: bool,
    /// Interpolation weight in `[0, 1]`: 0 = purely individual,
    /// 1 = purely team-pooled.
    team_spirit: f64,
}

impl TeamRewardBlender {
    /// Build a blender.
    ///
    /// # Errors
    ///
    /// Returns [`ShapingError::TeamSpiritOutOfRange`] when `team_spirit`
    /// is outside `[0, 1]` (or not a number).
    pub fn new(cooperative: bool, team_spirit: f64) -> Result<Self, ShapingError> {
        if !(0.0..=1.0).contains(&team_spirit) {
            return Err(ShapingError::TeamSpiritOutOfRange { value: team_spirit });
        }
        Ok(Self {
            cooperative,
            team_spirit,
        })
    }

    /// A pass-through blender (team mode disabled).
    pub const fn disabled() -> Self {
        Self {
            cooperative: false,
            team_spirit: 0.0,
        }
    }

    /// Whether team mode is enabled.
    pub const fn cooperative(&self) -> bool {
        self.cooperative
    }

    /// The interpolation weight.
    pub const fn team_spirit(&self) -> f64 {
        self.team_spirit
    }

    /// Rewrite per-agent scalar rewards for one step.
    ///
    /// Per population, a per-task reward vector is formed as the
    /// element-wise maximum over the member vectors (missing entries read
    /// as 0), summed into the population's team reward; each member then
    /// receives `team_spirit * team_reward + (1 - team_spirit) * own`.
    ///
    /// With team mode disabled the input rewards are returned unchanged.
    /// An agent absent from `populations` cannot be pooled and passes
    /// through unchanged. A single-member population pools to that
    /// member's own task vector.
    pub fn blend(
        &self,
        rewards: &BTreeMap<AgentId, f64>,
        task_rewards: &BTreeMap<AgentId, TaskRewards>,
        populations: &BTreeMap<AgentId, PopulationId>,
    ) -> BTreeMap<AgentId, f64> {
        if !self.cooperative {
            return rewards.clone();
        }

        // Union of task rewards across each population: per-task maximum.
        let mut pooled: BTreeMap<PopulationId, TaskRewards> = BTreeMap::new();
        for (agent_id, tasks) in task_rewards {
            let Some(population) = populations.get(agent_id) else {
                continue;
            };
            let team = pooled.entry(*population).or_default();
            for (task, reward) in tasks {
                let entry = team.entry(task.clone()).or_insert(0.0);
                *entry = entry.max(*reward);
            }
        }

        // Team reward is the sum over the pooled task vector.
        let team_reward: BTreeMap<PopulationId, f64> = pooled
            .into_iter()
            .map(|(population, tasks)| (population, tasks.values().sum()))
            .collect();

        rewards
            .iter()
            .map(|(agent_id, own)| {
                let blended = populations.get(agent_id).map_or(*own, |population| {
                    let team = team_reward.get(population).copied().unwrap_or(0.0);
                    self.team_spirit * team + (1.0 - self.team_spirit) * own
                });
                (*agent_id, blended)
            })
            .collect()
    }
}

impl Default for TeamRewardBlender {
    fn default() -> Self {
        Self::disabled()
    }
}
