//! Stateful per-agent reward shaping over resource deltas.
//!
//! The shaper owns two pieces of per-episode state: the action history
//! (via [`HistoryStore`]) and a per-agent resource baseline -- the last
//! recorded value of every resource. Each step it:
//!
//! 1. Masks the agent's previously used sell price out of the observation
//!    (pre-step), forcing the policy to explore a different price.
//! 2. Records the chosen sell price and move direction (pre-action).
//! 3. Adds `delta * weight` per resource to the raw reward and advances
//!    the baseline to the current value (post-step).
//!
//! The baseline update in step 3 is unconditional: zero-weight resources
//! and terminal steps still advance it, so the delta stream stays
//! continuous across every step boundary and a re-ordered caller can
//! never double-count.

use std::collections::BTreeMap;

use tracing::debug;

use crucible_types::{AgentId, Observation, PriceLevel, ResourceKind, ResourceLevels, StepAction};

use crate::config::ShaperConfig;
use crate::error::ShapingError;
use crate::history::HistoryStore;

/// The post-step output for one agent: shaped reward plus the pass-through
/// termination flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedStep {
    /// The shaped scalar reward.
    pub reward: f64,
    /// Whether the agent's episode terminated this step (pass-through).
    pub terminated: bool,
    /// Whether the agent's episode was truncated this step (pass-through).
    pub truncated: bool,
}

/// Converts raw per-agent resource deltas into a shaped scalar reward and
/// applies the exploration-encouraging observation mask.
///
/// One instance per rollout worker; mutated only by that worker's step
/// loop.
#[derive(Debug, Clone, Default)]
pub struct RewardShaper {
    /// Fixed configuration (weights, enable toggle).
    config: ShaperConfig,
    /// Per-agent action history for the current episode.
    history: HistoryStore,
    /// Last recorded resource values per agent.
    baselines: BTreeMap<AgentId, ResourceLevels>,
}

impl RewardShaper {
    /// Build a shaper with the given configuration.
    pub const fn new(config: ShaperConfig) -> Self {
        Self {
            config,
            history: HistoryStore::new(),
            baselines: BTreeMap::new(),
        }
    }

    /// Re-initialize all per-episode state for the given agent roster.
    ///
    /// Every agent's resource baseline returns to the episode baseline
    /// (vitals at 100, everything else 0) and the history store is reset.
    /// Idempotent for the same id set: calling twice at episode start
    /// yields the same state as calling once.
    pub fn reset(&mut self, agent_ids: &[AgentId]) {
        self.baselines = agent_ids
            .iter()
            .map(|id| (*id, ResourceLevels::episode_baseline()))
            .collect();
        self.history.reset(agent_ids.iter().copied());
        debug!(agents = agent_ids.len(), "reward shaper reset for new episode");
    }

    /// Zero the agent's previously used sell price out of the observation's
    /// price mask.
    ///
    /// Pure transform: reads history, mutates only the given observation.
    /// An agent the store has never seen behaves as just-reset (previous
    /// price 0), so late joiners get the same mask a fresh agent would.
    pub fn mask_observation(&self, agent_id: AgentId, observation: &mut Observation) {
        let previous = self
            .history
            .previous_sell_price(agent_id)
            .unwrap_or(PriceLevel(0));
        if !observation.action_targets.sell_price.zero(previous) {
            debug!(
                %agent_id,
                price = %previous,
                levels = observation.action_targets.sell_price.levels(),
                "previous sell price outside observation mask range"
            );
        }
    }

    /// Record the sell price and move direction of an action.
    ///
    /// The action itself passes through to the environment unchanged; this
    /// hook only updates the history store.
    ///
    /// # Errors
    ///
    /// Returns [`ShapingError::UnknownAgent`] if the agent was never part
    /// of a `reset`.
    pub fn record_action(
        &mut self,
        agent_id: AgentId,
        action: &StepAction,
    ) -> Result<(), ShapingError> {
        self.history
            .record_action(agent_id, action.sell_price(), action.move_direction())
    }

    /// Shape one agent's post-step reward from its current resource values.
    ///
    /// For every resource kind: `delta = current - baseline`, the shaped
    /// reward gains `delta * weight`, and the baseline advances to the
    /// current value. The advance happens even for zero-weight resources
    /// and even when the agent terminated this step.
    ///
    /// An agent with no stored baseline (late joiner) is seeded from the
    /// current values with a zero delta for this step -- entry into the
    /// episode must not read as a reward spike.
    pub fn shape_reward(
        &mut self,
        agent_id: AgentId,
        current: &ResourceLevels,
        raw_reward: f64,
        terminated: bool,
        truncated: bool,
    ) -> ShapedStep {
        let Some(baseline) = self.baselines.get_mut(&agent_id) else {
            debug!(%agent_id, "late-joining agent: seeding resource baseline, zero delta");
            self.baselines.insert(agent_id, current.clone());
            return ShapedStep {
                reward: raw_reward,
                terminated,
                truncated,
            };
        };

        let mut reward = raw_reward;
        if self.config.custom_reward_enabled {
            for kind in ResourceKind::ALL {
                let delta = current.get(kind) - baseline.get(kind);
                reward += delta * self.config.bonus_weights.weight(kind);
            }
        }
        *baseline = current.clone();

        ShapedStep {
            reward,
            terminated,
            truncated,
        }
    }

    /// Read access to the history store (mask inputs, tests).
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// The stored baseline for an agent, if it has one.
    pub fn baseline(&self, agent_id: AgentId) -> Option<&ResourceLevels> {
        self.baselines.get(&agent_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crucible_types::{Direction, MoveDecision, SellDecision};

    use crate::config::BonusWeights;

    use super::*;

    fn gold_shaper(weight: f64) -> RewardShaper {
        RewardShaper::new(ShaperConfig {
            custom_reward_enabled: true,
            bonus_weights: BonusWeights::disabled().with_weight(ResourceKind::Gold, weight),
        })
    }

    fn levels_with_gold(gold: f64) -> ResourceLevels {
        let mut levels = ResourceLevels::episode_baseline();
        levels.set(ResourceKind::Gold, gold);
        levels
    }

    #[test]
    fn delta_times_weight_is_added_once() {
        let agent = AgentId::new();
        let mut shaper = gold_shaper(1.0);
        shaper.reset(&[agent]);

        // Gold goes 0 -> 5: shaped contribution is 5.
        let step = shaper.shape_reward(agent, &levels_with_gold(5.0), 0.25, false, false);
        assert!((step.reward - 5.25).abs() < 1e-9);

        // Gold stays at 5: no further contribution.
        let step = shaper.shape_reward(agent, &levels_with_gold(5.0), 0.25, false, false);
        assert!((step.reward - 0.25).abs() < 1e-9);
    }

    #[test]
    fn shaped_minus_raw_equals_weighted_delta_sum() {
        let agent = AgentId::new();
        let mut shaper = RewardShaper::new(ShaperConfig {
            custom_reward_enabled: true,
            bonus_weights: BonusWeights::disabled()
                .with_weight(ResourceKind::Gold, 2.0)
                .with_weight(ResourceKind::Health, -0.5),
        });
        shaper.reset(&[agent]);

        let mut current = ResourceLevels::episode_baseline();
        current.set(ResourceKind::Gold, 3.0); // delta +3, weight 2
        current.set(ResourceKind::Health, 90.0); // delta -10, weight -0.5
        current.set(ResourceKind::FishingExp, 40.0); // delta +40, weight 0

        let raw = 1.5;
        let step = shaper.shape_reward(agent, &current, raw, false, false);
        let expected_bonus = 3.0 * 2.0 + (-10.0) * (-0.5);
        assert!((step.reward - raw - expected_bonus).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_resources_still_advance_baseline() {
        let agent = AgentId::new();
        let mut shaper = gold_shaper(1.0);
        shaper.reset(&[agent]);

        let mut current = ResourceLevels::episode_baseline();
        current.set(ResourceKind::FishingExp, 12.0);
        let _ = shaper.shape_reward(agent, &current, 0.0, false, false);

        let stored = shaper.baseline(agent).unwrap();
        assert!((stored.get(ResourceKind::FishingExp) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn terminal_step_delta_still_counts() {
        let agent = AgentId::new();
        let mut shaper = gold_shaper(1.0);
        shaper.reset(&[agent]);

        let step = shaper.shape_reward(agent, &levels_with_gold(8.0), 0.0, true, false);
        assert!((step.reward - 8.0).abs() < 1e-9);
        assert!(step.terminated);

        // Baseline advanced on the terminal step too.
        let stored = shaper.baseline(agent).unwrap();
        assert!((stored.get(ResourceKind::Gold) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn late_joiner_is_seeded_with_zero_delta() {
        let known = AgentId::new();
        let mut shaper = gold_shaper(1.0);
        shaper.reset(&[known]);

        let stranger = AgentId::new();
        let step = shaper.shape_reward(stranger, &levels_with_gold(50.0), 0.0, false, false);
        // No reward spike on entry.
        assert!(step.reward.abs() < 1e-9);

        // The next step deltas against the seeded values.
        let step = shaper.shape_reward(stranger, &levels_with_gold(53.0), 0.0, false, false);
        assert!((step.reward - 3.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_custom_reward_passes_raw_through() {
        let agent = AgentId::new();
        let mut shaper = RewardShaper::new(ShaperConfig {
            custom_reward_enabled: false,
            bonus_weights: BonusWeights::disabled().with_weight(ResourceKind::Gold, 1.0),
        });
        shaper.reset(&[agent]);

        let step = shaper.shape_reward(agent, &levels_with_gold(5.0), 0.75, false, false);
        assert!((step.reward - 0.75).abs() < f64::EPSILON);

        // Baselines still track so enabling later would not spike.
        let stored = shaper.baseline(agent).unwrap();
        assert!((stored.get(ResourceKind::Gold) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mask_zeroes_previous_price() {
        let agent = AgentId::new();
        let mut shaper = gold_shaper(0.0);
        shaper.reset(&[agent]);

        let action = StepAction {
            sell: Some(SellDecision {
                price: PriceLevel(2),
            }),
            movement: Some(MoveDecision {
                direction: Direction::North,
            }),
        };
        shaper.record_action(agent, &action).unwrap();

        let mut obs = Observation::with_uniform_targets(4);
        shaper.mask_observation(agent, &mut obs);
        assert_eq!(obs.action_targets.sell_price.gate(PriceLevel(2)), Some(0.0));
        assert_eq!(obs.action_targets.sell_price.gate(PriceLevel(1)), Some(1.0));
    }

    #[test]
    fn mask_unknown_agent_uses_reset_price() {
        let shaper = gold_shaper(0.0);

        let stranger = AgentId::new();
        let mut obs = Observation::with_uniform_targets(4);
        shaper.mask_observation(stranger, &mut obs);
        // Behaves as just-reset: price level 0 masked.
        assert_eq!(obs.action_targets.sell_price.gate(PriceLevel(0)), Some(0.0));
    }

    #[test]
    fn reset_is_idempotent_at_episode_start() {
        let agents = [AgentId::new(), AgentId::new()];
        let mut first = gold_shaper(1.0);
        first.reset(&agents);
        let mut second = gold_shaper(1.0);
        second.reset(&agents);
        second.reset(&agents);

        for id in agents {
            assert_eq!(first.baseline(id), second.baseline(id));
        }
    }

    #[test]
    fn record_action_before_reset_is_an_error() {
        let mut shaper = gold_shaper(1.0);
        let result = shaper.record_action(AgentId::new(), &StepAction::default());
        assert!(matches!(result, Err(ShapingError::UnknownAgent(_))));
    }
}
