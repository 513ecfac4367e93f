//! Per-agent action history for one episode.
//!
//! The store remembers, for each agent, the sell price it last used and the
//! ordered log of its move directions. Both feed the exploration-encouraging
//! observation mask: the previously used price is zeroed out of the next
//! observation's price mask.
//!
//! Lifecycle: `reset` exactly once per episode start, before any step;
//! `record_action` once per agent per step, before the action is forwarded
//! to the environment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crucible_types::{AgentId, Direction, PriceLevel};

use crate::error::ShapingError;

/// One agent's recorded history within the current episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The sell price the agent chose on its most recent step
    /// ([`PriceLevel`] 0 until the agent first sells).
    pub previous_sell_price: PriceLevel,
    /// Every move direction the agent has taken this episode, in order.
    pub move_log: Vec<Direction>,
}

/// Per-agent transient state, reset every episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStore {
    /// History per agent currently known to the episode.
    entries: BTreeMap<AgentId, HistoryEntry>,
}

impl HistoryStore {
    /// An empty store with no episode state.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Re-create one fresh [`HistoryEntry`] per agent id.
    ///
    /// Drops all state from the previous episode. Must be called exactly
    /// once per episode start, before any step.
    pub fn reset(&mut self, agent_ids: impl IntoIterator<Item = AgentId>) {
        self.entries = agent_ids
            .into_iter()
            .map(|id| (id, HistoryEntry::default()))
            .collect();
    }

    /// Record one step's action components for an agent.
    ///
    /// Overwrites the previous sell price when `sell_price` is present and
    /// appends to the move log when `direction` is present.
    ///
    /// # Errors
    ///
    /// Returns [`ShapingError::UnknownAgent`] if the agent was never part
    /// of a `reset` -- recording before reset is a step-loop wiring bug.
    pub fn record_action(
        &mut self,
        agent_id: AgentId,
        sell_price: Option<PriceLevel>,
        direction: Option<Direction>,
    ) -> Result<(), ShapingError> {
        let entry = self
            .entries
            .get_mut(&agent_id)
            .ok_or(ShapingError::UnknownAgent(agent_id))?;

        if let Some(price) = sell_price {
            entry.previous_sell_price = price;
        }
        if let Some(dir) = direction {
            entry.move_log.push(dir);
        }
        Ok(())
    }

    /// The sell price an agent last used, or `None` for an unknown agent.
    pub fn previous_sell_price(&self, agent_id: AgentId) -> Option<PriceLevel> {
        self.entries
            .get(&agent_id)
            .map(|entry| entry.previous_sell_price)
    }

    /// The ordered move log for an agent, or `None` for an unknown agent.
    pub fn move_log(&self, agent_id: AgentId) -> Option<&[Direction]> {
        self.entries
            .get(&agent_id)
            .map(|entry| entry.move_log.as_slice())
    }

    /// Whether the store holds an entry for this agent.
    pub fn contains(&self, agent_id: AgentId) -> bool {
        self.entries.contains_key(&agent_id)
    }

    /// Number of agents currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store tracks no agents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_every_entry() {
        let agents = [AgentId::new(), AgentId::new(), AgentId::new()];
        let mut store = HistoryStore::new();
        store.reset(agents);

        assert_eq!(store.len(), 3);
        for id in agents {
            assert_eq!(store.previous_sell_price(id), Some(PriceLevel(0)));
            assert_eq!(store.move_log(id), Some(&[][..]));
        }
    }

    #[test]
    fn record_action_round_trip() {
        let agent = AgentId::new();
        let mut store = HistoryStore::new();
        store.reset([agent]);

        store
            .record_action(agent, Some(PriceLevel(4)), Some(Direction::North))
            .unwrap();

        assert_eq!(store.previous_sell_price(agent), Some(PriceLevel(4)));
        assert_eq!(store.move_log(agent), Some(&[Direction::North][..]));
    }

    #[test]
    fn price_overwrites_and_moves_accumulate() {
        let agent = AgentId::new();
        let mut store = HistoryStore::new();
        store.reset([agent]);

        store
            .record_action(agent, Some(PriceLevel(2)), Some(Direction::East))
            .unwrap();
        store
            .record_action(agent, Some(PriceLevel(7)), Some(Direction::West))
            .unwrap();

        assert_eq!(store.previous_sell_price(agent), Some(PriceLevel(7)));
        assert_eq!(
            store.move_log(agent),
            Some(&[Direction::East, Direction::West][..])
        );
    }

    #[test]
    fn absent_components_leave_state_untouched() {
        let agent = AgentId::new();
        let mut store = HistoryStore::new();
        store.reset([agent]);

        store
            .record_action(agent, Some(PriceLevel(5)), Some(Direction::South))
            .unwrap();
        store.record_action(agent, None, None).unwrap();

        assert_eq!(store.previous_sell_price(agent), Some(PriceLevel(5)));
        assert_eq!(store.move_log(agent), Some(&[Direction::South][..]));
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut store = HistoryStore::new();
        store.reset([AgentId::new()]);

        let stranger = AgentId::new();
        let result = store.record_action(stranger, Some(PriceLevel(1)), None);
        assert!(matches!(result, Err(ShapingError::UnknownAgent(id)) if id == stranger));
    }

    #[test]
    fn serde_roundtrip() {
        let agent = AgentId::new();
        let mut store = HistoryStore::new();
        store.reset([agent]);
        store
            .record_action(agent, Some(PriceLevel(3)), Some(Direction::West))
            .unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let restored: HistoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn reset_drops_previous_episode() {
        let first = AgentId::new();
        let second = AgentId::new();
        let mut store = HistoryStore::new();

        store.reset([first]);
        store
            .record_action(first, Some(PriceLevel(9)), Some(Direction::North))
            .unwrap();

        store.reset([second]);
        assert!(!store.contains(first));
        assert_eq!(store.previous_sell_price(second), Some(PriceLevel(0)));
    }
}
