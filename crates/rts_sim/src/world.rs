//! Aggregate simulation state for one round: grid, unit registry, catalogs,
//! and per-agent gold, bundled the way the teacher's `TdState` bundles its
//! grid, entity tables, and wallet into one value threaded through `step`.

use std::collections::HashMap;

use rts_core::AgentId;

use crate::catalogs::Catalogs;
use crate::graph::SearchState;
use crate::grid::Map;
use crate::registry::Registry;

pub struct World {
    pub map: Map,
    pub registry: Registry,
    pub catalogs: Catalogs,
    pub tick_hz: u32,
    gold: HashMap<AgentId, u32>,
    pub search: SearchState,
}

impl World {
    pub fn new(width: u16, height: u16, game_speed: u32, tick_hz: u32) -> Self {
        Self {
            map: Map::new(width, height),
            registry: Registry::new(),
            catalogs: Catalogs::new(game_speed),
            tick_hz,
            gold: HashMap::new(),
            search: SearchState::new(),
        }
    }

    pub fn gold(&self, agent: AgentId) -> u32 {
        *self.gold.get(&agent).unwrap_or(&0)
    }

    pub fn set_gold(&mut self, agent: AgentId, value: u32) {
        self.gold.insert(agent, value);
    }

    /// Debit `amount` from `agent`'s gold. Returns `false` (and leaves gold
    /// unchanged) if the balance would go negative — invariant 4 (§3).
    pub fn debit_gold(&mut self, agent: AgentId, amount: u32) -> bool {
        let balance = self.gold(agent);
        if balance < amount {
            return false;
        }
        self.gold.insert(agent, balance - amount);
        true
    }

    pub fn credit_gold(&mut self, agent: AgentId, amount: u32) {
        let balance = self.gold(agent);
        self.gold.insert(agent, balance.saturating_add(amount));
    }
}
