//! Match configuration (§6). Plain serde-derived struct with field defaults,
//! the way the teacher's game configs are assembled.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub map_width: u16,
    pub map_height: u16,

    pub starting_gold: u32,
    pub mine_starting_gold: u32,
    pub mines_per_round: u8,

    /// 1-30 typical; 0 is an intentional full pause (§4.3).
    pub game_speed: u32,
    pub rounds_per_match: u8,
    pub max_seconds_per_round: u32,
    pub enable_learning: bool,

    /// Simulation tick rate. Not an agent-facing knob (§6 lists it among
    /// cosmetic runtime keys only indirectly, via game speed); carried here
    /// because every `Micros` duration needs it to become a tick count.
    pub tick_hz: u32,

    /// Cosmetic runtime toggles (§6): no rendering layer exists in this
    /// workspace to act on them, but they are carried on `MatchConfig` for
    /// forward-compatibility with a future viewer, the way `sim_td` keeps
    /// `td-types` decoupled from `td-viewer-app`.
    pub debug: DebugToggles,
}

/// Cosmetic overlay toggles (§6). None of these change simulation
/// semantics; they exist only so a future presentation layer has somewhere
/// to read runtime UI state from.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugToggles {
    pub per_agent_overlay: bool,
    pub per_unit_overlay: bool,
    pub influence_map_overlay: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            map_width: 40,
            map_height: 40,
            starting_gold: 1000,
            mine_starting_gold: 10_000,
            mines_per_round: 2,
            game_speed: 1,
            rounds_per_match: 3,
            max_seconds_per_round: 300,
            enable_learning: true,
            tick_hz: 60,
            debug: DebugToggles::default(),
        }
    }
}

impl MatchConfig {
    pub fn clamp_game_speed(&mut self) {
        self.game_speed = self.game_speed.min(30);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = MatchConfig::default();
        assert_eq!(config.starting_gold, 1000);
        assert_eq!(config.mine_starting_gold, 10_000);
        assert_eq!(config.mines_per_round, 2);
        assert_eq!(config.game_speed, 1);
        assert_eq!(config.rounds_per_match, 3);
        assert_eq!(config.max_seconds_per_round, 300);
    }

    #[test]
    fn round_trips_through_json() {
        let config = MatchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.starting_gold, config.starting_gold);
    }

    #[test]
    fn clamp_game_speed_caps_at_thirty() {
        let mut config = MatchConfig { game_speed: 99, ..MatchConfig::default() };
        config.clamp_game_speed();
        assert_eq!(config.game_speed, 30);
    }
}
