//! Serializable snapshot types for agents that want to log or inspect a
//! `WorldView` as plain data, ground: `td-types`'s schemars-derived
//! observation DTOs, the same pattern applied to this SDK's own surface
//! instead of an MCP transport.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use rts_sim::{UnitInfo, UnitKind, WorldView};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct UnitObservation {
    pub kind: String,
    pub owner: u8,
    pub pos: (u16, u16),
    pub health: i32,
    pub max_health: i32,
    pub is_built: bool,
    pub action: String,
}

impl From<&UnitInfo> for UnitObservation {
    fn from(unit: &UnitInfo) -> Self {
        Self {
            kind: format!("{:?}", unit.kind),
            owner: unit.owner,
            pos: unit.pos,
            health: unit.health,
            max_health: unit.max_health,
            is_built: unit.is_built,
            action: unit.action.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct RoundObservation {
    pub map_size: (u16, u16),
    pub own_gold: u32,
    pub enemy_gold: u32,
    pub own_units: Vec<UnitObservation>,
    pub enemy_units: Vec<UnitObservation>,
    pub mines: Vec<UnitObservation>,
}

impl RoundObservation {
    pub fn capture(world: &WorldView) -> Self {
        let own_units = UnitKind::ALL
            .iter()
            .flat_map(|&kind| world.own_units_by_type(kind))
            .collect::<Vec<_>>();
        let enemy_units = UnitKind::ALL
            .iter()
            .flat_map(|&kind| world.enemy_units_by_type(kind))
            .collect::<Vec<_>>();

        Self {
            map_size: world.map_size(),
            own_gold: world.own_gold(),
            enemy_gold: world.enemy_gold(),
            own_units: own_units.iter().map(UnitObservation::from).collect(),
            enemy_units: enemy_units.iter().map(UnitObservation::from).collect(),
            mines: world.mines().iter().map(UnitObservation::from).collect(),
        }
    }
}
