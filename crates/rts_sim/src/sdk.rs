//! Agent-facing surface (§4.7): a read-only `WorldView`, a write-only
//! `Actions` surface, and the four lifecycle hooks an agent implements.
//!
//! `rts_agent_sdk` re-exports these and adds the parts explicitly out of
//! core scope (§1) — the CSV log sink and authoring conveniences — rather
//! than duplicating them, so there is exactly one `WorldView`/`Actions`
//! definition for the whole workspace.

use rts_core::AgentId;

use crate::catalogs::UnitKind;
use crate::command::Command;
use crate::graph::astar;
use crate::unit::UnitId;
use crate::world::World;

/// Snapshot-style info about one unit, suitable for an agent's decision
/// logic without exposing the engine's internal `Unit`/`Action` types.
#[derive(Clone, Debug)]
pub struct UnitInfo {
    pub id: UnitId,
    pub kind: UnitKind,
    pub owner: AgentId,
    pub pos: (u16, u16),
    pub health: i32,
    pub max_health: i32,
    pub is_built: bool,
    pub action: &'static str,
    pub can_move: bool,
    pub can_build: bool,
    pub can_train: bool,
    pub can_attack: bool,
    pub can_gather: bool,
}

/// Read-only view of the world as seen by one agent. Never constructed by
/// agents themselves; the controller builds one per `update`/`init_round`/
/// `learn` call and hands it a `&WorldView`.
pub struct WorldView<'a> {
    world: &'a World,
    agent: AgentId,
    enemy: AgentId,
}

impl<'a> WorldView<'a> {
    pub fn new(world: &'a World, agent: AgentId, enemy: AgentId) -> Self {
        Self { world, agent, enemy }
    }

    pub fn map_size(&self) -> (u16, u16) {
        (self.world.map.width(), self.world.map.height())
    }

    pub fn own_gold(&self) -> u32 {
        self.world.gold(self.agent)
    }

    pub fn enemy_gold(&self) -> u32 {
        self.world.gold(self.enemy)
    }

    pub fn own_units_by_type(&self, kind: UnitKind) -> Vec<UnitInfo> {
        self.world
            .registry
            .by_owner_type(self.agent, kind)
            .iter()
            .filter_map(|&id| self.unit_info(id))
            .collect()
    }

    pub fn enemy_units_by_type(&self, kind: UnitKind) -> Vec<UnitInfo> {
        self.world
            .registry
            .by_owner_type(self.enemy, kind)
            .iter()
            .filter_map(|&id| self.unit_info(id))
            .collect()
    }

    pub fn mines(&self) -> Vec<UnitInfo> {
        self.world
            .registry
            .by_type(UnitKind::Mine)
            .iter()
            .filter_map(|&id| self.unit_info(id))
            .collect()
    }

    pub fn unit_info(&self, id: UnitId) -> Option<UnitInfo> {
        let unit = self.world.registry.get(id)?;
        let descriptor = self.world.catalogs.descriptor(unit.kind);
        Some(UnitInfo {
            id: unit.id,
            kind: unit.kind,
            owner: unit.owner,
            pos: unit.pos,
            health: unit.health,
            max_health: unit.max_health,
            is_built: unit.is_built,
            action: unit.action.label(),
            can_move: descriptor.can_move,
            can_build: descriptor.can_build,
            can_train: descriptor.can_train,
            can_attack: descriptor.can_attack,
            can_gather: descriptor.can_gather,
        })
    }

    pub fn is_walkable(&self, pos: (u16, u16)) -> bool {
        self.world.map.is_walkable((pos.0 as i32, pos.1 as i32))
    }

    pub fn is_buildable(&self, pos: (u16, u16)) -> bool {
        self.world.map.is_buildable((pos.0 as i32, pos.1 as i32))
    }

    pub fn area_buildable(&self, anchor: (u16, u16), kind: UnitKind) -> bool {
        let footprint = self.world.catalogs.descriptor(kind).footprint;
        self.world.map.area_buildable(anchor, footprint, &[])
    }

    pub fn bounded_area_buildable(&self, anchor: (u16, u16), kind: UnitKind) -> bool {
        let footprint = self.world.catalogs.descriptor(kind).footprint;
        self.world.map.bounded_area_buildable(anchor, footprint, &[])
    }

    /// Path between two tiles, excluding `from` (§4.2 contract).
    pub fn path(&self, from: (u16, u16), to: (u16, u16)) -> Option<Vec<(u16, u16)>> {
        let mut scratch = crate::graph::SearchState::new();
        let path = astar(&self.world.map, &mut scratch, from, to, 2000);
        if path.is_empty() {
            None
        } else {
            Some(path.nodes)
        }
    }

    /// Path from `from` to any walkable neighbor of `target`'s footprint.
    pub fn path_to_unit_neighborhood(&self, from: (u16, u16), target: UnitId) -> Option<Vec<(u16, u16)>> {
        let unit = self.world.registry.get(target)?;
        let footprint = self.world.catalogs.descriptor(unit.kind).footprint;
        let border = self.world.map.walkable_neighbor_of_footprint(unit.pos, footprint)?;
        self.path(from, border)
    }

    /// Every in-bounds anchor at which `kind`'s footprint would currently
    /// fit (buildable, no exclusion set — useful for scouting sites before
    /// a worker is standing next to any of them).
    pub fn prospective_build_positions(&self, kind: UnitKind) -> Vec<(u16, u16)> {
        let footprint = self.world.catalogs.descriptor(kind).footprint;
        let (w, h) = self.map_size();
        let mut sites = Vec::new();
        for x in 0..w {
            for y in 0..h {
                if self.world.map.bounded_area_buildable((x, y), footprint, &[]) {
                    sites.push((x, y));
                }
            }
        }
        sites
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn enemy(&self) -> AgentId {
        self.enemy
    }
}

/// Write surface handed to `Agent::update`. Commands are queued here and
/// dispatched by the controller after `update` returns (§5: agents never
/// mutate the world directly).
pub struct Actions {
    agent: AgentId,
    pub(crate) commands: Vec<Command>,
    pub(crate) log_rows: Vec<Vec<(String, String)>>,
}

impl Actions {
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            commands: Vec::new(),
            log_rows: Vec::new(),
        }
    }

    pub fn move_unit(&mut self, unit: UnitId, target: (u16, u16)) {
        self.commands.push(Command::Move { unit, target });
    }

    pub fn build(&mut self, worker: UnitId, anchor: (u16, u16), kind: UnitKind) {
        self.commands.push(Command::Build { worker, anchor, kind });
    }

    pub fn gather(&mut self, worker: UnitId, mine: UnitId, base: UnitId) {
        self.commands.push(Command::Gather { worker, mine, base });
    }

    pub fn train(&mut self, structure: UnitId, kind: UnitKind) {
        self.commands.push(Command::Train { structure, kind });
    }

    pub fn attack(&mut self, attacker: UnitId, target: UnitId) {
        self.commands.push(Command::Attack { attacker, target });
    }

    /// Append one free-form key/value row to this agent's per-round log.
    pub fn log_row(&mut self, row: Vec<(String, String)>) {
        self.log_rows.push(row);
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }
}

/// The four lifecycle hooks an agent implements (§4.7, §9: replaces the
/// source's `Agent -> PlanningAgent` inheritance with a plain interface).
pub trait Agent {
    fn init_match(&mut self);
    fn init_round(&mut self, world: &WorldView);
    fn update(&mut self, world: &WorldView, actions: &mut Actions);
    fn learn(&mut self, world: &WorldView);
}
