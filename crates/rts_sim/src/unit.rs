//! Per-unit instance data and the action/sub-phase state it carries (§3, §4.4).

use std::collections::VecDeque;

use rts_core::AgentId;
use slotmap::new_key_type;

use crate::catalogs::UnitKind;

new_key_type! {
    /// Opaque per-round unit id, monotonically allocated by the registry (§4.5).
    pub struct UnitId;
}

/// A path walk in progress: the remaining tiles plus enough state to resume
/// or re-plan after the next tile in the path is found blocked.
#[derive(Clone, Debug)]
pub struct Travel {
    pub target: (u16, u16),
    pub path: VecDeque<(u16, u16)>,
    /// Distance (in tiles) left to cover before arriving at `path[0]`.
    pub remaining: f64,
    pub replan_failures: u32,
}

impl Travel {
    pub fn new(target: (u16, u16), path: Vec<(u16, u16)>) -> Self {
        Self {
            target,
            path: path.into(),
            remaining: 0.0,
            replan_failures: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    ToPosition,
    Building,
}

#[derive(Clone, Debug)]
pub struct BuildState {
    pub structure: UnitId,
    pub phase: BuildPhase,
    pub travel: Option<Travel>,
    pub ticks_remaining: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatherPhase {
    ToMine,
    Mining,
    ToBase,
}

#[derive(Clone, Debug)]
pub struct GatherState {
    pub mine: UnitId,
    pub base: UnitId,
    pub phase: GatherPhase,
    pub travel: Option<Travel>,
    pub ticks_remaining: u64,
    pub carried: u32,
}

#[derive(Clone, Debug)]
pub struct TrainState {
    pub trainee: UnitKind,
    pub ticks_remaining: u64,
}

#[derive(Clone, Debug)]
pub struct AttackState {
    pub target: UnitId,
    /// `None` until the attacker first comes into range; `Some(0)` fires
    /// immediately on the next advance.
    pub ticks_until_hit: Option<u64>,
    /// Chase in progress toward a walkable neighbor of the target, persisted
    /// across ticks the same way `BuildState`/`GatherState` persist theirs.
    /// `None` while in range or with no walkable approach tile.
    pub travel: Option<Travel>,
}

/// `action ∈ {IDLE, MOVE, TRAIN, BUILD, GATHER, ATTACK}` with the per-action
/// payload §3 calls for (target position, target unit id, path remainder,
/// timer, gather phase, carried gold, ...).
#[derive(Clone, Debug)]
pub enum Action {
    Idle,
    Move(Travel),
    Build(BuildState),
    Gather(GatherState),
    Train(TrainState),
    Attack(AttackState),
}

impl Action {
    pub fn is_idle(&self) -> bool {
        matches!(self, Action::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Idle => "IDLE",
            Action::Move(_) => "MOVE",
            Action::Build(_) => "BUILD",
            Action::Gather(_) => "GATHER",
            Action::Train(_) => "TRAIN",
            Action::Attack(_) => "ATTACK",
        }
    }
}

/// A single live (or under-construction) unit. Tagged-record in place of
/// the component composition the original engine used for this (§9):
/// everything a unit can be doing lives in one `Action` variant rather than
/// attached components, so destruction is a single id-table removal.
#[derive(Clone, Debug)]
pub struct Unit {
    pub id: UnitId,
    /// Monotonically increasing allocation order (§4.5). `UnitId` itself is
    /// a slotmap key and its index can be recycled after a destroy within
    /// the same round, so tick processing order is derived from this field
    /// rather than from `id`.
    pub spawn_seq: u64,
    pub kind: UnitKind,
    pub owner: AgentId,
    /// Top-left tile of the unit's footprint.
    pub pos: (u16, u16),
    pub health: i32,
    pub max_health: i32,
    /// False while a structure's build timer is running; always true for
    /// mobile units and mines.
    pub is_built: bool,
    pub action: Action,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_mine(&self) -> bool {
        matches!(self.kind, UnitKind::Mine)
    }
}
