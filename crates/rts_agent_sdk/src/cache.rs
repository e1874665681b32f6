//! Small authoring convenience an agent opts into, not required by the SDK
//! surface itself (§9 Design Notes: replace the source's base-class
//! unit-list caches with a plain reusable module instead of inheritance).

use std::collections::HashMap;

use rts_sim::{UnitInfo, UnitKind, WorldView};

/// Own/enemy units grouped by type, refreshed once per tick instead of
/// re-querying `WorldView` for every decision an agent makes that tick.
#[derive(Default)]
pub struct UnitCache {
    own: HashMap<UnitKind, Vec<UnitInfo>>,
    enemy: HashMap<UnitKind, Vec<UnitInfo>>,
}

impl UnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, world: &WorldView) {
        self.own.clear();
        self.enemy.clear();
        for &kind in UnitKind::ALL.iter() {
            self.own.insert(kind, world.own_units_by_type(kind));
            self.enemy.insert(kind, world.enemy_units_by_type(kind));
        }
    }

    pub fn own(&self, kind: UnitKind) -> &[UnitInfo] {
        self.own.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn enemy(&self, kind: UnitKind) -> &[UnitInfo] {
        self.enemy.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn own_idle(&self, kind: UnitKind) -> impl Iterator<Item = &UnitInfo> {
        self.own(kind).iter().filter(|u| u.action == "IDLE")
    }
}
