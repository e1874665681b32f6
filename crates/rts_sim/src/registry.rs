//! Unit/world registry (§4.5): id allocation, type/owner indexes, and
//! placement/destruction kept in lock-step with the grid's cell flags.

use std::collections::HashMap;

use rts_core::AgentId;
use slotmap::SlotMap;

use crate::catalogs::{Catalogs, UnitKind};
use crate::errors::Fatal;
use crate::grid::Map;
use crate::unit::{Action, Unit, UnitId};

#[derive(Default)]
pub struct Registry {
    by_id: SlotMap<UnitId, Unit>,
    by_type: HashMap<UnitKind, Vec<UnitId>>,
    by_owner_type: HashMap<(AgentId, UnitKind), Vec<UnitId>>,
    next_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            by_id: SlotMap::with_key(),
            by_type: HashMap::new(),
            by_owner_type: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.by_id.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.by_id.values()
    }

    /// Live unit ids in allocation order, per the "sequential in id order"
    /// ordering guarantee of §5.
    pub fn ids_in_tick_order(&self) -> Vec<UnitId> {
        let mut units: Vec<&Unit> = self.by_id.values().collect();
        units.sort_by_key(|u| u.spawn_seq);
        units.into_iter().map(|u| u.id).collect()
    }

    pub fn by_type(&self, kind: UnitKind) -> &[UnitId] {
        self.by_type.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_owner_type(&self, owner: AgentId, kind: UnitKind) -> &[UnitId] {
        self.by_owner_type
            .get(&(owner, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Place a new unit: inserts into the arena and indexes, and sets the
    /// footprint's `buildable` (and `walkable`, for immobile units) flags
    /// per invariants 1-2 (§3).
    pub fn place(
        &mut self,
        map: &mut Map,
        catalogs: &Catalogs,
        kind: UnitKind,
        owner: AgentId,
        pos: (u16, u16),
        is_built: bool,
    ) -> UnitId {
        let descriptor = catalogs.descriptor(kind);
        let immobile = !descriptor.can_move;
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.by_id.insert_with_key(|id| Unit {
            id,
            spawn_seq: seq,
            kind,
            owner,
            pos,
            health: descriptor.max_health,
            max_health: descriptor.max_health,
            is_built,
            action: Action::Idle,
        });
        map.set_area_flags(pos, descriptor.footprint, false, immobile.then_some(false));
        self.by_type.entry(kind).or_default().push(id);
        self.by_owner_type.entry((owner, kind)).or_default().push(id);
        id
    }

    /// Destroy a unit: frees the footprint tiles not covered by another live
    /// unit and removes the id from every index. Destruction is otherwise
    /// immediate here; the "deferred" guarantee of §4.5 is provided by the
    /// controller always finishing the current unit's state-machine advance
    /// before consulting the registry for the next one (§5).
    pub fn destroy(&mut self, map: &mut Map, catalogs: &Catalogs, id: UnitId) -> Option<Unit> {
        let unit = self.by_id.remove(id)?;
        if let Some(ids) = self.by_type.get_mut(&unit.kind) {
            ids.retain(|&i| i != id);
        }
        if let Some(ids) = self.by_owner_type.get_mut(&(unit.owner, unit.kind)) {
            ids.retain(|&i| i != id);
        }

        let descriptor = catalogs.descriptor(unit.kind);
        for (x, y) in Map::footprint_tiles(unit.pos, descriptor.footprint) {
            if !map.in_bounds((x, y)) {
                continue;
            }
            let (x, y) = (x as u16, y as u16);
            if self.tile_occupied_by_other(catalogs, (x, y), id) {
                continue;
            }
            map.set_buildable(x, y, true);
            if !descriptor.can_move {
                map.set_walkable(x, y, true);
            }
        }
        Some(unit)
    }

    /// Check that every `by_type`/`by_owner_type` index entry still points at
    /// a live unit with the matching kind/owner (§7: this should never fail
    /// in a correct engine; the controller aborts the round with `Fatal` if
    /// it does, rather than operating on a registry an index disagrees with).
    pub fn check_invariants(&self) -> Result<(), Fatal> {
        for (&kind, ids) in &self.by_type {
            for &id in ids {
                match self.by_id.get(id) {
                    Some(unit) if unit.kind == kind => {}
                    Some(unit) => {
                        return Err(Fatal::DanglingIndexEntry {
                            description: format!("by_type[{kind:?}] holds {id:?} whose actual kind is {:?}", unit.kind),
                        });
                    }
                    None => {
                        return Err(Fatal::DanglingIndexEntry {
                            description: format!("by_type[{kind:?}] holds {id:?}, not present in the arena"),
                        });
                    }
                }
            }
        }
        for (&(owner, kind), ids) in &self.by_owner_type {
            for &id in ids {
                match self.by_id.get(id) {
                    Some(unit) if unit.kind == kind && unit.owner == owner => {}
                    Some(unit) => {
                        return Err(Fatal::DanglingIndexEntry {
                            description: format!(
                                "by_owner_type[({owner}, {kind:?})] holds {id:?} whose actual owner/kind is ({}, {:?})",
                                unit.owner, unit.kind
                            ),
                        });
                    }
                    None => {
                        return Err(Fatal::DanglingIndexEntry {
                            description: format!("by_owner_type[({owner}, {kind:?})] holds {id:?}, not present in the arena"),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn tile_occupied_by_other(&self, catalogs: &Catalogs, tile: (u16, u16), excluding: UnitId) -> bool {
        self.by_id.iter().any(|(id, unit)| {
            if id == excluding {
                return false;
            }
            let descriptor = catalogs.descriptor(unit.kind);
            Map::footprint_tiles(unit.pos, descriptor.footprint)
                .iter()
                .any(|&(x, y)| x >= 0 && y >= 0 && (x as u16, y as u16) == tile)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(n: u8) -> AgentId {
        n
    }

    #[test]
    fn place_sets_footprint_flags() {
        let mut map = Map::new(10, 10);
        let catalogs = Catalogs::new(1);
        let mut reg = Registry::new();
        let id = reg.place(&mut map, &catalogs, UnitKind::Base, agent(0), (2, 2), true);
        // Footprint for a 3x3 anchored at (2, 2) covers x in [2, 4], y in [0, 2]
        // (grid.rs's (i, -j) offset convention), so (2, 2) is inside it and
        // (3, 3) is not.
        assert!(!map.is_buildable((2, 2)));
        assert!(!map.is_walkable((2, 2)));
        assert!(map.is_walkable((3, 3)));
        assert!(reg.by_type(UnitKind::Base).contains(&id));
        assert!(reg.by_owner_type(agent(0), UnitKind::Base).contains(&id));
    }

    #[test]
    fn destroy_restores_flags() {
        let mut map = Map::new(10, 10);
        let catalogs = Catalogs::new(1);
        let mut reg = Registry::new();
        let id = reg.place(&mut map, &catalogs, UnitKind::Base, agent(0), (2, 2), true);
        reg.destroy(&mut map, &catalogs, id);
        assert!(map.is_buildable((2, 2)));
        assert!(map.is_walkable((3, 3)));
        assert!(reg.by_type(UnitKind::Base).is_empty());
    }

    #[test]
    fn destroy_does_not_free_tile_still_covered_by_another_unit() {
        let mut map = Map::new(10, 10);
        let catalogs = Catalogs::new(1);
        let mut reg = Registry::new();
        let a = reg.place(&mut map, &catalogs, UnitKind::Worker, agent(0), (5, 5), true);
        let b = reg.place(&mut map, &catalogs, UnitKind::Worker, agent(0), (5, 5), true);
        reg.destroy(&mut map, &catalogs, a);
        // b still occupies (5,5); tile must remain non-buildable.
        assert!(!map.is_buildable((5, 5)));
        reg.destroy(&mut map, &catalogs, b);
        assert!(map.is_buildable((5, 5)));
    }

    #[test]
    fn check_invariants_passes_after_place_and_destroy() {
        let mut map = Map::new(10, 10);
        let catalogs = Catalogs::new(1);
        let mut reg = Registry::new();
        let a = reg.place(&mut map, &catalogs, UnitKind::Worker, agent(0), (2, 2), true);
        reg.place(&mut map, &catalogs, UnitKind::Worker, agent(1), (6, 6), true);
        assert!(reg.check_invariants().is_ok());
        reg.destroy(&mut map, &catalogs, a);
        assert!(reg.check_invariants().is_ok());
    }
}
