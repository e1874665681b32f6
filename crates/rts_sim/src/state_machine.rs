//! Per-unit task state machine: command validation/commit plus the per-tick
//! advance of each action's sub-phases (§4.4).

use crate::catalogs::UnitKind;
use crate::errors::{Fatal, InvalidCommand};
use crate::events::SimEvent;
use crate::graph::astar;
use crate::grid::Map;
use crate::unit::{
    Action, AttackState, BuildPhase, BuildState, GatherPhase, GatherState, Travel, TrainState, UnitId,
};
use crate::world::World;

/// A\* expansion cap used by every in-engine search (§4.2).
const MAX_EXPANSIONS: usize = 2000;

/// Consecutive re-plan failures tolerated before a MOVE gives up and returns
/// to IDLE. The source left this unconstrained (§9 open question); fixed
/// here at 3 moves so the property tests can assert on it.
const REPLAN_BUDGET: u32 = 3;

fn euclidean(a: (u16, u16), b: (u16, u16)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

fn start_travel(world: &mut World, from: (u16, u16), target: (u16, u16)) -> Option<Travel> {
    let path = astar(&world.map, &mut world.search, from, target, MAX_EXPANSIONS);
    if path.is_empty() {
        return None;
    }
    Some(Travel::new(target, path.nodes))
}

fn start_travel_to_footprint(
    world: &mut World,
    from: (u16, u16),
    anchor: (u16, u16),
    footprint: (u16, u16),
) -> Option<Travel> {
    let border = world.map.walkable_neighbor_of_footprint(anchor, footprint)?;
    start_travel(world, from, border)
}

fn vacate_and_occupy(map: &mut Map, from: (u16, u16), to: (u16, u16)) {
    map.set_buildable(from.0, from.1, true);
    map.set_buildable(to.0, to.1, false);
}

/// Step a `Travel` forward by up to `distance_budget` tiles, re-planning in
/// place when the next tile has become unwalkable. Returns `Ok(Some(pos))`
/// with the unit's new position while still travelling, `Ok(None)` when the
/// path completes this tick (caller transitions out of MOVE), or `Err(())`
/// when the re-plan budget is exhausted and the unit must return to IDLE.
fn step_travel(
    world: &mut World,
    mut pos: (u16, u16),
    travel: &mut Travel,
    mut distance_budget: f64,
) -> Result<Option<(u16, u16)>, ()> {
    loop {
        let Some(&next) = travel.path.front() else {
            return Ok(None);
        };

        if !world.map.is_walkable((next.0 as i32, next.1 as i32)) {
            travel.replan_failures += 1;
            if travel.replan_failures > REPLAN_BUDGET {
                return Err(());
            }
            match start_travel(world, pos, travel.target) {
                Some(replanned) => {
                    travel.path = replanned.path;
                    travel.remaining = 0.0;
                    continue;
                }
                None => return Err(()),
            }
        }

        if travel.remaining <= 0.0 {
            travel.remaining = euclidean(pos, next);
        }

        if distance_budget < travel.remaining {
            travel.remaining -= distance_budget;
            return Ok(Some(pos));
        }

        distance_budget -= travel.remaining;
        vacate_and_occupy(&mut world.map, pos, next);
        pos = next;
        travel.path.pop_front();
        travel.remaining = 0.0;
        travel.replan_failures = 0;

        if travel.path.is_empty() {
            return Ok(None);
        }
        if distance_budget <= 0.0 {
            return Ok(Some(pos));
        }
    }
}

/// Advance every live unit's action one tick, in the order given (§5: id
/// order, so cell-flag changes made by earlier units are visible to later
/// ones within the same tick).
pub fn advance_all(world: &mut World, order: &[UnitId], events: &mut Vec<SimEvent>) {
    for &id in order {
        advance_unit(world, id, events);
    }
    reap_dead(world, events);
}

/// Remove every unit (combat casualty or depleted mine) whose health reached
/// zero this tick: frees its footprint tiles via `Registry::destroy` and
/// emits `UnitDestroyed`. Run once per tick rather than inline in
/// `advance_attack`, since a unit can die from damage applied while a
/// different unit (not itself) is the one currently advancing.
fn reap_dead(world: &mut World, events: &mut Vec<SimEvent>) {
    let dead: Vec<UnitId> = world.registry.iter().filter(|u| !u.is_alive()).map(|u| u.id).collect();
    for id in dead {
        if let Some(unit) = world.registry.destroy(&mut world.map, &world.catalogs, id) {
            events.push(SimEvent::UnitDestroyed {
                id,
                kind: unit.kind,
                owner: unit.owner,
            });
        }
    }
}

/// Check that every unit's in-flight action still references units of the
/// expected kind, raising `Fatal::InconsistentActionPayload` if not (§7).
/// This should never fail in a correct engine, since ids are only captured
/// into an action's payload at the moment `try_gather`/`try_attack` already
/// verified the target's kind — a mismatch here means something bypassed
/// that check.
pub fn check_action_payload_consistency(world: &World) -> Result<(), Fatal> {
    for unit in world.registry.iter() {
        match &unit.action {
            Action::Gather(state) => {
                if let Some(mine) = world.registry.get(state.mine) {
                    if !mine.is_mine() {
                        return Err(Fatal::InconsistentActionPayload {
                            description: format!("{:?} is gathering from {:?}, which is not a mine", unit.id, state.mine),
                        });
                    }
                }
                if let Some(base) = world.registry.get(state.base) {
                    if !matches!(base.kind, UnitKind::Base) {
                        return Err(Fatal::InconsistentActionPayload {
                            description: format!("{:?} is depositing to {:?}, which is not a base", unit.id, state.base),
                        });
                    }
                }
            }
            Action::Attack(state) => {
                if state.target == unit.id {
                    return Err(Fatal::InconsistentActionPayload {
                        description: format!("{:?} is attacking itself", unit.id),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn advance_unit(world: &mut World, id: UnitId, events: &mut Vec<SimEvent>) {
    let Some(unit) = world.registry.get(id) else {
        return;
    };
    if !unit.is_alive() {
        return;
    }
    let kind = unit.kind;
    let owner = unit.owner;
    let pos = unit.pos;

    let action = match world.registry.get_mut(id) {
        Some(u) => std::mem::replace(&mut u.action, Action::Idle),
        None => return,
    };

    let new_action = match action {
        Action::Idle => Action::Idle,
        Action::Move(travel) => advance_move(world, id, kind, pos, travel),
        Action::Build(state) => advance_build(world, id, kind, pos, owner, state, events),
        Action::Gather(state) => advance_gather(world, id, pos, owner, state, events),
        Action::Train(state) => advance_train(world, id, kind, pos, owner, state, events),
        Action::Attack(state) => advance_attack(world, id, kind, pos, state, events),
    };

    if let Some(u) = world.registry.get_mut(id) {
        u.action = new_action;
    }
}

/// Commit a MOVE command (§4.4). A target that yields an empty path leaves
/// the unit IDLE rather than being rejected outright — the command itself
/// is always well-formed, it just has nothing to do.
pub fn try_move(world: &mut World, unit_id: UnitId, target: (u16, u16)) -> Result<(), InvalidCommand> {
    let unit = world.registry.get(unit_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !matches!(unit.action, Action::Idle | Action::Move(_)) {
        return Err(InvalidCommand::WrongAction);
    }
    if !world.catalogs.descriptor(unit.kind).can_move {
        return Err(InvalidCommand::MissingCapability);
    }
    if !world.map.in_bounds((target.0 as i32, target.1 as i32)) {
        return Err(InvalidCommand::OutOfBounds);
    }
    let pos = unit.pos;

    match start_travel(world, pos, target) {
        Some(travel) => {
            if let Some(u) = world.registry.get_mut(unit_id) {
                u.action = Action::Move(travel);
            }
        }
        None => {
            if let Some(u) = world.registry.get_mut(unit_id) {
                u.action = Action::Idle;
            }
        }
    }
    Ok(())
}

fn advance_move(world: &mut World, id: UnitId, kind: UnitKind, pos: (u16, u16), mut travel: Travel) -> Action {
    let speed = world.catalogs.moving_speed(kind);
    if speed <= 0.0 {
        return Action::Idle;
    }
    let budget = speed / world.tick_hz as f64;
    match step_travel(world, pos, &mut travel, budget) {
        Ok(Some(new_pos)) => {
            if let Some(u) = world.registry.get_mut(id) {
                u.pos = new_pos;
            }
            Action::Move(travel)
        }
        Ok(None) => {
            if let Some(&last) = travel.path.back() {
                if let Some(u) = world.registry.get_mut(id) {
                    u.pos = last;
                }
            }
            Action::Idle
        }
        Err(()) => Action::Idle,
    }
}

// ---------------------------------------------------------------- BUILD ---

pub fn try_build(
    world: &mut World,
    worker_id: UnitId,
    anchor: (u16, u16),
    structure_kind: UnitKind,
) -> Result<(), InvalidCommand> {
    let worker = world.registry.get(worker_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !matches!(worker.action, Action::Idle | Action::Gather(_)) {
        return Err(InvalidCommand::WrongAction);
    }
    let owner = worker.owner;
    let worker_pos = worker.pos;
    let worker_descriptor = world.catalogs.descriptor(worker.kind).clone();
    if !worker_descriptor.can_build || !worker_descriptor.builds.contains(&structure_kind) {
        return Err(InvalidCommand::MissingCapability);
    }

    let structure_descriptor = world.catalogs.descriptor(structure_kind).clone();
    for dep in &structure_descriptor.dependency {
        let built = world
            .registry
            .by_owner_type(owner, *dep)
            .iter()
            .filter_map(|id| world.registry.get(*id))
            .any(|u| u.is_built);
        if !built {
            return Err(InvalidCommand::MissingDependency);
        }
    }

    let excluding = Map::footprint_tiles(worker_pos, worker_descriptor.footprint);
    if !world.map.area_buildable(anchor, structure_descriptor.footprint, &excluding) {
        return Err(InvalidCommand::AreaNotBuildable);
    }

    let cost = structure_descriptor.cost;
    let have = world.gold(owner);
    if have < cost {
        return Err(InvalidCommand::InsufficientGold { have, need: cost });
    }

    let travel = start_travel_to_footprint(world, worker_pos, anchor, structure_descriptor.footprint)
        .ok_or(InvalidCommand::NoPath)?;

    world.debit_gold(owner, cost);
    let structure_id = world
        .registry
        .place(&mut world.map, &world.catalogs, structure_kind, owner, anchor, false);
    let ticks = world.catalogs.creation_time(structure_kind).to_ticks(world.tick_hz);

    if let Some(w) = world.registry.get_mut(worker_id) {
        w.action = Action::Build(BuildState {
            structure: structure_id,
            phase: BuildPhase::ToPosition,
            travel: Some(travel),
            ticks_remaining: ticks,
        });
    }
    Ok(())
}

fn advance_build(
    world: &mut World,
    worker_id: UnitId,
    worker_kind: UnitKind,
    pos: (u16, u16),
    owner: rts_core::AgentId,
    mut state: BuildState,
    events: &mut Vec<SimEvent>,
) -> Action {
    if world
        .registry
        .get(state.structure)
        .map(|s| !s.is_alive())
        .unwrap_or(true)
    {
        events.push(SimEvent::UnitReturnedToIdle {
            id: worker_id,
            from_action: "BUILD",
        });
        return Action::Idle;
    }

    match state.phase {
        BuildPhase::ToPosition => {
            let Some(mut travel) = state.travel.take() else {
                state.phase = BuildPhase::Building;
                return advance_build(world, worker_id, worker_kind, pos, owner, state, events);
            };
            let speed = world.catalogs.moving_speed(worker_kind);
            let budget = speed / world.tick_hz as f64;
            match step_travel(world, pos, &mut travel, budget) {
                Ok(Some(new_pos)) => {
                    if let Some(u) = world.registry.get_mut(worker_id) {
                        u.pos = new_pos;
                    }
                    state.travel = Some(travel);
                    Action::Build(state)
                }
                Ok(None) => {
                    if let Some(&last) = travel.path.back() {
                        if let Some(u) = world.registry.get_mut(worker_id) {
                            u.pos = last;
                        }
                    }
                    state.phase = BuildPhase::Building;
                    state.travel = None;
                    Action::Build(state)
                }
                Err(()) => Action::Idle,
            }
        }
        BuildPhase::Building => {
            if state.ticks_remaining > 0 {
                state.ticks_remaining -= 1;
            }
            if state.ticks_remaining > 0 {
                return Action::Build(state);
            }
            if let Some(structure) = world.registry.get_mut(state.structure) {
                structure.is_built = true;
                let id = structure.id;
                let kind = structure.kind;
                events.push(SimEvent::StructureCompleted { id, kind });
            }
            Action::Idle
        }
    }
}

// --------------------------------------------------------------- GATHER ---

pub fn try_gather(
    world: &mut World,
    worker_id: UnitId,
    mine_id: UnitId,
    base_id: UnitId,
) -> Result<(), InvalidCommand> {
    let worker = world.registry.get(worker_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !matches!(worker.action, Action::Idle | Action::Gather(_)) {
        return Err(InvalidCommand::WrongAction);
    }
    if !world.catalogs.descriptor(worker.kind).can_gather {
        return Err(InvalidCommand::MissingCapability);
    }
    let mine = world.registry.get(mine_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !mine.is_mine() || !mine.is_alive() {
        return Err(InvalidCommand::InvalidTarget);
    }
    let base = world.registry.get(base_id).ok_or(InvalidCommand::InvalidTarget)?;
    if base.owner != worker.owner || !base.is_built {
        return Err(InvalidCommand::InvalidTarget);
    }

    if let Some(w) = world.registry.get_mut(worker_id) {
        w.action = Action::Gather(GatherState {
            mine: mine_id,
            base: base_id,
            phase: GatherPhase::ToMine,
            travel: None,
            ticks_remaining: 0,
            carried: 0,
        });
    }
    Ok(())
}

fn advance_gather(
    world: &mut World,
    worker_id: UnitId,
    pos: (u16, u16),
    owner: rts_core::AgentId,
    mut state: GatherState,
    events: &mut Vec<SimEvent>,
) -> Action {
    let mine_alive = world.registry.get(state.mine).map(|m| m.is_alive()).unwrap_or(false);
    let base_alive = world.registry.get(state.base).map(|b| b.is_alive()).unwrap_or(false);

    // Still let an in-flight deposit land when the base is the one thing
    // still standing; any other loss of mine/base sends the worker home.
    let returning_with_deposit = state.phase == GatherPhase::ToBase && base_alive;
    if (!mine_alive || !base_alive) && !returning_with_deposit {
        if state.carried > 0 && base_alive {
            world.credit_gold(owner, state.carried);
            events.push(SimEvent::GoldChanged {
                agent: owner,
                delta: state.carried as i64,
                balance: world.gold(owner),
            });
        }
        events.push(SimEvent::UnitReturnedToIdle {
            id: worker_id,
            from_action: "GATHER",
        });
        return Action::Idle;
    }

    let worker_kind = world.registry.get(worker_id).map(|u| u.kind);
    let Some(worker_kind) = worker_kind else {
        return Action::Idle;
    };

    match state.phase {
        GatherPhase::ToMine => {
            let mut travel = match state.travel.take() {
                Some(t) => t,
                None => {
                    let mine_pos = world.registry.get(state.mine).map(|m| m.pos);
                    let Some(mine_pos) = mine_pos else { return Action::Idle };
                    let footprint = world.catalogs.descriptor(UnitKind::Mine).footprint;
                    match start_travel_to_footprint(world, pos, mine_pos, footprint) {
                        Some(t) => t,
                        None => return Action::Idle,
                    }
                }
            };
            let speed = world.catalogs.moving_speed(worker_kind);
            let budget = speed / world.tick_hz as f64;
            match step_travel(world, pos, &mut travel, budget) {
                Ok(Some(new_pos)) => {
                    if let Some(u) = world.registry.get_mut(worker_id) {
                        u.pos = new_pos;
                    }
                    state.travel = Some(travel);
                    Action::Gather(state)
                }
                Ok(None) => {
                    if let Some(&last) = travel.path.back() {
                        if let Some(u) = world.registry.get_mut(worker_id) {
                            u.pos = last;
                        }
                    }
                    state.phase = GatherPhase::Mining;
                    state.travel = None;
                    let ticks = world.catalogs.creation_time(UnitKind::Worker).to_ticks(world.tick_hz);
                    state.ticks_remaining = ticks.max(1);
                    Action::Gather(state)
                }
                Err(()) => Action::Idle,
            }
        }
        GatherPhase::Mining => {
            if state.ticks_remaining > 0 {
                state.ticks_remaining -= 1;
            }
            if state.ticks_remaining > 0 {
                return Action::Gather(state);
            }
            let capacity = world.catalogs.descriptor(worker_kind).mining_capacity;
            let mine_health_before = world.registry.get(state.mine).map(|m| m.health).unwrap_or(0);
            let extracted = capacity.min(mine_health_before.max(0) as u32);
            if let Some(mine) = world.registry.get_mut(state.mine) {
                mine.health -= extracted as i32;
            }
            let boost = if !world.registry.by_owner_type(owner, UnitKind::Refinery).is_empty() {
                world.catalogs.mining_boost()
            } else {
                1.0
            };
            state.carried = (extracted as f64 * boost) as u32;
            state.phase = GatherPhase::ToBase;
            Action::Gather(state)
        }
        GatherPhase::ToBase => {
            let mut travel = match state.travel.take() {
                Some(t) => t,
                None => {
                    let base_pos = world.registry.get(state.base).map(|b| b.pos);
                    let Some(base_pos) = base_pos else { return Action::Idle };
                    let footprint = world.catalogs.descriptor(UnitKind::Base).footprint;
                    match start_travel_to_footprint(world, pos, base_pos, footprint) {
                        Some(t) => t,
                        None => return Action::Idle,
                    }
                }
            };
            let speed = world.catalogs.moving_speed(worker_kind);
            let budget = speed / world.tick_hz as f64;
            match step_travel(world, pos, &mut travel, budget) {
                Ok(Some(new_pos)) => {
                    if let Some(u) = world.registry.get_mut(worker_id) {
                        u.pos = new_pos;
                    }
                    state.travel = Some(travel);
                    Action::Gather(state)
                }
                Ok(None) => {
                    if let Some(&last) = travel.path.back() {
                        if let Some(u) = world.registry.get_mut(worker_id) {
                            u.pos = last;
                        }
                    }
                    world.credit_gold(owner, state.carried);
                    events.push(SimEvent::GoldChanged {
                        agent: owner,
                        delta: state.carried as i64,
                        balance: world.gold(owner),
                    });
                    state.carried = 0;
                    state.travel = None;
                    let mine_health = world.registry.get(state.mine).map(|m| m.health).unwrap_or(0);
                    if mine_health > 0 {
                        state.phase = GatherPhase::ToMine;
                        Action::Gather(state)
                    } else {
                        Action::Idle
                    }
                }
                Err(()) => Action::Idle,
            }
        }
    }
}

// ---------------------------------------------------------------- TRAIN ---

pub fn try_train(world: &mut World, structure_id: UnitId, trainee: UnitKind) -> Result<(), InvalidCommand> {
    let structure = world.registry.get(structure_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !structure.action.is_idle() {
        return Err(InvalidCommand::WrongAction);
    }
    if !structure.is_built {
        return Err(InvalidCommand::WrongAction);
    }
    let owner = structure.owner;
    let descriptor = world.catalogs.descriptor(structure.kind).clone();
    if !descriptor.can_train || !descriptor.trains.contains(&trainee) {
        return Err(InvalidCommand::MissingCapability);
    }
    let cost = world.catalogs.descriptor(trainee).cost;
    let have = world.gold(owner);
    if have < cost {
        return Err(InvalidCommand::InsufficientGold { have, need: cost });
    }
    world.debit_gold(owner, cost);
    let ticks = world.catalogs.creation_time(trainee).to_ticks(world.tick_hz);
    if let Some(s) = world.registry.get_mut(structure_id) {
        s.action = Action::Train(TrainState {
            trainee,
            ticks_remaining: ticks,
        });
    }
    Ok(())
}

fn advance_train(
    world: &mut World,
    _structure_id: UnitId,
    structure_kind: UnitKind,
    pos: (u16, u16),
    owner: rts_core::AgentId,
    mut state: TrainState,
    events: &mut Vec<SimEvent>,
) -> Action {
    if state.ticks_remaining > 0 {
        state.ticks_remaining -= 1;
    }
    if state.ticks_remaining > 0 {
        return Action::Train(state);
    }
    let footprint = world.catalogs.descriptor(structure_kind).footprint;
    if let Some(cell) = world.map.walkable_neighbor_of_footprint(pos, footprint) {
        let id = world
            .registry
            .place(&mut world.map, &world.catalogs, state.trainee, owner, cell, true);
        events.push(SimEvent::UnitSpawned {
            id,
            kind: state.trainee,
            owner,
            pos: cell,
        });
        Action::Idle
    } else {
        Action::Train(state)
    }
}

// --------------------------------------------------------------- ATTACK ---

pub fn try_attack(world: &mut World, attacker_id: UnitId, target_id: UnitId) -> Result<(), InvalidCommand> {
    let attacker = world.registry.get(attacker_id).ok_or(InvalidCommand::InvalidTarget)?;
    if !matches!(attacker.action, Action::Idle | Action::Move(_) | Action::Attack(_)) {
        return Err(InvalidCommand::WrongAction);
    }
    if !world.catalogs.descriptor(attacker.kind).can_attack {
        return Err(InvalidCommand::MissingCapability);
    }
    let owner = attacker.owner;
    let target = world.registry.get(target_id).ok_or(InvalidCommand::InvalidTarget)?;
    if target.is_mine() || target.owner == owner {
        return Err(InvalidCommand::InvalidTarget);
    }

    if let Some(a) = world.registry.get_mut(attacker_id) {
        a.action = Action::Attack(AttackState {
            target: target_id,
            ticks_until_hit: None,
            travel: None,
        });
    }
    Ok(())
}

fn advance_attack(
    world: &mut World,
    attacker_id: UnitId,
    attacker_kind: UnitKind,
    pos: (u16, u16),
    mut state: AttackState,
    events: &mut Vec<SimEvent>,
) -> Action {
    let target = world.registry.get(state.target);
    let (target_pos, target_alive) = match target {
        Some(t) => (t.pos, t.is_alive()),
        None => (pos, false),
    };
    if !target_alive {
        events.push(SimEvent::UnitReturnedToIdle {
            id: attacker_id,
            from_action: "ATTACK",
        });
        return Action::Idle;
    }

    let range = world.catalogs.descriptor(attacker_kind).attack_range;
    let distance = euclidean(pos, target_pos);

    if distance <= range {
        state.travel = None;
        let ticks = state.ticks_until_hit.get_or_insert_with(|| {
            let period = world.catalogs.creation_time(attacker_kind);
            period.to_ticks(world.tick_hz).max(1)
        });
        if *ticks > 0 {
            *ticks -= 1;
        }
        if *ticks == 0 {
            let damage = world.catalogs.damage(attacker_kind);
            if let Some(target) = world.registry.get_mut(state.target) {
                target.health -= damage;
            }
            let period = world.catalogs.creation_time(attacker_kind).to_ticks(world.tick_hz).max(1);
            state.ticks_until_hit = Some(period);
        }
        return Action::Attack(state);
    }

    state.ticks_until_hit = None;

    let Some(border) = world.map.walkable_neighbor_of_footprint(target_pos, (1, 1)) else {
        state.travel = None;
        return Action::Attack(state);
    };

    // Re-plan only when the chase target has moved to a different approach
    // tile; otherwise keep accumulating `remaining` distance across ticks.
    let needs_replan = state.travel.as_ref().map(|t| t.target != border).unwrap_or(true);
    if needs_replan {
        state.travel = start_travel(world, pos, border);
    }

    let Some(mut travel) = state.travel.take() else {
        return Action::Attack(state);
    };

    let speed = world.catalogs.moving_speed(attacker_kind);
    let budget = speed / world.tick_hz as f64;
    match step_travel(world, pos, &mut travel, budget) {
        Ok(Some(new_pos)) => {
            if let Some(u) = world.registry.get_mut(attacker_id) {
                u.pos = new_pos;
            }
            state.travel = Some(travel);
        }
        Ok(None) => {
            if let Some(&last) = travel.path.back() {
                if let Some(u) = world.registry.get_mut(attacker_id) {
                    u.pos = last;
                }
            }
            state.travel = None;
        }
        Err(()) => {
            state.travel = None;
        }
    }
    Action::Attack(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(game_speed: u32) -> World {
        World::new(20, 20, game_speed, 60)
    }

    #[test]
    fn train_worker_happy_path() {
        let mut world = world_with(20);
        world.set_gold(0, 1000);
        let base = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Base, 0, (10, 10), true);

        try_train(&mut world, base, UnitKind::Worker).expect("train should commit");
        assert_eq!(world.gold(0), 950);

        let ticks = world.catalogs.creation_time(UnitKind::Worker).to_ticks(world.tick_hz);
        for _ in 0..ticks {
            advance_all(&mut world, &world.registry.ids_in_tick_order(), &mut Vec::new());
        }

        assert_eq!(world.registry.by_type(UnitKind::Worker).len(), 1);
        assert!(matches!(world.registry.get(base).unwrap().action, Action::Idle));
    }

    #[test]
    fn build_rejected_insufficient_gold() {
        let mut world = world_with(1);
        world.set_gold(0, 10);
        let worker = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 0, (9, 10), true);

        let result = try_build(&mut world, worker, (10, 10), UnitKind::Base);
        assert!(matches!(result, Err(InvalidCommand::InsufficientGold { .. })));
        assert_eq!(world.gold(0), 10);
        assert!(world.registry.by_type(UnitKind::Base).is_empty());
    }

    #[test]
    fn payload_consistency_passes_for_well_formed_gather_and_attack() {
        let mut world = world_with(20);
        let base = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Base, 0, (5, 5), true);
        let mine = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Mine, 0, (15, 5), true);
        let worker = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 0, (8, 5), true);
        try_gather(&mut world, worker, mine, base).expect("gather should commit");

        let soldier = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Soldier, 0, (0, 0), true);
        let enemy = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 1, (1, 1), true);
        try_attack(&mut world, soldier, enemy).expect("attack should commit");

        assert!(check_action_payload_consistency(&world).is_ok());
    }

    #[test]
    fn attacker_closes_distance_on_out_of_range_target() {
        let mut world = world_with(20);
        let soldier = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Soldier, 0, (2, 2), true);
        let enemy = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 1, (15, 15), true);

        try_attack(&mut world, soldier, enemy).expect("attack should commit");
        let start_pos = world.registry.get(soldier).unwrap().pos;

        for _ in 0..4000 {
            advance_all(&mut world, &world.registry.ids_in_tick_order(), &mut Vec::new());
        }

        let moved_pos = world.registry.get(soldier).unwrap().pos;
        assert_ne!(start_pos, moved_pos, "an out-of-range attacker must close distance toward its target");
        let range = world.catalogs.descriptor(UnitKind::Soldier).attack_range;
        assert!(euclidean(moved_pos, world.registry.get(enemy).unwrap().pos) <= range + 1e-6);
    }

    #[test]
    fn gather_cycle_credits_gold_and_drains_mine() {
        let mut world = world_with(20);
        let base = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Base, 0, (5, 5), true);
        let mine = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Mine, 0, (15, 5), true);
        let worker = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 0, (8, 5), true);

        try_gather(&mut world, worker, mine, base).expect("gather should commit");

        for _ in 0..20_000 {
            if matches!(
                world.registry.get(worker).unwrap().action,
                Action::Gather(ref g) if g.phase == GatherPhase::ToMine && world.gold(0) > 0
            ) {
                break;
            }
            advance_all(&mut world, &world.registry.ids_in_tick_order(), &mut Vec::new());
        }

        assert_eq!(world.gold(0), 100);
        assert_eq!(world.registry.get(mine).unwrap().health, 10_000 - 100);
    }
}
