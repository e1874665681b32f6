//! Command validator / dispatcher (§4.6): the only way an agent's intent
//! reaches unit state. Ownership is checked here, uniformly, before the
//! per-verb state-machine commit logic runs.

use rts_core::AgentId;

use crate::catalogs::UnitKind;
use crate::errors::InvalidCommand;
use crate::events::SimEvent;
use crate::state_machine;
use crate::unit::UnitId;
use crate::world::World;

/// The five command verbs an agent may issue (§4.4, §6).
#[derive(Clone, Copy, Debug)]
pub enum Command {
    Move { unit: UnitId, target: (u16, u16) },
    Build { worker: UnitId, anchor: (u16, u16), kind: UnitKind },
    Gather { worker: UnitId, mine: UnitId, base: UnitId },
    Train { structure: UnitId, kind: UnitKind },
    Attack { attacker: UnitId, target: UnitId },
}

impl Command {
    /// The unit the issuing agent must own for the command to even be
    /// considered (§4.6: "ownership ... the commanded unit belongs to the
    /// issuing agent").
    fn commanded_unit(&self) -> UnitId {
        match *self {
            Command::Move { unit, .. } => unit,
            Command::Build { worker, .. } => worker,
            Command::Gather { worker, .. } => worker,
            Command::Train { structure, .. } => structure,
            Command::Attack { attacker, .. } => attacker,
        }
    }
}

/// Validate ownership, then forward to the state machine. Failures are
/// logged as events and dropped; they never reach the agent as an error
/// value (§7 propagation).
pub fn dispatch(world: &mut World, agent: AgentId, command: Command, events: &mut Vec<SimEvent>) {
    let owner = world.registry.get(command.commanded_unit()).map(|u| u.owner);
    let result = match owner {
        None => Err(InvalidCommand::InvalidTarget),
        Some(actual_owner) if actual_owner != agent => Err(InvalidCommand::NotOwner),
        Some(_) => match command {
            Command::Move { unit, target } => state_machine::try_move(world, unit, target),
            Command::Build { worker, anchor, kind } => state_machine::try_build(world, worker, anchor, kind),
            Command::Gather { worker, mine, base } => state_machine::try_gather(world, worker, mine, base),
            Command::Train { structure, kind } => state_machine::try_train(world, structure, kind),
            Command::Attack { attacker, target } => state_machine::try_attack(world, attacker, target),
        },
    };

    if let Err(reason) = result {
        events.push(SimEvent::CommandRejected { agent, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_command_on_unit_owned_by_another_agent() {
        let mut world = World::new(20, 20, 1, 60);
        let worker = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 0, (5, 5), true);
        let mut events = Vec::new();
        dispatch(
            &mut world,
            1,
            Command::Move {
                unit: worker,
                target: (6, 6),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [SimEvent::CommandRejected {
                reason: InvalidCommand::NotOwner,
                ..
            }]
        ));
    }

    #[test]
    fn accepts_well_formed_move() {
        let mut world = World::new(20, 20, 1, 60);
        let worker = world
            .registry
            .place(&mut world.map, &world.catalogs, UnitKind::Worker, 0, (5, 5), true);
        let mut events = Vec::new();
        dispatch(
            &mut world,
            0,
            Command::Move {
                unit: worker,
                target: (6, 6),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(matches!(
            world.registry.get(worker).unwrap().action,
            crate::unit::Action::Move(_)
        ));
    }
}
