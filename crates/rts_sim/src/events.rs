//! Observable occurrences emitted during a tick, for logging and tests.

use rts_core::AgentId;

use crate::catalogs::UnitKind;
use crate::errors::InvalidCommand;
use crate::unit::UnitId;

#[derive(Clone, Debug)]
pub enum SimEvent {
    CommandRejected {
        agent: AgentId,
        reason: InvalidCommand,
    },
    UnitSpawned {
        id: UnitId,
        kind: UnitKind,
        owner: AgentId,
        pos: (u16, u16),
    },
    UnitDestroyed {
        id: UnitId,
        kind: UnitKind,
        owner: AgentId,
    },
    StructureCompleted {
        id: UnitId,
        kind: UnitKind,
    },
    GoldChanged {
        agent: AgentId,
        delta: i64,
        balance: u32,
    },
    UnitReturnedToIdle {
        id: UnitId,
        from_action: &'static str,
    },
    RoundEnded {
        winner: Option<AgentId>,
    },
    MatchEnded {
        winner: AgentId,
    },
}
