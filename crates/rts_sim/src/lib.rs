//! The simulation crate: grid, pathing, catalogs, unit state machine,
//! registry, command dispatch, agent SDK surface, and the match/round
//! controller (§2, §4).

pub mod catalogs;
pub mod command;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod graph;
pub mod grid;
pub mod registry;
pub mod sdk;
pub mod state_machine;
pub mod unit;
pub mod world;

pub use catalogs::{Catalogs, UnitDescriptor, UnitKind};
pub use command::{dispatch, Command};
pub use config::MatchConfig;
pub use controller::{Controller, MatchOutcome, RoundOutcome, RoundResult};
pub use errors::{Fatal, InvalidCommand};
pub use events::SimEvent;
pub use graph::{astar, Outcome, Path, SearchState};
pub use grid::{Cell, Map};
pub use registry::Registry;
pub use sdk::{Actions, Agent, UnitInfo, WorldView};
pub use unit::{Action, Travel, Unit, UnitId};
pub use world::World;
