//! Agent-facing SDK (§4.7, §10): re-exports the `WorldView`/`Actions`/
//! `Agent` surface defined in `rts_sim` (it is core per the component
//! table, so there is exactly one definition workspace-wide) and adds the
//! parts explicitly out of core scope — the CSV log sink, a unit-list
//! cache agents may opt into, and serializable observation snapshots.

pub mod cache;
pub mod log_sink;
pub mod observation;

pub use cache::UnitCache;
pub use log_sink::RoundCsvSink;
pub use observation::{RoundObservation, UnitObservation};
pub use rts_sim::{Action, Actions, Agent, Command, InvalidCommand, UnitInfo, UnitKind, WorldView};
