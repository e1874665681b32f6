pub mod time;
pub mod types;

pub use time::Micros;
pub use types::{AgentId, Tick, NEUTRAL_AGENT};
