/// Simulation tick counter, monotonically increasing from round start.
pub type Tick = u64;

/// Identifies one of the two competing agents. `0` and `1` for the two
/// factions in a match; `agent order` (§4.8) decides which is instantiated
/// first but the id itself never changes mid-match.
pub type AgentId = u8;

/// Sentinel `owner` for a unit that belongs to neither agent. Mines are the
/// only such unit (§4.7: "neutral mine list" in `WorldView`) — they never
/// accept commands, so nothing ever compares a real `AgentId` against this
/// value for authorization.
pub const NEUTRAL_AGENT: AgentId = u8::MAX;
