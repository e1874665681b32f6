//! Error taxonomy (§7). `InvalidCommand` and `Fatal` are `std::error::Error`
//! types surfaced to the dispatcher/controller; `TransientConflict`,
//! `TargetLost`, and `CapHit` are not raised as errors at all — they are
//! materialized as state (the unit stays where it is, or returns to IDLE)
//! and only ever observed through logging.

use std::fmt;

/// A command was rejected at dispatch time; no state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidCommand {
    NotOwner,
    MissingCapability,
    MissingDependency,
    InsufficientGold { have: u32, need: u32 },
    InvalidTarget,
    OutOfBounds,
    AreaNotBuildable,
    NoPath,
    WrongAction,
}

impl fmt::Display for InvalidCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidCommand::NotOwner => write!(f, "unit does not belong to the issuing agent"),
            InvalidCommand::MissingCapability => write!(f, "unit lacks the required capability"),
            InvalidCommand::MissingDependency => write!(f, "prerequisite type not yet built"),
            InvalidCommand::InsufficientGold { have, need } => {
                write!(f, "insufficient gold: have {have}, need {need}")
            }
            InvalidCommand::InvalidTarget => write!(f, "target is invalid for this command"),
            InvalidCommand::OutOfBounds => write!(f, "target tile is out of bounds"),
            InvalidCommand::AreaNotBuildable => write!(f, "target area is not buildable"),
            InvalidCommand::NoPath => write!(f, "no path exists to the target"),
            InvalidCommand::WrongAction => write!(f, "unit is not in a state that accepts this command"),
        }
    }
}

impl std::error::Error for InvalidCommand {}

/// An internal invariant was violated. Per §7 this should never occur in a
/// correct engine; the round is aborted with a diagnostic rather than
/// continuing on inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fatal {
    DanglingIndexEntry { description: String },
    InconsistentActionPayload { description: String },
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fatal::DanglingIndexEntry { description } => {
                write!(f, "dangling registry index entry: {description}")
            }
            Fatal::InconsistentActionPayload { description } => {
                write!(f, "inconsistent action/sub-phase payload: {description}")
            }
        }
    }
}

impl std::error::Error for Fatal {}
