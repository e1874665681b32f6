//! Pathfinding subsystem (§4.2): min-heap with decrease-key plus the A*
//! search built on top of it.

mod astar;
mod heap;

pub use astar::{astar, Outcome, Path, SearchState};
pub use heap::{Handle, PriorityQueue};
