//! 8-connected A* search over the tile grid (§4.2).

use crate::grid::Map;
use std::collections::HashMap;

use super::heap::{Handle, PriorityQueue};

/// Observable outcome classification, exposed so tests can assert on *why*
/// a search returned empty rather than just that it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    SameNode,
    Found,
    EndBlocked,
    Exhausted,
    Cap,
}

pub struct Path {
    pub nodes: Vec<(u16, u16)>,
    pub outcome: Outcome,
}

impl Path {
    fn empty(outcome: Outcome) -> Self {
        Self {
            nodes: Vec::new(),
            outcome,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn euclidean(a: (u16, u16), b: (u16, u16)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

struct NodeState {
    cost: f64,
    back_ptr: Option<(u16, u16)>,
    handle: Option<Handle>,
    closed: bool,
}

/// Scratch search state, reusable across calls via `reset_search` so a
/// sequence of searches on the same map doesn't reallocate — mirrors the
/// teacher's `TdState::dist` scratch-buffer idiom (`world.rs`).
pub struct SearchState {
    nodes: HashMap<(u16, u16), NodeState>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Clear per-node `cost`/`back_ptr`/heap handle from a previous search.
    /// Searches are not concurrent; call this (or construct fresh) before
    /// reusing a `SearchState` for another `astar` call.
    pub fn reset_search(&mut self) {
        self.nodes.clear();
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run 8-connected A* from `start` to `end`. `scratch` is cleared internally
/// before the search runs, so callers don't need to call `reset_search`
/// themselves between calls.
pub fn astar(map: &Map, scratch: &mut SearchState, start: (u16, u16), end: (u16, u16), max_expansions: usize) -> Path {
    scratch.reset_search();

    if start == end {
        return Path::empty(Outcome::SameNode);
    }
    if !map.is_walkable((end.0 as i32, end.1 as i32)) {
        return Path::empty(Outcome::EndBlocked);
    }

    let mut open: PriorityQueue<(u16, u16)> = PriorityQueue::new();
    let h0 = euclidean(start, end);
    let handle = open.push(h0, start);
    scratch.nodes.insert(
        start,
        NodeState {
            cost: 0.0,
            back_ptr: None,
            handle: Some(handle),
            closed: false,
        },
    );

    let mut popped = 0usize;

    while let Some((_, current)) = open.pop() {
        popped += 1;
        if popped > max_expansions {
            return Path::empty(Outcome::Cap);
        }

        if current == end {
            return Path {
                nodes: reconstruct(&scratch.nodes, current),
                outcome: Outcome::Found,
            };
        }

        let current_cost = scratch.nodes[&current].cost;
        scratch.nodes.get_mut(&current).unwrap().closed = true;

        for neighbor in map.neighbors8(current) {
            // The start node itself is allowed to be unwalkable (a unit
            // pathing out of a cell it just occupied); every other node
            // must be walkable to be expanded into.
            let walkable = map.is_walkable((neighbor.0 as i32, neighbor.1 as i32));
            if !walkable && neighbor != start {
                continue;
            }

            let step_cost = euclidean(current, neighbor);
            let tentative = current_cost + step_cost;

            let existing_cost = scratch.nodes.get(&neighbor).map(|n| n.cost);
            let is_closed = scratch
                .nodes
                .get(&neighbor)
                .map(|n| n.closed)
                .unwrap_or(false);
            if is_closed {
                continue;
            }

            if existing_cost.is_none() || tentative < existing_cost.unwrap() {
                let f = tentative + euclidean(neighbor, end);
                let new_handle = match scratch.nodes.get(&neighbor).and_then(|n| n.handle) {
                    Some(h) => {
                        open.change_priority(h, f);
                        h
                    }
                    None => open.push(f, neighbor),
                };
                scratch.nodes.insert(
                    neighbor,
                    NodeState {
                        cost: tentative,
                        back_ptr: Some(current),
                        handle: Some(new_handle),
                        closed: false,
                    },
                );
            }
        }
    }

    Path::empty(Outcome::Exhausted)
}

fn reconstruct(nodes: &HashMap<(u16, u16), NodeState>, end: (u16, u16)) -> Vec<(u16, u16)> {
    let mut path = Vec::new();
    let mut current = end;
    loop {
        path.push(current);
        match nodes[&current].back_ptr {
            Some(prev) => current = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_node_returns_empty() {
        let map = Map::new(5, 5);
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (2, 2), (2, 2), 2000);
        assert!(path.is_empty());
        assert_eq!(path.outcome, Outcome::SameNode);
    }

    #[test]
    fn end_blocked() {
        let mut map = Map::new(5, 5);
        map.set_walkable(4, 4, false);
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 0), (4, 4), 2000);
        assert!(path.is_empty());
        assert_eq!(path.outcome, Outcome::EndBlocked);
    }

    #[test]
    fn open_grid_path_excludes_start_and_ends_at_end() {
        let map = Map::new(5, 5);
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 0), (4, 4), 2000);
        assert_eq!(path.outcome, Outcome::Found);
        assert!(!path.nodes.contains(&(0, 0)));
        assert_eq!(path.nodes.last(), Some(&(4, 4)));
        // Chebyshev distance bound on an open grid.
        assert!(path.nodes.len() <= 4);
    }

    #[test]
    fn routes_around_a_wall() {
        let mut map = Map::new(5, 5);
        for y in 1..4 {
            map.set_walkable(2, y, false);
        }
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 2), (4, 2), 2000);
        assert_eq!(path.outcome, Outcome::Found);
        for y in 1..4 {
            assert!(!path.nodes.contains(&(2, y)));
        }
    }

    #[test]
    fn expansion_cap_reports_cap_outcome() {
        let map = Map::new(10, 10);
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 0), (9, 9), 1);
        assert!(path.is_empty());
        assert_eq!(path.outcome, Outcome::Cap);
    }

    #[test]
    fn exhausted_when_walled_off() {
        let mut map = Map::new(5, 5);
        for y in 0..5 {
            map.set_walkable(2, y, false);
        }
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 2), (4, 2), 2000);
        assert!(path.is_empty());
        assert_eq!(path.outcome, Outcome::Exhausted);
    }

    #[test]
    fn deterministic_repeat_runs() {
        let mut map = Map::new(8, 8);
        map.set_walkable(3, 3, false);
        let mut scratch = SearchState::new();
        let p1 = astar(&map, &mut scratch, (0, 0), (7, 7), 2000);
        let p2 = astar(&map, &mut scratch, (0, 0), (7, 7), 2000);
        assert_eq!(p1.nodes, p2.nodes);
    }

    #[test]
    fn unwalkable_start_is_still_allowed() {
        let mut map = Map::new(5, 5);
        map.set_walkable(0, 0, false);
        let mut scratch = SearchState::new();
        let path = astar(&map, &mut scratch, (0, 0), (4, 4), 2000);
        assert_eq!(path.outcome, Outcome::Found);
    }
}
