//! Shared read-only queries over the game state: adjacency walks and the
//! BFS services used by strikes (radius search) and withdrawal.

use std::collections::{BTreeSet, VecDeque};

use crate::model::GameState;

/// BFS from `start` to the nearest region matching `predicate`, in hop
/// order. `start` itself is considered first.
pub fn bfs_nearest(
    state: &GameState,
    start: u64,
    predicate: impl Fn(u64) -> bool,
) -> Option<u64> {
    if predicate(start) {
        return Some(start);
    }
    let mut visited = BTreeSet::new();
    visited.insert(start);
    let mut queue: VecDeque<u64> = VecDeque::new();
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        for &adj in state.adjacent_regions(current) {
            if !visited.insert(adj) {
                continue;
            }
            if predicate(adj) {
                return Some(adj);
            }
            queue.push_back(adj);
        }
    }
    None
}

/// All regions within `radius` hops of `center`, center included.
pub fn regions_within(state: &GameState, center: u64, radius: u32) -> Vec<u64> {
    let mut visited = BTreeSet::new();
    visited.insert(center);
    let mut result = vec![center];
    let mut queue: VecDeque<(u64, u32)> = VecDeque::new();
    queue.push_back((center, 0));
    while let Some((current, depth)) = queue.pop_front() {
        if depth == radius {
            continue;
        }
        for &adj in state.adjacent_regions(current) {
            if visited.insert(adj) {
                result.push(adj);
                queue.push_back((adj, depth + 1));
            }
        }
    }
    result
}

/// Nearest region a stranded unit of `nation` can legally withdraw to:
/// owned by the nation, unoccupied, and without a unit already present.
/// `None` means the unit has nowhere to go and disbands.
pub fn withdrawal_target(state: &GameState, from: u64, nation: u64) -> Option<u64> {
    bfs_nearest(state, from, |id| {
        let region = state.region(id);
        region.owner == nation && region.occupier.is_none() && region.unit.is_none()
    })
    // The stranded unit stands in a foreign region, so `from` itself can
    // never satisfy the predicate; no need to exclude it.
}
