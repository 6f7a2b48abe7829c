//! Offset-coordinate neighbours and BFS pathing for the movement system
//! (§4.C "Neighbours" — "the movement system, for historical reasons,
//! uses an offset-coordinate neighbour set that differs on even/odd
//! rows").
//!
//! This module's neighbour function must only be used together with its
//! own path reconstruction; it is not interchangeable with
//! [`crate::axial::Axial::neighbors`] within one system (§9 "Dual
//! hex-neighbour conventions").

use std::collections::{HashMap, VecDeque};

use crate::axial::Axial;

/// The "odd-r" offset neighbour table: the six neighbour deltas of a
/// hex depend on whether its row is even or odd.
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, -1), (-1, -1), (0, 1), (-1, 1)];
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (-1, 0), (1, -1), (0, -1), (1, 1), (0, 1)];

/// The six offset-coordinate neighbours of `tile`, in the movement
/// system's historical enumeration order. Out-of-bounds candidates are
/// included; callers filter with [`Axial::in_bounds`].
#[must_use]
pub fn offset_neighbors(tile: Axial) -> [Axial; 6] {
    let offsets = if tile.r.rem_euclid(2) == 0 {
        EVEN_ROW_OFFSETS
    } else {
        ODD_ROW_OFFSETS
    };
    offsets.map(|(dq, dr)| Axial::new(tile.q + dq, tile.r + dr))
}

/// Breadth-first shortest path from `from` to `to` over tiles for which
/// `passable` returns `true`, using the offset neighbour convention.
///
/// Returns `[from, ..., to]` inclusive, or an empty vector if either
/// endpoint is out of bounds or no path exists. Neighbour order is
/// deterministic, so whichever shortest path BFS discovers first is the
/// one returned; any shortest path is acceptable here, not a specific one.
#[must_use]
pub fn bfs_path(
    from: Axial,
    to: Axial,
    width: i32,
    height: i32,
    passable: impl Fn(Axial) -> bool,
) -> Vec<Axial> {
    if !from.in_bounds(width, height) || !to.in_bounds(width, height) {
        return Vec::new();
    }
    if from == to {
        return vec![from];
    }

    let mut visited: HashMap<Axial, Axial> = HashMap::new();
    visited.insert(from, from);
    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return reconstruct(&visited, from, to);
        }
        for neighbor in offset_neighbors(current) {
            if !neighbor.in_bounds(width, height) || visited.contains_key(&neighbor) {
                continue;
            }
            if !passable(neighbor) {
                continue;
            }
            visited.insert(neighbor, current);
            queue.push_back(neighbor);
        }
    }

    Vec::new()
}

fn reconstruct(visited: &HashMap<Axial, Axial>, from: Axial, to: Axial) -> Vec<Axial> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        match visited.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_neighbor_count_is_six_and_distinct() {
        let neighbors = offset_neighbors(Axial::new(4, 4));
        let unique: std::collections::HashSet<_> = neighbors.iter().copied().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn even_and_odd_rows_use_different_tables() {
        let even = offset_neighbors(Axial::new(4, 4));
        let odd = offset_neighbors(Axial::new(4, 5));
        assert_ne!(even, odd);
    }

    #[test]
    fn bfs_path_same_tile_is_single_element() {
        let path = bfs_path(Axial::new(2, 2), Axial::new(2, 2), 10, 10, |_| true);
        assert_eq!(path, vec![Axial::new(2, 2)]);
    }

    #[test]
    fn bfs_path_returns_empty_when_out_of_bounds() {
        let path = bfs_path(Axial::new(2, 2), Axial::new(50, 50), 10, 10, |_| true);
        assert!(path.is_empty());
    }

    #[test]
    fn bfs_path_returns_empty_when_blocked() {
        let path = bfs_path(Axial::new(0, 0), Axial::new(9, 0), 10, 1, |_| false);
        assert!(path.is_empty());
    }

    #[test]
    fn bfs_path_is_inclusive_of_both_endpoints() {
        let path = bfs_path(Axial::new(0, 0), Axial::new(3, 0), 10, 10, |_| true);
        assert_eq!(path.first().copied(), Some(Axial::new(0, 0)));
        assert_eq!(path.last().copied(), Some(Axial::new(3, 0)));
    }

    #[test]
    fn bfs_path_around_a_wall_is_longer_than_direct() {
        let blocked = Axial::new(5, 0);
        let path = bfs_path(Axial::new(0, 0), Axial::new(9, 0), 10, 10, |a| a != blocked);
        assert!(!path.is_empty());
        assert!(!path.contains(&blocked));
    }
}
