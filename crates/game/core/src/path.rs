//! Grid A* for enemy movement.
//!
//! Four-connected, unit cost, Manhattan heuristic. Paths are recomputed from
//! scratch every call; only the first step is used by the AI.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::map::Terrain;
use crate::state::Position;

/// Shortest path from `start` to `goal`, excluding `start` and including
/// `goal`.
///
/// A cell is walkable when the terrain is passable and `is_empty` holds for
/// it. The goal only needs passable terrain, since it is usually occupied by
/// whatever is being chased. Ties are broken deterministically.
pub fn find_path<T, F>(terrain: &T, start: Position, goal: Position, is_empty: F) -> Option<Vec<Position>>
where
    T: Terrain + ?Sized,
    F: Fn(Position) -> bool,
{
    if start == goal {
        return Some(Vec::new());
    }
    if !terrain.is_passable(goal) {
        return None;
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut cost_so_far: HashMap<Position, u32> = HashMap::new();
    let mut sequence = 0u64;

    frontier.push(Reverse((start.manhattan(goal), start.manhattan(goal), sequence, start)));
    cost_so_far.insert(start, 0);

    while let Some(Reverse((_, _, _, current))) = frontier.pop() {
        if current == goal {
            let mut path = vec![current];
            let mut node = current;
            while let Some(&previous) = came_from.get(&node) {
                if previous == start {
                    break;
                }
                path.push(previous);
                node = previous;
            }
            path.reverse();
            return Some(path);
        }

        let cost = cost_so_far.get(&current).copied().unwrap_or(u32::MAX);
        for next in current.neighbors() {
            let walkable =
                terrain.is_passable(next) && (next == goal || is_empty(next));
            if !walkable {
                continue;
            }
            let new_cost = cost.saturating_add(1);
            if cost_so_far.get(&next).is_none_or(|&known| new_cost < known) {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                sequence += 1;
                let heuristic = next.manhattan(goal);
                frontier.push(Reverse((new_cost + heuristic, heuristic, sequence, next)));
            }
        }
    }

    None
}

/// First step from `start` toward `goal`.
///
/// `None` means "hold position": already on or beside the goal, or no route.
pub fn next_step<T, F>(terrain: &T, start: Position, goal: Position, is_empty: F) -> Option<Position>
where
    T: Terrain + ?Sized,
    F: Fn(Position) -> bool,
{
    if start == goal || start.is_adjacent(goal) {
        return None;
    }
    find_path(terrain, start, goal, is_empty)?.first().copied()
}
