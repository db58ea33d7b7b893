//! Ore veins and gems.
//!
//! A vein is a bounded random walk over plain wall cells, painting each
//! visited cell with one ore. Gems are single cells buried away from floor.

use crate::config::VeinConfig;
use crate::env::GameRng;
use crate::state::{Material, Position};

use super::generate::pick_cell;
use super::{Cell, Map, Ore};

/// Paints up to `veins.count` veins using the weighted ore `mix`. Stops
/// early once no plain wall is left to start one in.
pub(super) fn place_veins(
    map: &mut Map,
    veins: &VeinConfig,
    mix: &[(Material, u32)],
    attempts: u32,
    rng: &mut GameRng,
) -> usize {
    let mut painted = 0;
    for placed in 0..veins.count {
        let Some(ore) = rng.pick_weighted(mix).copied().and_then(Ore::from_material) else {
            continue;
        };
        let Ok(start) = pick_cell(map, rng, attempts, "ore vein", |map, position| {
            map.cell(position).is_some_and(Cell::is_plain_wall)
        }) else {
            tracing::debug!(placed, wanted = veins.count, "ran out of rock for veins");
            break;
        };
        painted += walk(map, start, ore, veins.max_length, rng);
    }
    painted
}

/// Random walk from `start`, stopping at `max_length` cells or when no plain
/// wall neighbour is left.
fn walk(map: &mut Map, start: Position, ore: Ore, max_length: u32, rng: &mut GameRng) -> usize {
    let mut current = start;
    let mut length = 0;
    loop {
        match map.wall_mut(current) {
            Some(wall) if wall.ore.is_none() => wall.ore = Some(ore),
            _ => break,
        }
        length += 1;
        if length >= max_length as usize {
            break;
        }

        let options: Vec<Position> = current
            .neighbors()
            .into_iter()
            .filter(|&next| map.cell(next).is_some_and(Cell::is_plain_wall))
            .collect();
        match rng.pick(&options) {
            Some(&next) => current = next,
            None => break,
        }
    }
    length
}

/// Buries up to `count` gems in plain walls with no floor neighbour and
/// returns how many found a home.
pub(super) fn place_gems(map: &mut Map, count: u32, attempts: u32, rng: &mut GameRng) -> u32 {
    for placed in 0..count {
        let Ok(position) = pick_cell(map, rng, attempts, "gem", |map, position| {
            map.cell(position).is_some_and(Cell::is_plain_wall)
                && !map.has_neighbor(position, Cell::is_floor)
        }) else {
            tracing::debug!(placed, wanted = count, "ran out of buried rock for gems");
            return placed;
        };
        if let Some(wall) = map.wall_mut(position) {
            wall.ore = Some(Ore::Gem);
        }
    }
    count
}
