//! Cellular-automaton cave carving.
//!
//! Cells start as floor with `fill_probability`, then each smoothing pass
//! applies a birth/survival rule over the eight surrounding cells. The outer
//! border is always wall.

use crate::config::CaveConfig;
use crate::env::GameRng;

/// Returns a row-major floor mask (`true` = floor).
pub(super) fn carve(width: usize, height: usize, cave: &CaveConfig, rng: &mut GameRng) -> Vec<bool> {
    let mut floor: Vec<bool> = (0..width * height)
        .map(|_| rng.chance(cave.fill_probability))
        .collect();
    seal_border(&mut floor, width, height);

    for _ in 0..cave.smoothing_passes {
        floor = smooth(&floor, width, height, cave);
    }
    floor
}

fn smooth(floor: &[bool], width: usize, height: usize, cave: &CaveConfig) -> Vec<bool> {
    let mut next = vec![false; floor.len()];
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let key = x + y * width;
            let neighbours = floor_neighbours(floor, width, x, y);
            next[key] = if floor[key] {
                neighbours >= cave.survival_threshold
            } else {
                neighbours >= cave.birth_threshold
            };
        }
    }
    next
}

/// Floor count among the eight surrounding cells. Callers keep `(x, y)`
/// off the border so every neighbour is in bounds.
fn floor_neighbours(floor: &[bool], width: usize, x: usize, y: usize) -> u8 {
    let mut count = 0;
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if (nx, ny) != (x, y) && floor[nx + ny * width] {
                count += 1;
            }
        }
    }
    count
}

fn seal_border(floor: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        floor[x] = false;
        floor[x + (height - 1) * width] = false;
    }
    for y in 0..height {
        floor[y * width] = false;
        floor[width - 1 + y * width] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_is_always_wall() {
        let mut rng = GameRng::new(11);
        let (width, height) = (20, 12);
        let floor = carve(width, height, &CaveConfig::default(), &mut rng);
        for x in 0..width {
            assert!(!floor[x]);
            assert!(!floor[x + (height - 1) * width]);
        }
        for y in 0..height {
            assert!(!floor[y * width]);
            assert!(!floor[width - 1 + y * width]);
        }
    }

    #[test]
    fn full_fill_survives_smoothing() {
        let cave = CaveConfig {
            fill_probability: 1.0,
            ..CaveConfig::default()
        };
        let mut rng = GameRng::new(1);
        let floor = carve(7, 7, &cave, &mut rng);
        // Interior corners see three floor neighbours and erode; everything
        // else keeps at least four and the shape settles after one pass.
        assert!(!floor[1 + 7]);
        assert!(floor[2 + 7]);
        assert!(floor[2 + 2 * 7]);
        assert!(floor[3 + 3 * 7]);
    }

    #[test]
    fn same_seed_same_cave() {
        let cave = CaveConfig::default();
        let a = carve(30, 20, &cave, &mut GameRng::new(5));
        let b = carve(30, 20, &cave, &mut GameRng::new(5));
        assert_eq!(a, b);
    }
}
