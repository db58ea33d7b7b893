//! Connectivity repair for carved caves.
//!
//! Floor regions are labelled under 4-adjacency. Every region other than the
//! largest is joined to it by a shortest tunnel through the map interior,
//! until a single region remains. Before that, a cave with no cell open on
//! all four sides gets one cleared so the ladder always has a site.

use std::collections::VecDeque;

use crate::env::GameRng;

use super::GenerationError;

/// Connected floor regions of a row-major grid.
pub(super) struct Regions {
    labels: Vec<Option<usize>>,
    sizes: Vec<usize>,
}

impl Regions {
    pub(super) fn label(width: usize, height: usize, is_floor: impl Fn(usize) -> bool) -> Self {
        let mut labels = vec![None; width * height];
        let mut sizes = Vec::new();
        let mut queue = VecDeque::new();

        for start in 0..width * height {
            if labels[start].is_some() || !is_floor(start) {
                continue;
            }
            let region = sizes.len();
            let mut size = 0;
            labels[start] = Some(region);
            queue.push_back(start);
            while let Some(key) = queue.pop_front() {
                size += 1;
                for next in orthogonal(key, width, height) {
                    if labels[next].is_none() && is_floor(next) {
                        labels[next] = Some(region);
                        queue.push_back(next);
                    }
                }
            }
            sizes.push(size);
        }

        Self { labels, sizes }
    }

    pub(super) fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Largest region; the lowest label wins ties.
    fn largest(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (region, &size) in self.sizes.iter().enumerate() {
            if best.is_none_or(|(_, best_size)| size > best_size) {
                best = Some((region, size));
            }
        }
        best.map(|(region, _)| region)
    }

    fn of(&self, key: usize) -> Option<usize> {
        self.labels[key]
    }
}

/// Joins all floor regions into one. Returns the number of wall cells carved.
pub(super) fn connect(
    floor: &mut [bool],
    width: usize,
    height: usize,
) -> Result<usize, GenerationError> {
    let mut carved = 0;

    let initial = Regions::label(width, height, |key| floor[key]);
    if initial.len() == 0 {
        carved += carve_center_room(floor, width, height);
    }

    for _ in 0..initial.len() {
        let regions = Regions::label(width, height, |key| floor[key]);
        let Some(main) = regions.largest() else {
            break;
        };
        let Some(stray) = (0..regions.len()).find(|&region| region != main) else {
            break;
        };
        carved += tunnel(floor, width, height, &regions, stray, main).ok_or(
            GenerationError::Disconnected {
                regions: regions.len(),
            },
        )?;
    }

    let regions = Regions::label(width, height, |key| floor[key]).len();
    if regions != 1 {
        return Err(GenerationError::Disconnected { regions });
    }
    Ok(carved)
}

/// Breadth-first search from every cell of `from` through interior cells to
/// the nearest cell of `to`, carving the path found.
fn tunnel(
    floor: &mut [bool],
    width: usize,
    height: usize,
    regions: &Regions,
    from: usize,
    to: usize,
) -> Option<usize> {
    let mut previous: Vec<Option<usize>> = vec![None; width * height];
    let mut seen = vec![false; width * height];
    let mut queue = VecDeque::new();

    for key in 0..width * height {
        if regions.of(key) == Some(from) {
            seen[key] = true;
            queue.push_back(key);
        }
    }

    while let Some(key) = queue.pop_front() {
        if regions.of(key) == Some(to) {
            let mut carved = 0;
            let mut cursor = Some(key);
            while let Some(cell) = cursor {
                if !floor[cell] {
                    floor[cell] = true;
                    carved += 1;
                }
                cursor = previous[cell];
            }
            return Some(carved);
        }
        for next in orthogonal(key, width, height) {
            if !seen[next] && is_interior(next, width, height) {
                seen[next] = true;
                previous[next] = Some(key);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Ensures some floor cell has floor on all four sides, clearing a plus
/// shape around an interior cell when none does. Returns the number of wall
/// cells carved. The clearing may stand alone; [`connect`] joins it later.
pub(super) fn clear_ladder_site(
    floor: &mut [bool],
    width: usize,
    height: usize,
    rng: &mut GameRng,
) -> usize {
    let open = |floor: &[bool], key: usize| {
        floor[key] && orthogonal(key, width, height).filter(|&next| floor[next]).count() == 4
    };
    if (0..width * height).any(|key| open(floor, key)) {
        return 0;
    }

    // Cells whose whole plus stays off the border.
    let candidates: Vec<usize> = (0..width * height)
        .filter(|&key| {
            let (x, y) = (key % width, key / width);
            floor[key] && x >= 2 && y >= 2 && x + 2 < width && y + 2 < height
        })
        .collect();
    let center = rng
        .pick(&candidates)
        .copied()
        .unwrap_or(width / 2 + (height / 2) * width);

    let mut carved = 0;
    for key in std::iter::once(center).chain(orthogonal(center, width, height)) {
        if !floor[key] {
            floor[key] = true;
            carved += 1;
        }
    }
    carved
}

fn carve_center_room(floor: &mut [bool], width: usize, height: usize) -> usize {
    let (cx, cy) = (width / 2, height / 2);
    let mut carved = 0;
    for y in cy - 1..=cy + 1 {
        for x in cx - 1..=cx + 1 {
            let key = x + y * width;
            if !floor[key] {
                floor[key] = true;
                carved += 1;
            }
        }
    }
    carved
}

fn is_interior(key: usize, width: usize, height: usize) -> bool {
    let (x, y) = (key % width, key / width);
    x > 0 && y > 0 && x + 1 < width && y + 1 < height
}

/// In-bounds orthogonal neighbours in a fixed order.
fn orthogonal(key: usize, width: usize, height: usize) -> impl Iterator<Item = usize> {
    let (x, y) = (key % width, key / width);
    let up = (y > 0).then(|| key - width);
    let down = (y + 1 < height).then(|| key + width);
    let left = (x > 0).then(|| key - 1);
    let right = (x + 1 < width).then(|| key + 1);
    [up, down, right, left].into_iter().flatten()
}
