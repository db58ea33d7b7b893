//! Field of view.
//!
//! Symmetric shadowcasting over the four quadrants around the origin. Slopes
//! are kept as exact fractions so results do not depend on float rounding.
//! Only terrain blocks sight; walls themselves are revealed when lit.
//!
//! # References
//!
//! - Albert Ford, "Symmetric Shadowcasting":
//!   <https://www.albertford.com/shadowcasting/>

use std::collections::BTreeSet;

use crate::map::Terrain;
use crate::state::Position;

/// Cells in sight for the current turn. Replaced wholesale on recompute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    cells: BTreeSet<Position>,
}

impl VisibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Computes every cell with line of sight from `origin` within `radius`.
pub fn compute_visibility<T>(terrain: &T, origin: Position, radius: u32) -> VisibleSet
where
    T: Terrain + ?Sized,
{
    let mut caster = Caster {
        terrain,
        origin,
        radius: radius as i32,
        visible: VisibleSet::new(),
    };
    if terrain.contains(origin) {
        caster.visible.cells.insert(origin);
    }
    for quadrant in Quadrant::ALL {
        caster.scan(
            quadrant,
            Row {
                depth: 1,
                start: Slope::new(-1, 1),
                end: Slope::new(1, 1),
            },
        );
    }
    caster.visible
}

#[derive(Clone, Copy, Debug)]
enum Quadrant {
    North,
    South,
    East,
    West,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [
        Quadrant::North,
        Quadrant::South,
        Quadrant::East,
        Quadrant::West,
    ];

    fn transform(self, origin: Position, depth: i32, col: i32) -> Position {
        match self {
            Quadrant::North => Position::new(origin.x + col, origin.y - depth),
            Quadrant::South => Position::new(origin.x + col, origin.y + depth),
            Quadrant::East => Position::new(origin.x + depth, origin.y + col),
            Quadrant::West => Position::new(origin.x - depth, origin.y + col),
        }
    }
}

/// Fraction `num / den` with `den > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Slope through the near edge of the tile at (`depth`, `col`).
    fn of_tile(depth: i32, col: i32) -> Self {
        Self::new(2 * col - 1, 2 * depth)
    }
}

#[derive(Clone, Copy, Debug)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    fn columns(&self) -> std::ops::RangeInclusive<i32> {
        let min = round_ties_up(self.depth * self.start.num, self.start.den);
        let max = round_ties_down(self.depth * self.end.num, self.end.den);
        min..=max
    }

    /// A floor tile is only lit if its centre lies inside the row's slopes.
    fn is_symmetric(&self, col: i32) -> bool {
        col * self.start.den >= self.depth * self.start.num
            && col * self.end.den <= self.depth * self.end.num
    }

    fn next(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }
}

/// `round(a / b)` with halves rounded up, `b > 0`.
fn round_ties_up(a: i32, b: i32) -> i32 {
    (2 * a + b).div_euclid(2 * b)
}

/// `round(a / b)` with halves rounded down, `b > 0`.
fn round_ties_down(a: i32, b: i32) -> i32 {
    -(b - 2 * a).div_euclid(2 * b)
}

struct Caster<'t, T: ?Sized> {
    terrain: &'t T,
    origin: Position,
    radius: i32,
    visible: VisibleSet,
}

impl<T: Terrain + ?Sized> Caster<'_, T> {
    fn scan(&mut self, quadrant: Quadrant, mut row: Row) {
        if row.depth > self.radius {
            return;
        }

        // `Some(true)` after a wall, `Some(false)` after a floor tile.
        let mut previous: Option<bool> = None;
        for col in row.columns() {
            let position = quadrant.transform(self.origin, row.depth, col);
            let wall = self.terrain.blocks_sight(position);

            if wall || row.is_symmetric(col) {
                self.reveal(position, row.depth, col);
            }
            if previous == Some(true) && !wall {
                row.start = Slope::of_tile(row.depth, col);
            }
            if previous == Some(false) && wall {
                let mut next = row.next();
                next.end = Slope::of_tile(row.depth, col);
                self.scan(quadrant, next);
            }
            previous = Some(wall);
        }
        if previous == Some(false) {
            self.scan(quadrant, row.next());
        }
    }

    fn reveal(&mut self, position: Position, depth: i32, col: i32) {
        if depth * depth + col * col <= self.radius * self.radius
            && self.terrain.contains(position)
        {
            self.visible.cells.insert(position);
        }
    }
}
