//! Cave terrain grid and its procedural generator.
//!
//! Cells are not entities. A wall carries its ore, remaining hp, hardness and
//! whether it borders floor; a floor carries nothing. Mining replaces a wall
//! with floor in place.
mod cellular;
mod connect;
mod error;
mod generate;
mod veins;

pub use error::GenerationError;
pub use generate::{MapGenerator, generate_map};
pub(crate) use generate::pick_cell;

use crate::env::BalanceTables;
use crate::state::{Material, Position};

/// Mineral painted into a wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ore {
    Copper,
    Iron,
    Mithril,
    Gem,
}

impl Ore {
    /// Material dropped when a wall of this ore breaks.
    pub fn material(self) -> Material {
        match self {
            Ore::Copper => Material::CopperOre,
            Ore::Iron => Material::IronOre,
            Ore::Mithril => Material::MithrilOre,
            Ore::Gem => Material::Gem,
        }
    }

    pub fn from_material(material: Material) -> Option<Self> {
        match material {
            Material::CopperOre => Some(Ore::Copper),
            Material::IronOre => Some(Ore::Iron),
            Material::MithrilOre => Some(Ore::Mithril),
            Material::Gem => Some(Ore::Gem),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    pub ore: Option<Ore>,
    pub hp: i32,
    pub hardness: i32,
    /// Orthogonally adjacent to floor.
    pub exposed: bool,
}

impl Wall {
    /// Material this wall drops; plain walls drop rock.
    pub fn material(&self) -> Material {
        self.ore.map_or(Material::Rock, Ore::material)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Floor,
    Wall(Wall),
}

impl Cell {
    pub fn is_floor(&self) -> bool {
        matches!(self, Cell::Floor)
    }

    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Cell::Wall(wall) => Some(wall),
            Cell::Floor => None,
        }
    }

    /// Unmined wall without ore.
    pub fn is_plain_wall(&self) -> bool {
        matches!(self, Cell::Wall(Wall { ore: None, .. }))
    }
}

/// Axis-aligned cell rectangle, `width` by `height` cells from `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub origin: Position,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(origin: Position, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Square of side `2 * radius + 1` centred on `center`.
    pub fn around(center: Position, radius: u32) -> Self {
        let r = radius as i32;
        Self::new(
            Position::new(center.x - r, center.y - r),
            2 * radius + 1,
            2 * radius + 1,
        )
    }
}

/// Static terrain as seen by visibility and pathfinding.
pub trait Terrain {
    fn contains(&self, position: Position) -> bool;

    /// Out-of-bounds positions block sight.
    fn blocks_sight(&self, position: Position) -> bool;

    /// Walkable terrain, ignoring occupants.
    fn is_passable(&self, position: Position) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    width: u32,
    height: u32,
    level: u32,
    cells: Vec<Cell>,
    gems_visible: bool,
    ladder: Option<Position>,
}

impl Map {
    /// Smallest map that still fits a walled 3x3 room.
    pub const MIN_SIZE: u32 = 5;

    pub(crate) fn from_floor(width: u32, height: u32, level: u32, floor: &[bool]) -> Self {
        let stats = BalanceTables::ROCK;
        let cells = floor
            .iter()
            .map(|&is_floor| {
                if is_floor {
                    Cell::Floor
                } else {
                    Cell::Wall(Wall {
                        ore: None,
                        hp: stats.hp,
                        hardness: stats.hardness,
                        exposed: false,
                    })
                }
            })
            .collect();

        Self {
            width,
            height,
            level,
            cells,
            gems_visible: false,
            ladder: None,
        }
    }

    /// Builds a map from ASCII rows, mainly for tests and scenarios.
    ///
    /// `#` rock, `.` floor, `>` floor holding the ladder, `c`/`i`/`m`/`g`
    /// copper, iron, mithril and gem walls. Wall stats come from `tables`.
    pub fn from_ascii(
        rows: &[&str],
        level: u32,
        tables: &BalanceTables,
    ) -> Result<Self, GenerationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || rows.iter().any(|row| row.chars().count() != width) {
            return Err(GenerationError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
                min: 1,
            });
        }

        let mut floor = Vec::with_capacity(width * height);
        let mut ores = Vec::with_capacity(width * height);
        let mut ladder = None;
        for (row, line) in rows.iter().enumerate() {
            for (column, glyph) in line.chars().enumerate() {
                let (is_floor, ore) = match glyph {
                    '.' => (true, None),
                    '>' => {
                        ladder = Some(Position::new(column as i32, row as i32));
                        (true, None)
                    }
                    '#' => (false, None),
                    'c' => (false, Some(Ore::Copper)),
                    'i' => (false, Some(Ore::Iron)),
                    'm' => (false, Some(Ore::Mithril)),
                    'g' => (false, Some(Ore::Gem)),
                    _ => return Err(GenerationError::InvalidGlyph { glyph, column, row }),
                };
                floor.push(is_floor);
                ores.push(ore);
            }
        }

        let mut map = Self::from_floor(width as u32, height as u32, level, &floor);
        for (cell, ore) in map.cells.iter_mut().zip(ores) {
            if let Cell::Wall(wall) = cell {
                wall.ore = ore;
            }
        }
        map.apply_material_stats(tables);
        map.calculate_exposed();
        map.ladder = ladder;
        Ok(map)
    }

    /// Renders terrain back to the glyphs accepted by [`from_ascii`](Self::from_ascii).
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.height as i32)
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| {
                        let position = Position::new(x, y);
                        match self.cell(position) {
                            Some(Cell::Floor) if self.ladder == Some(position) => '>',
                            Some(Cell::Floor) => '.',
                            Some(Cell::Wall(wall)) => match wall.ore {
                                None => '#',
                                Some(Ore::Copper) => 'c',
                                Some(Ore::Iron) => 'i',
                                Some(Ore::Mithril) => 'm',
                                Some(Ore::Gem) => 'g',
                            },
                            None => ' ',
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dungeon depth, starting at 1.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ladder(&self) -> Option<Position> {
        self.ladder
    }

    pub(crate) fn set_ladder(&mut self, position: Position) {
        self.ladder = Some(position);
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// Linearised cell key, `x + y * width`.
    pub fn key(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.x as usize + position.y as usize * self.width as usize)
    }

    pub(crate) fn position_of(&self, key: usize) -> Position {
        let width = self.width as usize;
        Position::new((key % width) as i32, (key / width) as i32)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.key(position).and_then(|key| self.cells.get(key))
    }

    pub fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        let key = self.key(position)?;
        self.cells.get_mut(key)
    }

    pub fn wall(&self, position: Position) -> Option<&Wall> {
        self.cell(position).and_then(Cell::as_wall)
    }

    pub fn wall_mut(&mut self, position: Position) -> Option<&mut Wall> {
        match self.cell_mut(position)? {
            Cell::Wall(wall) => Some(wall),
            Cell::Floor => None,
        }
    }

    pub fn is_floor(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_floor)
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.wall(position).is_some()
    }

    /// True when any in-bounds orthogonal neighbour satisfies `filter`.
    pub fn has_neighbor(&self, position: Position, filter: impl Fn(&Cell) -> bool) -> bool {
        position
            .neighbors()
            .into_iter()
            .filter_map(|neighbor| self.cell(neighbor))
            .any(filter)
    }

    /// Recomputes structural exposure: a wall is exposed iff it borders floor.
    pub fn calculate_exposed(&mut self) {
        for key in 0..self.cells.len() {
            let position = self.position_of(key);
            let exposed = self.has_neighbor(position, Cell::is_floor);
            if let Cell::Wall(wall) = &mut self.cells[key] {
                wall.exposed = exposed;
            }
        }
    }

    pub fn gems_visible(&self) -> bool {
        self.gems_visible
    }

    pub fn set_gems_visible(&mut self, visible: bool) {
        self.gems_visible = visible;
    }

    /// Gem walls revealed by the sensor, independent of structural exposure.
    pub fn is_sensed(&self, position: Position) -> bool {
        self.gems_visible
            && self
                .wall(position)
                .is_some_and(|wall| wall.ore == Some(Ore::Gem))
    }

    /// Whether a wall's identity may be shown: exposed or sensed. Floor is
    /// always revealed.
    pub fn is_revealed(&self, position: Position) -> bool {
        match self.cell(position) {
            Some(Cell::Floor) => true,
            Some(Cell::Wall(wall)) => wall.exposed || self.is_sensed(position),
            None => false,
        }
    }

    /// Replaces a wall with floor and returns the wall that was there.
    pub fn mine_out(&mut self, position: Position) -> Option<Wall> {
        let cell = self.cell_mut(position)?;
        match *cell {
            Cell::Wall(wall) => {
                *cell = Cell::Floor;
                Some(wall)
            }
            Cell::Floor => None,
        }
    }

    /// Cells inside `rect`, clipped to the map, in row-major order.
    pub fn cells_in(&self, rect: Rect) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let x0 = rect.origin.x.max(0);
        let y0 = rect.origin.y.max(0);
        let x1 = (rect.origin.x + rect.width as i32).min(self.width as i32);
        let y1 = (rect.origin.y + rect.height as i32).min(self.height as i32);
        (y0..y1).flat_map(move |y| {
            (x0..x1).filter_map(move |x| {
                let position = Position::new(x, y);
                self.cell(position).map(|cell| (position, cell))
            })
        })
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(key, cell)| (self.position_of(key), cell))
    }

    pub fn floor_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.is_floor())
            .map(|(position, _)| position)
            .collect()
    }

    /// Number of 4-connected floor regions.
    pub fn floor_regions(&self) -> usize {
        connect::Regions::label(self.width as usize, self.height as usize, |key| {
            self.cells[key].is_floor()
        })
        .len()
    }

    pub(crate) fn apply_material_stats(&mut self, tables: &BalanceTables) {
        for cell in &mut self.cells {
            if let Cell::Wall(wall) = cell {
                let stats = tables.material(wall.material());
                wall.hp = stats.hp;
                wall.hardness = stats.hardness;
            }
        }
    }
}

impl Terrain for Map {
    fn contains(&self, position: Position) -> bool {
        Map::contains(self, position)
    }

    fn blocks_sight(&self, position: Position) -> bool {
        !self.is_floor(position)
    }

    fn is_passable(&self, position: Position) -> bool {
        self.is_floor(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> BalanceTables {
        BalanceTables::new()
    }

    #[test]
    fn ascii_round_trip_and_stats() {
        let rows = ["#####", "#.>c#", "#..m#", "##g##"];
        let map = Map::from_ascii(&rows, 1, &tables()).unwrap();

        assert_eq!(map.width(), 5);
        assert_eq!(map.height(), 4);
        assert_eq!(map.ladder(), Some(Position::new(2, 1)));
        assert_eq!(map.to_ascii(), rows);

        let copper = map.wall(Position::new(3, 1)).unwrap();
        assert_eq!((copper.hp, copper.hardness), (10, 1));
        let mithril = map.wall(Position::new(3, 2)).unwrap();
        assert_eq!((mithril.hp, mithril.hardness), (20, 2));
    }

    #[test]
    fn rejects_ragged_rows_and_unknown_glyphs() {
        assert!(matches!(
            Map::from_ascii(&["###", "##"], 1, &tables()),
            Err(GenerationError::InvalidDimensions { .. })
        ));
        assert_eq!(
            Map::from_ascii(&["#?#"], 1, &tables()),
            Err(GenerationError::InvalidGlyph {
                glyph: '?',
                column: 1,
                row: 0
            })
        );
    }

    #[test]
    fn exposure_tracks_floor_adjacency() {
        let mut map = Map::from_ascii(&["#####", "#.###", "#####"], 1, &tables()).unwrap();
        assert!(map.wall(Position::new(2, 1)).unwrap().exposed);
        assert!(!map.wall(Position::new(3, 1)).unwrap().exposed);
        // Diagonal neighbours do not expose.
        assert!(!map.wall(Position::new(2, 2)).unwrap().exposed);

        map.mine_out(Position::new(2, 1)).unwrap();
        map.calculate_exposed();
        assert!(map.wall(Position::new(3, 1)).unwrap().exposed);
        assert!(map.mine_out(Position::new(2, 1)).is_none());
    }

    #[test]
    fn gem_sensor_is_a_separate_channel() {
        let mut map = Map::from_ascii(&["#####", "#.#g#", "#####"], 2, &tables()).unwrap();
        let gem = Position::new(3, 1);
        assert!(!map.is_revealed(gem));

        map.set_gems_visible(true);
        assert!(map.is_sensed(gem));
        assert!(map.is_revealed(gem));
        map.calculate_exposed();
        assert!(!map.wall(gem).unwrap().exposed);
    }

    #[test]
    fn cells_in_clips_to_bounds() {
        let map = Map::from_ascii(&["###", "#.#", "###"], 1, &tables()).unwrap();
        let cells: Vec<_> = map.cells_in(Rect::around(Position::new(0, 0), 1)).collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].0, Position::new(0, 0));
        assert_eq!(map.cells_in(Rect::around(Position::new(1, 1), 5)).count(), 9);
    }

    #[test]
    fn out_of_bounds_blocks_sight_and_movement() {
        let map = Map::from_ascii(&[".."], 1, &tables()).unwrap();
        assert!(map.blocks_sight(Position::new(-1, 0)));
        assert!(!map.is_passable(Position::new(2, 0)));
        assert!(map.is_passable(Position::new(1, 0)));
        assert_eq!(map.key(Position::new(1, 0)), Some(1));
        assert_eq!(map.key(Position::new(0, 1)), None);
    }
}
