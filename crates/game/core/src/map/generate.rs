use crate::config::GameConfig;
use crate::env::{BalanceTables, GameRng};
use crate::state::Position;

use super::{GenerationError, Map, cellular, connect, veins};

/// Produces playable cave levels.
///
/// Pipeline: carve → clear a ladder site → connect → expose → veins → gems →
/// stats → ladder. Vein and gem counts are targets: small caves get what
/// rock they have. Every step draws from the caller's [`GameRng`], so a seed
/// fully determines the result.
#[derive(Clone, Copy, Debug)]
pub struct MapGenerator<'a> {
    config: &'a GameConfig,
    tables: &'a BalanceTables,
}

impl<'a> MapGenerator<'a> {
    pub fn new(config: &'a GameConfig, tables: &'a BalanceTables) -> Self {
        Self { config, tables }
    }

    pub fn generate(
        &self,
        width: u32,
        height: u32,
        level: u32,
        gems_visible: bool,
        rng: &mut GameRng,
    ) -> Result<Map, GenerationError> {
        if width < Map::MIN_SIZE || height < Map::MIN_SIZE {
            return Err(GenerationError::InvalidDimensions {
                width,
                height,
                min: Map::MIN_SIZE,
            });
        }
        let (w, h) = (width as usize, height as usize);
        let attempts = self.config.max_placement_attempts;

        let mut floor = cellular::carve(w, h, &self.config.cave, rng);
        let mut carved = connect::clear_ladder_site(&mut floor, w, h, rng);
        carved += connect::connect(&mut floor, w, h)?;

        let mut map = Map::from_floor(width, height, level, &floor);
        map.calculate_exposed();

        let painted = veins::place_veins(
            &mut map,
            &self.config.veins,
            self.tables.vein_mix(level),
            attempts,
            rng,
        );
        let wanted_gems = self.config.veins.gems_for_level(level);
        let gems = veins::place_gems(&mut map, wanted_gems, attempts, rng);
        map.apply_material_stats(self.tables);
        map.set_gems_visible(gems_visible);

        let ladder = pick_cell(&map, rng, attempts, "ladder", |map, position| {
            map.is_floor(position) && !map.has_neighbor(position, |cell| !cell.is_floor())
        })
        .map_err(|_| GenerationError::NoLadderSite)?;
        map.set_ladder(ladder);

        tracing::debug!(
            level,
            carved,
            ore_cells = painted,
            gems,
            ladder = %ladder,
            "generated cave"
        );
        Ok(map)
    }
}

/// Generates a level with default configuration and balance tables.
pub fn generate_map(
    width: u32,
    height: u32,
    level: u32,
    gems_visible: bool,
    seed: u64,
) -> Result<Map, GenerationError> {
    let config = GameConfig::default();
    let tables = BalanceTables::default();
    let mut rng = GameRng::new(seed);
    MapGenerator::new(&config, &tables).generate(width, height, level, gems_visible, &mut rng)
}

/// Picks a random cell satisfying `accept`.
///
/// Random probing is bounded by `attempts`; after that the whole grid is
/// scanned and a candidate chosen uniformly. Fails only when no cell
/// qualifies.
pub(crate) fn pick_cell(
    map: &Map,
    rng: &mut GameRng,
    attempts: u32,
    what: &'static str,
    accept: impl Fn(&Map, Position) -> bool,
) -> Result<Position, GenerationError> {
    for _ in 0..attempts {
        let position = Position::new(
            rng.below(map.width()) as i32,
            rng.below(map.height()) as i32,
        );
        if accept(map, position) {
            return Ok(position);
        }
    }

    let candidates: Vec<Position> = map
        .iter()
        .map(|(position, _)| position)
        .filter(|&position| accept(map, position))
        .collect();
    rng.pick(&candidates)
        .copied()
        .ok_or(GenerationError::PlacementExhausted { what, attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Ore;

    #[test]
    fn rejects_tiny_maps() {
        assert!(matches!(
            generate_map(4, 40, 1, false, 1),
            Err(GenerationError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn smallest_maps_generate_for_every_seed() {
        for (width, height) in [(5, 5), (8, 8), (12, 6), (20, 10)] {
            for seed in 0..200 {
                let map = generate_map(width, height, 3, false, seed)
                    .unwrap_or_else(|error| panic!("{width}x{height} seed {seed}: {error}"));
                assert_eq!(map.floor_regions(), 1, "{width}x{height} seed {seed}");
                let ladder = map.ladder().unwrap();
                assert!(!map.has_neighbor(ladder, |cell| !cell.is_floor()));
            }
        }
    }

    #[test]
    fn generated_caves_are_single_regions_with_a_clear_ladder() {
        for seed in 0..8 {
            let map = generate_map(80, 40, 1, false, seed).unwrap();
            assert_eq!(map.floor_regions(), 1, "seed {seed}");

            let ladder = map.ladder().unwrap();
            assert!(map.is_floor(ladder));
            assert!(!map.has_neighbor(ladder, |cell| !cell.is_floor()));
        }
    }

    #[test]
    fn same_seed_same_map() {
        let a = generate_map(60, 30, 3, false, 77).unwrap();
        let b = generate_map(60, 30, 3, false, 77).unwrap();
        assert_eq!(a, b);
        let c = generate_map(60, 30, 3, false, 78).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn first_level_has_copper_only_and_no_gems() {
        let map = generate_map(80, 40, 1, false, 3).unwrap();
        let ores: Vec<Ore> = map
            .iter()
            .filter_map(|(_, cell)| cell.as_wall().and_then(|wall| wall.ore))
            .collect();
        assert!(!ores.is_empty());
        assert!(ores.iter().all(|&ore| ore == Ore::Copper));
    }

    #[test]
    fn deeper_levels_bury_gems() {
        let map = generate_map(80, 40, 3, true, 3).unwrap();
        let gems: Vec<Position> = map
            .iter()
            .filter(|(_, cell)| cell.as_wall().is_some_and(|wall| wall.ore == Some(Ore::Gem)))
            .map(|(position, _)| position)
            .collect();
        assert_eq!(gems.len(), 6);
        for gem in gems {
            assert!(!map.wall(gem).unwrap().exposed);
            assert!(map.is_revealed(gem));
            assert_eq!(map.wall(gem).unwrap().hardness, 2);
        }
    }
}
