//! Level population, descent, and the workshop.

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::env::{GameRng, ToolStats};
use crate::map::{GenerationError, Map, MapGenerator, pick_cell};
use crate::state::{
    Carryable, ComponentSet, EnemyKind, EntityId, GameMode, GameState, Inventory, Material,
    PlayerStats, Position, Wallet,
};

use super::{GameEngine, GameplayError};

/// Gear name that reveals gem walls through rock.
pub const GEM_SENSOR: &str = "sensor";

/// Moss and enemy sites chosen for a level before anything is spawned.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Population {
    moss: Vec<Position>,
    enemies: Vec<(EnemyKind, Position)>,
}

impl Population {
    /// Picks spawn sites on `map`. Nothing lands on `player` or the ladder,
    /// and no two spawns share a cell. Enemies start out of sight when the
    /// level has room for it. Counts are targets: a cramped level gets as
    /// many as it has free floor for.
    pub(crate) fn plan(
        map: &Map,
        config: &GameConfig,
        player: Position,
        rng: &mut GameRng,
    ) -> Self {
        let level = map.level();
        let attempts = config.max_placement_attempts;
        let population = &config.population;
        let radius = i64::from(config.fov_radius);

        let mut taken: BTreeSet<Position> =
            std::iter::once(player).chain(map.ladder()).collect();
        let free = |taken: &BTreeSet<Position>, position: Position| {
            map.is_floor(position) && !taken.contains(&position)
        };
        let mut plan = Self::default();

        for _ in 0..population.moss_count {
            let Ok(position) = pick_cell(map, rng, attempts, "moss", |_, position| {
                free(&taken, position)
            }) else {
                break;
            };
            taken.insert(position);
            plan.moss.push(position);
        }

        for _ in 0..population.enemies_for_level(level) {
            let distant = pick_cell(map, rng, attempts, "enemy", |_, position| {
                let (dx, dy) = (
                    i64::from(position.x - player.x),
                    i64::from(position.y - player.y),
                );
                free(&taken, position) && dx * dx + dy * dy > radius * radius
            });
            let Ok(position) = distant.or_else(|_| {
                pick_cell(map, rng, attempts, "enemy", |_, position| free(&taken, position))
            }) else {
                break;
            };
            let kind = if rng.chance(population.elite_chance(level)) {
                EnemyKind::Elite
            } else {
                EnemyKind::Normal
            };
            taken.insert(position);
            plan.enemies.push((kind, position));
        }

        if plan.moss.len() < population.moss_count as usize
            || plan.enemies.len() < population.enemies_for_level(level) as usize
        {
            tracing::debug!(
                level,
                moss = plan.moss.len(),
                enemies = plan.enemies.len(),
                "level too cramped for its full population"
            );
        }
        plan
    }
}

impl GameEngine<'_> {
    /// Places moss and enemies on the current level.
    pub(crate) fn populate_level(&mut self) {
        let player = self.state.player_position();
        let plan = {
            let GameState {
                config, map, rng, ..
            } = &mut *self.state;
            Population::plan(map, config, player, rng)
        };
        self.spawn_population(plan);
    }

    fn spawn_population(&mut self, plan: Population) {
        let (moss, enemies) = (plan.moss.len(), plan.enemies.len());
        for position in plan.moss {
            self.spawn_moss(position);
        }
        for (kind, position) in plan.enemies {
            self.spawn_enemy(kind, position);
        }
        tracing::debug!(level = self.state.level(), moss, enemies, "level populated");
    }

    /// Generates the next level down and moves the player onto its ladder.
    ///
    /// Everything left on the old level's floor is destroyed; the player's
    /// inventory comes along. The gem sensor state carries over. On error
    /// the current level is left exactly as it was.
    pub fn descend(&mut self) -> Result<(), GenerationError> {
        let next = self.state.level() + 1;
        let gems_visible = self.state.map.gems_visible();
        let config = &self.state.config;
        let mut rng = self.state.rng.clone();

        let map = MapGenerator::new(config, &self.state.tables).generate(
            config.map_width,
            config.map_height,
            next,
            gems_visible,
            &mut rng,
        )?;
        let ladder = map.ladder().ok_or(GenerationError::NoLadderSite)?;
        let plan = Population::plan(&map, config, ladder, &mut rng);

        let player = self.state.player;
        for id in self.state.entities.ids_with(ComponentSet::ON_MAP) {
            if id != player {
                self.state.entities.remove(id);
            }
        }
        self.state.map = map;
        self.state.rng = rng;
        self.state.entities.set_position(player, ladder);
        self.spawn_ladder(ladder);
        self.spawn_population(plan);
        self.state.refresh();

        tracing::info!(level = next, %ladder, "descended");
        self.say(format!("Climbing to level {next}"));
        Ok(())
    }

    /// Climbs out to the workshop and unloads the inventory into the
    /// stockpile. Items that do not fit stay with the player.
    pub fn enter_workshop(&mut self) {
        self.state.turn.mode = GameMode::Workshop;

        let (player, workshop) = (self.state.player, self.state.workshop);
        let carried: Vec<EntityId> = self
            .state
            .inventory()
            .map(|inventory| inventory.iter().collect())
            .unwrap_or_default();

        let mut stocked = 0;
        for id in carried {
            if !self.state.entities.has(id, ComponentSet::STOCKABLE) {
                continue;
            }
            let Some(material) = self.state.entities.get::<Carryable>(id).map(|c| c.material) else {
                continue;
            };
            let accepted = self
                .state
                .entities
                .get_mut::<Inventory>(workshop)
                .is_some_and(|stockpile| stockpile.give(id, material).is_ok());
            if accepted {
                if let Some(inventory) = self.state.entities.get_mut::<Inventory>(player) {
                    inventory.take(id);
                }
                stocked += 1;
            }
        }

        tracing::info!(stocked, "entered workshop");
        self.say("Climbing back up to workshop");
    }

    /// Leaves the workshop. Returns false when not in it.
    pub fn return_to_mine(&mut self) -> bool {
        if self.state.turn.mode != GameMode::Workshop {
            return false;
        }
        self.state.turn.mode = GameMode::Mine;
        self.say("You yearn for the mines!");
        true
    }

    /// Sells one stocked item of `material`, crediting the workshop wallet.
    pub fn sell(&mut self, material: Material) -> bool {
        match self.try_sell(material) {
            Ok(value) => {
                self.say(format!("Sold {material} for {value}"));
                true
            }
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    fn try_sell(&mut self, material: Material) -> Result<i64, GameplayError> {
        let value = self
            .state
            .tables
            .sale_value(material)
            .ok_or(GameplayError::NotForSale(material))?;
        let workshop = self.state.workshop;
        let item = self
            .state
            .entities
            .get_mut::<Inventory>(workshop)
            .and_then(|stockpile| stockpile.remove_of_type(material))
            .ok_or(GameplayError::OutOfStock(material))?;
        self.state.entities.remove(item);

        if let Some(wallet) = self.state.entities.get_mut::<Wallet>(workshop) {
            wallet.transact(value);
        }
        Ok(value)
    }

    /// Adds named gear to the player. The gem sensor takes effect at once.
    pub fn grant_gear(&mut self, name: &str) {
        let player = self.state.player;
        if let Some(stats) = self.state.entities.get_mut::<PlayerStats>(player) {
            stats.gear.insert(name.to_string());
        }
        if name == GEM_SENSOR {
            self.state.map.set_gems_visible(true);
        }
        self.debug_message(format!("Granted {name}"));
    }

    pub fn upgrade_tool(&mut self, tool: &ToolStats) {
        let player = self.state.player;
        if let Some(stats) = self.state.entities.get_mut::<PlayerStats>(player) {
            stats.tool = tool.name.clone();
            stats.dmg = tool.dmg;
            stats.hardness = tool.hardness;
        }
        self.say(format!("You now wield a {}", tool.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BalanceTables;
    use crate::state::Direction;

    fn session(seed: u64) -> GameState {
        GameState::new(GameConfig::default(), BalanceTables::default(), seed).unwrap()
    }

    #[test]
    fn new_levels_are_populated_off_the_ladder() {
        let state = session(21);
        let config = &state.config.population;
        let start = state.player_position();

        let moss = state
            .entities
            .query::<(Carryable,)>()
            .filter(|(_, (c,))| c.material == Material::Moss)
            .count();
        assert_eq!(moss, config.moss_count as usize);
        assert_eq!(state.enemies().count(), config.enemies_for_level(1) as usize);
        assert_eq!(state.entities_at(start).len(), 1);
        assert!(state.has_capability(start, ComponentSet::CLIMBABLE));
    }

    #[test]
    fn descent_replaces_the_level() {
        let mut state = session(8);
        let old: Vec<EntityId> = state
            .entities
            .ids_with(ComponentSet::ON_MAP)
            .into_iter()
            .filter(|&id| id != state.player)
            .collect();

        GameEngine::new(&mut state).descend().unwrap();

        assert_eq!(state.level(), 2);
        assert!(old.iter().all(|&id| !state.entities.contains(id)));
        assert_eq!(state.map.ladder(), Some(state.player_position()));
        assert!(state.has_capability(state.player_position(), ComponentSet::CLIMBABLE));
        assert_eq!(state.enemies().count(), state.config.population.enemies_for_level(2) as usize);
        assert_eq!(state.log.latest(), Some("Climbing to level 2"));
    }

    #[test]
    fn failed_descent_leaves_the_level_untouched() {
        let mut state = session(8);
        let on_map = state.entities.ids_with(ComponentSet::ON_MAP);
        let (map, rng, start) = (state.map.clone(), state.rng.clone(), state.player_position());
        state.config.map_width = Map::MIN_SIZE - 1;

        assert!(matches!(
            GameEngine::new(&mut state).descend(),
            Err(GenerationError::InvalidDimensions { .. })
        ));

        assert_eq!(state.level(), 1);
        assert_eq!(state.map, map);
        assert_eq!(state.rng, rng);
        assert_eq!(state.player_position(), start);
        assert_eq!(state.entities.ids_with(ComponentSet::ON_MAP), on_map);
    }

    #[test]
    fn cramped_levels_take_what_population_fits() {
        let config = GameConfig::default().with_map_size(Map::MIN_SIZE, Map::MIN_SIZE);
        for seed in 0..50 {
            let mut state = GameState::new(config.clone(), BalanceTables::default(), seed).unwrap();
            GameEngine::new(&mut state).descend().unwrap();

            let floor = state.map.floor_positions().len();
            let spawned = state.entities.ids_with(ComponentSet::ON_MAP).len();
            // Player and ladder share a cell; every other spawn has its own.
            assert!(spawned <= floor + 1, "seed {seed}");
            assert_eq!(state.map.ladder(), Some(state.player_position()));
        }
    }

    #[test]
    fn plans_keep_spawns_apart() {
        let state = session(5);
        let mut rng = GameRng::new(99);
        let plan = Population::plan(&state.map, &state.config, state.player_position(), &mut rng);

        let mut cells: Vec<Position> = plan.moss.clone();
        cells.extend(plan.enemies.iter().map(|&(_, position)| position));
        let distinct: BTreeSet<Position> = cells.iter().copied().collect();
        assert_eq!(distinct.len(), cells.len());
        assert!(!distinct.contains(&state.player_position()));
        assert!(cells.iter().all(|&position| state.map.is_floor(position)));
    }

    #[test]
    fn sensor_survives_descent() {
        let mut state = session(13);
        let mut engine = GameEngine::new(&mut state);
        engine.grant_gear(GEM_SENSOR);
        engine.descend().unwrap();
        assert!(state.map.gems_visible());
        assert!(state.player_stats().unwrap().gear.contains(GEM_SENSOR));
    }

    #[test]
    fn workshop_takes_what_fits_and_sells_it() {
        let mut state = session(3);
        let (player, here) = (state.player, state.player_position());
        let mut engine = GameEngine::new(&mut state);
        for material in [Material::Quartz, Material::Quartz, Material::Rock] {
            let id = engine.spawn_mineral(material, here);
            assert!(engine.give_to_inventory(player, id));
        }

        engine.enter_workshop();
        assert!(!engine.move_player(Direction::North));
        assert!(engine.sell(Material::Quartz));
        assert!(!engine.sell(Material::Rock));
        assert!(engine.return_to_mine());

        assert_eq!(state.mode(), GameMode::Mine);
        assert!(state.inventory().unwrap().is_empty());
        assert_eq!(state.stockpile().unwrap().count_of(Material::Quartz), 1);
        assert_eq!(state.balance(), 1);
        assert_eq!(state.log.latest(), Some("You yearn for the mines!"));
    }

    #[test]
    fn tool_upgrade_raises_hardness() {
        let mut state = session(1);
        GameEngine::new(&mut state).upgrade_tool(&ToolStats::new("mithril pick", 4, 2));
        let stats = state.player_stats().unwrap();
        assert_eq!((stats.dmg, stats.hardness), (4, 2));
        assert_eq!(stats.tool, "mithril pick");
    }
}
