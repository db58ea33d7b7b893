use crate::map::Cell;
use crate::state::{EntityId, Material, Position};

use super::{GameEngine, GameplayError};

/// Result of one successful mining hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MineOutcome {
    Damaged { remaining: i32 },
    /// The wall became floor and dropped a mineral.
    Broken { drop: EntityId, material: Material },
}

impl GameEngine<'_> {
    /// Hits the wall at `position` with the player's tool.
    ///
    /// A hit spends a turn. A refused hit (too hard, nothing there) is
    /// reported and spends nothing.
    pub fn mine(&mut self, position: Position) -> Result<MineOutcome, GameplayError> {
        let result = self.try_mine(position);
        match &result {
            Ok(_) => self.end_turn(),
            Err(error) => self.report(error),
        }
        result
    }

    fn try_mine(&mut self, position: Position) -> Result<MineOutcome, GameplayError> {
        let player = self.state.player;
        let stats = self
            .state
            .player_stats()
            .ok_or(GameplayError::ComponentMissing {
                entity: player,
                component: "PlayerStats",
            })?;
        let (damage, tool_hardness, tool) = (stats.dmg, stats.hardness, stats.tool.clone());

        let wall = match self.state.map.cell(position) {
            None => return Err(GameplayError::OutOfBounds(position)),
            Some(Cell::Floor) => return Err(GameplayError::NothingToMine(position)),
            Some(Cell::Wall(wall)) => *wall,
        };
        let material = wall.material();
        if wall.hardness > tool_hardness {
            return Err(GameplayError::HardnessTooHigh {
                material,
                hardness: wall.hardness,
                tool,
            });
        }

        let remaining = wall.hp - damage;
        if remaining > 0 {
            if let Some(wall) = self.state.map.wall_mut(position) {
                wall.hp = remaining;
            }
            self.say(format!("Mining {material}"));
            return Ok(MineOutcome::Damaged { remaining });
        }

        self.state.map.mine_out(position);
        let quartz_chance = self.state.config.quartz_chance;
        let material = if material == Material::Rock && self.state.rng.chance(quartz_chance) {
            self.say("This rock contained a piece of quartz!");
            Material::Quartz
        } else {
            self.say(format!("Mined {material}"));
            material
        };
        let drop = self.spawn_mineral(material, position);
        self.state.map.calculate_exposed();
        tracing::debug!(%position, %material, "wall broken");
        Ok(MineOutcome::Broken { drop, material })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::BalanceTables;
    use crate::map::Map;
    use crate::state::{Carryable, ComponentSet, Direction, GameState};

    fn quarry(rows: &[&str], quartz_chance: f64) -> GameState {
        let tables = BalanceTables::new();
        let map = Map::from_ascii(rows, 1, &tables).unwrap();
        let config = GameConfig {
            quartz_chance,
            ..GameConfig::default()
        };
        GameState::from_map(config, tables, map, Position::new(1, 1), 11)
    }

    #[test]
    fn four_hits_break_a_rock_wall() {
        let mut state = quarry(&["#####", "#.#.#", "#####"], 0.0);
        let target = Position::new(2, 1);
        let mut engine = GameEngine::new(&mut state);

        for expected in [7, 4, 1] {
            assert_eq!(engine.mine(target), Ok(MineOutcome::Damaged { remaining: expected }));
        }
        let outcome = engine.mine(target).unwrap();
        let MineOutcome::Broken { drop, material } = outcome else {
            panic!("expected the wall to break, got {outcome:?}");
        };

        assert_eq!(material, Material::Rock);
        assert!(state.map.is_floor(target));
        assert_eq!(state.entities_at(target), &[drop]);
        assert_eq!(state.turn.turn, 4);
        assert_eq!(state.log.latest(), Some("Mined rock"));
    }

    #[test]
    fn hard_walls_refuse_the_starting_pick() {
        let mut state = quarry(&["#####", "#.m.#", "#####"], 0.0);
        let target = Position::new(2, 1);

        for _ in 0..5 {
            let result = GameEngine::new(&mut state).move_player(Direction::East);
            assert!(result);
        }

        assert_eq!(state.map.wall(target).unwrap().hp, 20);
        assert_eq!(state.turn.turn, 0);
        assert_eq!(state.log.latest(), Some("You need a better tool for mithril ore"));
    }

    #[test]
    fn rock_can_turn_out_to_be_quartz() {
        let mut state = quarry(&["#####", "#.#.#", "#####"], 1.0);
        if let Some(wall) = state.map.wall_mut(Position::new(2, 1)) {
            wall.hp = 1;
        }

        let outcome = GameEngine::new(&mut state).mine(Position::new(2, 1)).unwrap();
        assert!(matches!(outcome, MineOutcome::Broken { material: Material::Quartz, .. }));
        assert!(state.has_capability(Position::new(2, 1), ComponentSet::CARRYABLE));
        assert!(state.log.contains("quartz"));
    }

    #[test]
    fn breaking_a_wall_exposes_its_neighbours() {
        let mut state = quarry(&["#####", "#.#c#", "#####"], 0.0);
        assert!(!state.map.wall(Position::new(3, 1)).unwrap().exposed);
        if let Some(wall) = state.map.wall_mut(Position::new(2, 1)) {
            wall.hp = 3;
        }

        GameEngine::new(&mut state).mine(Position::new(2, 1)).unwrap();

        assert!(state.map.wall(Position::new(3, 1)).unwrap().exposed);
        assert_eq!(state.hover_text(Position::new(3, 1)), "copper ore");
        assert_eq!(materials_at(&state, Position::new(2, 1)), vec![Material::Rock]);
    }

    #[test]
    fn floor_and_out_of_bounds_are_not_minable() {
        let mut state = quarry(&["#####", "#...#", "#####"], 0.0);
        let mut engine = GameEngine::new(&mut state);
        assert_eq!(
            engine.mine(Position::new(2, 1)),
            Err(GameplayError::NothingToMine(Position::new(2, 1)))
        );
        assert_eq!(
            engine.mine(Position::new(-1, 0)),
            Err(GameplayError::OutOfBounds(Position::new(-1, 0)))
        );
        assert_eq!(state.turn.turn, 0);
    }

    fn materials_at(state: &GameState, position: Position) -> Vec<Material> {
        state
            .entities
            .query_in::<(Carryable,)>(state.entities_at(position))
            .map(|(_, (carryable,))| carryable.material)
            .collect()
    }
}
