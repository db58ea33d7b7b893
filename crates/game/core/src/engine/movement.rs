use crate::state::{BumpKind, Bumpable, Direction, EntityId, GameMode, OnMap, Position};

use super::GameEngine;

impl GameEngine<'_> {
    /// Handles a movement key.
    ///
    /// Steps onto open floor, mines a wall, or bumps whatever solid thing is
    /// in the way. Returns whether the input was consumed.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.state.turn.input.is_terminal() || self.state.turn.mode != GameMode::Mine {
            return false;
        }

        let target = self.state.player_position().step(direction);
        if !self.state.map.contains(target) {
            return true;
        }

        if self.is_open(target) {
            self.state.entities.set_position(self.state.player, target);
            self.end_turn();
        } else if self.state.map.is_wall(target) {
            // Failures are reported inside `mine`.
            let _ = self.mine(target);
        } else {
            let bumped: Vec<EntityId> = self
                .state
                .entities
                .query_in::<(Bumpable,)>(self.state.entities_at(target))
                .map(|(id, (bumpable,))| (id, bumpable.kind))
                .filter(|(_, kind)| *kind == BumpKind::Enemy)
                .map(|(id, _)| id)
                .collect();
            if bumped.is_empty() {
                self.debug_message(format!("Something blocks the way at {target}"));
                return true;
            }
            for id in bumped {
                self.bump_enemy(id);
            }
            self.end_turn();
        }
        true
    }

    /// Floor with no solid occupant.
    pub(super) fn is_open(&self, position: Position) -> bool {
        self.state.map.is_floor(position)
            && !self
                .state
                .entities
                .query_in::<(OnMap,)>(self.state.entities_at(position))
                .any(|(_, (on_map,))| on_map.solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::BalanceTables;
    use crate::map::Map;
    use crate::state::{GameState, InputState};

    fn corridor() -> GameState {
        let rows = ["#######", "#.....#", "#######"];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        GameState::from_map(GameConfig::default(), tables, map, Position::new(1, 1), 9)
    }

    #[test]
    fn stepping_onto_floor_spends_a_turn() {
        let mut state = corridor();
        assert!(GameEngine::new(&mut state).move_player(Direction::East));
        assert_eq!(state.player_position(), Position::new(2, 1));
        assert_eq!(state.turn.turn, 1);
        assert!(state.is_visible(Position::new(5, 1)));
    }

    #[test]
    fn map_edge_consumes_input_without_a_turn() {
        let rows = ["...", "...", "..."];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        let mut state =
            GameState::from_map(GameConfig::default(), tables, map, Position::new(0, 0), 0);

        assert!(GameEngine::new(&mut state).move_player(Direction::North));
        assert_eq!(state.player_position(), Position::ORIGIN);
        assert_eq!(state.turn.turn, 0);
    }

    #[test]
    fn movement_is_ignored_once_the_game_is_over() {
        let mut state = corridor();
        state.turn.input = InputState::Defeat;
        assert!(!GameEngine::new(&mut state).move_player(Direction::East));
        assert_eq!(state.player_position(), Position::new(1, 1));
    }

    #[test]
    fn loose_items_do_not_block_movement() {
        let mut state = corridor();
        let mut engine = GameEngine::new(&mut state);
        engine.spawn_moss(Position::new(2, 1));
        assert!(engine.move_player(Direction::East));
        assert_eq!(state.player_position(), Position::new(2, 1));
    }
}
