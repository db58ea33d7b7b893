//! Enemy decisions and the per-turn enemy tick.
//!
//! Deciding is pure: [`decide`] reads the state and names an intent. The
//! engine applies intents one enemy at a time, in id order, rebuilding the
//! spatial index after each move so later enemies see earlier ones.

use crate::path::next_step;
use crate::state::{ComponentSet, EnemyState, EntityId, GameState, PlayerStats, Position};

use super::GameEngine;

/// What an enemy does with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyIntent {
    /// Inactive and out of sight.
    Sleep,
    /// Spotted by the player; activation costs the turn.
    Wake,
    /// Staggered by a shove; loses this action.
    Recover,
    Attack,
    Step(Position),
    /// Active but no path toward the player exists.
    Hold,
}

/// Chooses the intent for one enemy. Returns `None` for ids that are not
/// enemies on the map.
pub fn decide(state: &GameState, id: EntityId) -> Option<EnemyIntent> {
    let enemy = state.entities.get::<EnemyState>(id)?;
    let position = state.entities.position(id)?;

    if enemy.staggered {
        return Some(EnemyIntent::Recover);
    }
    if !enemy.active {
        return Some(if state.is_visible(position) {
            EnemyIntent::Wake
        } else {
            EnemyIntent::Sleep
        });
    }

    let target = state.player_position();
    if position.is_adjacent(target) {
        return Some(EnemyIntent::Attack);
    }

    let step = next_step(&state.map, position, target, |cell| {
        !state.has_capability(cell, ComponentSet::ENEMY)
    });
    Some(step.map_or(EnemyIntent::Hold, EnemyIntent::Step))
}

impl GameEngine<'_> {
    /// Runs every enemy once. Stops early if the player dies mid-tick.
    pub(super) fn tick_enemies(&mut self) {
        let enemies = self
            .state
            .entities
            .ids_with(ComponentSet::ENEMY | ComponentSet::ON_MAP);

        for id in enemies {
            if self.player_hp() <= 0 {
                break;
            }
            let Some(intent) = decide(self.state, id) else {
                continue;
            };
            tracing::debug!(enemy = %id, ?intent, "enemy acts");
            self.apply_intent(id, intent);
        }
    }

    fn apply_intent(&mut self, id: EntityId, intent: EnemyIntent) {
        let Some(enemy) = self.state.entities.get_mut::<EnemyState>(id) else {
            return;
        };
        let kind = enemy.kind;
        let damage = enemy.damage;

        match intent {
            EnemyIntent::Sleep | EnemyIntent::Hold => {}
            EnemyIntent::Wake => {
                enemy.active = true;
                self.say(format!("The {kind} is awoken by your footsteps"));
            }
            EnemyIntent::Recover => enemy.staggered = false,
            EnemyIntent::Attack => {
                if let Some(stats) = self.state.entities.get_mut::<PlayerStats>(self.state.player) {
                    stats.hp -= damage;
                }
                self.say(format!("The {kind} wounds you, -{damage} HP"));
            }
            EnemyIntent::Step(to) => {
                if self.state.entities.set_position(id, to) {
                    self.state.refresh_index();
                }
            }
        }
    }

    fn player_hp(&self) -> i32 {
        self.state.player_stats().map_or(0, |stats| stats.hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::BalanceTables;
    use crate::map::Map;
    use crate::state::EnemyKind;

    fn open_room(player: Position) -> GameState {
        let rows = [
            "###########",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "###########",
        ];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        GameState::from_map(GameConfig::default(), tables, map, player, 3)
    }

    fn activate(state: &mut GameState, id: EntityId) {
        if let Some(enemy) = state.entities.get_mut::<EnemyState>(id) {
            enemy.active = true;
        }
    }

    #[test]
    fn active_enemy_steps_straight_toward_the_player() {
        let mut state = open_room(Position::new(5, 2));
        let id = GameEngine::new(&mut state).spawn_enemy(EnemyKind::Normal, Position::new(5, 5));
        activate(&mut state, id);

        assert_eq!(decide(&state, id), Some(EnemyIntent::Step(Position::new(5, 4))));
    }

    #[test]
    fn visible_sleeper_wakes_without_acting() {
        let mut state = open_room(Position::new(5, 2));
        let id = GameEngine::new(&mut state).spawn_enemy(EnemyKind::Normal, Position::new(5, 3));
        state.refresh();

        assert_eq!(decide(&state, id), Some(EnemyIntent::Wake));
        GameEngine::new(&mut state).tick_enemies();

        let enemy = state.entities.get::<EnemyState>(id).unwrap();
        assert!(enemy.active);
        assert_eq!(state.player_stats().unwrap().hp, 10);
        assert_eq!(state.entities.position(id), Some(Position::new(5, 3)));
        assert!(state.log.contains("awoken"));
    }

    #[test]
    fn adjacent_enemy_attacks() {
        let mut state = open_room(Position::new(5, 2));
        let id = GameEngine::new(&mut state).spawn_enemy(EnemyKind::Elite, Position::new(5, 3));
        activate(&mut state, id);

        GameEngine::new(&mut state).tick_enemies();

        assert_eq!(state.player_stats().unwrap().hp, 8);
        assert_eq!(state.log.latest(), Some("The elite wounds you, -2 HP"));
    }

    #[test]
    fn staggered_enemy_recovers_instead_of_attacking() {
        let mut state = open_room(Position::new(5, 2));
        let id = GameEngine::new(&mut state).spawn_enemy(EnemyKind::Normal, Position::new(5, 3));
        if let Some(enemy) = state.entities.get_mut::<EnemyState>(id) {
            enemy.active = true;
            enemy.staggered = true;
        }

        GameEngine::new(&mut state).tick_enemies();

        assert_eq!(state.player_stats().unwrap().hp, 10);
        assert!(!state.entities.get::<EnemyState>(id).unwrap().staggered);
    }

    #[test]
    fn enemy_boxed_in_by_others_holds() {
        // Player in a dead end; both approach cells held by enemies.
        let rows = ["#######", "#.#####", "#.....#", "#######"];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        let mut state = GameState::from_map(GameConfig::default(), tables, map, Position::new(1, 1), 0);

        let mut engine = GameEngine::new(&mut state);
        engine.spawn_enemy(EnemyKind::Normal, Position::new(1, 2));
        engine.spawn_enemy(EnemyKind::Normal, Position::new(2, 2));
        let blocked = engine.spawn_enemy(EnemyKind::Normal, Position::new(4, 2));
        activate(&mut state, blocked);

        assert_eq!(decide(&state, blocked), Some(EnemyIntent::Hold));
    }
}
