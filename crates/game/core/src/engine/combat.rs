use crate::state::{Direction, EnemyState, EntityId, Position};

use super::GameEngine;

/// Result of the player bumping an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BumpOutcome {
    Killed,
    /// Knocked back one cell and staggered.
    Shoved(Position),
    /// Nowhere to be shoved to; staggered in place.
    Staggered,
}

impl GameEngine<'_> {
    /// Hits an enemy with the player's tool, then kills or shoves it.
    pub fn bump_enemy(&mut self, id: EntityId) -> Option<BumpOutcome> {
        let damage = self.state.player_stats()?.dmg;
        let player = self.state.player_position();
        let position = self.state.entities.position(id)?;

        let enemy = self.state.entities.get_mut::<EnemyState>(id)?;
        enemy.hp -= damage;
        let kind = enemy.kind;

        if enemy.hp <= 0 {
            self.state.entities.remove(id);
            self.state.refresh_index();
            tracing::debug!(enemy = %id, %kind, "enemy killed");
            self.say(format!("You kill the {kind}"));
            return Some(BumpOutcome::Killed);
        }
        enemy.active = true;
        enemy.staggered = true;

        let away = Direction::between(player, position).map(|direction| position.step(direction));
        let outcome = match away {
            Some(to) if self.is_open(to) => {
                self.state.entities.set_position(id, to);
                self.state.refresh_index();
                BumpOutcome::Shoved(to)
            }
            _ => BumpOutcome::Staggered,
        };
        self.say(format!("You hit the {kind}"));
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::BalanceTables;
    use crate::map::Map;
    use crate::state::{EnemyKind, GameState};

    fn hall() -> GameState {
        let rows = ["########", "#......#", "########"];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        GameState::from_map(GameConfig::default(), tables, map, Position::new(1, 1), 4)
    }

    #[test]
    fn surviving_enemy_is_shoved_and_staggered() {
        let mut state = hall();
        let mut engine = GameEngine::new(&mut state);
        let id = engine.spawn_enemy(EnemyKind::Elite, Position::new(2, 1));

        assert_eq!(engine.bump_enemy(id), Some(BumpOutcome::Shoved(Position::new(3, 1))));
        let enemy = state.entities.get::<EnemyState>(id).unwrap();
        assert_eq!(enemy.hp, 2);
        assert!(enemy.active && enemy.staggered);
        assert_eq!(state.entities_at(Position::new(3, 1)), &[id]);
    }

    #[test]
    fn enemy_against_a_wall_is_staggered_in_place() {
        let mut state = hall();
        state.entities.set_position(state.player, Position::new(5, 1));
        state.refresh();
        let mut engine = GameEngine::new(&mut state);
        let id = engine.spawn_enemy(EnemyKind::Elite, Position::new(6, 1));

        assert_eq!(engine.bump_enemy(id), Some(BumpOutcome::Staggered));
        assert_eq!(state.entities.position(id), Some(Position::new(6, 1)));
    }

    #[test]
    fn weak_enemy_dies_to_one_hit() {
        let mut state = hall();
        let mut engine = GameEngine::new(&mut state);
        let id = engine.spawn_enemy(EnemyKind::Normal, Position::new(2, 1));

        assert_eq!(engine.bump_enemy(id), Some(BumpOutcome::Killed));
        assert!(!state.entities.contains(id));
        assert!(state.entities_at(Position::new(2, 1)).is_empty());
        assert_eq!(state.log.latest(), Some("You kill the enemy"));
    }

    #[test]
    fn bumping_the_player_into_an_enemy_spends_a_turn() {
        let mut state = hall();
        let id = GameEngine::new(&mut state).spawn_enemy(EnemyKind::Elite, Position::new(2, 1));

        assert!(GameEngine::new(&mut state).move_player(Direction::East));
        assert_eq!(state.turn.turn, 1);
        assert_eq!(state.player_position(), Position::new(1, 1));
        // Staggered by the shove, so it recovers rather than closing in.
        assert_eq!(state.entities.position(id), Some(Position::new(3, 1)));
        assert!(!state.entities.get::<EnemyState>(id).unwrap().staggered);
    }
}
