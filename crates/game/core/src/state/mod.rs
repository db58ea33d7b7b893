//! Authoritative game state representation.
//!
//! This module owns the entity store, the spatial index derived from it, the
//! terrain, and turn bookkeeping. Front-ends read this state through the query
//! surface but mutate it exclusively through [`crate::GameEngine`].
mod common;
mod components;
mod index;
mod inventory;
mod log;
mod query;
mod store;
mod turn;

pub use common::{Direction, EntityId, Position};
pub use components::{
    BumpKind, Bumpable, Carryable, Climbable, Component, ComponentSet, EnemyKind, EnemyState,
    Entity, EntityKind, Material, Named, OnMap, PlayerStats, Stockable, Wallet,
};
pub use index::SpatialIndex;
pub use inventory::{Inventory, InventoryError, Stack};
pub use log::MessageLog;
pub use query::SelectionEntry;
pub use store::{EntityStore, Query};
pub use turn::{GameMode, InputState, PendingAction, TurnState};

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::engine::GameEngine;
use crate::env::{BalanceTables, GameRng};
use crate::fov::{VisibleSet, compute_visibility};
use crate::map::{GenerationError, Map, MapGenerator};

/// Complete session state.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Seed the session was started from. Never modified.
    pub seed: u64,
    pub config: GameConfig,
    pub tables: BalanceTables,
    pub map: Map,
    pub entities: EntityStore,
    /// Rebuilt from `entities` after every position change.
    pub index: SpatialIndex,
    /// Player's sight for the current turn.
    pub visible: VisibleSet,
    pub rng: GameRng,
    pub player: EntityId,
    /// Holds the stockpile inventory and the wallet.
    pub workshop: EntityId,
    pub turn: TurnState,
    pub log: MessageLog,
}

impl GameState {
    /// Starts a session on a freshly generated first level.
    pub fn new(
        config: GameConfig,
        tables: BalanceTables,
        seed: u64,
    ) -> Result<Self, GenerationError> {
        let mut rng = GameRng::new(seed);
        let map = MapGenerator::new(&config, &tables).generate(
            config.map_width,
            config.map_height,
            1,
            false,
            &mut rng,
        )?;
        let start = map.ladder().ok_or(GenerationError::NoLadderSite)?;

        let mut state = Self::assemble(config, tables, map, start, seed, rng);
        GameEngine::new(&mut state).populate_level();
        state.refresh();
        Ok(state)
    }

    /// Starts a session on a prepared map with no moss or enemies. A ladder
    /// entity is placed if the map marks one.
    pub fn from_map(
        config: GameConfig,
        tables: BalanceTables,
        map: Map,
        player_position: Position,
        seed: u64,
    ) -> Self {
        let rng = GameRng::new(seed);
        let mut state = Self::assemble(config, tables, map, player_position, seed, rng);
        state.refresh();
        state
    }

    fn assemble(
        config: GameConfig,
        tables: BalanceTables,
        map: Map,
        player_position: Position,
        seed: u64,
        rng: GameRng,
    ) -> Self {
        let mut entities = EntityStore::new();

        let tool = &tables.starting_tool;
        let player = entities.create(
            Entity::new()
                .with(OnMap::solid(player_position))
                .with(PlayerStats {
                    hp: tables.player_max_hp,
                    max_hp: tables.player_max_hp,
                    tool: tool.name.clone(),
                    dmg: tool.dmg,
                    hardness: tool.hardness,
                    gear: BTreeSet::new(),
                })
                .with(Inventory::new(
                    config.player_stack_limit,
                    config.player_inventory_limit,
                )),
        );
        let workshop = entities.create(
            Entity::new()
                .with(Inventory::new(
                    config.stockpile_stack_limit,
                    config.stockpile_inventory_limit,
                ))
                .with(Wallet::default()),
        );
        if let Some(ladder) = map.ladder() {
            entities.create(Entity::ladder(ladder));
        }

        let log = MessageLog::new(config.log_capacity);
        Self {
            seed,
            config,
            tables,
            map,
            index: SpatialIndex::default(),
            visible: VisibleSet::new(),
            entities,
            rng,
            player,
            workshop,
            turn: TurnState::new(),
            log,
        }
    }

    /// Rebuilds the spatial index and recomputes the player's sight.
    pub fn refresh(&mut self) {
        self.refresh_index();
        self.visible = compute_visibility(&self.map, self.player_position(), self.config.fov_radius);
    }

    pub fn refresh_index(&mut self) {
        self.index = SpatialIndex::rebuild(&self.entities, self.map.width());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_on_the_ladder() {
        let state = GameState::new(GameConfig::default(), BalanceTables::default(), 5).unwrap();
        let start = state.player_position();

        assert_eq!(state.map.ladder(), Some(start));
        assert!(state.has_capability(start, ComponentSet::CLIMBABLE));
        assert!(state.is_visible(start));
        assert_eq!(state.player, EntityId(1));
        assert_eq!(state.turn.input, InputState::Idle);
        assert!(!state.index.is_stale(&state.entities));
    }

    #[test]
    fn player_is_not_indexed() {
        let map = Map::from_ascii(&["#####", "#...#", "#####"], 1, &BalanceTables::new()).unwrap();
        let state = GameState::from_map(
            GameConfig::default(),
            BalanceTables::default(),
            map,
            Position::new(2, 1),
            0,
        );
        assert!(state.entities_at(Position::new(2, 1)).is_empty());
    }
}
