//! Moving carryables between the map and inventories, and entity spawning.

use crate::error::GameError;
use crate::state::{
    Carryable, ComponentSet, EnemyKind, Entity, EntityId, Inventory, Material, Named, OnMap,
    PlayerStats, Position,
};

use super::{GameEngine, GameplayError, PlayerAction};

impl GameEngine<'_> {
    /// Puts a carryable into `container`'s inventory, taking it off the map.
    /// Returns false, leaving everything where it was, if it does not fit.
    pub fn give_to_inventory(&mut self, container: EntityId, item: EntityId) -> bool {
        match self.try_give(container, item) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(%container, %item, code = error.error_code(), "give refused");
                false
            }
        }
    }

    pub(super) fn try_give(
        &mut self,
        container: EntityId,
        item: EntityId,
    ) -> Result<(), GameplayError> {
        let entity = self
            .state
            .entities
            .entity(item)
            .ok_or(GameplayError::EntityNotFound(item))?;
        let material = entity
            .get::<Carryable>()
            .ok_or(GameplayError::NotCarryable(item))?
            .material;
        if container == self.state.workshop && !entity.has(ComponentSet::STOCKABLE) {
            return Err(GameplayError::NotStockable(item));
        }
        let carried = self
            .state
            .entities
            .query::<(Inventory,)>()
            .any(|(_, (inventory,))| inventory.contains(item));
        if carried {
            return Err(GameplayError::AlreadyCarried(item));
        }

        self.state
            .entities
            .get_mut::<Inventory>(container)
            .ok_or(GameplayError::ComponentMissing {
                entity: container,
                component: "Inventory",
            })?
            .give(item, material)?;

        if self.state.entities.remove_component::<OnMap>(item).is_some() {
            self.state.refresh_index();
        }
        Ok(())
    }

    /// Takes the whole stack holding `item` out of `container`.
    ///
    /// With a location every member is placed there; without one the
    /// members are left unplaced for the caller to hand elsewhere.
    pub fn drop_from_inventory(
        &mut self,
        container: EntityId,
        item: EntityId,
        location: Option<Position>,
    ) -> Result<Vec<EntityId>, GameplayError> {
        if let Some(position) = location {
            if !self.state.map.contains(position) {
                return Err(GameplayError::OutOfBounds(position));
            }
        }

        let stack = self
            .state
            .entities
            .get_mut::<Inventory>(container)
            .ok_or(GameplayError::ComponentMissing {
                entity: container,
                component: "Inventory",
            })?
            .drop_stack(item)
            .ok_or(GameplayError::NotInInventory(item))?;

        let members = stack.into_items();
        if let Some(position) = location {
            for &member in &members {
                self.state.entities.add_component(member, OnMap::new(position));
            }
            self.state.refresh_index();
        }
        Ok(members)
    }

    /// Pops up to `count` items of `material` from `container`. Returns fewer
    /// when stock runs short.
    pub fn remove_from_inventory(
        &mut self,
        container: EntityId,
        material: Material,
        count: usize,
    ) -> Vec<EntityId> {
        self.state
            .entities
            .get_mut::<Inventory>(container)
            .map(|inventory| inventory.remove_count(material, count))
            .unwrap_or_default()
    }

    /// Picks up an entity lying under the player.
    pub fn pickup(&mut self, item: EntityId) -> bool {
        let underfoot = self.state.entities_at(self.state.player_position()).contains(&item);
        let result = if underfoot {
            self.try_give(self.state.player, item)
        } else {
            Err(GameplayError::NotUnderfoot(item))
        };

        match result {
            Ok(()) => {
                let name = self.name_of(item);
                self.say(format!("You pick up the {name}"));
                self.end_turn();
                true
            }
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    /// Drops the player's stack holding `item` underfoot.
    pub fn drop_item(&mut self, item: EntityId) -> bool {
        let name = self.name_of(item);
        let here = self.state.player_position();
        match self.drop_from_inventory(self.state.player, item, Some(here)) {
            Ok(members) => {
                match members.len() {
                    1 => self.say(format!("You drop the {name}")),
                    n => self.say(format!("You drop the {name} ({n})")),
                }
                self.end_turn();
                true
            }
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    /// Drinks a carried potion, healing to full.
    pub fn quaff(&mut self) -> bool {
        match self.try_quaff() {
            Ok(()) => {
                self.say("Your wounds are healed!");
                self.end_turn();
                true
            }
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    fn try_quaff(&mut self) -> Result<(), GameplayError> {
        let player = self.state.player;
        let stats = self
            .state
            .player_stats()
            .ok_or(GameplayError::ComponentMissing {
                entity: player,
                component: "PlayerStats",
            })?;
        if stats.hp >= stats.max_hp {
            return Err(GameplayError::FullHealth);
        }

        let potion = self
            .state
            .entities
            .get_mut::<Inventory>(player)
            .and_then(|inventory| inventory.remove_of_type(Material::Potion))
            .ok_or(GameplayError::ActionUnavailable(PlayerAction::Quaff))?;
        self.state.entities.remove(potion);

        if let Some(stats) = self.state.entities.get_mut::<PlayerStats>(player) {
            stats.hp = stats.max_hp;
        }
        Ok(())
    }

    /// Display name for messages.
    fn name_of(&self, id: EntityId) -> String {
        self.state
            .entities
            .get::<Named>(id)
            .map(Named::hover)
            .unwrap_or_else(|| "thing".to_string())
    }
}

/// Entity factories. Each keeps the spatial index current.
impl GameEngine<'_> {
    pub fn spawn_mineral(&mut self, material: Material, position: Position) -> EntityId {
        self.spawn_on_map(Entity::mineral(material, position))
    }

    pub fn spawn_moss(&mut self, position: Position) -> EntityId {
        self.spawn_on_map(Entity::moss(position))
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Position) -> EntityId {
        let stats = self.state.tables.enemy(kind);
        self.spawn_on_map(Entity::enemy(kind, stats, position))
    }

    pub fn spawn_ladder(&mut self, position: Position) -> EntityId {
        self.spawn_on_map(Entity::ladder(position))
    }

    /// Creates an unplaced item, e.g. workshop output. Creating the artifact
    /// ends the game.
    pub fn spawn_item(&mut self, material: Material) -> EntityId {
        let id = self.state.entities.create(Entity::item(material));
        self.debug_message(format!("Spawned {material} as {id}"));
        self.check_outcome();
        id
    }

    fn spawn_on_map(&mut self, entity: Entity) -> EntityId {
        let id = self.state.entities.create(entity);
        self.state.refresh_index();
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::BalanceTables;
    use crate::map::Map;
    use crate::state::{GameState, InputState, Stockable};

    fn floor() -> GameState {
        let rows = ["######", "#....#", "#....#", "######"];
        let tables = BalanceTables::new();
        let map = Map::from_ascii(&rows, 1, &tables).unwrap();
        GameState::from_map(GameConfig::default(), tables, map, Position::new(1, 1), 2)
    }

    #[test]
    fn pickup_then_drop_restores_the_position() {
        let mut state = floor();
        let here = state.player_position();
        let mut engine = GameEngine::new(&mut state);
        let moss = engine.spawn_moss(here);

        assert!(engine.pickup(moss));
        assert!(engine.state().entities.position(moss).is_none());
        assert!(engine.state().entities_at(here).is_empty());

        assert!(engine.drop_item(moss));
        assert_eq!(state.entities.position(moss), Some(here));
        assert!(state.inventory().unwrap().is_empty());
        assert_eq!(state.turn.turn, 2);
    }

    #[test]
    fn full_inventory_leaves_the_item_on_the_floor() {
        let mut state = floor();
        let here = state.player_position();
        let mut engine = GameEngine::new(&mut state);
        for material in [Material::Rock, Material::Quartz, Material::Moss] {
            let id = engine.spawn_mineral(material, Position::new(3, 2));
            assert!(engine.give_to_inventory(engine.state().player, id));
        }
        let gem = engine.spawn_mineral(Material::Gem, here);

        assert!(!engine.pickup(gem));
        assert_eq!(state.entities.position(gem), Some(here));
        assert_eq!(state.log.latest(), Some("No room!"));
        assert_eq!(state.turn.turn, 0);
    }

    #[test]
    fn items_elsewhere_cannot_be_picked_up() {
        let mut state = floor();
        let mut engine = GameEngine::new(&mut state);
        let far = engine.spawn_moss(Position::new(4, 2));
        assert!(!engine.pickup(far));
        assert_eq!(state.entities.position(far), Some(Position::new(4, 2)));
    }

    #[test]
    fn carried_items_are_not_given_twice() {
        let mut state = floor();
        let workshop = state.workshop;
        let player = state.player;
        let mut engine = GameEngine::new(&mut state);
        let rock = engine.spawn_mineral(Material::Rock, Position::new(2, 2));

        assert!(engine.give_to_inventory(player, rock));
        assert_eq!(engine.try_give(workshop, rock), Err(GameplayError::AlreadyCarried(rock)));
        let ladder = engine.spawn_ladder(Position::new(3, 2));
        assert_eq!(engine.try_give(player, ladder), Err(GameplayError::NotCarryable(ladder)));
    }

    #[test]
    fn drop_without_a_location_leaves_members_unplaced() {
        let mut state = floor();
        let player = state.player;
        let mut engine = GameEngine::new(&mut state);
        let rocks: Vec<EntityId> = (0..3)
            .map(|_| engine.spawn_mineral(Material::Rock, Position::new(2, 2)))
            .collect();
        for &rock in &rocks {
            assert!(engine.give_to_inventory(player, rock));
        }

        let members = engine.drop_from_inventory(player, rocks[1], None).unwrap();
        assert_eq!(members, rocks);
        assert!(members.iter().all(|&id| state.entities.position(id).is_none()));
        assert!(state.inventory().unwrap().is_empty());
    }

    #[test]
    fn remove_from_inventory_returns_what_is_there() {
        let mut state = floor();
        let player = state.player;
        let mut engine = GameEngine::new(&mut state);
        for _ in 0..2 {
            let id = engine.spawn_mineral(Material::CopperOre, Position::new(2, 2));
            engine.give_to_inventory(player, id);
        }
        assert_eq!(engine.remove_from_inventory(player, Material::CopperOre, 5).len(), 2);
        assert!(engine.remove_from_inventory(player, Material::CopperOre, 1).is_empty());
    }

    #[test]
    fn quaff_heals_and_consumes_the_potion() {
        let mut state = floor();
        let player = state.player;
        let mut engine = GameEngine::new(&mut state);
        assert!(!engine.quaff());
        assert_eq!(
            engine.state().log.latest(),
            Some("You don't need a potion right now")
        );

        let potion = engine.spawn_item(Material::Potion);
        assert!(engine.give_to_inventory(player, potion));
        if let Some(stats) = state.entities.get_mut::<PlayerStats>(player) {
            stats.hp = 3;
        }

        assert!(GameEngine::new(&mut state).quaff());
        assert_eq!(state.player_stats().unwrap().hp, 10);
        assert!(!state.entities.contains(potion));
        assert!(state.log.contains("Your wounds are healed!"));
    }

    #[test]
    fn workshop_refuses_goods_it_cannot_stock() {
        let mut state = floor();
        let workshop = state.workshop;
        let mut engine = GameEngine::new(&mut state);
        let keepsake = engine.spawn_mineral(Material::Quartz, Position::new(2, 2));
        engine.state.entities.remove_component::<Stockable>(keepsake);
        let quartz = engine.spawn_mineral(Material::Quartz, Position::new(2, 2));

        assert_eq!(
            engine.try_give(workshop, keepsake),
            Err(GameplayError::NotStockable(keepsake))
        );
        assert!(engine.give_to_inventory(workshop, quartz));

        assert_eq!(state.entities.position(keepsake), Some(Position::new(2, 2)));
        let stockpile = state.stockpile().unwrap();
        assert!(!stockpile.contains(keepsake));
        assert_eq!(stockpile.count_of(Material::Quartz), 1);
    }

    #[test]
    fn spawning_the_amulet_wins() {
        let mut state = floor();
        GameEngine::new(&mut state).spawn_item(Material::Amulet);
        assert_eq!(state.turn.input, InputState::Victory);
    }
}
