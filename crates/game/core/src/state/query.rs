//! Read-only query surface for front-ends.
//!
//! Everything here reads the current turn's state and never mutates it.

use crate::engine::PlayerAction;
use crate::map::{Cell, Rect};

use super::{
    Carryable, ComponentSet, EnemyState, EntityId, GameMode, GameState, InputState, Inventory,
    Material, Named, PendingAction, PlayerStats, Position, Wallet,
};

/// Letters that address inventory stacks. `q` is reserved for cancel.
pub(crate) const INVENTORY_KEYS: &str = "abcdefghijklmnoprstuvwxyz";

/// Digits that address entities underfoot.
pub(crate) const GROUND_KEYS: &str = "1234567890";

/// One labelled choice while a selection is pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEntry {
    pub key: char,
    pub label: String,
}

impl GameState {
    pub fn player_position(&self) -> Position {
        self.entities.position(self.player).unwrap_or_default()
    }

    pub fn player_stats(&self) -> Option<&PlayerStats> {
        self.entities.get::<PlayerStats>(self.player)
    }

    /// The player's inventory.
    pub fn inventory(&self) -> Option<&Inventory> {
        self.entities.get::<Inventory>(self.player)
    }

    /// The workshop's stockpile.
    pub fn stockpile(&self) -> Option<&Inventory> {
        self.entities.get::<Inventory>(self.workshop)
    }

    pub fn balance(&self) -> i64 {
        self.entities
            .get::<Wallet>(self.workshop)
            .map_or(0, |wallet| wallet.balance)
    }

    pub fn level(&self) -> u32 {
        self.map.level()
    }

    pub fn mode(&self) -> GameMode {
        self.turn.mode
    }

    pub fn input(&self) -> InputState {
        self.turn.input
    }

    pub fn cells_in(&self, rect: Rect) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.map.cells_in(rect)
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.visible.is_visible(position)
    }

    /// Named entities on a cell. Empty when nothing is there.
    pub fn entities_at(&self, position: Position) -> &[EntityId] {
        debug_assert!(
            !self.index.is_stale(&self.entities),
            "spatial index read after an unindexed position change"
        );
        self.index.at(position)
    }

    /// True when some entity on the cell holds every component in `required`.
    pub fn has_capability(&self, position: Position, required: ComponentSet) -> bool {
        self.entities_at(position)
            .iter()
            .any(|&id| self.entities.has(id, required))
    }

    /// Short description of what is on a cell: the first entity there, or the
    /// wall material if it has been revealed.
    pub fn hover_text(&self, position: Position) -> String {
        if let Some((_, (named,))) = self
            .entities
            .query_in::<(Named,)>(self.entities_at(position))
            .next()
        {
            return named.hover();
        }
        match self.map.wall(position) {
            Some(wall) if self.map.is_revealed(position) => wall.material().to_string(),
            _ => String::new(),
        }
    }

    /// Entity ids underfoot, in the order digit keys address them.
    pub fn ground_items(&self) -> &[EntityId] {
        self.entities_at(self.player_position())
    }

    /// Resolves a selection key: letters pick inventory stacks, digits pick
    /// entities underfoot.
    pub fn entity_for_key(&self, key: char) -> Option<EntityId> {
        if let Some(slot) = INVENTORY_KEYS.find(key) {
            return self.inventory()?.stack_at(slot);
        }
        if let Some(slot) = GROUND_KEYS.find(key) {
            return self.ground_items().get(slot).copied();
        }
        None
    }

    /// Choices for the pending selection, or nothing when idle.
    pub fn selection_labels(&self) -> Vec<SelectionEntry> {
        match self.turn.input.pending() {
            Some(PendingAction::Pickup) => GROUND_KEYS
                .chars()
                .zip(self.ground_items())
                .map(|(key, &id)| SelectionEntry {
                    key,
                    label: self
                        .entities
                        .get::<Named>(id)
                        .map(Named::hover)
                        .unwrap_or_default(),
                })
                .collect(),
            Some(PendingAction::Drop) => {
                let labels = self.inventory().map(Inventory::labels).unwrap_or_default();
                INVENTORY_KEYS
                    .chars()
                    .zip(labels)
                    .map(|(key, label)| SelectionEntry { key, label })
                    .collect()
            }
            Some(PendingAction::Climb) => vec![
                SelectionEntry {
                    key: 'u',
                    label: "up to the workshop".to_string(),
                },
                SelectionEntry {
                    key: 'd',
                    label: format!("down to level {}", self.level() + 1),
                },
            ],
            None => Vec::new(),
        }
    }

    /// Idle-mode actions whose precondition currently holds.
    pub fn available_actions(&self) -> Vec<PlayerAction> {
        PlayerAction::ALL
            .into_iter()
            .filter(|action| action.is_available(self))
            .collect()
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &EnemyState)> + '_ {
        self.entities
            .query::<(EnemyState,)>()
            .map(|(id, (enemy,))| (id, enemy))
    }

    /// Whether the winning artifact exists anywhere.
    pub fn has_artifact(&self) -> bool {
        self.entities
            .query::<(Carryable,)>()
            .any(|(_, (carryable,))| carryable.material == Material::Amulet)
    }
}
