//! Gameplay errors surfaced by the command surface.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, InventoryError, Material, Position};

use super::PlayerAction;

/// Failures of a single player command.
///
/// None of these are fatal. The engine turns each into a message-log line
/// and leaves the state as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameplayError {
    #[error("{entity} has no {component} component")]
    ComponentMissing {
        entity: EntityId,
        component: &'static str,
    },

    #[error("no room for {material}")]
    CapacityExceeded { material: Material },

    #[error("{material} (hardness {hardness}) is too hard for a {tool}")]
    HardnessTooHigh {
        material: Material,
        hardness: i32,
        tool: String,
    },

    #[error("{0} cannot be carried")]
    NotCarryable(EntityId),

    #[error("{0} cannot be stockpiled")]
    NotStockable(EntityId),

    #[error("{0} is already carried")]
    AlreadyCarried(EntityId),

    #[error("{0} is not in that inventory")]
    NotInInventory(EntityId),

    #[error("{0} is not underfoot")]
    NotUnderfoot(EntityId),

    #[error("{0} is outside the map")]
    OutOfBounds(Position),

    #[error("no entity {0}")]
    EntityNotFound(EntityId),

    #[error("nothing to mine at {0}")]
    NothingToMine(Position),

    #[error("already at full health")]
    FullHealth,

    #[error("{0} is not available right now")]
    ActionUnavailable(PlayerAction),

    #[error("{0} cannot be sold")]
    NotForSale(Material),

    #[error("no {0} in stock")]
    OutOfStock(Material),
}

impl GameplayError {
    /// Text shown in the message log.
    pub fn player_message(&self) -> String {
        match self {
            Self::CapacityExceeded { .. } => "No room!".to_string(),
            Self::HardnessTooHigh { material, .. } => {
                format!("You need a better tool for {material}")
            }
            Self::NotCarryable(_) => "You can't carry that".to_string(),
            Self::NotStockable(_) => "The workshop has no use for that".to_string(),
            Self::AlreadyCarried(_) => "You are already carrying that".to_string(),
            Self::NotInInventory(_) => "You aren't carrying that".to_string(),
            Self::FullHealth => "You don't need a potion right now".to_string(),
            Self::NotForSale(material) => format!("Nobody wants to buy {material}"),
            Self::OutOfStock(material) => format!("You have no {material} to sell"),
            other => other.to_string(),
        }
    }
}

impl From<InventoryError> for GameplayError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::CapacityExceeded { material, .. } => {
                GameplayError::CapacityExceeded { material }
            }
            InventoryError::AlreadyContained(id) => GameplayError::AlreadyCarried(id),
        }
    }
}

impl GameError for GameplayError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CapacityExceeded { .. }
            | Self::HardnessTooHigh { .. }
            | Self::FullHealth
            | Self::OutOfStock(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ComponentMissing { .. } => "GAMEPLAY_COMPONENT_MISSING",
            Self::CapacityExceeded { .. } => "INVENTORY_CAPACITY_EXCEEDED",
            Self::HardnessTooHigh { .. } => "MINING_HARDNESS_TOO_HIGH",
            Self::NotCarryable(_) => "INVENTORY_NOT_CARRYABLE",
            Self::NotStockable(_) => "WORKSHOP_NOT_STOCKABLE",
            Self::AlreadyCarried(_) => "INVENTORY_ALREADY_CARRIED",
            Self::NotInInventory(_) => "INVENTORY_NOT_IN_INVENTORY",
            Self::NotUnderfoot(_) => "INVENTORY_NOT_UNDERFOOT",
            Self::OutOfBounds(_) => "GAMEPLAY_OUT_OF_BOUNDS",
            Self::EntityNotFound(_) => "GAMEPLAY_ENTITY_NOT_FOUND",
            Self::NothingToMine(_) => "MINING_NOTHING_TO_MINE",
            Self::FullHealth => "QUAFF_FULL_HEALTH",
            Self::ActionUnavailable(_) => "ACTION_UNAVAILABLE",
            Self::NotForSale(_) => "WORKSHOP_NOT_FOR_SALE",
            Self::OutOfStock(_) => "WORKSHOP_OUT_OF_STOCK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_errors_map_onto_gameplay_errors() {
        let error: GameplayError = InventoryError::CapacityExceeded {
            material: Material::Rock,
            limit: 3,
        }
        .into();
        assert_eq!(error.error_code(), "INVENTORY_CAPACITY_EXCEEDED");
        assert!(error.severity().is_recoverable());
        assert_eq!(error.player_message(), "No room!");
    }

    #[test]
    fn hardness_message_names_the_material() {
        let error = GameplayError::HardnessTooHigh {
            material: Material::MithrilOre,
            hardness: 2,
            tool: "pick".into(),
        };
        assert_eq!(error.player_message(), "You need a better tool for mithril ore");
    }
}
