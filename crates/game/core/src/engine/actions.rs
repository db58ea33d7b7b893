use crate::state::{ComponentSet, GameState, Material};

/// Idle-mode commands bound to a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlayerAction {
    Pickup,
    Drop,
    Climb,
    Quaff,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 4] = [
        PlayerAction::Pickup,
        PlayerAction::Drop,
        PlayerAction::Climb,
        PlayerAction::Quaff,
    ];

    pub fn key(self) -> char {
        match self {
            PlayerAction::Pickup => 'p',
            PlayerAction::Drop => 'd',
            PlayerAction::Climb => 'c',
            PlayerAction::Quaff => 'q',
        }
    }

    /// Menu text with the key in brackets.
    pub fn description(self) -> &'static str {
        match self {
            PlayerAction::Pickup => "[P]ick up",
            PlayerAction::Drop => "[D]rop",
            PlayerAction::Climb => "[C]limb",
            PlayerAction::Quaff => "[Q]uaff",
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.key() == key.to_ascii_lowercase())
    }

    /// Whether the action's precondition holds in the current state.
    pub fn is_available(self, state: &GameState) -> bool {
        let underfoot = state.player_position();
        match self {
            PlayerAction::Pickup => state.has_capability(underfoot, ComponentSet::CARRYABLE),
            PlayerAction::Drop => state.inventory().is_some_and(|inventory| !inventory.is_empty()),
            PlayerAction::Climb => state.has_capability(underfoot, ComponentSet::CLIMBABLE),
            PlayerAction::Quaff => state
                .inventory()
                .is_some_and(|inventory| inventory.has_any(Material::Potion)),
        }
    }
}
