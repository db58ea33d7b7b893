/// Where the player currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    #[default]
    Mine,
    Workshop,
}

/// An action waiting for the player to pick a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PendingAction {
    /// Digit keys pick an entity underfoot.
    Pickup,
    /// Letter keys pick an inventory stack.
    Drop,
    /// `u` or `d` picks a direction.
    Climb,
}

/// Input state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputState {
    #[default]
    Idle,
    AwaitingSelection(PendingAction),
    Defeat,
    Victory,
}

impl InputState {
    pub fn is_terminal(self) -> bool {
        matches!(self, InputState::Defeat | InputState::Victory)
    }

    pub fn pending(self) -> Option<PendingAction> {
        match self {
            InputState::AwaitingSelection(action) => Some(action),
            _ => None,
        }
    }
}

/// Turn bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    /// Completed turns since the session started.
    pub turn: u64,
    pub mode: GameMode,
    pub input: InputState,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }
}
