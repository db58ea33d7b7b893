//! Key handling and the selection state machine.

use crate::state::{ComponentSet, Direction, EntityId, GameMode, InputState, PendingAction};

use super::{GameEngine, GameplayError, PlayerAction};

/// Front-end neutral key events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Char(char),
}

impl Key {
    fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::North),
            Key::Down => Some(Direction::South),
            Key::Left => Some(Direction::West),
            Key::Right => Some(Direction::East),
            Key::Escape | Key::Char(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClimbDirection {
    Up,
    Down,
}

impl GameEngine<'_> {
    /// Feeds one key press through the input state machine. Returns whether
    /// the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match self.state.turn.input {
            InputState::Defeat | InputState::Victory => false,
            InputState::AwaitingSelection(pending) => self.handle_selection_key(pending, key),
            InputState::Idle => {
                if self.state.turn.mode != GameMode::Mine {
                    return false;
                }
                if let Some(direction) = key.direction() {
                    return self.move_player(direction);
                }
                match key {
                    Key::Char(c) => match PlayerAction::from_key(c) {
                        Some(action) if action.is_available(self.state) => {
                            self.start_action(action)
                        }
                        _ => false,
                    },
                    _ => false,
                }
            }
        }
    }

    fn handle_selection_key(&mut self, pending: PendingAction, key: Key) -> bool {
        let c = match key {
            Key::Escape | Key::Char('q' | 'Q') => {
                self.cancel_selection();
                return true;
            }
            Key::Char(c) => c.to_ascii_lowercase(),
            _ => return false,
        };

        match pending {
            PendingAction::Climb => match c {
                'u' => self.choose_climb(ClimbDirection::Up),
                'd' => self.choose_climb(ClimbDirection::Down),
                _ => {
                    self.say("Which direction? (or [q]uit)");
                    false
                }
            },
            PendingAction::Pickup | PendingAction::Drop => match self.state.entity_for_key(c) {
                Some(target) => self.resolve_selection(target),
                None => {
                    self.say("I don't know what that is ([q]uit?)");
                    false
                }
            },
        }
    }

    /// Begins an idle-mode action: runs it at once when no target is needed,
    /// otherwise prompts and waits for a selection.
    pub fn start_action(&mut self, action: PlayerAction) -> bool {
        let ready = self.state.turn.input == InputState::Idle
            && self.state.turn.mode == GameMode::Mine
            && action.is_available(self.state);
        if !ready {
            tracing::warn!(%action, input = ?self.state.turn.input, "action started out of turn");
            self.report(&GameplayError::ActionUnavailable(action));
            return false;
        }

        match action {
            PlayerAction::Pickup => {
                let here = self.state.player_position();
                let carryables: Vec<EntityId> = self
                    .state
                    .entities_at(here)
                    .iter()
                    .copied()
                    .filter(|&id| self.state.entities.has(id, ComponentSet::CARRYABLE))
                    .collect();
                match carryables.as_slice() {
                    [] => false,
                    [item] => self.pickup(*item),
                    _ => {
                        self.await_selection(PendingAction::Pickup, "Pick up what? (or [q]uit)");
                        true
                    }
                }
            }
            PlayerAction::Drop => {
                self.await_selection(PendingAction::Drop, "Drop what? (or [q]uit)");
                true
            }
            PlayerAction::Climb => {
                self.await_selection(PendingAction::Climb, "Climb [U]p or [D]own? (or [q]uit)");
                true
            }
            PlayerAction::Quaff => self.quaff(),
        }
    }

    /// Applies the pending pickup or drop to `target` and returns to idle.
    pub fn resolve_selection(&mut self, target: EntityId) -> bool {
        match self.state.turn.input.pending() {
            Some(PendingAction::Pickup) => {
                self.state.turn.input = InputState::Idle;
                self.pickup(target)
            }
            Some(PendingAction::Drop) => {
                self.state.turn.input = InputState::Idle;
                self.drop_item(target)
            }
            Some(PendingAction::Climb) => {
                tracing::warn!(%target, "climb resolved with an entity");
                false
            }
            None => {
                tracing::warn!(%target, "selection resolved with nothing pending");
                false
            }
        }
    }

    /// Resolves a pending climb.
    pub fn choose_climb(&mut self, direction: ClimbDirection) -> bool {
        if self.state.turn.input.pending() != Some(PendingAction::Climb) {
            return false;
        }
        self.state.turn.input = InputState::Idle;
        match direction {
            ClimbDirection::Up => self.enter_workshop(),
            ClimbDirection::Down => {
                if let Err(error) = self.descend() {
                    tracing::error!(%error, "descent failed");
                    self.say("The way down is blocked");
                }
            }
        }
        true
    }

    /// Abandons the pending action.
    pub fn cancel_selection(&mut self) -> bool {
        if self.state.turn.input.pending().is_none() {
            return false;
        }
        self.state.turn.input = InputState::Idle;
        self.say("Never mind");
        true
    }

    fn await_selection(&mut self, action: PendingAction, prompt: &str) {
        self.state.turn.input = InputState::AwaitingSelection(action);
        self.say(prompt);
    }
}
