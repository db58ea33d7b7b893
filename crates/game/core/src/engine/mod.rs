//! Turn resolution and the command surface.
//!
//! The [`GameEngine`] is the only writer of [`GameState`]. Every command that
//! spends simulation time ends with [`GameEngine::end_turn`], which rebuilds
//! the spatial index, recomputes sight, runs the enemies and checks for the
//! end of the game, in that order.
//!
//! Gameplay failures never escape as panics: they are reported to the
//! message log and leave the state unchanged.

mod actions;
mod ai;
mod combat;
mod errors;
mod input;
mod items;
mod levels;
mod mining;
mod movement;
mod turns;

pub use actions::PlayerAction;
pub use ai::{EnemyIntent, decide};
pub use combat::BumpOutcome;
pub use errors::GameplayError;
pub use input::{ClimbDirection, Key};
pub use levels::GEM_SENSOR;
pub use mining::MineOutcome;

use crate::error::GameError;
use crate::state::GameState;

/// Mutating façade over a [`GameState`].
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &*self.state
    }

    /// Adds a player-facing message.
    fn say(&mut self, line: impl Into<String>) {
        self.state.log.push(line);
    }

    /// Engine detail, mirrored into the message log when `debug_messages` is set.
    fn debug_message(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(%line, "engine message");
        if self.state.config.debug_messages {
            self.state.log.push(line);
        }
    }

    /// Logs a failed command and shows it to the player.
    fn report(&mut self, error: &GameplayError) {
        if error.severity().is_recoverable() {
            tracing::debug!(code = error.error_code(), %error, "command refused");
        } else {
            tracing::warn!(code = error.error_code(), %error, "invalid command");
        }
        self.say(error.player_message());
    }
}
