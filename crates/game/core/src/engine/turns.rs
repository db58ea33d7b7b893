use crate::state::{InputState, PlayerStats};

use super::GameEngine;

/// Turn sequencing for GameEngine.
impl GameEngine<'_> {
    /// Completed turns since the session started.
    pub fn turn(&self) -> u64 {
        self.state.turn.turn
    }

    /// Resolves the world's response to a time-consuming player action:
    /// index rebuild, sight recompute, enemy tick, then the terminal check.
    pub fn end_turn(&mut self) {
        self.state.turn.turn += 1;
        self.state.refresh();
        self.tick_enemies();
        self.check_outcome();
        tracing::trace!(
            turn = self.state.turn.turn,
            visible = self.state.visible.len(),
            "turn resolved"
        );
    }

    /// Moves to a terminal state when the player is dead or the artifact
    /// exists. Terminal states are never left.
    pub fn check_outcome(&mut self) -> InputState {
        if self.state.turn.input.is_terminal() {
            return self.state.turn.input;
        }

        let hp = self
            .state
            .entities
            .get::<PlayerStats>(self.state.player)
            .map_or(0, |stats| stats.hp);
        if hp <= 0 {
            tracing::info!(turn = self.state.turn.turn, level = self.state.level(), "player died");
            self.state.turn.input = InputState::Defeat;
            self.say("You have died.");
        } else if self.state.has_artifact() {
            tracing::info!(turn = self.state.turn.turn, "artifact completed");
            self.state.turn.input = InputState::Victory;
            self.say("The amulet is complete. You win!");
        }
        self.state.turn.input
    }

    pub fn is_over(&self) -> bool {
        self.state.turn.input.is_terminal()
    }
}
