//! A deliberately simple player: wander, dig, pick things up, and head
//! for the ladder's workshop when the pack is full.

use delver_core::{
    ComponentSet, Direction, GameEngine, GameMode, GameRng, GameState, InputState, Key, Material,
    PendingAction, PlayerAction,
};

/// Keys spent on one level before the autopilot takes the ladder down.
const LEVEL_PATIENCE: u32 = 150;

pub struct Autopilot {
    rng: GameRng,
    heading: Direction,
    level: u32,
    keys_on_level: u32,
}

impl Autopilot {
    /// The autopilot rolls its own stream so it never perturbs the game's.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed.rotate_left(17) ^ 0x5eed),
            heading: Direction::North,
            level: 1,
            keys_on_level: 0,
        }
    }

    /// Sends up to `budget` keys. Returns how many were sent.
    pub fn play(&mut self, state: &mut GameState, budget: u32) -> u32 {
        let mut sent = 0;
        while sent < budget && !state.input().is_terminal() {
            if state.mode() == GameMode::Workshop {
                self.visit_workshop(state);
                continue;
            }
            if state.level() != self.level {
                self.level = state.level();
                self.keys_on_level = 0;
            }

            let key = self.choose(state);
            let turn = state.turn.turn;
            let consumed = GameEngine::new(state).handle_key(key);
            sent += 1;
            self.keys_on_level += 1;
            tracing::trace!(?key, consumed, turn = state.turn.turn, "autopilot key");

            if !consumed || (state.input() == InputState::Idle && state.turn.turn == turn) {
                self.turn_aside();
            }
        }
        sent
    }

    fn choose(&mut self, state: &GameState) -> Key {
        match state.input() {
            InputState::AwaitingSelection(PendingAction::Pickup) => state
                .selection_labels()
                .into_iter()
                .find(|entry| {
                    state
                        .entity_for_key(entry.key)
                        .is_some_and(|id| state.entities.has(id, ComponentSet::CARRYABLE))
                })
                .map_or(Key::Escape, |entry| Key::Char(entry.key)),
            InputState::AwaitingSelection(PendingAction::Climb) => {
                Key::Char(if pack_is_full(state) { 'u' } else { 'd' })
            }
            InputState::AwaitingSelection(PendingAction::Drop) => Key::Escape,
            InputState::Idle => self.choose_idle(state),
            InputState::Defeat | InputState::Victory => Key::Escape,
        }
    }

    fn choose_idle(&mut self, state: &GameState) -> Key {
        let available = state.available_actions();
        let wounded = state
            .player_stats()
            .is_some_and(|stats| stats.hp * 2 <= stats.max_hp);

        if wounded && available.contains(&PlayerAction::Quaff) {
            return Key::Char(PlayerAction::Quaff.key());
        }
        if available.contains(&PlayerAction::Climb)
            && (pack_is_full(state) || self.keys_on_level > LEVEL_PATIENCE)
        {
            return Key::Char(PlayerAction::Climb.key());
        }
        if available.contains(&PlayerAction::Pickup) && !pack_is_full(state) {
            return Key::Char(PlayerAction::Pickup.key());
        }

        if self.rng.chance(0.2) {
            self.turn_aside();
        }
        match self.heading {
            Direction::North => Key::Up,
            Direction::South => Key::Down,
            Direction::East => Key::Right,
            Direction::West => Key::Left,
        }
    }

    fn turn_aside(&mut self) {
        if let Some(&heading) = self.rng.pick(&Direction::ALL) {
            self.heading = heading;
        }
    }

    /// Sells everything the workshop pays for, then goes back down.
    fn visit_workshop(&mut self, state: &mut GameState) {
        let stocked: Vec<Material> = state
            .stockpile()
            .map(|stockpile| {
                stockpile
                    .stacks()
                    .iter()
                    .flat_map(|stack| std::iter::repeat_n(stack.material(), stack.len()))
                    .filter(|&material| state.tables.sale_value(material).is_some())
                    .collect()
            })
            .unwrap_or_default();

        let mut engine = GameEngine::new(state);
        for material in stocked {
            engine.sell(material);
        }
        engine.return_to_mine();
        // Otherwise the full-pack rule would send it straight back up.
        self.keys_on_level = LEVEL_PATIENCE + 1;
    }
}

fn pack_is_full(state: &GameState) -> bool {
    state
        .inventory()
        .is_some_and(|inventory| inventory.stacks().len() >= inventory.inventory_limit())
}
