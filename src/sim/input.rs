//! Player input: keyboard with held-key debounce, on-screen buttons
//!
//! Keyboard moves obey the light, except for the sneak-move chance: a move
//! attempted on red still goes through with probability
//! `Tuning::sneak_move_chance`. On-screen buttons ignore the light while
//! `Tuning::buttons_bypass_light` is set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameState, RoundOutcome};

/// The four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (top, left) percent delta of one step
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Up => (-1.0, 0.0),
            Direction::Down => (1.0, 0.0),
            Direction::Left => (0.0, -1.0),
            Direction::Right => (0.0, 1.0),
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Map an on-screen control button id
    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }
}

/// A raw input event, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Direction),
    KeyUp(Direction),
    /// On-screen control click
    Button(Direction),
}

/// Directions whose key is currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn is_held(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Mark held; false if it already was
    pub fn press(&mut self, dir: Direction) -> bool {
        let was_held = self.is_held(dir);
        self.0 |= dir.bit();
        !was_held
    }

    pub fn release(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Apply one input event. Returns the round outcome if a move reached the finish line.
pub fn handle_input(state: &mut GameState, event: InputEvent) -> Option<RoundOutcome> {
    match event {
        InputEvent::KeyDown(dir) => {
            if !state.is_running() || !state.held.press(dir) {
                return None;
            }
            // Roll only on red so green moves never consume randomness
            let allowed = state.light.is_green() || sneak_move_succeeds(state);
            if allowed {
                return move_player(state, dir);
            }
            None
        }
        InputEvent::KeyUp(dir) => {
            state.held.release(dir);
            None
        }
        InputEvent::Button(dir) => {
            if !state.is_running() {
                return None;
            }
            let allowed = state.tuning.buttons_bypass_light
                || state.light.is_green()
                || sneak_move_succeeds(state);
            if allowed {
                return move_player(state, dir);
            }
            None
        }
    }
}

fn sneak_move_succeeds(state: &mut GameState) -> bool {
    let chance = state.tuning.sneak_move_chance;
    let succeeded = state.rng().random::<f64>() < chance;
    if succeeded {
        log::debug!("Sneak move on red light");
    }
    succeeded
}

/// Step the player and run the position checks
fn move_player(state: &mut GameState, dir: Direction) -> Option<RoundOutcome> {
    let player = state.player.as_mut()?;
    player.step(dir);
    check_finish(state)
}

/// Win when the player box reaches the finish line
pub fn check_finish(state: &GameState) -> Option<RoundOutcome> {
    let player = state.player?;
    let board = state.board();
    if player.rect(board).overlaps(&board.finish_line) {
        Some(RoundOutcome::Won)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Light, PlayerPosition};
    use crate::sim::tick::start;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        start(&mut state);
        state
    }

    fn tap(state: &mut GameState, dir: Direction) -> Option<RoundOutcome> {
        let outcome = handle_input(state, InputEvent::KeyDown(dir));
        handle_input(state, InputEvent::KeyUp(dir));
        outcome
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("w"), None);
        assert_eq!(Direction::from_button_id("right"), Some(Direction::Right));
        assert_eq!(Direction::from_button_id("controls"), None);
    }

    #[test]
    fn test_held_keys() {
        let mut held = HeldKeys::default();
        assert!(held.press(Direction::Up));
        assert!(!held.press(Direction::Up));
        assert!(held.press(Direction::Left));
        held.release(Direction::Up);
        assert!(!held.is_held(Direction::Up));
        assert!(held.is_held(Direction::Left));
        held.clear();
        assert_eq!(held, HeldKeys::default());
    }

    #[test]
    fn test_input_ignored_without_player() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(handle_input(&mut state, InputEvent::KeyDown(Direction::Up)), None);
        assert_eq!(handle_input(&mut state, InputEvent::Button(Direction::Up)), None);
        assert!(state.player.is_none());
        assert!(!state.held.is_held(Direction::Up));
    }

    #[test]
    fn test_green_key_moves_one_step() {
        let mut state = running_state(1);
        assert_eq!(state.light, Light::Green);
        tap(&mut state, Direction::Up);
        assert_eq!(state.player, Some(PlayerPosition::new(89.0, 10.0)));
        tap(&mut state, Direction::Right);
        assert_eq!(state.player, Some(PlayerPosition::new(89.0, 11.0)));
    }

    #[test]
    fn test_held_key_does_not_repeat() {
        let mut state = running_state(1);
        handle_input(&mut state, InputEvent::KeyDown(Direction::Up));
        handle_input(&mut state, InputEvent::KeyDown(Direction::Up));
        handle_input(&mut state, InputEvent::KeyDown(Direction::Up));
        assert_eq!(state.player, Some(PlayerPosition::new(89.0, 10.0)));

        handle_input(&mut state, InputEvent::KeyUp(Direction::Up));
        handle_input(&mut state, InputEvent::KeyDown(Direction::Up));
        assert_eq!(state.player, Some(PlayerPosition::new(88.0, 10.0)));
    }

    #[test]
    fn test_red_key_never_moves_without_sneak_chance() {
        let mut tuning = Tuning::default();
        tuning.sneak_move_chance = 0.0;
        let mut state = GameState::new(3, tuning);
        start(&mut state);
        state.light = Light::Red;

        for _ in 0..50 {
            tap(&mut state, Direction::Up);
        }
        assert_eq!(state.player, Some(PlayerPosition::new(90.0, 10.0)));
    }

    #[test]
    fn test_red_key_always_moves_with_certain_sneak() {
        let mut tuning = Tuning::default();
        tuning.sneak_move_chance = 1.0;
        let mut state = GameState::new(3, tuning);
        start(&mut state);
        state.light = Light::Red;

        for _ in 0..5 {
            tap(&mut state, Direction::Up);
        }
        assert_eq!(state.player, Some(PlayerPosition::new(85.0, 10.0)));
    }

    #[test]
    fn test_sneak_move_rate() {
        let mut state = running_state(42);
        state.light = Light::Red;
        let attempts = 5000;
        let mut moves = 0;
        for _ in 0..attempts {
            let before = state.player;
            tap(&mut state, Direction::Left);
            if state.player != before {
                moves += 1;
                state.player = before;
            }
        }
        let rate = moves as f64 / attempts as f64;
        assert!((0.17..0.23).contains(&rate), "sneak rate {rate}");
    }

    #[test]
    fn test_buttons_bypass_red_light() {
        let mut state = running_state(1);
        state.light = Light::Red;
        handle_input(&mut state, InputEvent::Button(Direction::Up));
        handle_input(&mut state, InputEvent::Button(Direction::Up));
        assert_eq!(state.player, Some(PlayerPosition::new(88.0, 10.0)));
    }

    #[test]
    fn test_buttons_gated_when_bypass_disabled() {
        let mut tuning = Tuning::default();
        tuning.buttons_bypass_light = false;
        tuning.sneak_move_chance = 0.0;
        let mut state = GameState::new(1, tuning);
        start(&mut state);
        state.light = Light::Red;
        handle_input(&mut state, InputEvent::Button(Direction::Up));
        assert_eq!(state.player, Some(PlayerPosition::new(90.0, 10.0)));

        state.light = Light::Green;
        handle_input(&mut state, InputEvent::Button(Direction::Up));
        assert_eq!(state.player, Some(PlayerPosition::new(89.0, 10.0)));
    }

    #[test]
    fn test_reaching_finish_line_wins() {
        let mut state = running_state(1);
        // Finish line spans y 0..10, player box is 30 px tall: top 1% = 6 px
        state.player = Some(PlayerPosition::new(2.0, 50.0));
        assert_eq!(check_finish(&state), None);
        assert_eq!(tap(&mut state, Direction::Up), Some(RoundOutcome::Won));
    }

    proptest! {
        #[test]
        fn green_moves_step_and_clamp(
            top in 0u8..=100, left in 0u8..=100, dir_idx in 0usize..4,
        ) {
            let mut state = running_state(9);
            // Keep clear of the finish line so the move is observable
            let top = (top as f32).max(10.0);
            let left = left as f32;
            state.player = Some(PlayerPosition::new(top, left));
            let dir = Direction::ALL[dir_idx];

            tap(&mut state, dir);

            let (dt, dl) = dir.delta();
            let expected = PlayerPosition::new(
                (top + dt).clamp(0.0, 100.0),
                (left + dl).clamp(0.0, 100.0),
            );
            prop_assert_eq!(state.player, Some(expected));
        }
    }
}
