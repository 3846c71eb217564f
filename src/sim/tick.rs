//! Fixed timestep simulation tick and round lifecycle
//!
//! One tick advances every subsystem in a fixed order. A win or loss emits its
//! event, resets the round and ends the tick on the spot.

use super::countdown::update_countdown;
use super::input::{Direction, InputEvent, handle_input};
use super::light::{set_light, update_light};
use super::obstacles::{advance_obstacles, generate_obstacles};
use super::state::{GameEvent, GameState, Light, PlayerPosition, RoundOutcome};
use super::threat::{advance_projectiles, update_threat};
use crate::ticks_from_ms;

/// Ticks between autopilot steps in idle mode
const IDLE_STEP_TICKS: u64 = 6;

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key and button events in arrival order
    pub events: Vec<InputEvent>,
    /// Idle/demo mode - autopilot walks toward the finish line on green
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;

    let idle_events = if input.idle_mode {
        idle_input(state)
    } else {
        Vec::new()
    };

    for &event in input.events.iter().chain(idle_events.iter()) {
        if let Some(outcome) = handle_input(state, event) {
            finish_round(state, outcome);
            return;
        }
    }

    update_light(state);

    if let Some(outcome) = update_countdown(state) {
        finish_round(state, outcome);
        return;
    }

    update_threat(state);
    advance_obstacles(state);

    if let Some(outcome) = advance_projectiles(state) {
        finish_round(state, outcome);
    }
}

/// Autopilot: tap up while the light is green, unless a player holds Up
fn idle_input(state: &GameState) -> Vec<InputEvent> {
    if state.light != Light::Green
        || state.held.is_held(Direction::Up)
        || !state.time_ticks.is_multiple_of(IDLE_STEP_TICKS)
    {
        return Vec::new();
    }
    vec![
        InputEvent::KeyDown(Direction::Up),
        InputEvent::KeyUp(Direction::Up),
    ]
}

/// Begin a round: spawn the player, lay out obstacles, go green, arm timers
pub fn start(state: &mut GameState) {
    let board = state.board();
    let spawn = PlayerPosition::new(board.player_start_top, board.player_start_left);
    state.player = Some(spawn);
    state.time_left = state.tuning.round_seconds;

    generate_obstacles(state);
    set_light(state, Light::Green);

    let now = state.time_ticks;
    state.schedule.next_light_tick = Some(now + ticks_from_ms(state.tuning.light_interval_ms));
    state.schedule.next_countdown_tick =
        Some(now + ticks_from_ms(state.tuning.countdown_interval_ms));

    state.round += 1;
    log::info!(
        "Round {} started ({} obstacles, {}s)",
        state.round,
        state.obstacles.len(),
        state.time_left
    );
    state.push_event(GameEvent::RoundStarted { round: state.round });
}

/// Cancel everything in flight and start over
pub fn reset(state: &mut GameState) {
    state.schedule.clear();
    state.time_left = state.tuning.round_seconds;
    state.light = Light::Green;
    state.projectiles.clear();
    state.held.clear();
    start(state);
}

/// Report the outcome, then reset
fn finish_round(state: &mut GameState, outcome: RoundOutcome) {
    let event = match outcome {
        RoundOutcome::Won => {
            log::info!("Round {} won with {}s left", state.round, state.time_left);
            GameEvent::Won
        }
        RoundOutcome::Lost(reason) => {
            log::info!("Round {} lost: {:?}", state.round, reason);
            GameEvent::Lost(reason)
        }
    };
    state.push_event(event);
    reset(state);
}
