//! Round countdown
//!
//! Decrements `time_left` once per `countdown_interval_ms`. The tick that
//! brings it to zero ends the round.

use super::state::{GameState, LossReason, RoundOutcome};
use crate::ticks_from_ms;

/// Decrement the countdown if due; reports the loss when time runs out
pub fn update_countdown(state: &mut GameState) -> Option<RoundOutcome> {
    let due = state.schedule.next_countdown_tick?;
    if state.time_ticks < due {
        return None;
    }

    state.time_left = state.time_left.saturating_sub(1);
    if state.time_left == 0 {
        state.schedule.next_countdown_tick = None;
        return Some(RoundOutcome::Lost(LossReason::TimeUp));
    }

    state.schedule.next_countdown_tick =
        Some(due + ticks_from_ms(state.tuning.countdown_interval_ms));
    None
}
