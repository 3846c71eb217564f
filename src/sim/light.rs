//! Light state controller
//!
//! Two states, one transition: every `light_interval_ms` the light flips.
//! Each flip re-arms or cancels the guard's firing cadence.

use super::state::{GameEvent, GameState, Light};
use super::threat;
use crate::ticks_from_ms;

/// Flip the light if its toggle is due
pub fn update_light(state: &mut GameState) {
    let Some(due) = state.schedule.next_light_tick else {
        return;
    };
    if state.time_ticks < due {
        return;
    }
    state.schedule.next_light_tick = Some(due + ticks_from_ms(state.tuning.light_interval_ms));
    toggle_light(state);
}

/// Invert the light
pub fn toggle_light(state: &mut GameState) {
    let next = state.light.toggled();
    set_light(state, next);
}

/// Force the light into `light`, syncing the threat subsystem
pub fn set_light(state: &mut GameState, light: Light) {
    if state.light != light {
        state.light = light;
        log::debug!("Light -> {:?} at tick {}", light, state.time_ticks);
        state.push_event(GameEvent::LightChanged(light));
    }
    threat::sync_with_light(state);
}
