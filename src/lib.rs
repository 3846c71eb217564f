//! Red Light, Green Light - a browser arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, light, threat, lifecycle)
//! - `view`: Projection of game state into DOM placements
//! - `tuning`: Data-driven game balance and board layout
//! - `error`: Configuration errors

pub mod error;
pub mod sim;
pub mod tuning;
pub mod view;

pub use error::TuningError;
pub use tuning::{BoardLayout, Tuning};

/// Game configuration constants
pub mod consts {
    /// Simulation rate. One tick stands in for one animation frame.
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Random attempts before obstacle placement falls back to a grid scan
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;
}

/// Convert a millisecond cadence into simulation ticks (never zero)
#[inline]
pub fn ticks_from_ms(ms: u32) -> u64 {
    delay_ticks(ms).max(1)
}

/// Convert a millisecond delay into simulation ticks; zero means same tick
#[inline]
pub fn delay_ticks(ms: u32) -> u64 {
    (ms as f64 * consts::SIM_HZ as f64 / 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_from_ms() {
        assert_eq!(ticks_from_ms(5000), 300);
        assert_eq!(ticks_from_ms(1000), 60);
        assert_eq!(ticks_from_ms(500), 30);
        assert_eq!(ticks_from_ms(100), 6);
        // Sub-tick cadences still fire every tick
        assert_eq!(ticks_from_ms(1), 1);
        assert_eq!(ticks_from_ms(0), 1);
    }

    #[test]
    fn test_delay_ticks_allows_zero() {
        assert_eq!(delay_ticks(100), 6);
        assert_eq!(delay_ticks(0), 0);
        assert_eq!(delay_ticks(5), 0);
    }
}
