//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per animation frame)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod countdown;
pub mod geom;
pub mod input;
pub mod light;
pub mod obstacles;
pub mod state;
pub mod threat;
pub mod tick;

pub use geom::Rect;
pub use input::{Direction, HeldKeys, InputEvent};
pub use state::{
    GameEvent, GameState, Light, LossReason, Obstacle, PlayerPosition, Projectile, RoundOutcome,
};
pub use threat::ProjectileFate;
pub use tick::{TickInput, reset, start, tick};
