//! Projection of game state into DOM placements
//!
//! The front end owns the elements; this module only says where each one goes
//! and what the HUD shows. Player and obstacles are placed in percent of the
//! board, projectiles in pixels.

use serde::Serialize;

use crate::sim::{GameEvent, GameState, Light, LossReason};

/// CSS length unit of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Percent,
    Px,
}

/// A `top` / `left` style pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub top: f32,
    pub left: f32,
    pub unit: Unit,
}

impl Placement {
    pub fn percent(top: f32, left: f32) -> Self {
        Self {
            top,
            left,
            unit: Unit::Percent,
        }
    }

    pub fn px(top: f32, left: f32) -> Self {
        Self {
            top,
            left,
            unit: Unit::Px,
        }
    }

    pub fn css_top(&self) -> String {
        self.css(self.top)
    }

    pub fn css_left(&self) -> String {
        self.css(self.left)
    }

    fn css(&self, value: f32) -> String {
        match self.unit {
            Unit::Percent => format!("{}%", value),
            Unit::Px => format!("{}px", value),
        }
    }
}

/// Everything the front end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub board_color: &'static str,
    pub timer_text: String,
    pub player: Option<Placement>,
    /// (entity id, placement), sorted by id
    pub obstacles: Vec<(u32, Placement)>,
    /// (entity id, placement), sorted by id
    pub projectiles: Vec<(u32, Placement)>,
}

impl Scene {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            board_color: board_color(state.light),
            timer_text: format!("Time: {}", state.time_left),
            player: state.player.map(|p| Placement::percent(p.top, p.left)),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| (o.id, Placement::percent(o.top, o.left)))
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| (p.id, Placement::px(p.pos.y, p.pos.x)))
                .collect(),
        }
    }
}

/// Board background for a light state
pub fn board_color(light: Light) -> &'static str {
    match light {
        Light::Green => "lightgreen",
        Light::Red => "lightcoral",
    }
}

/// Modal text shown for a terminal event
pub fn notification(event: &GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::Won => Some("You win! Great job!"),
        GameEvent::Lost(LossReason::Hit) => Some("You were hit! Game Over."),
        GameEvent::Lost(LossReason::TimeUp) => Some("Time's up! You lost."),
        _ => None,
    }
}
