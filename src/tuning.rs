//! Data-driven game balance and board layout
//!
//! Defaults reproduce the classic game. Overrides are partial JSON documents
//! (missing fields keep their defaults), read from LocalStorage in the browser
//! or from the file named by `RED_LIGHT_TUNING` natively.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::geom::{Rect, percent_to_px};
use crate::sim::obstacles::find_free_slot;

/// Board geometry in pixels, plus the percentage placements the game uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLayout {
    /// Board width (px)
    pub width: f32,
    /// Board height (px)
    pub height: f32,
    pub player_size: Vec2,
    /// Player spawn, percent from the top edge
    pub player_start_top: f32,
    /// Player spawn, percent from the left edge
    pub player_start_left: f32,
    /// Guard top-left corner (px)
    pub guard_origin: Vec2,
    pub guard_size: Vec2,
    /// Clearance kept free of obstacles around the guard (px)
    pub guard_buffer: f32,
    /// Height of the on-screen controls strip along the bottom edge (px)
    pub controls_height: f32,
    pub obstacle_size: Vec2,
    /// Obstacles spawn and oscillate within [0, max] percent
    pub obstacle_max_percent: f32,
    pub projectile_size: Vec2,
    pub finish_line: Rect,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_size: Vec2::splat(30.0),
            player_start_top: 90.0,
            player_start_left: 10.0,
            guard_origin: Vec2::new(375.0, 20.0),
            guard_size: Vec2::splat(50.0),
            guard_buffer: 30.0,
            controls_height: 60.0,
            obstacle_size: Vec2::splat(40.0),
            obstacle_max_percent: 90.0,
            projectile_size: Vec2::splat(10.0),
            finish_line: Rect::from_xywh(0.0, 0.0, 800.0, 10.0),
        }
    }
}

impl BoardLayout {
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn guard_rect(&self) -> Rect {
        Rect::new(self.guard_origin, self.guard_size)
    }

    /// Guard box grown by the buffer margin
    pub fn guard_buffer_rect(&self) -> Rect {
        self.guard_rect().expand(self.guard_buffer)
    }

    /// Bottom strip reserved for the on-screen controls
    pub fn controls_zone(&self) -> Rect {
        Rect::from_xywh(
            0.0,
            self.height - self.controls_height,
            self.width,
            self.controls_height,
        )
    }

    pub fn player_rect(&self, top: f32, left: f32) -> Rect {
        Rect::new(percent_to_px(top, left, self.size()), self.player_size)
    }

    pub fn obstacle_rect(&self, top: f32, left: f32) -> Rect {
        Rect::new(percent_to_px(top, left, self.size()), self.obstacle_size)
    }

    /// Upper bound of obstacle placement and drift, kept on the board
    pub fn obstacle_range(&self) -> f32 {
        self.obstacle_max_percent.clamp(0.0, 100.0)
    }

    /// Whether an obstacle spawned at this placement stays clear of reserved zones
    pub fn obstacle_slot_is_free(&self, top: f32, left: f32) -> bool {
        let rect = self.obstacle_rect(top, left);
        !rect.overlaps(&self.controls_zone()) && !rect.overlaps(&self.guard_buffer_rect())
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub board: BoardLayout,
    /// Countdown budget per round (seconds)
    pub round_seconds: u32,
    /// Countdown tick cadence (ms)
    pub countdown_interval_ms: u32,
    /// Light toggle cadence (ms)
    pub light_interval_ms: u32,
    /// Chance that a keyboard move on red goes through anyway
    pub sneak_move_chance: f64,
    /// On-screen buttons move the player regardless of the light
    pub buttons_bypass_light: bool,
    pub obstacle_count: u32,
    /// Obstacle drift (percent of board width per tick)
    pub obstacle_speed: f32,
    /// Delay between volleys while red (ms)
    pub volley_interval_ms: u32,
    /// Projectiles per volley
    pub volley_size: u32,
    /// Delay between shots inside one volley (ms)
    pub volley_stagger_ms: u32,
    /// Projectile speed (px per tick)
    pub projectile_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board: BoardLayout::default(),
            round_seconds: 60,
            countdown_interval_ms: 1000,
            light_interval_ms: 5000,
            sneak_move_chance: 0.2,
            buttons_bypass_light: true,
            obstacle_count: 5,
            obstacle_speed: 0.5,
            volley_interval_ms: 500,
            volley_size: 2,
            volley_stagger_ms: 100,
            projectile_speed: 5.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "red_light_tuning";

    /// Environment variable naming a tuning JSON file (native only)
    pub const ENV_VAR: &'static str = "RED_LIGHT_TUNING";

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tuning the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = &self.board;
        let dims = [
            ("board.width", b.width),
            ("board.height", b.height),
            ("board.player_size.x", b.player_size.x),
            ("board.player_size.y", b.player_size.y),
            ("board.obstacle_size.x", b.obstacle_size.x),
            ("board.obstacle_size.y", b.obstacle_size.y),
            ("board.projectile_size.x", b.projectile_size.x),
            ("board.projectile_size.y", b.projectile_size.y),
            ("board.obstacle_max_percent", b.obstacle_max_percent),
        ];
        for (field, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::InvalidBoard { field, value });
            }
        }

        let percents = [
            ("board.player_start_top", b.player_start_top),
            ("board.player_start_left", b.player_start_left),
            ("board.obstacle_max_percent", b.obstacle_max_percent),
        ];
        for (field, value) in percents {
            if !(0.0..=100.0).contains(&value) {
                return Err(TuningError::PercentOutOfRange { field, value });
            }
        }

        if self.round_seconds == 0 {
            return Err(TuningError::ZeroRoundTime);
        }
        let cadences = [
            ("countdown_interval_ms", self.countdown_interval_ms),
            ("light_interval_ms", self.light_interval_ms),
            ("volley_interval_ms", self.volley_interval_ms),
            ("volley_size", self.volley_size),
        ];
        for (field, value) in cadences {
            if value == 0 {
                return Err(TuningError::ZeroCadence { field });
            }
        }

        if !(0.0..=1.0).contains(&self.sneak_move_chance) {
            return Err(TuningError::ProbabilityOutOfRange {
                field: "sneak_move_chance",
                value: self.sneak_move_chance,
            });
        }

        let speeds = [
            ("obstacle_speed", self.obstacle_speed),
            ("projectile_speed", self.projectile_speed),
        ];
        for (field, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NonPositiveSpeed { field, value });
            }
        }

        if self.obstacle_count > 0 && find_free_slot(b).is_none() {
            return Err(TuningError::NoObstacleSpace);
        }

        Ok(())
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning overrides from the file named by `RED_LIGHT_TUNING`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::load_from_path(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|e| TuningError::Io(e.to_string()))?;
        Self::from_json(&json)
    }
}
