//! Game state and core simulation types
//!
//! Everything the subsystems read or write lives in `GameState`; nothing is
//! shared through globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::input::{Direction, HeldKeys};
use crate::tuning::{BoardLayout, Tuning};

/// Game-wide light mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Light {
    /// Movement allowed, guard holds fire
    Green,
    /// Movement forbidden (sneak-move chance aside), guard fires volleys
    Red,
}

impl Light {
    pub fn toggled(self) -> Self {
        match self {
            Light::Green => Light::Red,
            Light::Red => Light::Green,
        }
    }

    #[inline]
    pub fn is_green(self) -> bool {
        self == Light::Green
    }
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Countdown reached zero
    TimeUp,
    /// A projectile reached the player
    Hit,
}

/// Terminal result of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Won,
    Lost(LossReason),
}

/// Notable things that happened during a tick, drained by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh round began (`round` counts from 1)
    RoundStarted { round: u32 },
    LightChanged(Light),
    /// One shot of a volley left the guard
    ProjectileFired { id: u32 },
    /// A projectile hit an obstacle and vanished
    ProjectileAbsorbed { id: u32 },
    Won,
    Lost(LossReason),
}

/// Player placement in percent of the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub top: f32,
    pub left: f32,
}

impl PlayerPosition {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    pub fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// One unit step in `dir`, clamped to the board
    pub fn step(&mut self, dir: Direction) {
        let (dt, dl) = dir.delta();
        self.top = (self.top + dt).clamp(Self::MIN, Self::MAX);
        self.left = (self.left + dl).clamp(Self::MIN, Self::MAX);
    }

    pub fn rect(&self, board: &BoardLayout) -> Rect {
        board.player_rect(self.top, self.left)
    }
}

/// A roaming obstacle that absorbs projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Percent from the top edge (fixed)
    pub top: f32,
    /// Percent from the left edge (oscillates)
    pub left: f32,
    /// +1.0 drifting right, -1.0 drifting left
    pub direction: f32,
}

impl Obstacle {
    pub fn new(id: u32, top: f32, left: f32) -> Self {
        Self {
            id,
            top,
            left,
            direction: 1.0,
        }
    }

    /// Drift one tick, bouncing between 0 and `max_left` percent
    pub fn advance(&mut self, speed: f32, max_left: f32) {
        let next = self.left + self.direction * speed;
        if next <= 0.0 || next >= max_left {
            self.direction = -self.direction;
        }
        self.left = next.clamp(0.0, max_left);
    }

    pub fn rect(&self, board: &BoardLayout) -> Rect {
        board.obstacle_rect(self.top, self.left)
    }
}

/// A guard shot, aimed once at spawn and never re-aimed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Top-left corner in board pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn rect(&self, board: &BoardLayout) -> Rect {
        Rect::new(self.pos, board.projectile_size)
    }

    /// Whether the top-left corner has left the board
    pub fn out_of_bounds(&self, board: &BoardLayout) -> bool {
        self.pos.x < 0.0 || self.pos.y < 0.0 || self.pos.x > board.width || self.pos.y > board.height
    }
}

/// Firing cadence, present only while the light is red
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatSchedule {
    /// Tick at which the next volley opens
    pub next_volley_tick: u64,
    /// Ticks at which staggered shots of an open volley are due
    pub pending_shots: Vec<u64>,
}

/// Due ticks for every repeating process of a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Next light toggle (None when the round is not running)
    pub next_light_tick: Option<u64>,
    /// Next countdown decrement
    pub next_countdown_tick: Option<u64>,
    pub threat: Option<ThreatSchedule>,
}

impl Schedule {
    /// Cancel every repeating process
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Rounds started so far
    pub round: u32,
    /// Absent until the first round starts
    pub player: Option<PlayerPosition>,
    /// Keyboard debounce, not game state proper
    pub held: HeldKeys,
    pub light: Light,
    /// Countdown seconds remaining
    pub time_left: u32,
    /// Sorted by id
    pub obstacles: Vec<Obstacle>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    pub schedule: Schedule,
    /// Events since the front end last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle game; call `start` to begin the first round
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let time_left = tuning.round_seconds;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time_ticks: 0,
            round: 0,
            player: None,
            held: HeldKeys::default(),
            // Starting a round toggles this to green
            light: Light::Red,
            time_left,
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            schedule: Schedule::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    #[inline]
    pub fn board(&self) -> &BoardLayout {
        &self.tuning.board
    }

    pub fn is_running(&self) -> bool {
        self.player.is_some()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
