//! Guard fire: volley cadence while red, projectile flight and collisions
//!
//! A volley opens every `volley_interval_ms`; its shots leave the guard
//! `volley_stagger_ms` apart. Each shot is aimed once, at the player's center
//! at the moment it spawns, and flies straight until it leaves the board,
//! reaches the player or is absorbed by an obstacle (checked in that order).

use glam::Vec2;

use super::geom::Rect;
use super::state::{
    GameEvent, GameState, Light, LossReason, Obstacle, Projectile, RoundOutcome, ThreatSchedule,
};
use crate::{delay_ticks, ticks_from_ms};
use crate::tuning::BoardLayout;

/// What happened to a projectile this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    /// Still flying
    InFlight,
    /// Left the board, no effect
    Exited,
    /// Reached the player
    HitPlayer,
    /// Swallowed by an obstacle
    Absorbed { obstacle_id: u32 },
}

/// Arm the firing cadence on red, cancel it (with any pending shot) on green
pub fn sync_with_light(state: &mut GameState) {
    match state.light {
        Light::Red => {
            if state.schedule.threat.is_none() {
                let first = state.time_ticks + ticks_from_ms(state.tuning.volley_interval_ms);
                state.schedule.threat = Some(ThreatSchedule {
                    next_volley_tick: first,
                    pending_shots: Vec::new(),
                });
            }
        }
        Light::Green => state.schedule.threat = None,
    }
}

/// Open due volleys and release due shots
pub fn update_threat(state: &mut GameState) {
    let now = state.time_ticks;
    let volley_ticks = ticks_from_ms(state.tuning.volley_interval_ms);
    let stagger_ticks = delay_ticks(state.tuning.volley_stagger_ms);
    let volley_size = state.tuning.volley_size as u64;

    let Some(threat) = state.schedule.threat.as_mut() else {
        return;
    };

    if now >= threat.next_volley_tick {
        threat.next_volley_tick += volley_ticks;
        threat
            .pending_shots
            .extend((0..volley_size).map(|i| now + i * stagger_ticks));
        log::debug!("Volley of {} at tick {}", volley_size, now);
    }

    let pending = threat.pending_shots.len();
    threat.pending_shots.retain(|&due| due > now);
    let due_shots = pending - threat.pending_shots.len();

    for _ in 0..due_shots {
        spawn_projectile(state);
    }
}

/// Fire one projectile from the guard at the player's current center
pub fn spawn_projectile(state: &mut GameState) -> Option<u32> {
    let player = state.player?;
    let board = state.board();
    let size = board.projectile_size;
    let origin = board.guard_rect().center() - size * 0.5;
    let vel = aim(origin + size * 0.5, player.rect(board).center(), state.tuning.projectile_speed);

    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: origin,
        vel,
    });
    state.push_event(GameEvent::ProjectileFired { id });
    Some(id)
}

/// Velocity from `from` toward `to` at `speed`; zero when they coincide
pub fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Classify a projectile that has already moved this tick
pub fn projectile_fate(
    projectile: &Projectile,
    board: &BoardLayout,
    player: Option<Rect>,
    obstacles: &[Obstacle],
) -> ProjectileFate {
    if projectile.out_of_bounds(board) {
        return ProjectileFate::Exited;
    }
    let rect = projectile.rect(board);
    if player.is_some_and(|p| rect.overlaps(&p)) {
        return ProjectileFate::HitPlayer;
    }
    obstacles
        .iter()
        .find(|o| rect.overlaps(&o.rect(board)))
        .map_or(ProjectileFate::InFlight, |o| ProjectileFate::Absorbed {
            obstacle_id: o.id,
        })
}

/// Move every projectile one tick and resolve collisions
pub fn advance_projectiles(state: &mut GameState) -> Option<RoundOutcome> {
    let board = &state.tuning.board;
    let obstacles = &state.obstacles;
    let player = state.player.map(|p| p.rect(board));

    let mut hit = false;
    let mut absorbed = Vec::new();
    state.projectiles.retain_mut(|p| {
        if hit {
            return true;
        }
        p.advance();
        match projectile_fate(p, board, player, obstacles) {
            ProjectileFate::InFlight => true,
            ProjectileFate::Exited => false,
            ProjectileFate::HitPlayer => {
                hit = true;
                false
            }
            ProjectileFate::Absorbed { .. } => {
                absorbed.push(p.id);
                false
            }
        }
    });

    for id in absorbed {
        state.push_event(GameEvent::ProjectileAbsorbed { id });
    }

    hit.then_some(RoundOutcome::Lost(LossReason::Hit))
}
