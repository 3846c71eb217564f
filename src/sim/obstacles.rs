//! Obstacle placement and oscillation
//!
//! Obstacles spawn at random percentages, never on the controls strip or
//! inside the guard buffer, then drift left and right for the rest of the
//! round. Random placement is bounded; after `MAX_PLACEMENT_ATTEMPTS` misses a
//! deterministic grid scan takes over.

use rand::Rng;

use super::state::{GameState, Obstacle};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::tuning::BoardLayout;

/// Replace the obstacle set with a freshly placed one
pub fn generate_obstacles(state: &mut GameState) {
    state.obstacles.clear();
    let board = state.tuning.board.clone();

    for _ in 0..state.tuning.obstacle_count {
        let (top, left) = place_obstacle(state.rng(), &board);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, top, left));
    }
}

/// Pick a legal (top, left) percent placement
pub fn place_obstacle<R: Rng>(rng: &mut R, board: &BoardLayout) -> (f32, f32) {
    let max = board.obstacle_range();
    if max > 0.0 {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let top = rng.random_range(0.0..max);
            let left = rng.random_range(0.0..max);
            if board.obstacle_slot_is_free(top, left) {
                return (top, left);
            }
        }
    }

    log::warn!(
        "No random obstacle slot after {} attempts, scanning grid",
        MAX_PLACEMENT_ATTEMPTS
    );
    find_free_slot(board).unwrap_or_else(|| {
        log::warn!("Board has no free obstacle slot, using origin");
        (0.0, 0.0)
    })
}

/// First legal placement on a 1% grid, scanning rows top to bottom
pub fn find_free_slot(board: &BoardLayout) -> Option<(f32, f32)> {
    let steps = board.obstacle_range().ceil().max(1.0) as u32;
    (0..steps)
        .flat_map(|top| (0..steps).map(move |left| (top as f32, left as f32)))
        .find(|&(top, left)| board.obstacle_slot_is_free(top, left))
}

/// Drift every obstacle by one tick
pub fn advance_obstacles(state: &mut GameState) {
    let speed = state.tuning.obstacle_speed;
    let max_left = state.tuning.board.obstacle_range();
    for obstacle in &mut state.obstacles {
        obstacle.advance(speed, max_left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generates_configured_count() {
        let mut state = GameState::new(11, Tuning::default());
        generate_obstacles(&mut state);
        assert_eq!(state.obstacles.len(), 5);

        let ids: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
        generate_obstacles(&mut state);
        assert_eq!(state.obstacles.len(), 5);
        // Regenerated set gets fresh ids
        assert!(state.obstacles.iter().all(|o| !ids.contains(&o.id)));
    }

    #[test]
    fn test_cramped_board_still_places() {
        // Only a thin band at the very top stays legal
        let board = BoardLayout {
            controls_height: 555.0,
            guard_origin: Vec2::new(-500.0, -500.0),
            ..BoardLayout::default()
        };
        let slot = find_free_slot(&board).expect("one free row");
        assert_eq!(slot, (0.0, 0.0));

        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            let (top, left) = place_obstacle(&mut rng, &board);
            assert!(board.obstacle_slot_is_free(top, left));
        }
    }

    #[test]
    fn test_fully_blocked_board_terminates() {
        let board = BoardLayout {
            controls_height: 600.0,
            ..BoardLayout::default()
        };
        assert_eq!(find_free_slot(&board), None);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(place_obstacle(&mut rng, &board), (0.0, 0.0));
    }

    #[test]
    fn test_oversized_range_is_bounded() {
        let board = BoardLayout {
            controls_height: 600.0,
            obstacle_max_percent: 4000.0,
            ..BoardLayout::default()
        };
        assert_eq!(find_free_slot(&board), None);

        let board = BoardLayout {
            obstacle_max_percent: 400.0,
            ..BoardLayout::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..50 {
            let (top, left) = place_obstacle(&mut rng, &board);
            assert!((0.0..=100.0).contains(&top));
            assert!((0.0..=100.0).contains(&left));
        }
    }

    #[test]
    fn test_obstacles_stay_within_bounds() {
        let mut state = GameState::new(3, Tuning::default());
        generate_obstacles(&mut state);
        for _ in 0..2000 {
            advance_obstacles(&mut state);
            for o in &state.obstacles {
                assert!((0.0..=90.0).contains(&o.left));
            }
        }
    }

    proptest! {
        #[test]
        fn placed_obstacles_avoid_reserved_zones(seed in any::<u64>()) {
            let mut state = GameState::new(seed, Tuning::default());
            generate_obstacles(&mut state);
            let board = state.board().clone();
            prop_assert_eq!(state.obstacles.len(), 5);
            for o in &state.obstacles {
                let rect = o.rect(&board);
                prop_assert!(!rect.overlaps(&board.controls_zone()));
                prop_assert!(!rect.overlaps(&board.guard_buffer_rect()));
                prop_assert!((0.0..90.0).contains(&o.top));
                prop_assert!((0.0..90.0).contains(&o.left));
            }
        }
    }
}
