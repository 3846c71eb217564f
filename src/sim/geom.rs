//! Axis-aligned boxes in board pixel space
//!
//! The board origin is its top-left corner, x grows right and y grows down.
//! Entities placed by percentage (player, obstacles) are converted into pixel
//! boxes here so every collision test runs in one coordinate system.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Half-open overlap test: boxes sharing only an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Grow the box by `margin` on every side
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(self.min - Vec2::splat(margin), self.size + Vec2::splat(2.0 * margin))
    }
}

/// Pixel origin of an entity placed at (`top`, `left`) percent of the board
#[inline]
pub fn percent_to_px(top: f32, left: f32, board: Vec2) -> Vec2 {
    Vec2::new(left / 100.0 * board.x, top / 100.0 * board.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
        let c = Rect::from_xywh(20.0, 20.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::from_xywh(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_xywh(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_xywh(-10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_xywh(0.0, -10.0, 10.0, 10.0)));
        // Corner contact
        assert!(!a.overlaps(&Rect::from_xywh(10.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::from_xywh(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_expand() {
        let guard = Rect::from_xywh(375.0, 20.0, 50.0, 50.0);
        let buffer = guard.expand(30.0);
        assert_eq!(buffer.min, Vec2::new(345.0, -10.0));
        assert_eq!(buffer.max(), Vec2::new(455.0, 100.0));
        assert_eq!(buffer.center(), guard.center());
    }

    #[test]
    fn test_percent_to_px() {
        let board = Vec2::new(800.0, 600.0);
        assert_eq!(percent_to_px(90.0, 10.0, board), Vec2::new(80.0, 540.0));
        assert_eq!(percent_to_px(0.0, 0.0, board), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.5f32..200.0, ah in 0.5f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.5f32..200.0, bh in 0.5f32..200.0,
        ) {
            let a = Rect::from_xywh(ax, ay, aw, ah);
            let b = Rect::from_xywh(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn box_placed_flush_right_never_overlaps(
            x in -500i32..500, y in -500i32..500,
            w in 1i32..200, h in 1i32..200, dy in -150i32..150,
        ) {
            // Integer coordinates keep the shared edge exact in f32
            let a = Rect::from_xywh(x as f32, y as f32, w as f32, h as f32);
            let b = Rect::from_xywh((x + w) as f32, (y + dy) as f32, w as f32, h as f32);
            prop_assert!(!a.overlaps(&b));
        }
    }
}
