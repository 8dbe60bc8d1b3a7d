//! Axis-aligned collision primitives
//!
//! Everything in the platformer is a box. Resolution is done one axis at a
//! time: move on X, push out on X, then move on Y, push out on Y. Resolving
//! both axes together snags on platform corners.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow the rectangle upward by `amount`, keeping the bottom edge fixed
    pub fn extend_up(&self, amount: f32) -> Rect {
        Rect::new(self.x, self.y - amount, self.w, self.h + amount)
    }
}

/// Result of resolving a moving box against static geometry on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Corrected position on the resolved axis
    pub pos: f32,
    /// Velocity on the resolved axis (zeroed on contact)
    pub vel: f32,
    /// True when the box was pushed out of something
    pub hit: bool,
}

/// Resolve horizontal overlap after the box has moved by `vx`
///
/// Each overlapping platform pushes the box back to the edge it came from.
/// A box that overlaps while standing still is left where it is.
pub fn resolve_x<'a>(
    mut body: Rect,
    vx: f32,
    solids: impl IntoIterator<Item = &'a Rect>,
) -> AxisResolution {
    let mut vel = vx;
    let mut hit = false;
    for solid in solids {
        if body.overlaps(solid) {
            if vx > 0.0 {
                body.x = solid.x - body.w;
            } else if vx < 0.0 {
                body.x = solid.right();
            }
            vel = 0.0;
            hit = true;
        }
    }
    AxisResolution {
        pos: body.x,
        vel,
        hit,
    }
}

/// Resolve vertical overlap after the box has moved by `vy`
///
/// Returns the resolution plus whether the box landed on top of something.
pub fn resolve_y<'a>(
    mut body: Rect,
    vy: f32,
    solids: impl IntoIterator<Item = &'a Rect>,
) -> (AxisResolution, bool) {
    let mut vel = vy;
    let mut hit = false;
    let mut grounded = false;
    for solid in solids {
        if body.overlaps(solid) {
            if vy > 0.0 {
                body.y = solid.y - body.h;
                vel = 0.0;
                grounded = true;
            } else if vy < 0.0 {
                body.y = solid.bottom();
                vel = 0.0;
            }
            hit = true;
        }
    }
    (
        AxisResolution {
            pos: body.y,
            vel,
            hit,
        },
        grounded,
    )
}

/// Bounce a value between `lo` and `hi`
///
/// Returns the clamped position and the velocity, whose sign is forced to
/// point back into the range when a bound is reached.
#[inline]
pub fn ping_pong(pos: f32, vel: f32, lo: f32, hi: f32) -> (f32, f32) {
    if pos <= lo {
        (lo, vel.abs())
    } else if pos >= hi {
        (hi, -vel.abs())
    } else {
        (pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_resolve_x_pushes_back_against_travel() {
        let wall = Rect::new(100.0, 0.0, 50.0, 100.0);

        // Moving right into the wall
        let body = Rect::new(85.0, 10.0, 20.0, 32.0);
        let res = resolve_x(body, 3.0, [&wall]);
        assert!(res.hit);
        assert_eq!(res.pos, 80.0);
        assert_eq!(res.vel, 0.0);

        // Moving left into the wall
        let body = Rect::new(148.0, 10.0, 20.0, 32.0);
        let res = resolve_x(body, -3.0, [&wall]);
        assert_eq!(res.pos, 150.0);
    }

    #[test]
    fn test_resolve_y_lands_on_top() {
        let ground = Rect::new(0.0, 368.0, 600.0, 32.0);
        let body = Rect::new(60.0, 340.0, 20.0, 32.0);
        let (res, grounded) = resolve_y(body, 4.0, [&ground]);
        assert!(grounded);
        assert_eq!(res.pos, 336.0);
        assert_eq!(res.vel, 0.0);
    }

    #[test]
    fn test_resolve_y_head_bump_is_not_grounded() {
        let ceiling = Rect::new(0.0, 200.0, 100.0, 24.0);
        let body = Rect::new(10.0, 220.0, 20.0, 32.0);
        let (res, grounded) = resolve_y(body, -6.0, [&ceiling]);
        assert!(!grounded);
        assert_eq!(res.pos, 224.0);
    }

    #[test]
    fn test_ping_pong_flips_at_bounds() {
        assert_eq!(ping_pong(50.0, 1.0, 0.0, 100.0), (50.0, 1.0));
        assert_eq!(ping_pong(101.0, 1.0, 0.0, 100.0), (100.0, -1.0));
        assert_eq!(ping_pong(-0.5, -1.0, 0.0, 100.0), (0.0, 1.0));
    }
}
