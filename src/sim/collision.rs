//! Axis-aligned collision detection and push-out response
//!
//! Every entity is positioned by its centre, so every collision rectangle is
//! built from the centre as well.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as centre + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Strict overlap test (touching edges do not intersect)
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Signed penetration of `self` into `other` on both axes.
    ///
    /// Positive when `self` sits on the low side of `other` (needs to move
    /// toward negative), negative otherwise. `None` if they do not overlap.
    pub fn penetration(&self, other: &Rect) -> Option<Vec2> {
        if !self.intersects(other) {
            return None;
        }
        let x = if self.center.x < other.center.x {
            self.max().x - other.min().x
        } else {
            -(other.max().x - self.min().x)
        };
        let y = if self.center.y < other.center.y {
            self.max().y - other.min().y
        } else {
            -(other.max().y - self.min().y)
        };
        Some(Vec2::new(x, y))
    }

    /// Translation that moves `self` out of `other` along the axis with the
    /// smaller penetration. Ties resolve on the y axis.
    pub fn separation(&self, other: &Rect) -> Option<Vec2> {
        let pen = self.penetration(other)?;
        if pen.x.abs() < pen.y.abs() {
            Some(Vec2::new(-pen.x, 0.0))
        } else {
            Some(Vec2::new(0.0, -pen.y))
        }
    }
}

/// Zero whichever velocity axis would drive `mover` deeper into `obstacle`.
///
/// The dominant axis of the centre-to-centre offset decides which component
/// is tested; a component moving away from the obstacle is kept.
pub fn block_velocity(mover: &Rect, obstacle: &Rect, vel: Vec2) -> Vec2 {
    let offset = obstacle.center - mover.center;
    let mut vel = vel;
    if offset.x.abs() > offset.y.abs() {
        if offset.x * vel.x > 0.0 {
            vel.x = 0.0;
        }
    } else if offset.y * vel.y > 0.0 {
        vel.y = 0.0;
    }
    vel
}
