//! Walls
//!
//! A wall is a renderable, axis-aligned vertical segment. Doors reuse it
//! through composition (see `door.rs`).

use serde::{Serialize, Deserialize};

use crate::core::geometry::{dot, Segment};
use crate::core::vec2::Vec2;

/// Base elevation of every wall.
pub const WALL_Z: f64 = 0.0;
/// Height of every wall.
pub const WALL_HEIGHT: f64 = 80.0;

/// Orientation of an axis-aligned segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Runs along x; its normal is purely vertical.
    Horizontal,
    /// Runs along y; its normal is purely horizontal.
    Vertical,
}

/// An axis-aligned wall segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// First endpoint
    pub pos_a: Vec2,
    /// Second endpoint
    pub pos_b: Vec2,
    /// Base elevation
    pub z: f64,
    /// Height above base
    pub height: f64,
    /// Unit normal, derived from endpoint order
    pub normal: Vec2,
    /// Drawn even when seen from behind
    pub backface_visible: bool,
}

impl Wall {
    /// Build a wall from A to B.
    ///
    /// A vertical wall (dx = 0) gets normal `(sign(dy), 0)`, a horizontal
    /// one `(0, −sign(dx))`. Endpoints must differ.
    pub fn new(pos_a: Vec2, pos_b: Vec2, backface_visible: bool) -> Self {
        let dx = pos_b.x - pos_a.x;
        let dy = pos_b.y - pos_a.y;
        let normal = if dx == 0.0 {
            Vec2::new(dy.signum(), 0.0)
        } else {
            Vec2::new(0.0, -dx.signum())
        };

        Self {
            pos_a,
            pos_b,
            z: WALL_Z,
            height: WALL_HEIGHT,
            normal,
            backface_visible,
        }
    }

    /// Endpoints as a segment.
    #[inline]
    pub fn line(&self) -> Segment {
        (self.pos_a, self.pos_b)
    }

    /// Elevation of the top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.z + self.height
    }

    /// Axis the wall runs along, read from its normal.
    #[inline]
    pub fn axis(&self) -> Axis {
        if self.normal.x == 0.0 {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Whether a camera at `camera` sees this wall.
    ///
    /// True if the wall is double sided, or the camera lies on the
    /// normal's side (`(camera − A) · normal ≥ 0`).
    pub fn faces(&self, camera: Vec2) -> bool {
        self.backface_visible || dot(camera - self.pos_a, self.normal) >= 0.0
    }
}
