//! Projection Pipeline
//!
//! World-space segments are moved into camera space, clipped against a
//! fixed near plane, then divided by depth into screen space.
//!
//! ## Camera space
//!
//! After [`world_to_view`] the camera sits at the origin looking down −y:
//! x is lateral and y is depth, negative in front of the camera. Screen y
//! grows downward, so points above eye level project above the centre.

use serde::{Serialize, Deserialize};

use crate::core::geometry::{line_intersect, rotate, translate, Segment};
use crate::core::vec2::Vec2;
use crate::game::entity::Player;

/// Camera-space near-plane segment.
pub const NEAR_PLANE: Segment = (Vec2::new(-1.0, -0.01), Vec2::new(1.0, -0.01));

/// Smallest depth divided by.
pub const MIN_DEPTH: f64 = 0.01;

// =============================================================================
// VIEWPORT
// =============================================================================

/// Integer pixel position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl ScreenPoint {
    /// Create a screen point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Output surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 450, height: 300 }
    }
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Integer half extents, also the centre pixel.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// Offset a camera-space point by the centre, without projection.
    pub fn offset(&self, p: Vec2) -> ScreenPoint {
        truncate(translate(p, self.center()))
    }

    /// Scale normalized device coordinates by the half extents and centre
    /// them.
    pub fn to_screen(&self, ndc: Vec2) -> ScreenPoint {
        let half = self.center();
        truncate(translate(ndc.scale_xy(half.x, half.y), half))
    }
}

/// Round toward zero, saturating at the i32 range.
#[inline]
fn truncate(p: Vec2) -> ScreenPoint {
    ScreenPoint::new(p.x as i32, p.y as i32)
}

// =============================================================================
// CAMERA
// =============================================================================

/// Viewpoint for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World position
    pub position: Vec2,
    /// Heading in degrees
    pub direction: f64,
    /// Eye elevation
    pub eye_z: f64,
}

impl Camera {
    /// Look through the player's eyes.
    pub fn from_player(player: &Player) -> Self {
        Self {
            position: player.position(),
            direction: player.direction,
            eye_z: player.eye_z(),
        }
    }

    /// World point to camera space.
    #[inline]
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        world_to_view(p, self.position, self.direction)
    }
}

/// Translate by the negated camera position, then rotate by
/// `90 - cam_dir` so the heading maps onto −y.
pub fn world_to_view(p: Vec2, cam_pos: Vec2, cam_dir: f64) -> Vec2 {
    rotate(translate(p, cam_pos.negate()), 90.0 - cam_dir)
}

// =============================================================================
// CLIPPING
// =============================================================================

/// Whether a camera-space point is behind the camera.
#[inline]
fn behind(p: Vec2) -> bool {
    p.y >= 0.0
}

/// Clip a camera-space segment against the near plane.
///
/// Returns `None` when both endpoints are behind, or when a crossing
/// segment is parallel to the plane.
pub fn clip_near_plane(a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
    match (behind(a), behind(b)) {
        (true, true) => None,
        (true, false) => Some((line_intersect((a, b), NEAR_PLANE)?, b)),
        (false, true) => Some((a, line_intersect((a, b), NEAR_PLANE)?)),
        (false, false) => Some((a, b)),
    }
}

/// Lateral and vertical normalized coordinates of a point at elevation `z`.
#[inline]
fn perspective(p: Vec2, z: f64, z_camera: f64) -> Vec2 {
    let depth = (-p.y).max(MIN_DEPTH);
    Vec2::new(p.x / depth, -(z - z_camera) / depth)
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Project a vertical wall quad.
///
/// Points come out as `[top_a, top_b, bottom_b, bottom_a]`.
pub fn view_to_screen(
    a: Vec2,
    b: Vec2,
    z_bottom: f64,
    z_top: f64,
    z_camera: f64,
    viewport: &Viewport,
) -> Option<[ScreenPoint; 4]> {
    let (a, b) = clip_near_plane(a, b)?;
    Some([
        viewport.to_screen(perspective(a, z_top, z_camera)),
        viewport.to_screen(perspective(b, z_top, z_camera)),
        viewport.to_screen(perspective(b, z_bottom, z_camera)),
        viewport.to_screen(perspective(a, z_bottom, z_camera)),
    ])
}

/// Project a segment with one elevation per endpoint.
pub fn view_to_screen_simple(
    a: Vec2,
    b: Vec2,
    z_a: f64,
    z_b: f64,
    z_camera: f64,
    viewport: &Viewport,
) -> Option<[ScreenPoint; 2]> {
    let (a, b) = clip_near_plane(a, b)?;
    Some([
        viewport.to_screen(perspective(a, z_a, z_camera)),
        viewport.to_screen(perspective(b, z_b, z_camera)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_world_to_view_heading_maps_forward() {
        // Facing +x: a point ahead lands at negative depth
        let v = world_to_view(Vec2::new(10.0, 0.0), Vec2::ZERO, 0.0);
        assert!(approx(v, Vec2::new(0.0, -10.0)));

        // Facing north (−y)
        let v = world_to_view(Vec2::new(5.0, -10.0), Vec2::new(5.0, 0.0), 90.0);
        assert!(approx(v, Vec2::new(0.0, -10.0)));

        // Behind the camera
        let v = world_to_view(Vec2::new(-10.0, 0.0), Vec2::ZERO, 0.0);
        assert!(v.y > 0.0);
    }

    #[test]
    fn test_clip_one_endpoint_behind() {
        let (a, b) = clip_near_plane(Vec2::new(0.0, 10.0), Vec2::new(0.0, -10.0)).unwrap();
        assert!(approx(a, Vec2::new(0.0, -0.01)));
        assert_eq!(b, Vec2::new(0.0, -10.0));

        // Depth exactly 0 counts as behind
        let (a, _) = clip_near_plane(Vec2::new(4.0, 0.0), Vec2::new(4.0, -8.0)).unwrap();
        assert!(approx(a, Vec2::new(4.0, -0.01)));
    }

    #[test]
    fn test_clip_both_behind() {
        assert!(clip_near_plane(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 3.0)).is_none());
    }

    #[test]
    fn test_clip_on_camera_plane_dropped() {
        assert!(clip_near_plane(Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)).is_none());
    }

    #[test]
    fn test_wall_quad() {
        let vp = Viewport::default();
        let quad = view_to_screen(Vec2::new(-10.0, -10.0), Vec2::new(10.0, -10.0), 0.0, 80.0, 30.0, &vp).unwrap();
        assert_eq!(
            quad,
            [
                ScreenPoint::new(0, -600),
                ScreenPoint::new(450, -600),
                ScreenPoint::new(450, 600),
                ScreenPoint::new(0, 600),
            ]
        );
    }

    #[test]
    fn test_simple_projection() {
        let vp = Viewport::default();
        let seg = view_to_screen_simple(Vec2::new(0.0, -30.0), Vec2::new(15.0, -30.0), 30.0, 0.0, 30.0, &vp).unwrap();
        assert_eq!(seg, [ScreenPoint::new(225, 150), ScreenPoint::new(337, 300)]);
    }

    #[test]
    fn test_depth_floor() {
        let vp = Viewport::default();
        // At the plane itself depth is floored at 0.01
        let seg = view_to_screen_simple(Vec2::new(0.001, -0.001), Vec2::new(0.0, -1.0), 30.0, 30.0, 30.0, &vp).unwrap();
        assert_eq!(seg[0], ScreenPoint::new(247, 150));
    }

    #[test]
    fn test_viewport_offset() {
        let vp = Viewport::new(451, 301);
        assert_eq!(vp.center(), Vec2::new(225.0, 150.0));
        assert_eq!(vp.offset(Vec2::new(-10.5, 3.9)), ScreenPoint::new(214, 153));
    }

    proptest! {
        #[test]
        fn prop_in_front_is_never_dropped(
            xa in -1000.0f64..1000.0, ya in -1000.0f64..-0.001,
            xb in -1000.0f64..1000.0, yb in -1000.0f64..-0.001,
        ) {
            let vp = Viewport::default();
            prop_assert!(view_to_screen(Vec2::new(xa, ya), Vec2::new(xb, yb), 0.0, 80.0, 30.0, &vp).is_some());
        }

        #[test]
        fn prop_behind_is_always_dropped(
            xa in -1000.0f64..1000.0, ya in 0.0f64..1000.0,
            xb in -1000.0f64..1000.0, yb in 0.0f64..1000.0,
        ) {
            let vp = Viewport::default();
            prop_assert!(view_to_screen(Vec2::new(xa, ya), Vec2::new(xb, yb), 0.0, 80.0, 30.0, &vp).is_none());
        }

        #[test]
        fn prop_clipped_endpoint_lies_on_plane(
            xa in -100.0f64..100.0, ya in 0.0f64..100.0,
            xb in -100.0f64..100.0, yb in -100.0f64..-0.1,
        ) {
            let (a, b) = clip_near_plane(Vec2::new(xa, ya), Vec2::new(xb, yb)).unwrap();
            prop_assert!((a.y + 0.01).abs() < 1e-6);
            prop_assert_eq!(b, Vec2::new(xb, yb));
        }
    }
}
