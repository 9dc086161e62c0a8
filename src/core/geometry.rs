//! Geometry Kernel
//!
//! Pure, stateless 2D helpers shared by the projection pipeline and the
//! spatial model.

use super::vec2::Vec2;

/// Tolerance used by [`near`] when matching sector corners.
pub const NEAR_TOLERANCE: f64 = 0.01;

/// A line segment between two points.
pub type Segment = (Vec2, Vec2);

/// Componentwise translation.
#[inline]
pub fn translate(point: Vec2, offset: Vec2) -> Vec2 {
    point + offset
}

/// Rotate `point` clockwise by `angle_deg` degrees.
///
/// `x' = x·cosθ + y·sinθ`, `y' = −x·sinθ + y·cosθ`.
#[inline]
pub fn rotate(point: Vec2, angle_deg: f64) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec2 {
        x: point.x * cos + point.y * sin,
        y: -point.x * sin + point.y * cos,
    }
}

/// Scale each axis independently.
#[inline]
pub fn scale(point: Vec2, factor_x: f64, factor_y: f64) -> Vec2 {
    point.scale_xy(factor_x, factor_y)
}

/// Dot product.
#[inline]
pub fn dot(u: Vec2, v: Vec2) -> f64 {
    u.dot(v)
}

/// Intersection of the infinite lines through two segments.
///
/// Uses the 2×2 determinant solution. Returns `None` when the lines are
/// parallel (zero determinant), where the solution is undefined.
pub fn line_intersect(line_a: Segment, line_b: Segment) -> Option<Vec2> {
    let ((x1, y1), (x2, y2)) = ((line_a.0.x, line_a.0.y), (line_a.1.x, line_a.1.y));
    let ((x3, y3), (x4, y4)) = ((line_b.0.x, line_b.0.y), (line_b.1.x, line_b.1.y));

    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if den == 0.0 {
        return None;
    }

    let num_a = x1 * y2 - y1 * x2;
    let num_b = x3 * y4 - y3 * x4;
    let point = Vec2 {
        x: (num_a * (x3 - x4) - (x1 - x2) * num_b) / den,
        y: (num_a * (y3 - y4) - (y1 - y2) * num_b) / den,
    };

    point.is_finite().then_some(point)
}

/// `|a − b| < 0.01`. Only for corner matching at load time.
#[inline]
pub fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < NEAR_TOLERANCE
}

/// Both coordinates of two points are [`near`].
#[inline]
pub fn near_point(a: Vec2, b: Vec2) -> bool {
    near(a.x, b.x) && near(a.y, b.y)
}

/// Sum of absolute componentwise differences.
///
/// Proximity regions measured with this are diamonds, not circles.
#[inline]
pub fn manhattan_distance(a: Vec2, b: Vec2) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

// =============================================================================
// TESTS
// =============================================================================
