use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// Rotates a vector 90 degrees anti-clockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Gets the unit vector pointing along a heading.
///
/// Headings are measured in radians clockwise from the positive y-axis,
/// so a heading of zero points "up" and a heading of π/2 points along +x.
pub fn heading_vector(heading: f64) -> Vector2d {
    let (sin, cos) = heading.sin_cos();
    Vector2d::new(sin, cos)
}

/// Moves a point a given distance along a heading.
pub fn translate(point: Point2d, heading: f64, distance: f64) -> Point2d {
    point + distance * heading_vector(heading)
}

/// Gets the point halfway between two points.
pub fn midpoint(a: Point2d, b: Point2d) -> Point2d {
    a.midpoint(b)
}

/// Computes twice the signed area of the triangle `a`, `b`, `c`.
/// Positive when the points wind anti-clockwise.
pub fn signed_area(a: Point2d, b: Point2d, c: Point2d) -> f64 {
    (b - a).perp_dot(c - a)
}
