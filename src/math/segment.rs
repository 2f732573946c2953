use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI};

/// A straight line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment2d {
    pub start: Point2d,
    pub end: Point2d,
}

/// The quadrant a segment points into when its start is moved to the origin.
///
/// Points on an axis belong to the quadrant on the non-negative side of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    /// +x, +y
    First,
    /// -x, +y
    Second,
    /// -x, -y
    Third,
    /// +x, -y
    Fourth,
}

impl Segment2d {
    /// Creates a segment from its two end points.
    pub const fn new(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    /// Creates a segment starting at `start` and running `length` units along `heading`.
    pub fn from_heading(start: Point2d, heading: f64, length: f64) -> Self {
        Self::new(start, super::translate(start, heading, length))
    }

    /// The vector from the start to the end of the segment.
    pub fn delta(&self) -> Vector2d {
        self.end - self.start
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.delta().magnitude()
    }

    /// The point halfway along the segment.
    pub fn midpoint(&self) -> Point2d {
        self.start.midpoint(self.end)
    }

    /// Whether the segment has zero length.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The quadrant the segment's direction falls into.
    pub fn quadrant(&self) -> Quadrant {
        let d = self.delta();
        match (d.x >= 0.0, d.y >= 0.0) {
            (true, true) => Quadrant::First,
            (false, true) => Quadrant::Second,
            (false, false) => Quadrant::Third,
            (true, false) => Quadrant::Fourth,
        }
    }

    /// The heading of the segment in `[0, 2π)`, measured clockwise from +y.
    ///
    /// Axis-aligned segments are resolved by lookup so that no division by zero
    /// occurs. A degenerate segment has a heading of zero.
    pub fn heading(&self) -> f64 {
        let d = self.delta();
        if d.x == 0.0 {
            return if d.y < 0.0 { PI } else { 0.0 };
        }
        if d.y == 0.0 {
            return if d.x < 0.0 { 3.0 * FRAC_PI_2 } else { FRAC_PI_2 };
        }
        match self.quadrant() {
            Quadrant::First => (d.x / d.y).atan(),
            Quadrant::Second => 3.0 * FRAC_PI_2 + (d.y / d.x.abs()).atan(),
            Quadrant::Third => PI + (d.x / d.y).atan(),
            Quadrant::Fourth => FRAC_PI_2 + (d.y.abs() / d.x).atan(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2d {
        Segment2d::new(Point2d::new(x1, y1), Point2d::new(x2, y2))
    }

    #[test]
    fn axis_aligned_headings() {
        assert_eq!(seg(0.0, 0.0, 0.0, 5.0).heading(), 0.0);
        assert_eq!(seg(0.0, 0.0, 5.0, 0.0).heading(), FRAC_PI_2);
        assert_eq!(seg(0.0, 0.0, 0.0, -5.0).heading(), PI);
        assert_eq!(seg(0.0, 0.0, -5.0, 0.0).heading(), 3.0 * FRAC_PI_2);
    }

    #[test]
    fn diagonal_headings() {
        assert_approx_eq!(seg(0.0, 0.0, 1.0, 1.0).heading(), 0.25 * PI);
        assert_approx_eq!(seg(0.0, 0.0, 1.0, -1.0).heading(), 0.75 * PI);
        assert_approx_eq!(seg(0.0, 0.0, -1.0, -1.0).heading(), 1.25 * PI);
        assert_approx_eq!(seg(0.0, 0.0, -1.0, 1.0).heading(), 1.75 * PI);
    }

    #[test]
    fn heading_matches_atan2() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let s = seg(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            let d = s.delta();
            let expected = d.x.atan2(d.y).rem_euclid(2.0 * PI);
            assert_approx_eq!(s.heading(), expected, 1e-9);
            assert!((0.0..2.0 * PI).contains(&s.heading()));
        }
    }

    #[test]
    fn from_heading_round_trips() {
        let s = Segment2d::from_heading(Point2d::new(3.0, 4.0), 1.0, 10.0);
        assert_approx_eq!(s.length(), 10.0);
        assert_approx_eq!(s.heading(), 1.0);
    }
}
