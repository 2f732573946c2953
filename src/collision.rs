use crate::math::{
    heading_vector, rot90, segment_crosses_line, segment_intersection, Point2d, Segment2d,
};
use crate::search::{Probe, Search};
use crate::track::Track;

/// The lateral border of a section that a vehicle struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// The rectangular footprint of a vehicle, centred on its reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    /// Half the vehicle's length.
    pub half_length: f64,
    /// Half the vehicle's width.
    pub half_width: f64,
}

/// The four edges of a footprint placed in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    /// Left side, then right side, then front, then rear.
    edges: [Segment2d; 4],
}

impl Footprint {
    /// Creates a footprint from a full width and length.
    pub fn new(width: f64, length: f64) -> Self {
        Self {
            half_length: 0.5 * length,
            half_width: 0.5 * width,
        }
    }

    /// The corners of the footprint at the given pose,
    /// in the order front left, front right, rear right, rear left.
    pub fn corners(&self, position: Point2d, heading: f64) -> [Point2d; 4] {
        let fwd = self.half_length * heading_vector(heading);
        let left = self.half_width * rot90(heading_vector(heading));
        [
            position + fwd + left,
            position + fwd - left,
            position - fwd - left,
            position - fwd + left,
        ]
    }

    /// Places the footprint at the given pose.
    pub fn outline(&self, position: Point2d, heading: f64) -> Outline {
        let [front_left, front_right, rear_right, rear_left] = self.corners(position, heading);
        Outline {
            edges: [
                Segment2d::new(front_left, rear_left),
                Segment2d::new(front_right, rear_right),
                Segment2d::new(front_left, front_right),
                Segment2d::new(rear_left, rear_right),
            ],
        }
    }
}

impl Outline {
    /// All four edges; the lateral edges come first.
    pub fn edges(&self) -> &[Segment2d; 4] {
        &self.edges
    }

    pub fn left(&self) -> &Segment2d {
        &self.edges[0]
    }

    pub fn right(&self) -> &Segment2d {
        &self.edges[1]
    }

    pub fn front(&self) -> &Segment2d {
        &self.edges[2]
    }

    pub fn rear(&self) -> &Segment2d {
        &self.edges[3]
    }
}

/// Determines whether a vehicle outline touches a lateral border of the track,
/// starting from the section the vehicle is on.
///
/// When nothing is struck in a section but the outline reaches over the
/// section's front (or back) border line, the search continues into the next
/// (or previous) section. It never turns around.
pub fn detect_collision(track: &Track, section: usize, outline: &Outline) -> Option<Side> {
    Search::start(section).run(track, |index| {
        let quad = track.section_at(index).quad();
        for edge in outline.edges() {
            if segment_intersection(edge, quad.left()).is_some() {
                return Probe::Hit(Side::Left);
            }
            if segment_intersection(edge, quad.right()).is_some() {
                return Probe::Hit(Side::Right);
            }
        }
        Probe::Crosses {
            front: outline
                .edges()
                .iter()
                .any(|edge| segment_crosses_line(edge, quad.front())),
            back: outline
                .edges()
                .iter()
                .any(|edge| segment_crosses_line(edge, quad.back())),
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn corners_follow_heading() {
        let footprint = Footprint::new(10.0, 30.0);
        let [fl, fr, rr, rl] = footprint.corners(Point2d::new(0.0, 0.0), 0.0);
        assert_eq!((fl.x, fl.y), (-5.0, 15.0));
        assert_eq!((fr.x, fr.y), (5.0, 15.0));
        assert_eq!((rr.x, rr.y), (5.0, -15.0));
        assert_eq!((rl.x, rl.y), (-5.0, -15.0));

        // Facing +x, the left side is towards +y
        let [fl, _, _, rl] = footprint.corners(Point2d::new(0.0, 0.0), FRAC_PI_2);
        assert_approx_eq!(fl.x, 15.0);
        assert_approx_eq!(fl.y, 5.0);
        assert_approx_eq!(rl.x, -15.0);
        assert_approx_eq!(rl.y, 5.0);
    }

    #[test]
    fn outline_edges() {
        let outline = Footprint::new(10.0, 30.0).outline(Point2d::new(0.0, 0.0), 0.0);
        assert_eq!(outline.left().start.x, -5.0);
        assert_eq!(outline.right().start.x, 5.0);
        assert_eq!(outline.front().start.y, 15.0);
        assert_eq!(outline.rear().start.y, -15.0);
    }
}
