use crate::math::{segment_intersection, Point2d, Segment2d};
use crate::search::{Probe, Search};
use crate::track::Track;
use crate::BuildError;
use cgmath::prelude::*;
use smallvec::SmallVec;
use std::f64::consts::FRAC_PI_2;

/// A ray fixed relative to a vehicle's heading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// The angle from the vehicle's heading, clockwise, in radians.
    pub angle: f64,
    /// The furthest distance the ray can sense.
    pub max_distance: f64,
}

/// The set of rays a vehicle senses the track with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorRig {
    rays: SmallVec<[Ray; 8]>,
}

/// The latest readings of a [SensorRig], one per ray.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReadings {
    /// The distance to the nearest border along each ray.
    distances: SmallVec<[f64; 8]>,
    /// The point each ray struck, or the end of the ray if it struck nothing.
    focus: SmallVec<[Point2d; 8]>,
}

impl Ray {
    /// The ray as a segment, cast from a vehicle at the given pose.
    pub fn segment(&self, position: Point2d, heading: f64) -> Segment2d {
        Segment2d::from_heading(position, heading + self.angle, self.max_distance)
    }

    /// The distance sensed when the ray cast from `origin` struck `hit`.
    /// Never more than the ray's max distance.
    pub fn distance(&self, origin: Point2d, hit: Option<Point2d>) -> f64 {
        match hit {
            Some(point) => f64::min(origin.distance(point), self.max_distance),
            None => self.max_distance,
        }
    }
}

impl SensorRig {
    /// Creates a sensor rig from parallel lists of ray angles and max distances.
    pub fn new(angles: &[f64], distances: &[f64]) -> Result<Self, BuildError> {
        if angles.len() != distances.len() {
            return Err(BuildError::MismatchedRig {
                angles: angles.len(),
                distances: distances.len(),
            });
        }
        let rays = angles
            .iter()
            .zip(distances)
            .enumerate()
            .map(|(index, (&angle, &max_distance))| {
                if max_distance >= 0.0 && max_distance.is_finite() {
                    Ok(Ray {
                        angle,
                        max_distance,
                    })
                } else {
                    Err(BuildError::InvalidRayDistance {
                        index,
                        distance: max_distance,
                    })
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rays })
    }

    /// The standard seven-ray rig for a vehicle of the given size.
    ///
    /// One long ray straight ahead, two either side of it through the
    /// vehicle's front corners, two wider ones, and two short ones
    /// pointing directly sideways.
    pub fn standard(width: f64, length: f64) -> Self {
        let corner = (width / length).atan();
        let rays = [
            (0.0, 175.0),
            (corner, 100.0),
            (-corner, 100.0),
            (3.0 * corner, 50.0),
            (-3.0 * corner, 50.0),
            (FRAC_PI_2, 30.0),
            (-FRAC_PI_2, 30.0),
        ];
        Self {
            rays: rays
                .into_iter()
                .map(|(angle, max_distance)| Ray {
                    angle,
                    max_distance,
                })
                .collect(),
        }
    }

    /// The rays, in order.
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// The number of rays.
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    /// Whether the rig has no rays.
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Readings for a vehicle at the given pose that sees nothing;
    /// every ray reports its max distance.
    pub fn initial_readings(&self, position: Point2d, heading: f64) -> SensorReadings {
        SensorReadings {
            distances: self.rays.iter().map(|ray| ray.max_distance).collect(),
            focus: self
                .rays
                .iter()
                .map(|ray| ray.segment(position, heading).end)
                .collect(),
        }
    }
}

impl SensorReadings {
    /// The distance sensed by each ray.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// The point each ray struck, or the end of the ray if it struck nothing.
    pub fn focus(&self) -> &[Point2d] {
        &self.focus
    }

    /// Records the reading of ray `index`.
    pub(crate) fn set(&mut self, index: usize, distance: f64, focus: Point2d) {
        self.distances[index] = distance;
        self.focus[index] = focus;
    }
}

/// Finds the nearest point where `ray` strikes a lateral track border,
/// starting from the section the ray is cast from.
///
/// The search moves section by section in the same way as collision detection,
/// but only continues over a front or back border the ray actually reaches.
pub fn raycast(track: &Track, section: usize, ray: &Segment2d) -> Option<Point2d> {
    Search::start(section).run(track, |index| {
        let quad = track.section_at(index).quad();
        let left = segment_intersection(ray, quad.left());
        let right = segment_intersection(ray, quad.right());
        let hit = match (left, right) {
            (Some(l), Some(r)) => {
                if ray.start.distance2(l) <= ray.start.distance2(r) {
                    Some(l)
                } else {
                    Some(r)
                }
            }
            (l, r) => l.or(r),
        };
        match hit {
            Some(point) => Probe::Hit(point),
            None => Probe::Crosses {
                front: segment_intersection(ray, quad.front()).is_some(),
                back: segment_intersection(ray, quad.back()).is_some(),
            },
        }
    })
}
