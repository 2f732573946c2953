//! Interchangeable implementations of the per-tick geometry queries.

use crate::collision::{Outline, Side};
use crate::locator::SectionDelta;
use crate::math::{Point2d, Segment2d};
use crate::sensor::{SensorReadings, SensorRig};
use crate::track::Track;
pub use packed::PackedEngine;
pub use reference::ReferenceEngine;
use std::fmt;
use std::str::FromStr;

mod packed;
mod reference;

/// The geometry queries a vehicle makes against the track every tick.
///
/// Every method is a pure function of its arguments, so an engine can be
/// shared by vehicles being evaluated on different threads.
pub trait GeometryEngine: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> EngineKind;

    /// Determines whether `position` has left section `section` over its front or back border.
    fn section_delta(&self, track: &Track, section: usize, position: Point2d) -> SectionDelta;

    /// Determines which lateral border, if any, the outline touches,
    /// searching outwards from section `section`.
    fn collision(&self, track: &Track, section: usize, outline: &Outline) -> Option<Side>;

    /// Finds the nearest point where `ray` strikes a lateral border,
    /// searching outwards from section `section`.
    fn raycast(&self, track: &Track, section: usize, ray: &Segment2d) -> Option<Point2d>;

    /// Casts every ray of a rig from the given pose and records the readings.
    fn sense(
        &self,
        track: &Track,
        section: usize,
        position: Point2d,
        heading: f64,
        rig: &SensorRig,
        readings: &mut SensorReadings,
    ) {
        for (index, ray) in rig.rays().iter().enumerate() {
            let segment = ray.segment(position, heading);
            let hit = self.raycast(track, section, &segment);
            readings.set(
                index,
                ray.distance(position, hit),
                hit.unwrap_or(segment.end),
            );
        }
    }
}

/// Selects a [GeometryEngine] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EngineKind {
    /// Straightforward implementation working directly on the track's segments.
    Reference,
    /// Works on border line coefficients precomputed when the engine is built.
    #[default]
    Packed,
}

/// The error returned when parsing an unknown [EngineKind].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown geometry engine {0:?}, expected \"reference\" or \"packed\"")]
pub struct ParseEngineKindError(String);

impl EngineKind {
    /// Builds the engine for the given track.
    pub fn build(self, track: &Track) -> Box<dyn GeometryEngine> {
        match self {
            EngineKind::Reference => Box::new(ReferenceEngine),
            EngineKind::Packed => Box::new(PackedEngine::new(track)),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Reference => f.write_str("reference"),
            EngineKind::Packed => f.write_str("packed"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = ParseEngineKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(EngineKind::Reference),
            "packed" => Ok(EngineKind::Packed),
            _ => Err(ParseEngineKindError(s.to_string())),
        }
    }
}
