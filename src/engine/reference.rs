use super::{EngineKind, GeometryEngine};
use crate::collision::{detect_collision, Outline, Side};
use crate::locator::{section_delta, SectionDelta};
use crate::math::{Point2d, Segment2d};
use crate::sensor::raycast;
use crate::track::Track;

/// Answers every query directly from the track's section geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceEngine;

impl GeometryEngine for ReferenceEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Reference
    }

    fn section_delta(&self, track: &Track, section: usize, position: Point2d) -> SectionDelta {
        section_delta(track.section_at(section).quad(), position)
    }

    fn collision(&self, track: &Track, section: usize, outline: &Outline) -> Option<Side> {
        detect_collision(track, section, outline)
    }

    fn raycast(&self, track: &Track, section: usize, ray: &Segment2d) -> Option<Point2d> {
        raycast(track, section, ray)
    }
}
