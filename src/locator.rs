use crate::math::{segment_crosses_line, segment_strictly_crosses_line, Point2d, Segment2d};
use crate::section::Quad;

/// How a vehicle's section changed over a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionDelta {
    /// Moved back over the back border into the previous section.
    Regressed,
    /// Still within the section.
    Unchanged,
    /// Moved over the front border into the next section.
    Advanced,
}

impl SectionDelta {
    /// The change in section index: -1, 0 or +1.
    pub fn offset(self) -> isize {
        match self {
            SectionDelta::Regressed => -1,
            SectionDelta::Unchanged => 0,
            SectionDelta::Advanced => 1,
        }
    }
}

/// Determines whether `position` has left `quad` over its front or back border.
///
/// Rather than a point-in-polygon test, this checks whether the segment from
/// the position back to the start of the centre line crosses the line through
/// the front border, and likewise whether the segment to the end of the centre
/// line crosses the line through the back border.
///
/// A position exactly on the front border has advanced, and one exactly on the
/// back border has not regressed, so a shared border belongs to the later section.
pub fn section_delta(quad: &Quad, position: Point2d) -> SectionDelta {
    let centre_line = quad.centre_line();

    let to_back = Segment2d::new(position, centre_line.start);
    if segment_crosses_line(&to_back, quad.front()) {
        return SectionDelta::Advanced;
    }

    let to_front = Segment2d::new(position, centre_line.end);
    if segment_strictly_crosses_line(&to_front, quad.back()) {
        return SectionDelta::Regressed;
    }

    SectionDelta::Unchanged
}
