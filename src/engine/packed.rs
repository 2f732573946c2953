use super::{EngineKind, GeometryEngine};
use crate::collision::{Outline, Side};
use crate::locator::SectionDelta;
use crate::math::{Point2d, Segment2d};
use crate::search::{Probe, Search};
use crate::track::Track;

/// Answers queries from line coefficients precomputed for every border of the track,
/// so that each intersection test only has to derive the moving segment's coefficients once.
#[derive(Clone, Debug)]
pub struct PackedEngine {
    sections: Vec<PackedSection>,
}

/// The borders of one section in packed form.
#[derive(Clone, Copy, Debug)]
struct PackedSection {
    front: Line,
    back: Line,
    left: Line,
    right: Line,
    centre_start: Point2d,
    centre_end: Point2d,
}

/// A segment along with the coefficients of its supporting line.
#[derive(Clone, Copy, Debug)]
struct Line {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    /// Start minus end
    dx: f64,
    dy: f64,
    /// The cross product of the start and end points
    c: f64,
}

impl PackedEngine {
    /// Packs the borders of every section of `track`.
    pub fn new(track: &Track) -> Self {
        let sections = track
            .iter()
            .map(|section| {
                let quad = section.quad();
                PackedSection {
                    front: Line::new(quad.front()),
                    back: Line::new(quad.back()),
                    left: Line::new(quad.left()),
                    right: Line::new(quad.right()),
                    centre_start: quad.centre_line().start,
                    centre_end: quad.centre_line().end,
                }
            })
            .collect();
        Self { sections }
    }

    fn section(&self, track: &Track, index: usize) -> &PackedSection {
        debug_assert_eq!(self.sections.len(), track.len(), "engine built for another track");
        &self.sections[index]
    }

    /// Finds which lateral border of a section a segment strikes, and where.
    /// When it strikes both, the one nearer the segment's start wins.
    fn strike(section: &PackedSection, line: &Line) -> Option<(Side, Point2d)> {
        match (line.intersection(&section.left), line.intersection(&section.right)) {
            (Some(l), Some(r)) => {
                if line.distance2(l) <= line.distance2(r) {
                    Some((Side::Left, l))
                } else {
                    Some((Side::Right, r))
                }
            }
            (Some(l), None) => Some((Side::Left, l)),
            (None, Some(r)) => Some((Side::Right, r)),
            (None, None) => None,
        }
    }
}

impl GeometryEngine for PackedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Packed
    }

    fn section_delta(&self, track: &Track, section: usize, position: Point2d) -> SectionDelta {
        let packed = self.section(track, section);
        if Line::between(position, packed.centre_start).crosses(&packed.front) {
            SectionDelta::Advanced
        } else if Line::between(position, packed.centre_end).passes(&packed.back) {
            SectionDelta::Regressed
        } else {
            SectionDelta::Unchanged
        }
    }

    fn collision(&self, track: &Track, section: usize, outline: &Outline) -> Option<Side> {
        let edges = outline.edges().map(|edge| Line::new(&edge));
        Search::start(section).run(track, |index| {
            let packed = self.section(track, index);
            for edge in &edges {
                if edge.intersects(&packed.left) {
                    return Probe::Hit(Side::Left);
                }
                if edge.intersects(&packed.right) {
                    return Probe::Hit(Side::Right);
                }
            }
            Probe::Crosses {
                front: edges.iter().any(|edge| edge.crosses(&packed.front)),
                back: edges.iter().any(|edge| edge.crosses(&packed.back)),
            }
        })
    }

    fn raycast(&self, track: &Track, section: usize, ray: &Segment2d) -> Option<Point2d> {
        let line = Line::new(ray);
        let mut depth = 0;
        let hit = Search::start(section).run(track, |index| {
            depth += 1;
            let packed = self.section(track, index);
            match Self::strike(packed, &line) {
                Some((_, point)) => Probe::Hit(point),
                None => Probe::Crosses {
                    front: line.intersects(&packed.front),
                    back: line.intersects(&packed.back),
                },
            }
        });
        log::trace!("ray from section {} searched {} sections", section, depth);
        hit
    }
}

impl Line {
    fn new(segment: &Segment2d) -> Self {
        Self::between(segment.start, segment.end)
    }

    fn between(start: Point2d, end: Point2d) -> Self {
        let (x1, y1, x2, y2) = (start.x, start.y, end.x, end.y);
        Self {
            x1,
            y1,
            x2,
            y2,
            dx: x1 - x2,
            dy: y1 - y2,
            c: x1 * y2 - y1 * x2,
        }
    }

    /// Which side of the line a point lies on; zero when it lies on the line.
    #[inline(always)]
    fn side(&self, x: f64, y: f64) -> f64 {
        self.dy * x - self.dx * y + self.c
    }

    #[inline(always)]
    fn denom(&self, other: &Line) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }

    /// Whether this segment's end points lie on opposite sides of (or on) `other`'s line.
    #[inline(always)]
    fn straddles(&self, other: &Line) -> bool {
        other.side(self.x1, self.y1) * other.side(self.x2, self.y2) <= 0.0
    }

    /// Whether this segment touches or crosses the infinite line through `other`.
    fn crosses(&self, other: &Line) -> bool {
        self.denom(other) != 0.0 && self.straddles(other)
    }

    /// Whether this segment's end points lie strictly on opposite sides of `other`'s line.
    fn passes(&self, other: &Line) -> bool {
        self.denom(other) != 0.0
            && other.side(self.x1, self.y1) * other.side(self.x2, self.y2) < 0.0
    }

    /// Whether the two segments touch or cross.
    fn intersects(&self, other: &Line) -> bool {
        self.denom(other) != 0.0 && self.straddles(other) && other.straddles(self)
    }

    /// Where the two segments cross, if they do.
    fn intersection(&self, other: &Line) -> Option<Point2d> {
        let denom = self.denom(other);
        if denom == 0.0 || !self.straddles(other) || !other.straddles(self) {
            return None;
        }
        Some(Point2d::new(
            (self.c * other.dx - self.dx * other.c) / denom,
            (self.c * other.dy - self.dy * other.c) / denom,
        ))
    }

    /// The squared distance from the segment's start to a point.
    fn distance2(&self, point: Point2d) -> f64 {
        let (dx, dy) = (point.x - self.x1, point.y - self.y1);
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::segment_intersection;
    use rand::{Rng, SeedableRng};

    #[test]
    fn packed_lines_match_segments() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut point = || Point2d::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
        for _ in 0..2000 {
            let a = Segment2d::new(point(), point());
            let b = Segment2d::new(point(), point());
            let packed = Line::new(&a).intersection(&Line::new(&b));
            assert_eq!(packed, segment_intersection(&a, &b));
            assert_eq!(Line::new(&a).intersects(&Line::new(&b)), packed.is_some());
        }
    }
}
