use crate::math::{Point2d, Segment2d};
use crate::section::{check_width, Quad, TrackSection};
use crate::BuildError;
use itertools::Itertools;
use log::info;

/// An ordered sequence of sections which vehicles drive along.
///
/// A track is immutable once built, and can be shared between any number of
/// vehicles being evaluated at the same time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// The sections, in driving order.
    sections: Vec<TrackSection>,
    /// Whether the last section's front border is the first section's back border.
    circular: bool,
    /// The sum of the section centre line lengths.
    length: f64,
}

/// Where a section index lies relative to a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackPosition {
    /// On the section with the given index.
    On(usize),
    /// Past the front of the last section of a non-circular track.
    Finished,
    /// Behind the back of the first section of a non-circular track.
    OffTrack,
}

/// Builds a [Track] one section at a time.
#[derive(Clone, Debug)]
pub struct TrackBuilder {
    /// The width of sections appended from waypoints.
    width: f64,
    /// The quads added so far.
    quads: Vec<Quad>,
}

impl Track {
    /// Creates a track from a list of quads, checking that consecutive quads share a border.
    ///
    /// For a circular track the last quad's front corners must also be the first quad's back corners.
    pub fn from_quads(quads: Vec<Quad>, circular: bool) -> Result<Self, BuildError> {
        if quads.is_empty() {
            return Err(BuildError::EmptyTrack);
        }

        for (index, (prev, next)) in quads.iter().tuple_windows().enumerate() {
            if !shares_border(prev, next) {
                return Err(BuildError::Disjoint { index: index + 1 });
            }
        }
        // A lone quad can never close on itself, since its front and back differ
        if circular && !shares_border(&quads[quads.len() - 1], &quads[0]) {
            return Err(BuildError::Disjoint { index: 0 });
        }

        let sections = quads
            .into_iter()
            .enumerate()
            .map(|(index, quad)| TrackSection::new(index, quad))
            .collect::<Vec<_>>();
        let length = sections.iter().map(|s| s.length()).sum();

        info!(
            "built {} track with {} sections, {:.1} long",
            if circular { "circular" } else { "open" },
            sections.len(),
            length
        );

        Ok(Self {
            sections,
            circular,
            length,
        })
    }

    /// The number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; a track has at least one section.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether the track forms a closed loop.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// The total length of the track's centre line.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Gets the section at the given index.
    ///
    /// # Panics
    /// If the index is out of range.
    pub fn section_at(&self, index: usize) -> &TrackSection {
        &self.sections[index]
    }

    /// Returns an iterator over the sections in driving order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackSection> + Clone + ExactSizeIterator {
        self.sections.iter()
    }

    /// Wraps an index onto a circular track.
    ///
    /// Indices on a non-circular track are returned unchanged, so that `-1`
    /// and `len()` remain recognisable as having left the track.
    pub fn wrap(&self, index: isize) -> isize {
        if self.circular {
            index.rem_euclid(self.sections.len() as isize)
        } else {
            index
        }
    }

    /// Resolves a possibly out of range index into a position on the track.
    pub fn position(&self, index: isize) -> TrackPosition {
        let index = self.wrap(index);
        if index < 0 {
            TrackPosition::OffTrack
        } else if index as usize >= self.sections.len() {
            TrackPosition::Finished
        } else {
            TrackPosition::On(index as usize)
        }
    }

    /// The position and heading a vehicle starts from: the middle of the first section's centre line.
    pub fn start_pose(&self) -> (Point2d, f64) {
        let line = self.sections[0].quad().centre_line();
        (line.midpoint(), line.heading())
    }
}

impl TrackBuilder {
    /// Starts a track whose first section is the given quad.
    pub fn new(first: Quad, width: f64) -> Result<Self, BuildError> {
        check_width(width)?;
        Ok(Self {
            width,
            quads: vec![first],
        })
    }

    /// Starts a track whose first section is a rectangle of width `width` around `line`.
    pub fn from_centre_line(line: &Segment2d, width: f64) -> Result<Self, BuildError> {
        Self::new(Quad::from_centre_line(line, width)?, width)
    }

    /// Changes the width of sections appended from now on.
    pub fn set_width(&mut self, width: f64) -> Result<&mut Self, BuildError> {
        check_width(width)?;
        self.width = width;
        Ok(self)
    }

    /// Appends a section running from the end of the last section to `waypoint`.
    pub fn append_section(&mut self, waypoint: Point2d) -> Result<&mut Self, BuildError> {
        let quad = self.last().extend(waypoint, self.width)?;
        self.quads.push(quad);
        Ok(self)
    }

    /// Appends a section per waypoint.
    pub fn append_waypoints(
        &mut self,
        waypoints: impl IntoIterator<Item = Point2d>,
    ) -> Result<&mut Self, BuildError> {
        for waypoint in waypoints {
            self.append_section(waypoint)?;
        }
        Ok(self)
    }

    /// Appends an explicit quad, which must share its back border with the last section's front border.
    pub fn append_quad(&mut self, quad: Quad) -> Result<&mut Self, BuildError> {
        if !shares_border(self.last(), &quad) {
            return Err(BuildError::Disjoint {
                index: self.quads.len(),
            });
        }
        self.quads.push(quad);
        Ok(self)
    }

    /// The number of sections added so far.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Always false; a builder starts with one section.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Finishes an open track.
    pub fn build(self) -> Result<Track, BuildError> {
        Track::from_quads(self.quads, false)
    }

    /// Appends a section joining the last section back to the first, and finishes a circular track.
    pub fn close(mut self) -> Result<Track, BuildError> {
        let bridge = self.last().bridge(&self.quads[0])?;
        self.quads.push(bridge);
        Track::from_quads(self.quads, true)
    }

    fn last(&self) -> &Quad {
        // A builder always holds its first quad
        &self.quads[self.quads.len() - 1]
    }
}

/// Whether `next`'s back corners are exactly `prev`'s front corners.
fn shares_border(prev: &Quad, next: &Quad) -> bool {
    next.bottom_left() == prev.top_left() && next.bottom_right() == prev.top_right()
}

#[cfg(test)]
mod test {
    use super::*;

    fn square_loop() -> Track {
        let line = Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0));
        let mut builder = TrackBuilder::from_centre_line(&line, 20.0).unwrap();
        builder
            .append_waypoints([
                Point2d::new(0.0, 200.0),
                Point2d::new(100.0, 250.0),
                Point2d::new(200.0, 200.0),
                Point2d::new(200.0, 0.0),
                Point2d::new(100.0, -50.0),
            ])
            .unwrap();
        builder.close().unwrap()
    }

    #[test]
    fn wrap_circular() {
        let track = square_loop();
        let len = track.len() as isize;
        assert_eq!(len, 7);
        assert_eq!(track.wrap(len), 0);
        assert_eq!(track.wrap(-1), len - 1);
        assert_eq!(track.position(len), TrackPosition::On(0));
        assert_eq!(track.position(-1), TrackPosition::On(6));
    }

    #[test]
    fn wrap_open() {
        let line = Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0));
        let track = TrackBuilder::from_centre_line(&line, 20.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(track.wrap(1), 1);
        assert_eq!(track.wrap(-1), -1);
        assert_eq!(track.position(1), TrackPosition::Finished);
        assert_eq!(track.position(-1), TrackPosition::OffTrack);
        assert_eq!(track.position(0), TrackPosition::On(0));
    }

    #[test]
    fn closed_loop_shares_corners() {
        let track = square_loop();
        for (prev, next) in track.iter().circular_tuple_windows() {
            assert_eq!(prev.quad().top_left(), next.quad().bottom_left());
            assert_eq!(prev.quad().top_right(), next.quad().bottom_right());
        }
        assert!(track.is_circular());
    }

    #[test]
    fn disjoint_quads_are_rejected() {
        let a = Quad::from_centre_line(
            &Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0)),
            20.0,
        )
        .unwrap();
        let b = Quad::from_centre_line(
            &Segment2d::new(Point2d::new(0.0, 100.5), Point2d::new(0.0, 200.0)),
            20.0,
        )
        .unwrap();
        assert_eq!(
            Track::from_quads(vec![a.clone(), b.clone()], false).unwrap_err(),
            BuildError::Disjoint { index: 1 }
        );

        let mut builder = TrackBuilder::new(a.clone(), 20.0).unwrap();
        assert!(builder.append_quad(b).is_err());
        assert!(Track::from_quads(vec![], false).is_err());
        assert_eq!(
            Track::from_quads(vec![a], true).unwrap_err(),
            BuildError::Disjoint { index: 0 }
        );
    }

    #[test]
    fn invalid_widths_are_rejected() {
        let line = Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0));
        let mut builder = TrackBuilder::from_centre_line(&line, 20.0).unwrap();
        assert_eq!(
            builder.set_width(-1.0).unwrap_err(),
            BuildError::InvalidWidth(-1.0)
        );
        assert!(builder.set_width(f64::NAN).is_err());
        assert!(builder.set_width(30.0).is_ok());
    }

    #[test]
    fn start_pose_follows_first_section() {
        let track = square_loop();
        let (pos, heading) = track.start_pose();
        assert_eq!(pos, Point2d::new(0.0, 50.0));
        assert_eq!(heading, 0.0);
    }
}
