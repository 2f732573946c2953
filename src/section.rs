use crate::math::{midpoint, rot90, signed_area, Point2d, Segment2d};
use crate::BuildError;
use cgmath::prelude::*;

/// A convex four-sided cell of a track.
///
/// Travel runs from the `back` border towards the `front` border;
/// `left` and `right` are the lateral borders a vehicle must not touch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quad {
    top_left: Point2d,
    top_right: Point2d,
    bottom_right: Point2d,
    bottom_left: Point2d,
    front: Segment2d,
    back: Segment2d,
    left: Segment2d,
    right: Segment2d,
    centre_line: Segment2d,
}

/// One section of a [Track](crate::Track).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSection {
    /// The position of the section along the track.
    index: usize,
    /// The section's geometry.
    quad: Quad,
    /// The length of the centre line.
    length: f64,
}

impl Quad {
    /// Creates a quad from its four corners.
    ///
    /// The corners must wind anti-clockwise when visited in the order
    /// bottom left, bottom right, top right, top left; i.e. `top_left` and
    /// `bottom_left` lie to the left of the direction of travel.
    pub fn from_corners(
        top_left: Point2d,
        top_right: Point2d,
        bottom_right: Point2d,
        bottom_left: Point2d,
    ) -> Result<Self, BuildError> {
        let ring = [bottom_left, bottom_right, top_right, top_left];

        // Shoelace formula over the ring, doubled
        let area = (0..4)
            .map(|i| ring[i].to_vec().perp_dot(ring[(i + 1) % 4].to_vec()))
            .sum::<f64>();
        if area == 0.0 || !area.is_finite() {
            return Err(BuildError::ZeroArea);
        }

        for i in 0..4 {
            let turn = signed_area(ring[i], ring[(i + 1) % 4], ring[(i + 2) % 4]);
            if turn == 0.0 {
                return Err(BuildError::ZeroArea);
            }
            if turn < 0.0 {
                return Err(BuildError::Twisted);
            }
        }

        Ok(Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            front: Segment2d::new(top_left, top_right),
            back: Segment2d::new(bottom_right, bottom_left),
            left: Segment2d::new(bottom_left, top_left),
            right: Segment2d::new(bottom_right, top_right),
            centre_line: Segment2d::new(
                midpoint(bottom_left, bottom_right),
                midpoint(top_left, top_right),
            ),
        })
    }

    /// Creates a rectangular quad of the given width around a centre line.
    pub fn from_centre_line(line: &Segment2d, width: f64) -> Result<Self, BuildError> {
        check_width(width)?;
        if line.is_degenerate() {
            return Err(BuildError::ZeroLengthCentreLine);
        }
        let offset = 0.5 * width * rot90(line.delta().normalize());
        Self::from_corners(
            line.end + offset,
            line.end - offset,
            line.start - offset,
            line.start + offset,
        )
    }

    /// Creates the quad that continues on from this one towards `waypoint`.
    ///
    /// The new quad's back corners are this quad's front corners, so the two
    /// share a border exactly. Its front border is perpendicular to the new
    /// centre line, which runs from the midpoint of this quad's front border
    /// to `waypoint`.
    pub fn extend(&self, waypoint: Point2d, width: f64) -> Result<Self, BuildError> {
        check_width(width)?;
        let line = Segment2d::new(self.centre_line.end, waypoint);
        if line.is_degenerate() {
            return Err(BuildError::ZeroLengthCentreLine);
        }
        let offset = 0.5 * width * rot90(line.delta().normalize());
        Self::from_corners(
            waypoint + offset,
            waypoint - offset,
            self.top_right,
            self.top_left,
        )
    }

    /// Creates the quad that joins this quad's front border to `next`'s back border.
    pub fn bridge(&self, next: &Quad) -> Result<Self, BuildError> {
        Self::from_corners(
            next.bottom_left,
            next.bottom_right,
            self.top_right,
            self.top_left,
        )
    }

    pub fn top_left(&self) -> Point2d {
        self.top_left
    }

    pub fn top_right(&self) -> Point2d {
        self.top_right
    }

    pub fn bottom_right(&self) -> Point2d {
        self.bottom_right
    }

    pub fn bottom_left(&self) -> Point2d {
        self.bottom_left
    }

    /// The corners, in the order top left, top right, bottom right, bottom left.
    pub fn corners(&self) -> [Point2d; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// The border leading into the next section, from top left to top right.
    pub fn front(&self) -> &Segment2d {
        &self.front
    }

    /// The border leading into the previous section, from bottom right to bottom left.
    pub fn back(&self) -> &Segment2d {
        &self.back
    }

    /// The left border, from bottom left to top left.
    pub fn left(&self) -> &Segment2d {
        &self.left
    }

    /// The right border, from bottom right to top right.
    pub fn right(&self) -> &Segment2d {
        &self.right
    }

    /// The segment from the midpoint of the back border to the midpoint of the front border.
    pub fn centre_line(&self) -> &Segment2d {
        &self.centre_line
    }
}

impl TrackSection {
    pub(crate) fn new(index: usize, quad: Quad) -> Self {
        let length = quad.centre_line.length();
        Self {
            index,
            quad,
            length,
        }
    }

    /// The position of the section along the track.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The section's geometry.
    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    /// The length of the section's centre line.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The heading of the section's centre line.
    pub fn heading(&self) -> f64 {
        self.quad.centre_line.heading()
    }
}

/// Checks that a lane width is positive and finite.
pub(crate) fn check_width(width: f64) -> Result<(), BuildError> {
    if width > 0.0 && width.is_finite() {
        Ok(())
    } else {
        Err(BuildError::InvalidWidth(width))
    }
}
