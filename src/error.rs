use thiserror::Error;

/// Errors raised while building a track or a sensor rig.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("section centre line has zero length")]
    ZeroLengthCentreLine,
    #[error("section corners enclose zero area")]
    ZeroArea,
    #[error("section corners are twisted or not in convex order")]
    Twisted,
    #[error("lane width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("track must contain at least one section")]
    EmptyTrack,
    #[error("section {index} does not share its back border with the previous section's front border")]
    Disjoint { index: usize },
    #[error("sensor rig has {angles} angles but {distances} distances")]
    MismatchedRig { angles: usize, distances: usize },
    #[error("sensor {index} has invalid max distance {distance}")]
    InvalidRayDistance { index: usize, distance: f64 },
}
