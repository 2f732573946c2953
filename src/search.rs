//! The outward section-by-section search shared by collision detection and raycasting.

use crate::track::{Track, TrackPosition};

/// A direction along the track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// What probing a single section found.
pub(crate) enum Probe<T> {
    /// The query struck a border of the section.
    Hit(T),
    /// The query struck nothing, but reaches over the section's front and/or back border lines.
    Crosses { front: bool, back: bool },
}

/// The state of an outward search: the section to probe next,
/// and the direction the search may no longer step in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Search {
    pub index: usize,
    pub forbidden: Option<Direction>,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl Search {
    /// Starts a search at the given section, free to move either way.
    pub fn start(index: usize) -> Self {
        Self {
            index,
            forbidden: None,
        }
    }

    /// Works out where the search continues after probing the current section
    /// found crossings but no hit. Returns `None` when the search is over.
    ///
    /// Forward is preferred to backward. Once the search has stepped one way
    /// it may never step back the other way.
    pub fn next(self, track: &Track, front: bool, back: bool) -> Option<Self> {
        let dir = if front && self.forbidden != Some(Direction::Forward) {
            Direction::Forward
        } else if back && self.forbidden != Some(Direction::Backward) {
            Direction::Backward
        } else {
            return None;
        };
        match track.position(self.index as isize + dir.step()) {
            TrackPosition::On(index) => Some(Self {
                index,
                forbidden: Some(dir.opposite()),
            }),
            TrackPosition::Finished | TrackPosition::OffTrack => None,
        }
    }

    /// Runs a search to completion, returning the first hit.
    ///
    /// At most one lap of the track is searched.
    pub fn run<T>(self, track: &Track, mut probe: impl FnMut(usize) -> Probe<T>) -> Option<T> {
        let mut search = self;
        for _ in 0..track.len() {
            match probe(search.index) {
                Probe::Hit(hit) => return Some(hit),
                Probe::Crosses { front, back } => search = search.next(track, front, back)?,
            }
        }
        None
    }
}
