pub use cgmath;
pub use collision::{Footprint, Outline, Side};
pub use engine::{EngineKind, GeometryEngine, PackedEngine, ParseEngineKindError, ReferenceEngine};
pub use error::BuildError;
pub use locator::SectionDelta;
pub use section::{Quad, TrackSection};
pub use sensor::{Ray, SensorReadings, SensorRig};
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use track::{Track, TrackBuilder, TrackPosition};
pub use vehicle::{Vehicle, VehicleAttributes, VehicleStatus};

pub mod collision;
#[cfg(feature = "debug")]
mod debug;
pub mod engine;
mod error;
pub mod locator;
pub mod math;
mod search;
mod section;
pub mod sensor;
mod simulation;
mod track;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
