use crate::collision::{Footprint, Outline, Side};
use crate::engine::GeometryEngine;
use crate::locator::SectionDelta;
use crate::math::Point2d;
use crate::sensor::{SensorReadings, SensorRig};
use crate::track::{Track, TrackPosition};
use crate::VehicleId;
use log::{debug, info};

mod dynamics;

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    pub(crate) id: VehicleId,
    /// The vehicle's rectangular footprint.
    footprint: Footprint,
    /// Distance between the front and rear axles.
    wheel_base: f64,
    /// The maximum speed in either direction.
    max_speed: f64,
    /// The wheel angle at full steering lock, in radians.
    max_steering: f64,
    /// The world space coordinates of the centre of the vehicle.
    position: Point2d,
    /// The heading in radians, clockwise from +y.
    heading: f64,
    /// The current speed; negative when reversing.
    speed: f64,
    /// The steering input in `[-1, 1]`; positive steers right.
    steering: f64,
    /// The index of the track section the vehicle is on.
    section: usize,
    /// Whether the vehicle is still driving.
    status: VehicleStatus,
    /// The rays the vehicle senses with.
    rig: SensorRig,
    /// The latest sensor readings.
    readings: SensorReadings,
    /// Time spent driving.
    time: f64,
    /// How long the vehicle may stay on the first section before it stalls.
    stall_time: f64,
    /// Whether the vehicle has ever left the first section.
    left_start: bool,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAttributes {
    /// The vehicle width.
    pub width: f64,
    /// The vehicle length.
    pub length: f64,
    /// Distance between the front and rear axles.
    pub wheel_base: f64,
    /// The maximum speed in either direction.
    pub max_speed: f64,
    /// The wheel angle at full steering lock, in radians.
    pub max_steering: f64,
    /// How long the vehicle may take to leave the first section before it stalls.
    /// Use `f64::INFINITY` to never stall.
    pub stall_time: f64,
}

/// Whether a vehicle is still taking part in the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleStatus {
    /// Still driving.
    Driving,
    /// Struck a border on the given side and stopped.
    Crashed(Side),
    /// Drove off the front of the last section of an open track.
    Finished,
    /// Drove off the back of the first section of an open track.
    OffTrack,
    /// Never left the first section within its stall time.
    Stalled,
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            width: 10.0,
            length: 30.0,
            wheel_base: 15.0,
            max_speed: 150.0,
            max_steering: 0.6,
            stall_time: 3.0,
        }
    }
}

impl VehicleStatus {
    /// Whether the vehicle has left the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VehicleStatus::Driving)
    }
}

impl Vehicle {
    /// Creates a new vehicle at the start of the track.
    pub(crate) fn new(
        id: VehicleId,
        attributes: &VehicleAttributes,
        rig: SensorRig,
        track: &Track,
    ) -> Self {
        let (position, heading) = track.start_pose();
        let readings = rig.initial_readings(position, heading);
        Self {
            id,
            footprint: Footprint::new(attributes.width, attributes.length),
            wheel_base: attributes.wheel_base,
            max_speed: attributes.max_speed,
            max_steering: attributes.max_steering,
            position,
            heading,
            speed: 0.0,
            steering: 0.0,
            section: 0,
            status: VehicleStatus::Driving,
            rig,
            readings,
            time: 0.0,
            stall_time: attributes.stall_time,
            left_start: false,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The vehicle's width.
    pub fn width(&self) -> f64 {
        2.0 * self.footprint.half_width
    }

    /// The vehicle's length.
    pub fn length(&self) -> f64 {
        2.0 * self.footprint.half_length
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// The vehicle's heading in radians, clockwise from +y.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// The vehicle's speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The steering input in `[-1, 1]`.
    pub fn steering(&self) -> f64 {
        self.steering
    }

    /// The index of the track section the vehicle is on.
    pub fn section(&self) -> usize {
        self.section
    }

    /// Whether the vehicle is still driving, and if not why.
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// The time the vehicle has spent driving.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The rays the vehicle senses with.
    pub fn sensor_rig(&self) -> &SensorRig {
        &self.rig
    }

    /// The latest sensor readings.
    pub fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    /// The edges of the vehicle's footprint in world space.
    pub fn outline(&self) -> Outline {
        self.footprint.outline(self.position, self.heading)
    }

    /// Sets the steering input and speed, which are clamped to the vehicle's limits.
    pub(crate) fn set_controls(&mut self, steering: f64, speed: f64) {
        self.steering = steering.clamp(-1.0, 1.0);
        self.speed = speed.clamp(-self.max_speed, self.max_speed);
    }

    /// Places the vehicle on the given section with the given pose, and resets its status.
    pub(crate) fn place(&mut self, section: usize, position: Point2d, heading: f64) {
        self.section = section;
        self.position = position;
        self.heading = heading;
        self.speed = 0.0;
        self.steering = 0.0;
        self.status = VehicleStatus::Driving;
        self.time = 0.0;
        self.left_start = section != 0;
        self.readings = self.rig.initial_readings(position, heading);
    }

    /// Sets the heading without moving the vehicle.
    pub(crate) fn set_heading(&mut self, heading: f64) {
        self.heading = heading.rem_euclid(std::f64::consts::TAU);
    }

    /// Simulates one tick: moves the vehicle, checks it against the track
    /// borders, updates its section and takes new sensor readings.
    ///
    /// A vehicle that would strike a border stays where it was and stops.
    pub(crate) fn tick(&mut self, dt: f64, track: &Track, engine: &dyn GeometryEngine) {
        if self.status.is_terminal() {
            return;
        }
        if !self.left_start && self.time > self.stall_time {
            info!("vehicle {:?} stalled on the first section", self.id);
            self.speed = 0.0;
            self.status = VehicleStatus::Stalled;
            return;
        }
        self.time += dt;

        let (position, heading) = dynamics::advance(
            self.position,
            self.heading,
            self.speed,
            self.steering * self.max_steering,
            self.wheel_base,
            dt,
        );

        let outline = self.footprint.outline(position, heading);
        if let Some(side) = engine.collision(track, self.section, &outline) {
            info!(
                "vehicle {:?} struck the {:?} border of section {}",
                self.id, side, self.section
            );
            self.speed = 0.0;
            self.status = VehicleStatus::Crashed(side);
            return;
        }
        self.position = position;
        self.heading = heading;

        let delta = engine.section_delta(track, self.section, position);
        if delta != SectionDelta::Unchanged {
            match track.position(self.section as isize + delta.offset()) {
                TrackPosition::On(section) => {
                    debug!(
                        "vehicle {:?} moved from section {} to {}",
                        self.id, self.section, section
                    );
                    self.section = section;
                    self.left_start |= section != 0;
                }
                TrackPosition::Finished => {
                    info!("vehicle {:?} finished after {:.2}s", self.id, self.time);
                    self.status = VehicleStatus::Finished;
                    return;
                }
                TrackPosition::OffTrack => {
                    info!("vehicle {:?} left the start of the track", self.id);
                    self.status = VehicleStatus::OffTrack;
                    return;
                }
            }
        }

        self.sense(track, engine);
    }

    /// Casts the vehicle's rays from its current pose.
    pub(crate) fn sense(&mut self, track: &Track, engine: &dyn GeometryEngine) {
        engine.sense(
            track,
            self.section,
            self.position,
            self.heading,
            &self.rig,
            &mut self.readings,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::ReferenceEngine;
    use crate::math::Segment2d;
    use crate::track::TrackBuilder;
    use crate::VehicleSet;
    use assert_approx_eq::assert_approx_eq;

    fn straight(len: f64) -> Track {
        TrackBuilder::from_centre_line(
            &Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0)),
            20.0,
        )
        .and_then(|mut builder| {
            builder.append_section(Point2d::new(0.0, len))?;
            builder.build()
        })
        .unwrap()
    }

    fn vehicle(track: &Track) -> Vehicle {
        let mut set = VehicleSet::default();
        let id = set.insert_with_key(|id| {
            Vehicle::new(id, &VehicleAttributes::default(), SensorRig::standard(10.0, 30.0), track)
        });
        set.remove(id).unwrap()
    }

    #[test]
    fn controls_are_clamped() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.set_controls(3.0, 1000.0);
        assert_eq!(vehicle.steering(), 1.0);
        assert_eq!(vehicle.speed(), 150.0);
        vehicle.set_controls(-3.0, -1000.0);
        assert_eq!(vehicle.steering(), -1.0);
        assert_eq!(vehicle.speed(), -150.0);
    }

    #[test]
    fn drives_into_next_section() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.set_controls(0.0, 100.0);
        for _ in 0..7 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.status(), VehicleStatus::Driving);
        assert_approx_eq!(vehicle.position().y, 120.0);
        assert_eq!(vehicle.section(), 1);
        // The ray pointing directly right
        assert_approx_eq!(vehicle.readings().distances()[5], 10.0);
    }

    #[test]
    fn finishes_open_track() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.set_controls(0.0, 100.0);
        for _ in 0..20 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.status(), VehicleStatus::Finished);

        let position = vehicle.position();
        vehicle.tick(0.1, &track, &ReferenceEngine);
        assert_eq!(vehicle.position(), position);
    }

    #[test]
    fn stopped_on_border_keeps_section() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.set_controls(0.0, 100.0);
        for _ in 0..5 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.position(), Point2d::new(0.0, 100.0));
        assert_eq!(vehicle.section(), 1);

        vehicle.set_controls(0.0, 0.0);
        for _ in 0..10 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
            assert_eq!(vehicle.section(), 1);
            assert_eq!(vehicle.status(), VehicleStatus::Driving);
        }
    }

    #[test]
    fn stationary_on_start_border() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.place(0, Point2d::new(0.0, 0.0), 0.0);
        for _ in 0..5 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.section(), 0);
        assert_eq!(vehicle.status(), VehicleStatus::Driving);
    }

    #[test]
    fn stalls_on_first_section() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.set_controls(0.0, 1.0);
        for _ in 0..40 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.status(), VehicleStatus::Stalled);
        assert_eq!(vehicle.speed(), 0.0);

        // Leaving the first section in time never stalls
        let mut vehicle = self::vehicle(&track);
        vehicle.set_controls(0.0, 20.0);
        for _ in 0..40 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
        }
        assert_eq!(vehicle.section(), 1);
        assert_eq!(vehicle.status(), VehicleStatus::Driving);
    }

    #[test]
    fn reversing_leaves_track() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.place(0, Point2d::new(0.0, 0.5), 0.0);
        vehicle.set_controls(0.0, -10.0);
        vehicle.tick(0.1, &track, &ReferenceEngine);
        assert_eq!(vehicle.status(), VehicleStatus::OffTrack);
    }

    #[test]
    fn crash_keeps_previous_pose() {
        let track = straight(200.0);
        let mut vehicle = vehicle(&track);
        vehicle.place(0, Point2d::new(4.0, 50.0), 0.0);
        vehicle.set_controls(1.0, 50.0);
        let mut last = vehicle.position();
        for _ in 0..50 {
            vehicle.tick(0.1, &track, &ReferenceEngine);
            if vehicle.status().is_terminal() {
                break;
            }
            last = vehicle.position();
        }
        assert_eq!(vehicle.status(), VehicleStatus::Crashed(Side::Right));
        assert_eq!(vehicle.position(), last);
        assert_eq!(vehicle.speed(), 0.0);
    }
}
