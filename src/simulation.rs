#[cfg(feature = "debug")]
use crate::debug::{debug_line, take_debug_frame};
use crate::engine::{EngineKind, GeometryEngine};
use crate::sensor::SensorRig;
use crate::track::Track;
use crate::vehicle::{Vehicle, VehicleAttributes};
use crate::{VehicleId, VehicleSet};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, NormalError};
use rayon::prelude::*;
use std::sync::Arc;

/// A simulation of vehicles driving around a track.
pub struct Simulation {
    /// The track being driven.
    track: Arc<Track>,
    /// Answers the geometry queries for every vehicle.
    engine: Box<dyn GeometryEngine>,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The current frame of simulation.
    frame: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a new simulation on the given track.
    pub fn new(track: Arc<Track>, engine: EngineKind) -> Self {
        log::info!("simulating with the {} geometry engine", engine);
        Self {
            engine: engine.build(&track),
            track,
            vehicles: Default::default(),
            frame: 0,
            #[cfg(feature = "debug")]
            debug: Default::default(),
        }
    }

    /// The track being driven.
    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }

    /// Which geometry engine the simulation uses.
    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Adds a vehicle with the standard sensor rig at the start of the track.
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> VehicleId {
        let rig = SensorRig::standard(attributes.width, attributes.length);
        self.add_vehicle_with_sensors(attributes, rig)
    }

    /// Adds a vehicle with the given sensor rig at the start of the track.
    pub fn add_vehicle_with_sensors(
        &mut self,
        attributes: &VehicleAttributes,
        rig: SensorRig,
    ) -> VehicleId {
        let (track, engine) = (&self.track, &self.engine);
        self.vehicles.insert_with_key(|id| {
            let mut vehicle = Vehicle::new(id, attributes, rig, track);
            vehicle.sense(track, engine.as_ref());
            vehicle
        })
    }

    /// Removes a vehicle from the simulation.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(id)
    }

    /// Sets the steering input, in `[-1, 1]`, and speed of a vehicle.
    /// Both are clamped to the vehicle's limits.
    pub fn set_vehicle_controls(&mut self, vehicle_id: VehicleId, steering: f64, speed: f64) {
        self.vehicles[vehicle_id].set_controls(steering, speed);
    }

    /// Puts a vehicle back at the start of the track, stationary and driving.
    pub fn reset_vehicle(&mut self, vehicle_id: VehicleId) {
        let (position, heading) = self.track.start_pose();
        let vehicle = &mut self.vehicles[vehicle_id];
        vehicle.place(0, position, heading);
        vehicle.sense(&self.track, self.engine.as_ref());
    }

    /// Offsets each vehicle's heading from the track's start heading by an angle
    /// sampled from a normal distribution with a mean of zero and standard deviation of `stddev`.
    ///
    /// The same seed and vehicles always produce the same headings.
    pub fn randomise_headings(&mut self, seed: u64, stddev: f64) -> Result<(), NormalError> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let distr = Normal::new(0.0, stddev)?;
        let (_, heading) = self.track.start_pose();
        for vehicle in self.vehicles.values_mut() {
            vehicle.set_heading(heading + distr.sample(&mut rng));
            vehicle.sense(&self.track, self.engine.as_ref());
        }
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Vehicles are evaluated in parallel; each only reads the track and writes its own state.
    pub fn step(&mut self, dt: f64) {
        let track = self.track.as_ref();
        let engine = self.engine.as_ref();
        self.vehicles
            .values_mut()
            .collect::<Vec<_>>()
            .into_par_iter()
            .for_each(|vehicle| vehicle.tick(dt, track, engine));
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            for vehicle in self.vehicles.values() {
                for focus in vehicle.readings().focus() {
                    debug_line("ray", vehicle.position(), *focus);
                }
            }
            self.debug = take_debug_frame();
        }
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Whether every vehicle has crashed, finished or left the track.
    pub fn all_stopped(&self) -> bool {
        self.vehicles.values().all(|v| v.status().is_terminal())
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }
}
