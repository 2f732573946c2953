//! Tests that involve a track made of a single straight section.

use assert_approx_eq::assert_approx_eq;
use rand::{Rng, SeedableRng};
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;
use track_sim::{
    math::{Point2d, Segment2d},
    EngineKind, Footprint, SectionDelta, SensorRig, Side, Simulation, Track, TrackBuilder,
    TrackPosition, VehicleAttributes, VehicleStatus,
};

const ENGINES: [EngineKind; 2] = [EngineKind::Reference, EngineKind::Packed];

/// The section spanning (0,0) to (0,100) with a width of 20.
fn straight() -> Track {
    let line = Segment2d::new(Point2d::new(0.0, 0.0), Point2d::new(0.0, 100.0));
    TrackBuilder::from_centre_line(&line, 20.0)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn rays_hit_lateral_borders() {
    let track = straight();
    let rig = SensorRig::new(&[-FRAC_PI_2, 0.0, FRAC_PI_2], &[50.0, 50.0, 50.0]).unwrap();
    for kind in ENGINES {
        let engine = kind.build(&track);
        let position = Point2d::new(0.0, 50.0);
        let mut readings = rig.initial_readings(position, 0.0);
        engine.sense(&track, 0, position, 0.0, &rig, &mut readings);

        let distances = readings.distances();
        assert_approx_eq!(distances[0], 10.0);
        assert_eq!(distances[1], 50.0);
        assert_approx_eq!(distances[2], 10.0);
        assert_approx_eq!(readings.focus()[0].x, -10.0);
        assert_approx_eq!(readings.focus()[2].x, 10.0);
    }
}

#[test]
fn collision_reports_right_border() {
    let track = straight();
    let outline = Footprint::new(10.0, 20.0).outline(Point2d::new(9.0, 50.0), 0.0);
    for kind in ENGINES {
        let engine = kind.build(&track);
        assert_eq!(engine.collision(&track, 0, &outline), Some(Side::Right));
    }

    let outline = Footprint::new(10.0, 20.0).outline(Point2d::new(-9.0, 50.0), 0.0);
    for kind in ENGINES {
        let engine = kind.build(&track);
        assert_eq!(engine.collision(&track, 0, &outline), Some(Side::Left));
    }
}

#[test]
fn crossing_front_finishes() {
    let track = straight();
    for kind in ENGINES {
        let engine = kind.build(&track);
        assert_eq!(
            engine.section_delta(&track, 0, Point2d::new(0.0, 99.0)),
            SectionDelta::Unchanged
        );
        let delta = engine.section_delta(&track, 0, Point2d::new(0.0, 101.0));
        assert_eq!(delta, SectionDelta::Advanced);
        assert_eq!(track.wrap(delta.offset()), 1);
        assert_eq!(track.position(delta.offset()), TrackPosition::Finished);
    }
}

#[test]
fn vehicle_finishes_course() {
    for kind in ENGINES {
        let mut sim = Simulation::new(Arc::new(straight()), kind);
        let id = sim.add_vehicle(&VehicleAttributes {
            width: 10.0,
            length: 20.0,
            ..Default::default()
        });
        sim.set_vehicle_controls(id, 0.0, 20.0);
        while !sim.all_stopped() {
            sim.step(0.1);
            assert!(sim.frame() < 100);
        }
        assert_eq!(sim.get_vehicle(id).status(), VehicleStatus::Finished);
        assert!(sim.get_vehicle(id).position().y >= 100.0);
    }
}

#[test]
fn contained_vehicle_stays_in_section() {
    let track = straight();
    let footprint = Footprint::new(4.0, 10.0);
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    for kind in ENGINES {
        let engine = kind.build(&track);
        for _ in 0..500 {
            let position = Point2d::new(rng.gen_range(-3.0..3.0), rng.gen_range(15.0..85.0));
            let heading = rng.gen_range(-0.3..0.3);
            let outline = footprint.outline(position, heading);
            assert_eq!(engine.collision(&track, 0, &outline), None);
            assert_eq!(
                engine.section_delta(&track, 0, position),
                SectionDelta::Unchanged
            );
        }
    }
}

#[test]
fn distances_are_bounded() {
    let track = straight();
    let rig = SensorRig::standard(10.0, 30.0);
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    for kind in ENGINES {
        let engine = kind.build(&track);
        for _ in 0..500 {
            let position = Point2d::new(rng.gen_range(-9.0..9.0), rng.gen_range(1.0..99.0));
            let heading = rng.gen_range(0.0..std::f64::consts::TAU);
            let mut readings = rig.initial_readings(position, heading);
            engine.sense(&track, 0, position, heading, &rig, &mut readings);
            for (distance, ray) in readings.distances().iter().zip(rig.rays()) {
                assert!(*distance >= 0.0 && *distance <= ray.max_distance);
            }
        }
    }
}
