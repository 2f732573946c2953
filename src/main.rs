use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Instant;

use track_sim::math::{Point2d, Segment2d};
use track_sim::{BuildError, EngineKind, Simulation, Track, TrackBuilder, VehicleAttributes};

const NUM_VEHICLES: usize = 200;
const NUM_FRAMES: u32 = 1000;
const DT: f64 = 0.05;

/// An oval circuit, driven clockwise.
fn circuit() -> Result<Track, BuildError> {
    let (rx, ry, points): (f64, f64, usize) = (600.0, 300.0, 48);
    let waypoint = |i: usize| {
        let angle = TAU * i as f64 / points as f64;
        Point2d::new(-rx * angle.cos(), ry * angle.sin())
    };
    let line = Segment2d::new(waypoint(0), waypoint(1));
    let mut builder = TrackBuilder::from_centre_line(&line, 60.0)?;
    builder.append_waypoints((2..points).map(waypoint))?;
    builder.close()
}

/// Steers away from the nearer wall and slows down when the road ahead is short.
fn controls(distances: &[f64]) -> (f64, f64) {
    let (ahead, right, left) = (distances[0], distances[5], distances[6]);
    let steering = 2.0 * (right - left) / (right + left);
    let speed = (ahead * 0.8).clamp(10.0, 120.0);
    (steering, speed)
}

fn main() {
    let engine = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<EngineKind>())
        .transpose()
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(2)
        })
        .unwrap_or_default();

    let track = match circuit() {
        Ok(track) => Arc::new(track),
        Err(err) => {
            eprintln!("Could not build the circuit: {}", err);
            std::process::exit(1)
        }
    };

    let mut sim = Simulation::new(track, engine);
    let ids = (0..NUM_VEHICLES)
        .map(|_| sim.add_vehicle(&VehicleAttributes::default()))
        .collect::<Vec<_>>();
    if let Err(err) = sim.randomise_headings(42, 0.05) {
        eprintln!("{}", err);
    }

    println!("Simulating {} vehicles with the {} engine...", ids.len(), engine);
    loop {
        let start = Instant::now();
        for _ in 0..NUM_FRAMES {
            for id in &ids {
                let (steering, speed) = controls(sim.get_vehicle(*id).readings().distances());
                sim.set_vehicle_controls(*id, steering, speed);
            }
            sim.step(DT);
        }
        let frame = start.elapsed() / NUM_FRAMES;
        let driving = sim
            .iter_vehicles()
            .filter(|v| !v.status().is_terminal())
            .count();
        println!(
            "Avg. frame: {:?} --> {:.1}x realtime ({} of {} vehicles driving)",
            frame,
            DT / frame.as_secs_f64(),
            driving,
            ids.len(),
        );
        if sim.all_stopped() {
            break;
        }
    }
}
