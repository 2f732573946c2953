use crate::math::{translate, Point2d};
use std::f64::consts::TAU;

/// Moves a vehicle along the arc it is steering around for one time step,
/// using a kinematic bicycle approximation.
///
/// # Parameters
/// * `pos` - The vehicle's reference point
/// * `heading` - The vehicle's heading, clockwise from +y
/// * `speed` - The vehicle's speed; negative when reversing
/// * `steer` - The angle of the front wheels, positive to the right
/// * `wheel_base` - Distance between the axles
/// * `dt` - The time step
pub fn advance(
    pos: Point2d,
    heading: f64,
    speed: f64,
    steer: f64,
    wheel_base: f64,
    dt: f64,
) -> (Point2d, f64) {
    let dist = speed * dt;
    if dist == 0.0 {
        return (pos, heading);
    }
    if steer == 0.0 || wheel_base <= 0.0 {
        return (translate(pos, heading, dist), heading);
    }

    // Signed turning radius; negative when turning left
    let radius = wheel_base / steer.tan();
    let turn = dist / radius;

    // The chord of the arc bisects the change in heading
    let chord = 2.0 * radius * (0.5 * turn).sin();
    let pos = translate(pos, heading + 0.5 * turn, chord);
    (pos, (heading + turn).rem_euclid(TAU))
}
