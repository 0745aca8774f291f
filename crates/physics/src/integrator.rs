//! Velocity phases of the per-tick update, kept free of world access.

use crate::MovementParams;
use glam::DVec3;

/// Decay each non-zero velocity component by `friction` of itself.
pub fn apply_friction(velocity: DVec3, friction: f64) -> DVec3 {
    let decay = |v: f64| if v != 0.0 { v - v * friction } else { v };
    DVec3::new(decay(velocity.x), decay(velocity.y), decay(velocity.z))
}

/// Rescale `velocity` so no axis exceeds `active_speed`.
///
/// A single divisor is applied to all three axes, so direction is preserved.
pub fn clamp_to_speed(velocity: DVec3, active_speed: f64) -> DVec3 {
    let fastest = velocity.abs().max_element();
    if fastest > active_speed {
        velocity / (fastest / active_speed)
    } else {
        velocity
    }
}

/// Advance the signed gravity accumulator by one tick.
///
/// God mode pins it to zero. Otherwise it falls by the medium's step until it
/// reaches the medium's terminal magnitude.
pub fn accumulate_gravity(
    gravity: f64,
    god_mode: bool,
    swimming: bool,
    params: &MovementParams,
) -> f64 {
    if god_mode {
        return 0.0;
    }
    let (step, terminal) = params.gravity_for(swimming);
    let mut next = gravity;
    if next > -terminal {
        next -= step;
    }
    if next < -terminal {
        next = -terminal;
    }
    next
}
