//! Kinematic state owned by a moving entity.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Pitch is clamped to `[-MAX_PITCH, MAX_PITCH]` degrees.
pub const MAX_PITCH: f64 = 89.0;

/// Eyes sit this far below the top of the entity's box.
pub const EYE_MARGIN: f64 = 0.2;

/// Extra height added to the eye point when testing for head submersion.
pub const SUBMERSION_BIAS: f64 = 0.25;

/// Position, motion, orientation and contact flags of one entity.
///
/// Yaw is kept in `[0, 360)` and pitch in `[-89, 89]` degrees by every mutator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub(crate) position: DVec3,
    pub(crate) velocity: DVec3,
    pub(crate) movement_direction: DVec3,
    pub(crate) gravity: f64,
    pub(crate) yaw: f64,
    pub(crate) pitch: f64,
    pub(crate) touching_ground: bool,
    pub(crate) is_swimming: bool,
    pub(crate) head_under_water: bool,
    pub(crate) god_mode: bool,
    pub(crate) jump_requested: bool,
    pub(crate) running: bool,
    pub(crate) step_counter: f64,
}

impl KinematicState {
    /// New state at `position` with the given orientation and zeroed kinematics.
    pub fn new(position: DVec3, yaw: f64, pitch: f64) -> Self {
        let mut state = Self {
            position,
            velocity: DVec3::ZERO,
            movement_direction: DVec3::ZERO,
            gravity: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            touching_ground: false,
            is_swimming: false,
            head_under_water: false,
            god_mode: false,
            jump_requested: false,
            running: false,
            step_counter: 0.0,
        };
        state.set_yaw(yaw);
        state.set_pitch(pitch);
        state
    }

    /// Zero velocity, pending movement and the gravity accumulator.
    pub fn reset(&mut self) {
        self.velocity = DVec3::ZERO;
        self.movement_direction = DVec3::ZERO;
        self.gravity = 0.0;
    }

    /// Entity origin (centre of its collision box).
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Velocity after the last tick.
    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Movement impulse accumulated for the coming tick.
    pub fn movement_direction(&self) -> DVec3 {
        self.movement_direction
    }

    /// Signed vertical accumulator; negative means falling.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Yaw in degrees, `[0, 360)`.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Pitch in degrees, `[-89, 89]`.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Resting on a solid surface this tick.
    pub fn touching_ground(&self) -> bool {
        self.touching_ground
    }

    /// Body overlaps a liquid block.
    pub fn is_swimming(&self) -> bool {
        self.is_swimming
    }

    /// Eye point is inside a liquid block.
    pub fn is_head_under_water(&self) -> bool {
        self.head_under_water
    }

    /// Free-fly mode: no gravity, no collision.
    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    /// A jump will fire on the next ground contact.
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Running speed was selected for the last tick.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Horizontal distance walked so far.
    pub fn step_counter(&self) -> f64 {
        self.step_counter
    }

    /// Move the entity without any collision handling.
    pub fn teleport(&mut self, position: DVec3) {
        self.position = position;
    }

    /// Toggle free-fly mode.
    pub fn set_god_mode(&mut self, enabled: bool) {
        self.god_mode = enabled;
        if enabled {
            self.gravity = 0.0;
            self.jump_requested = false;
        }
    }

    /// Turn by `delta` degrees, wrapping into `[0, 360)`.
    pub fn rotate_yaw(&mut self, delta: f64) {
        if delta.is_finite() {
            self.set_yaw(self.yaw + delta);
        }
    }

    /// Tilt the view by `delta` degrees (positive looks up), clamped to `[-89, 89]`.
    pub fn rotate_pitch(&mut self, delta: f64) {
        if delta.is_finite() {
            self.set_pitch(self.pitch - delta);
        }
    }

    /// Set yaw in degrees, wrapping into `[0, 360)`.
    pub fn set_yaw(&mut self, yaw: f64) {
        if !yaw.is_finite() {
            return;
        }
        let mut wrapped = yaw % 360.0;
        if wrapped < 0.0 {
            wrapped += 360.0;
        }
        // -1e-20 % 360 + 360 rounds to exactly 360.
        if wrapped >= 360.0 {
            wrapped = 0.0;
        }
        self.yaw = wrapped;
    }

    /// Set pitch in degrees, clamped to `[-89, 89]`.
    pub fn set_pitch(&mut self, pitch: f64) {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }
    }

    /// Unit vector the entity is looking along.
    pub fn viewing_direction(&self) -> DVec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        DVec3::new(
            yaw.sin() * pitch.cos(),
            -pitch.sin(),
            -pitch.cos() * yaw.cos(),
        )
        .normalize()
    }

    /// Derive pitch and yaw from a direction vector. Zero vectors are ignored.
    pub fn set_pitch_yaw_from_vector(&mut self, direction: DVec3) {
        let direction = direction.normalize_or_zero();
        if direction == DVec3::ZERO {
            return;
        }
        self.set_pitch((-direction.y.asin()).to_degrees());
        self.set_yaw(direction.x.atan2(-direction.z).to_degrees());
    }

    /// Face `target`.
    pub fn look_at(&mut self, target: DVec3) {
        self.set_pitch_yaw_from_vector(target - self.position);
    }

    /// Squared distance from the entity origin to `target`.
    pub fn distance_squared_to(&self, target: DVec3) -> f64 {
        self.position.distance_squared(target)
    }
}
