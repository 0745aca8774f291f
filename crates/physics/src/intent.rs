//! Walk, strafe and jump commands turned into a per-tick movement vector.

use crate::KinematicState;
use glam::DVec3;

/// Accumulates movement commands for one tick.
///
/// Forward and backward walking follow the yaw; while swimming or in god mode
/// they also follow the pitch, so looking up or down moves the entity
/// vertically. Strafing follows the yaw only.
pub struct MovementIntent<'a> {
    state: &'a mut KinematicState,
    speed: f64,
}

impl<'a> MovementIntent<'a> {
    /// Wrap `state` for a tick running at `active_walking_speed`.
    pub fn new(state: &'a mut KinematicState, active_walking_speed: f64) -> Self {
        Self {
            state,
            speed: active_walking_speed,
        }
    }

    /// Read-only view of the entity being steered.
    pub fn state(&self) -> &KinematicState {
        self.state
    }

    /// Speed the commands are scaled by this tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Step along the viewing direction.
    pub fn walk_forward(&mut self) {
        let step = self.walk_vector();
        self.state.movement_direction += step;
    }

    /// Step against the viewing direction.
    pub fn walk_backwards(&mut self) {
        let step = self.walk_vector();
        self.state.movement_direction -= step;
    }

    /// Step to the left of the viewing direction.
    pub fn strafe_left(&mut self) {
        let step = self.planar_vector(self.state.yaw - 90.0);
        self.state.movement_direction += step;
    }

    /// Step to the right of the viewing direction.
    pub fn strafe_right(&mut self) {
        let step = self.planar_vector(self.state.yaw + 90.0);
        self.state.movement_direction += step;
    }

    /// Rise; only has an effect while swimming or in god mode.
    pub fn move_up(&mut self) {
        if self.state.is_swimming || self.state.god_mode {
            self.state.movement_direction.y += self.speed;
        }
    }

    /// Request a jump; only accepted on the ground, out of water and out of god mode.
    pub fn jump(&mut self) {
        if self.state.touching_ground && !self.state.is_swimming && !self.state.god_mode {
            self.state.jump_requested = true;
        }
    }

    /// Turn by `delta` degrees.
    pub fn rotate_yaw(&mut self, delta: f64) {
        self.state.rotate_yaw(delta);
    }

    /// Tilt by `delta` degrees.
    pub fn rotate_pitch(&mut self, delta: f64) {
        self.state.rotate_pitch(delta);
    }

    /// Face an absolute heading in degrees.
    pub fn set_yaw(&mut self, yaw: f64) {
        self.state.set_yaw(yaw);
    }

    /// Face `target`.
    pub fn look_at(&mut self, target: DVec3) {
        self.state.look_at(target);
    }

    fn walk_vector(&self) -> DVec3 {
        if self.state.is_swimming || self.state.god_mode {
            let (yaw, pitch) = (self.state.yaw.to_radians(), self.state.pitch.to_radians());
            DVec3::new(
                self.speed * yaw.sin() * pitch.cos(),
                -self.speed * pitch.sin(),
                -self.speed * yaw.cos() * pitch.cos(),
            )
        } else {
            self.planar_vector(self.state.yaw)
        }
    }

    fn planar_vector(&self, yaw_degrees: f64) -> DVec3 {
        let yaw = yaw_degrees.to_radians();
        DVec3::new(self.speed * yaw.sin(), 0.0, -self.speed * yaw.cos())
    }
}
