//! Movement constants supplied by the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only movement constants. All speeds and accelerations are per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementParams {
    /// Walking speed (velocity clamp and movement impulse magnitude).
    pub walking_speed: f64,
    /// Multiplier applied to the walking speed while running.
    pub running_factor: f64,
    /// Upward gravity value set when a requested jump fires.
    pub jump_intensity: f64,
    /// Fraction of velocity removed each tick, in [0, 1].
    pub friction: f64,
    /// Gravity added each tick out of water.
    pub gravity: f64,
    /// Terminal falling speed out of water.
    pub max_gravity: f64,
    /// Gravity added each tick while swimming.
    pub gravity_swimming: f64,
    /// Terminal sinking speed while swimming.
    pub max_gravity_swimming: f64,
    /// Ticks between footsteps at walking speed (shorter when running).
    pub footstep_interval_ticks: u32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            walking_speed: 0.025,
            running_factor: 1.5,
            jump_intensity: 0.16,
            friction: 0.15,
            gravity: 0.006,
            max_gravity: 1.0,
            gravity_swimming: 0.0001,
            max_gravity_swimming: 0.01,
            footstep_interval_ticks: 24,
        }
    }
}

/// Rejected movement constants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMovementParams {
    /// NaN or infinite value.
    #[error("{field} must be finite")]
    NotFinite {
        /// Offending field.
        field: &'static str,
    },
    /// Negative value where only magnitudes make sense.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// Zero or negative value for a divisor.
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// Friction outside [0, 1] would amplify or flip velocity.
    #[error("friction must be within [0, 1] (got {value})")]
    FrictionOutOfRange {
        /// Value supplied.
        value: f64,
    },
}

impl MovementParams {
    /// Check every constant; returns the first problem found.
    pub fn validate(&self) -> Result<(), InvalidMovementParams> {
        let fields = [
            ("walking_speed", self.walking_speed),
            ("running_factor", self.running_factor),
            ("jump_intensity", self.jump_intensity),
            ("friction", self.friction),
            ("gravity", self.gravity),
            ("max_gravity", self.max_gravity),
            ("gravity_swimming", self.gravity_swimming),
            ("max_gravity_swimming", self.max_gravity_swimming),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(InvalidMovementParams::NotFinite { field });
            }
            if value < 0.0 {
                return Err(InvalidMovementParams::Negative { field, value });
            }
        }

        for (field, value) in [
            ("walking_speed", self.walking_speed),
            ("running_factor", self.running_factor),
        ] {
            if value <= 0.0 {
                return Err(InvalidMovementParams::NonPositive { field, value });
            }
        }

        if self.friction > 1.0 {
            return Err(InvalidMovementParams::FrictionOutOfRange {
                value: self.friction,
            });
        }

        Ok(())
    }

    /// Consume and return `self` if valid.
    pub fn validated(self) -> Result<Self, InvalidMovementParams> {
        self.validate()?;
        Ok(self)
    }

    /// Walking speed, or running speed when `running`.
    pub fn active_walking_speed(&self, running: bool) -> f64 {
        if running {
            self.walking_speed * self.running_factor
        } else {
            self.walking_speed
        }
    }

    /// Per-tick gravity step and terminal magnitude for the current medium.
    pub fn gravity_for(&self, swimming: bool) -> (f64, f64) {
        if swimming {
            (self.gravity_swimming, self.max_gravity_swimming)
        } else {
            (self.gravity, self.max_gravity)
        }
    }
}
