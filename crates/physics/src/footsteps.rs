//! Tick-gated footstep sounds.

use blockmotion_audio::SoundId;
use blockmotion_core::SimTick;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Horizontal speed an axis must exceed for the entity to count as walking.
pub const FOOTSTEP_SPEED_THRESHOLD: f64 = 0.01;

/// Decides when a walking entity emits its next footstep.
///
/// A footstep plays as soon as the entity walks on the ground with no step
/// pending. The pending step clears once more than `interval / speed_ratio`
/// ticks have passed since the clock was last reset, so running shortens the
/// gap between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootstepClock {
    current: Option<SoundId>,
    last_reset: SimTick,
}

impl FootstepClock {
    /// Sound still considered playing, if any.
    pub fn current(&self) -> Option<SoundId> {
        self.current
    }

    /// Tick at which the clock last cleared its pending step.
    pub fn last_reset(&self) -> SimTick {
        self.last_reset
    }

    /// Advance the clock for one tick. Returns `true` when a new step is due;
    /// the caller picks the variant and hands it to [`FootstepClock::start`].
    pub fn advance(
        &mut self,
        now: SimTick,
        velocity: DVec3,
        touching_ground: bool,
        speed_ratio: f64,
        interval_ticks: u32,
    ) -> bool {
        let walking = velocity.x.abs() > FOOTSTEP_SPEED_THRESHOLD
            || velocity.z.abs() > FOOTSTEP_SPEED_THRESHOLD;
        if !walking || !touching_ground {
            return false;
        }

        match self.current {
            None => true,
            Some(_) => {
                let elapsed = now.since(self.last_reset) as f64;
                if elapsed > interval_ticks as f64 / speed_ratio {
                    self.last_reset = now;
                    self.current = None;
                }
                false
            }
        }
    }

    /// Mark `sound` as the step now playing.
    pub fn start(&mut self, sound: SoundId) {
        self.current = Some(sound);
    }
}
