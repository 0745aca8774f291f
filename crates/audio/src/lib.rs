//! Sound catalogue and positional playback capability for moving entities.
//!
//! The kinematics core never talks to an audio device. It asks a
//! [`SoundPlayer`] to play a [`SoundId`] at a position relative to the
//! listener, and the host decides what that means.
//!
//! # Architecture
//!
//! - [`SoundId`] - Identifier for sound effects
//! - [`SoundPlayer`] - Capability the kinematics core plays sounds through
//! - [`SilentPlayer`] - Discards everything (headless runs, silent entities)
//! - [`SoundLog`] - Records every request (tests, traces)
//!
//! # Example
//!
//! ```ignore
//! let mut log = SoundLog::default();
//! log.play_positional(SoundId::footstep(7), DVec3::new(1.0, 0.0, 0.0));
//! assert_eq!(log.len(), 1);
//! ```

mod player;
mod sounds;

pub use player::{PlayedSound, SilentPlayer, SoundLog, SoundPlayer};
pub use sounds::SoundId;
