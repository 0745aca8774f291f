//! Positional playback capability.

use crate::SoundId;
use glam::DVec3;
use tracing::debug;

/// Something that can play a sound at a position relative to the listener.
pub trait SoundPlayer {
    /// Play `sound` at `relative_position` (source minus listener, world units).
    fn play_positional(&mut self, sound: SoundId, relative_position: DVec3);
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Box<P> {
    fn play_positional(&mut self, sound: SoundId, relative_position: DVec3) {
        (**self).play_positional(sound, relative_position);
    }
}

/// Player that drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play_positional(&mut self, _sound: SoundId, _relative_position: DVec3) {}
}

/// A single recorded playback request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedSound {
    /// Which sound was requested.
    pub sound: SoundId,
    /// Position relative to the listener.
    pub relative_position: DVec3,
}

/// Player that records every request in order.
#[derive(Debug, Clone, Default)]
pub struct SoundLog {
    played: Vec<PlayedSound>,
}

impl SoundLog {
    /// All recorded requests, oldest first.
    pub fn played(&self) -> &[PlayedSound] {
        &self.played
    }

    /// Number of recorded requests.
    pub fn len(&self) -> usize {
        self.played.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }

    /// Take the recorded requests, leaving the log empty.
    pub fn drain(&mut self) -> Vec<PlayedSound> {
        std::mem::take(&mut self.played)
    }
}

impl SoundPlayer for SoundLog {
    fn play_positional(&mut self, sound: SoundId, relative_position: DVec3) {
        debug!(?sound, ?relative_position, "Sound requested");
        self.played.push(PlayedSound {
            sound,
            relative_position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_log_records_in_order() {
        let mut log = SoundLog::default();
        assert!(log.is_empty());
        log.play_positional(SoundId::FootGrass2, DVec3::X);
        log.play_positional(SoundId::FootGrass5, DVec3::Z);
        assert_eq!(log.len(), 2);
        assert_eq!(log.played()[0].sound, SoundId::FootGrass2);
        assert_eq!(log.played()[1].relative_position, DVec3::Z);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn boxed_players_forward() {
        let mut boxed: Box<dyn SoundPlayer> = Box::new(SilentPlayer);
        boxed.play_positional(SoundId::FootGrass1, DVec3::ZERO);
    }
}
