//! Sound effect definitions.

use serde::{Deserialize, Serialize};

/// Identifiers for sound effects a moving entity can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    /// Walking on grass, first variant
    FootGrass1,
    /// Walking on grass, second variant
    FootGrass2,
    /// Walking on grass, third variant
    FootGrass3,
    /// Walking on grass, fourth variant
    FootGrass4,
    /// Walking on grass, fifth variant
    FootGrass5,
}

impl SoundId {
    /// Every footstep variant, in selection order.
    pub const FOOTSTEPS: [SoundId; 5] = [
        SoundId::FootGrass1,
        SoundId::FootGrass2,
        SoundId::FootGrass3,
        SoundId::FootGrass4,
        SoundId::FootGrass5,
    ];

    /// Pick a footstep variant from a raw random draw (`|draw| % 5`).
    pub fn footstep(draw: i32) -> SoundId {
        Self::FOOTSTEPS[(draw.unsigned_abs() % Self::FOOTSTEPS.len() as u32) as usize]
    }

    /// Get the relative file path for this sound effect.
    pub fn file_path(&self) -> &'static str {
        match self {
            SoundId::FootGrass1 => "sounds/step/grass1.ogg",
            SoundId::FootGrass2 => "sounds/step/grass2.ogg",
            SoundId::FootGrass3 => "sounds/step/grass3.ogg",
            SoundId::FootGrass4 => "sounds/step/grass4.ogg",
            SoundId::FootGrass5 => "sounds/step/grass5.ogg",
        }
    }

    /// Get the default volume for this sound (0.0 to 1.0).
    pub fn default_volume(&self) -> f32 {
        // Footsteps are subtle
        0.4
    }

    /// Whether this sound is a footstep.
    pub fn is_footstep(&self) -> bool {
        Self::FOOTSTEPS.contains(self)
    }
}
