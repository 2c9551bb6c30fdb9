//! Audio trigger contract
//!
//! The simulation never plays sound itself. It hands fire-and-forget triggers
//! to an `AudioSink` supplied by the platform layer.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired a volley
    PlayerShoot,
    /// Enemy or hostile obstacle fired
    EnemyShoot,
    /// Enemy destroyed
    EnemyDeath,
    /// Player took damage but survived
    PlayerHit,
    /// Player health reached zero
    PlayerDeath,
    /// Player gained a level
    LevelUp,
    /// Stage kill goal reached
    StageClear,
}

/// Receives sound triggers. No return value, no ordering guarantee.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every trigger (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Records triggers in order
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}
