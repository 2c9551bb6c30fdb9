//! Runtime settings
//!
//! Loaded from an optional JSON file by the native runner. Stage definitions
//! are compiled in and not part of this file.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the run
    pub seed: u64,
    /// Viewport width (spawn ring radius and bullet culling)
    pub screen_width: f32,
    /// Viewport height
    pub screen_height: f32,
    /// Probability that a killed enemy drops an orb (1.0 = always)
    pub orb_drop_chance: f32,
    /// Minimum time between two contact hits from hostile obstacles
    pub hostile_contact_cooldown_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            orb_drop_chance: 1.0,
            hostile_contact_cooldown_ms: HOSTILE_CONTACT_COOLDOWN_MS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if !(0.0..=1.0).contains(&self.orb_drop_chance) {
            return Err(SettingsError::Invalid(format!(
                "orb_drop_chance must be within [0, 1], got {}",
                self.orb_drop_chance
            )));
        }
        Ok(())
    }

    /// Radius of the ring on which enemies appear around the player
    pub fn enemy_spawn_distance(&self) -> f32 {
        self.screen_width.max(self.screen_height) * ENEMY_SPAWN_DISTANCE_FACTOR
    }
}
