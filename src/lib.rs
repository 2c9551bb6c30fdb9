//! Top-down shooter - real-time simulation core
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, enemy AI, world population, stages)
//! - `renderer`: Render adapter contract (camera transform, sprite instances)
//! - `audio`: Audio trigger contract
//! - `settings`: Runtime configuration

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, NullAudio, SoundEffect};
pub use settings::{Settings, SettingsError};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
///
/// Distances are world units, speeds are world units per tick, times are
/// milliseconds of the injected clock.
pub mod consts {
    /// Default viewport used for spawn ring and bullet culling distances
    pub const DEFAULT_SCREEN_WIDTH: f32 = 1920.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 1000.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 45.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Degrees per tick
    pub const PLAYER_ROTATION_SPEED: f32 = 3.0;
    pub const PLAYER_START_HEALTH: i32 = 200;
    pub const PLAYER_START_XP_THRESHOLD: i32 = 100;
    pub const PLAYER_START_FIRING_RATE: f32 = 2.5;
    pub const PLAYER_BULLET_DAMAGE: i32 = 50;
    pub const BOOST_MULTIPLIER: f32 = 2.0;
    /// XP threshold growth per level
    pub const LEVEL_XP_GROWTH: f32 = 1.5;
    /// Lateral offset between the two barrels of the DOUBLE pattern
    pub const DOUBLE_SHOT_OFFSET: f32 = 8.0;
    /// Spread of the angled bullets in TRIPLE/SIDEWAYS patterns (degrees)
    pub const PLAYER_SPREAD_DEGREES: f32 = 10.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 9.0;
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    pub const BASE_SHOT_COOLDOWN_MS: f32 = 1000.0;

    /// Enemy steering
    pub const ENEMY_SPEED: f32 = 3.0;
    pub const ENEMY_MAX_FORCE: f32 = 0.3;
    pub const ENEMY_STATE_CHANGE_MS: u64 = 3000;
    pub const ENEMY_WANDER_REROLL_MS: u64 = 5000;
    pub const ENEMY_STRAFE_FLIP_MS: u64 = 2000;
    pub const RETREAT_DISTANCE: f32 = 200.0;
    pub const ENGAGE_DISTANCE: f32 = 600.0;
    pub const CIRCLING_DISTANCE: f32 = 400.0;
    pub const CIRCLING_GAIN: f32 = 0.02;
    pub const RETREAT_SPEED_FACTOR: f32 = 1.5;
    pub const FACING_LERP: f32 = 0.2;
    pub const ENEMY_BULLET_DAMAGE: i32 = 10;
    /// Side bullets of the boss volley travel slower
    pub const BOSS_SIDE_SPEED_FACTOR: f32 = 0.6;
    pub const BOSS_SPREAD_DEGREES: f32 = 15.0;
    pub const QUICK_PAIR_OFFSET: f32 = 10.0;
    /// Below this length an aim vector falls back to the facing angle
    pub const AIM_EPSILON: f32 = 0.01;

    /// Obstacles
    pub const OBSTACLE_ROTATION_SPEED: f32 = 0.5;
    pub const OBSTACLE_HOVER_AMPLITUDE: f32 = 20.0;
    pub const OBSTACLE_HOVER_SPEED: f32 = 0.5;
    pub const HOSTILE_OBSTACLE_SHOOT_COOLDOWN_MS: u64 = 4000;
    pub const HOSTILE_OBSTACLE_RANGE: f32 = 700.0;
    pub const OBSTACLE_BULLET_DAMAGE: i32 = 20;
    pub const NEUTRAL_OBSTACLE_HEALTH: i32 = 99_999;
    pub const HOSTILE_OBSTACLE_HEALTH: i32 = 150;
    pub const OBSTACLE_MIN_SIZE: f32 = 50.0;
    pub const OBSTACLE_SIZE_SPREAD: f32 = 100.0;
    pub const HOSTILE_OBSTACLE_CHANCE: f32 = 0.2;
    pub const HOSTILE_CONTACT_DAMAGE: i32 = 10;
    pub const HOSTILE_CONTACT_COOLDOWN_MS: u64 = 500;

    /// World population
    pub const MAX_OBSTACLES: usize = 30;
    pub const SPAWN_RADIUS: f32 = 1920.0;
    pub const DESPAWN_RADIUS: f32 = 2120.0;
    pub const NUM_GRID_CELLS: usize = 20;
    pub const MIN_SEPARATION_DISTANCE: f32 = 150.0;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 100;
    pub const ENEMY_SPAWN_DISTANCE_FACTOR: f32 = 0.8;
    /// Stage spawn weights are expressed out of this total
    pub const SPAWN_WEIGHT_TOTAL: u32 = 1000;

    /// Orbs
    pub const ORB_START_ALPHA: f32 = 255.0;
    pub const ORB_FADE_RATE: f32 = 0.5;
    pub const ORB_MAGNET_RADIUS: f32 = 200.0;
    pub const ORB_MAGNET_SPEED: f32 = 4.0;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit vector for a heading in degrees (0 = +x, clockwise on a y-down screen)
#[inline]
pub fn vec_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Heading in degrees of a vector
#[inline]
pub fn degrees_of(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Facing vector for sprite angles where 0 means "up"
#[inline]
pub fn facing_vector(angle: f32) -> Vec2 {
    vec_from_degrees(angle - 90.0)
}

/// Uniform float in [min, max)
#[inline]
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), -180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }

    #[test]
    fn test_facing_vector_zero_is_up() {
        let v = facing_vector(0.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_random_float_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_float(&mut rng, -3.0, 5.0);
            assert!((-3.0..5.0).contains(&v));
        }
    }
}
