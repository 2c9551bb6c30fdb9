//! The player ship: movement, firing patterns, experience and level-ups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletType};
use super::collision::Rect;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::{facing_vector, normalize_degrees};

/// Snapshot of the logical actions held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Speed modifier
    pub boost: bool,
    pub fire: bool,
}

/// Volley shape fired per shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShootingPattern {
    #[default]
    Single,
    Double,
    Triple,
    Sideways,
}

/// Weapon assignment granted on reaching a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loadout {
    pub pattern: ShootingPattern,
    pub bullet: BulletType,
    /// Multiplies the current firing rate factor
    pub rate_multiplier: f32,
}

/// Loadouts for levels 2..=7; every level beyond 7 reuses the last entry
const LOADOUTS: [Loadout; 6] = [
    Loadout {
        pattern: ShootingPattern::Double,
        bullet: BulletType::Normal,
        rate_multiplier: 1.2,
    },
    Loadout {
        pattern: ShootingPattern::Triple,
        bullet: BulletType::Normal,
        rate_multiplier: 1.0,
    },
    Loadout {
        pattern: ShootingPattern::Triple,
        bullet: BulletType::Powered,
        rate_multiplier: 1.2,
    },
    Loadout {
        pattern: ShootingPattern::Sideways,
        bullet: BulletType::Powered,
        rate_multiplier: 1.0,
    },
    Loadout {
        pattern: ShootingPattern::Sideways,
        bullet: BulletType::SuperPowered,
        rate_multiplier: 1.2,
    },
    Loadout {
        pattern: ShootingPattern::Sideways,
        bullet: BulletType::ExtremePowered,
        rate_multiplier: 1.0,
    },
];

/// Loadout granted when reaching `level` (none for level 1)
pub fn loadout_for_level(level: u32) -> Option<&'static Loadout> {
    if level < 2 {
        return None;
    }
    let idx = ((level - 2) as usize).min(LOADOUTS.len() - 1);
    Some(&LOADOUTS[idx])
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// World-space centre
    pub pos: Vec2,
    /// Degrees, 0 = up
    pub angle: f32,
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub experience: i32,
    pub experience_to_next_level: i32,
    pub bullet_type: BulletType,
    pub shooting_pattern: ShootingPattern,
    pub firing_rate_factor: f32,
    pub last_shot_ms: Option<u64>,
    pub speed_multiplier: f32,
    /// Last time a hostile obstacle dealt contact damage
    #[serde(default)]
    pub last_contact_damage_ms: Option<u64>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            angle: 0.0,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            health: PLAYER_START_HEALTH,
            max_health: PLAYER_START_HEALTH,
            level: 1,
            experience: 0,
            experience_to_next_level: PLAYER_START_XP_THRESHOLD,
            bullet_type: BulletType::Normal,
            shooting_pattern: ShootingPattern::Single,
            firing_rate_factor: PLAYER_START_FIRING_RATE,
            last_shot_ms: None,
            speed_multiplier: 1.0,
            last_contact_damage_ms: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply one tick of held keys. Returns the number of bullets fired.
    pub fn handle_input(
        &mut self,
        keys: &KeyState,
        now_ms: u64,
        bullets: &mut Vec<Bullet>,
        audio: &mut dyn AudioSink,
    ) -> usize {
        self.speed_multiplier = if keys.boost { BOOST_MULTIPLIER } else { 1.0 };

        let step = self.speed * self.speed_multiplier;
        if keys.forward {
            self.pos += facing_vector(self.angle) * step;
        }
        if keys.backward {
            self.pos -= facing_vector(self.angle) * step;
        }
        if keys.rotate_left {
            self.angle -= PLAYER_ROTATION_SPEED;
        }
        if keys.rotate_right {
            self.angle += PLAYER_ROTATION_SPEED;
        }
        self.angle = normalize_degrees(self.angle);

        if keys.fire {
            self.shoot(self.shooting_pattern, now_ms, bullets, audio)
        } else {
            0
        }
    }

    /// Milliseconds required between two volleys
    pub fn shot_cooldown_ms(&self) -> f32 {
        BASE_SHOT_COOLDOWN_MS / self.firing_rate_factor
    }

    pub fn can_shoot(&self, now_ms: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) as f32 >= self.shot_cooldown_ms(),
        }
    }

    /// Fire a volley if off cooldown. Returns the number of bullets spawned.
    pub fn shoot(
        &mut self,
        pattern: ShootingPattern,
        now_ms: u64,
        bullets: &mut Vec<Bullet>,
        audio: &mut dyn AudioSink,
    ) -> usize {
        if !self.can_shoot(now_ms) {
            return 0;
        }

        let dir = facing_vector(self.angle);
        let origin = self.pos + dir * (self.size / 2.0);
        let speed = BULLET_SPEED * self.speed_multiplier;
        let kind = self.bullet_type;
        let angle = self.angle;
        let at = |offset_deg: f32| facing_vector(angle + offset_deg) * speed;
        let make = |pos: Vec2, vel: Vec2| Bullet::new(pos, vel, PLAYER_BULLET_DAMAGE, kind);

        let before = bullets.len();
        match pattern {
            ShootingPattern::Single => {
                bullets.push(make(origin, dir * speed));
            }
            ShootingPattern::Double => {
                let perp = Vec2::new(-dir.y, dir.x) * DOUBLE_SHOT_OFFSET;
                bullets.push(make(origin + perp, dir * speed));
                bullets.push(make(origin - perp, dir * speed));
            }
            ShootingPattern::Triple => {
                bullets.push(make(origin, dir * speed));
                bullets.push(make(origin, at(-PLAYER_SPREAD_DEGREES)));
                bullets.push(make(origin, at(PLAYER_SPREAD_DEGREES)));
            }
            ShootingPattern::Sideways => {
                bullets.push(make(origin, dir * speed));
                bullets.push(make(origin, at(-90.0)));
                bullets.push(make(origin, at(90.0)));
                bullets.push(make(origin, at(-PLAYER_SPREAD_DEGREES)));
                bullets.push(make(origin, at(PLAYER_SPREAD_DEGREES)));
            }
        }

        self.last_shot_ms = Some(now_ms);
        audio.play(SoundEffect::PlayerShoot);
        bullets.len() - before
    }

    /// Accumulate XP, levelling up as many times as the total allows.
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: i32) -> u32 {
        self.experience = self.experience.saturating_add(amount.max(0));
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level {
            self.level_up();
            gained += 1;
        }
        gained
    }

    /// A forced level-up below the threshold leaves the shortfall as
    /// negative XP, repaid by later pickups.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.experience = self.experience.saturating_sub(self.experience_to_next_level);
        let grown = (self.experience_to_next_level as f32 * LEVEL_XP_GROWTH) as i32;
        self.experience_to_next_level = grown.max(self.experience_to_next_level + 1);

        self.max_health = self.max_health.saturating_mul(2);
        self.health = self.max_health;

        if let Some(loadout) = loadout_for_level(self.level) {
            self.shooting_pattern = loadout.pattern;
            self.bullet_type = loadout.bullet;
            self.firing_rate_factor *= loadout.rate_multiplier;
        }
        log::info!(
            "Player reached level {} ({:?}, {:?})",
            self.level,
            self.shooting_pattern,
            self.bullet_type
        );
    }

    /// Subtract damage, flooring health at zero
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.health = self.health.saturating_sub(amount).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(player: &mut Player, pattern: ShootingPattern, now: u64) -> Vec<Bullet> {
        let mut bullets = Vec::new();
        let mut audio: Vec<SoundEffect> = Vec::new();
        player.shoot(pattern, now, &mut bullets, &mut audio);
        bullets
    }

    #[test]
    fn test_single_shot_along_facing() {
        let mut player = Player::new(Vec2::ZERO);
        let bullets = fire(&mut player, ShootingPattern::Single, 5000);
        assert_eq!(bullets.len(), 1);
        let b = &bullets[0];
        assert!((b.vel.length() - BULLET_SPEED).abs() < 1e-4);
        // Angle 0 faces up (negative y)
        assert!(b.vel.x.abs() < 1e-4);
        assert!(b.vel.y < 0.0);
        // Spawned half a ship ahead of the centre
        assert!((b.pos.y + PLAYER_SIZE / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_shot_speed_includes_boost() {
        let mut player = Player::new(Vec2::ZERO);
        let mut bullets = Vec::new();
        let mut audio: Vec<SoundEffect> = Vec::new();
        let keys = KeyState { boost: true, fire: true, ..Default::default() };
        player.handle_input(&keys, 0, &mut bullets, &mut audio);
        assert_eq!(bullets.len(), 1);
        assert!((bullets[0].vel.length() - BULLET_SPEED * BOOST_MULTIPLIER).abs() < 1e-3);
        assert_eq!(audio, vec![SoundEffect::PlayerShoot]);
    }

    #[test]
    fn test_pattern_counts() {
        let mut player = Player::new(Vec2::ZERO);
        assert_eq!(fire(&mut player, ShootingPattern::Double, 10_000).len(), 2);
        assert_eq!(fire(&mut player, ShootingPattern::Triple, 20_000).len(), 3);
        assert_eq!(fire(&mut player, ShootingPattern::Sideways, 30_000).len(), 5);
    }

    #[test]
    fn test_sideways_has_lateral_bullets() {
        let mut player = Player::new(Vec2::ZERO);
        let bullets = fire(&mut player, ShootingPattern::Sideways, 0);
        // Facing up: lateral bullets move purely along x
        let lateral = bullets.iter().filter(|b| b.vel.y.abs() < 1e-3).count();
        assert_eq!(lateral, 2);
    }

    #[test]
    fn test_cooldown_rate_limits() {
        let mut player = Player::new(Vec2::ZERO);
        let cooldown = player.shot_cooldown_ms() as u64;
        assert_eq!(fire(&mut player, ShootingPattern::Single, 1000).len(), 1);
        assert_eq!(fire(&mut player, ShootingPattern::Single, 1000 + cooldown - 1).len(), 0);
        assert_eq!(fire(&mut player, ShootingPattern::Single, 1000 + cooldown).len(), 1);
    }

    #[test]
    fn test_movement_forward_and_rotation() {
        let mut player = Player::new(Vec2::ZERO);
        let mut bullets = Vec::new();
        let mut audio: Vec<SoundEffect> = Vec::new();
        let keys = KeyState { forward: true, ..Default::default() };
        player.handle_input(&keys, 0, &mut bullets, &mut audio);
        assert!((player.pos.y + PLAYER_SPEED).abs() < 1e-4);

        let keys = KeyState { rotate_right: true, ..Default::default() };
        player.handle_input(&keys, 0, &mut bullets, &mut audio);
        assert_eq!(player.angle, PLAYER_ROTATION_SPEED);
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_level_up_progression() {
        let mut player = Player::new(Vec2::ZERO);
        let gained = player.add_experience(100);
        assert_eq!(gained, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.experience, 0);
        assert_eq!(player.experience_to_next_level, 150);
        assert_eq!(player.max_health, PLAYER_START_HEALTH * 2);
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.shooting_pattern, ShootingPattern::Double);
        assert!((player.firing_rate_factor - PLAYER_START_FIRING_RATE * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_multiple_level_ups_from_one_grant() {
        let mut player = Player::new(Vec2::ZERO);
        // 100 + 150 + 225 = 475
        let gained = player.add_experience(480);
        assert_eq!(gained, 3);
        assert_eq!(player.level, 4);
        assert_eq!(player.experience, 5);
        assert_eq!(player.bullet_type, BulletType::Powered);
        assert_eq!(player.shooting_pattern, ShootingPattern::Triple);
    }

    #[test]
    fn test_forced_level_up_keeps_xp_shortfall() {
        let mut player = Player::new(Vec2::ZERO);
        player.add_experience(30);
        player.level_up();
        assert_eq!(player.level, 2);
        assert_eq!(player.experience, 30 - PLAYER_START_XP_THRESHOLD);
        assert_eq!(player.experience_to_next_level, 150);

        // The shortfall is repaid before the next level
        assert_eq!(player.add_experience(150), 0);
        assert_eq!(player.experience, 80);
        assert_eq!(player.add_experience(70), 1);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 0);
    }

    #[test]
    fn test_heading_stays_wrapped() {
        let mut player = Player::new(Vec2::ZERO);
        let mut bullets = Vec::new();
        let mut audio: Vec<SoundEffect> = Vec::new();
        let keys = KeyState { rotate_right: true, ..Default::default() };
        for _ in 0..1000 {
            player.handle_input(&keys, 0, &mut bullets, &mut audio);
            assert!(player.angle >= -180.0 && player.angle < 180.0);
        }
        // 3000 degrees of turning is 120 degrees net
        assert!((player.angle - 120.0).abs() < 1e-2);

        let keys = KeyState { rotate_left: true, ..Default::default() };
        for _ in 0..2000 {
            player.handle_input(&keys, 0, &mut bullets, &mut audio);
            assert!(player.angle >= -180.0 && player.angle < 180.0);
        }
    }

    #[test]
    fn test_loadout_caps_at_level_seven() {
        assert!(loadout_for_level(1).is_none());
        assert_eq!(loadout_for_level(7), loadout_for_level(12));
        assert_eq!(loadout_for_level(12).unwrap().bullet, BulletType::ExtremePowered);
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut player = Player::new(Vec2::ZERO);
        player.take_damage(50);
        assert_eq!(player.health, PLAYER_START_HEALTH - 50);
        player.take_damage(10_000);
        assert_eq!(player.health, 0);
        player.take_damage(10);
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
    }
}
