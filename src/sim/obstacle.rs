//! Static world obstacles
//!
//! Neutral obstacles hover and spin slowly and cannot be destroyed. Hostile
//! obstacles turn toward a nearby player and fire a slow aimed shot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletType};
use super::collision::Rect;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::{degrees_of, random_float, vec_from_degrees};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleType {
    Neutral,
    Hostile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleType,
    /// World-space centre
    pub pos: Vec2,
    /// Anchor for the hover oscillation
    pub initial_y: f32,
    pub size: f32,
    pub health: i32,
    /// Render rotation in degrees
    pub angle: f32,
    pub last_shot_ms: Option<u64>,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: f32, kind: ObstacleType) -> Self {
        let health = match kind {
            ObstacleType::Neutral => NEUTRAL_OBSTACLE_HEALTH,
            ObstacleType::Hostile => HOSTILE_OBSTACLE_HEALTH,
        };
        Self {
            kind,
            pos,
            initial_y: pos.y,
            size,
            health,
            angle: 0.0,
            last_shot_ms: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Only hostile obstacles take damage from player fire
    pub fn is_destructible(&self) -> bool {
        self.kind == ObstacleType::Hostile
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.health = self.health.saturating_sub(amount).max(0);
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player_pos: Vec2,
        now_ms: u64,
        hostile_bullets: &mut Vec<Bullet>,
        rng: &mut R,
        audio: &mut dyn AudioSink,
    ) {
        match self.kind {
            ObstacleType::Neutral => {
                let t = now_ms as f32 / 1000.0;
                let hover = (t * OBSTACLE_HOVER_SPEED).sin() * OBSTACLE_HOVER_AMPLITUDE;
                self.pos.y = self.initial_y + hover;
                self.angle += random_float(rng, -OBSTACLE_ROTATION_SPEED, OBSTACLE_ROTATION_SPEED);
            }
            ObstacleType::Hostile => {
                let to_player = player_pos - self.pos;
                if to_player.length() >= HOSTILE_OBSTACLE_RANGE {
                    return;
                }
                // Sprite art points up, so rotate a quarter turn
                self.angle = degrees_of(to_player) + 90.0;
                if self.can_shoot(now_ms) {
                    self.shoot(to_player, now_ms, hostile_bullets, audio);
                }
            }
        }
    }

    fn can_shoot(&self, now_ms: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > HOSTILE_OBSTACLE_SHOOT_COOLDOWN_MS,
        }
    }

    fn shoot(
        &mut self,
        aim: Vec2,
        now_ms: u64,
        hostile_bullets: &mut Vec<Bullet>,
        audio: &mut dyn AudioSink,
    ) {
        let dir = if aim.length() > AIM_EPSILON {
            aim.normalize()
        } else {
            vec_from_degrees(self.angle - 90.0)
        };
        hostile_bullets.push(Bullet::new(
            self.pos,
            dir * ENEMY_BULLET_SPEED,
            OBSTACLE_BULLET_DAMAGE,
            BulletType::Normal,
        ));
        self.last_shot_ms = Some(now_ms);
        audio.play(SoundEffect::EnemyShoot);
    }
}
