//! Enemy ships: per-type stat table, aggro state machine, steering and volleys
//!
//! Each enemy picks an aggro state from its distance to the player, turns the
//! state into a desired velocity, then steers toward it with a clamped force.
//! Obstacles block movement along the axis that would deepen the overlap, and
//! any remaining penetration is pushed out after the move.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletType};
use super::collision::{Rect, block_velocity};
use super::obstacle::Obstacle;
use super::player::Player;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::{degrees_of, normalize_degrees, random_float, vec_from_degrees};

/// Enemy archetypes. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    Normal,
    Fast,
    Tank,
    Quick,
    Boss,
}

/// Fixed per-type tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub size: f32,
    pub health: i32,
    /// Multiplier on `ENEMY_SPEED`
    pub speed_factor: f32,
    pub firing_rate: f32,
    pub bullet: BulletType,
    pub fire_range: f32,
    /// Experience carried by the orb dropped on death
    pub orb_xp: i32,
    pub orb_size: f32,
}

const ENEMY_STATS: [EnemyStats; 5] = [
    // Normal
    EnemyStats {
        size: 110.0,
        health: 100,
        speed_factor: 1.0,
        firing_rate: 1.0,
        bullet: BulletType::Normal,
        fire_range: 700.0,
        orb_xp: 10,
        orb_size: 15.0,
    },
    // Fast
    EnemyStats {
        size: 110.0,
        health: 70,
        speed_factor: 1.5,
        firing_rate: 1.0,
        bullet: BulletType::Powered,
        fire_range: 700.0,
        orb_xp: 15,
        orb_size: 20.0,
    },
    // Tank
    EnemyStats {
        size: 200.0,
        health: 500,
        speed_factor: 0.6,
        firing_rate: 0.5,
        bullet: BulletType::ExtremePowered,
        fire_range: 800.0,
        orb_xp: 50,
        orb_size: 30.0,
    },
    // Quick
    EnemyStats {
        size: 130.0,
        health: 120,
        speed_factor: 1.2,
        firing_rate: 2.0,
        bullet: BulletType::SuperPowered,
        fire_range: 650.0,
        orb_xp: 20,
        orb_size: 25.0,
    },
    // Boss
    EnemyStats {
        size: 300.0,
        health: 5000,
        speed_factor: 0.5,
        firing_rate: 1.5,
        bullet: BulletType::ExtremePowered,
        fire_range: 1000.0,
        orb_xp: 500,
        orb_size: 40.0,
    },
];

impl EnemyType {
    pub const ALL: [EnemyType; 5] = [
        EnemyType::Normal,
        EnemyType::Fast,
        EnemyType::Tank,
        EnemyType::Quick,
        EnemyType::Boss,
    ];

    pub fn stats(self) -> &'static EnemyStats {
        &ENEMY_STATS[self as usize]
    }
}

/// Aggro state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Startup state, never re-entered
    #[default]
    Wandering,
    Engaging,
    Retreating,
    Circling,
}

impl EnemyState {
    /// State an enemy wants to be in at `distance` from the player
    pub fn for_distance(distance: f32) -> Self {
        if distance < RETREAT_DISTANCE {
            EnemyState::Retreating
        } else if distance > ENGAGE_DISTANCE {
            EnemyState::Engaging
        } else {
            EnemyState::Circling
        }
    }
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyType,
    /// World-space centre
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading of travel in degrees (0 = +x)
    pub angle: f32,
    pub size: f32,
    pub health: i32,
    /// Maximum speed
    pub speed: f32,
    pub firing_rate_factor: f32,
    pub last_shot_ms: Option<u64>,
    pub state: EnemyState,
    pub last_state_change_ms: u64,
    /// Wander heading in degrees
    pub wandering_angle: f32,
    pub last_wander_roll_ms: u64,
    /// Strafe side while circling (+1 or -1)
    pub circling_direction: f32,
    pub last_strafe_flip_ms: u64,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(kind: EnemyType, pos: Vec2, now_ms: u64, rng: &mut R) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            size: stats.size,
            health: stats.health,
            speed: ENEMY_SPEED * stats.speed_factor,
            firing_rate_factor: stats.firing_rate,
            last_shot_ms: None,
            state: EnemyState::Wandering,
            last_state_change_ms: now_ms,
            wandering_angle: random_float(rng, 0.0, 360.0),
            last_wander_roll_ms: now_ms,
            circling_direction: 1.0,
            last_strafe_flip_ms: now_ms,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
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

    /// Switch aggro state if the change interval has elapsed.
    /// Returns true when a transition happened.
    pub fn evaluate_state(&mut self, distance: f32, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_state_change_ms) <= ENEMY_STATE_CHANGE_MS {
            return false;
        }
        let next = EnemyState::for_distance(distance);
        if next == self.state {
            return false;
        }
        log::trace!("{:?} enemy {:?} -> {:?}", self.kind, self.state, next);
        self.state = next;
        self.last_state_change_ms = now_ms;
        true
    }

    /// Velocity the current state asks for
    fn desired_velocity<R: Rng + ?Sized>(
        &mut self,
        to_player: Vec2,
        now_ms: u64,
        rng: &mut R,
    ) -> Vec2 {
        let distance = to_player.length();
        let toward = if distance > AIM_EPSILON {
            to_player / distance
        } else {
            vec_from_degrees(self.angle)
        };

        match self.state {
            EnemyState::Wandering => {
                if now_ms.saturating_sub(self.last_wander_roll_ms) > ENEMY_WANDER_REROLL_MS {
                    self.wandering_angle = random_float(rng, 0.0, 360.0);
                    self.last_wander_roll_ms = now_ms;
                }
                vec_from_degrees(self.wandering_angle) * self.speed
            }
            EnemyState::Engaging => toward * self.speed,
            EnemyState::Retreating => {
                let away = degrees_of(-toward) + random_float(rng, -45.0, 45.0);
                vec_from_degrees(away) * self.speed * RETREAT_SPEED_FACTOR
            }
            EnemyState::Circling => {
                if now_ms.saturating_sub(self.last_strafe_flip_ms) > ENEMY_STRAFE_FLIP_MS {
                    self.circling_direction = if rng.random::<bool>() { 1.0 } else { -1.0 };
                    self.last_strafe_flip_ms = now_ms;
                }
                let strafe = Vec2::new(-toward.y, toward.x);
                let radial = ((distance - CIRCLING_DISTANCE) * CIRCLING_GAIN)
                    .clamp(-self.speed, self.speed);
                toward * radial + strafe * self.speed * self.circling_direction
            }
        }
    }

    fn max_speed(&self) -> f32 {
        if self.state == EnemyState::Retreating {
            self.speed * RETREAT_SPEED_FACTOR
        } else {
            self.speed
        }
    }

    /// Advance one tick: aggro state, steering, obstacle avoidance, facing
    /// and firing.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player: &Player,
        obstacles: &[Obstacle],
        now_ms: u64,
        hostile_bullets: &mut Vec<Bullet>,
        rng: &mut R,
        audio: &mut dyn AudioSink,
    ) {
        let to_player = player.pos - self.pos;
        let distance = to_player.length();

        self.evaluate_state(distance, now_ms);

        let desired = self.desired_velocity(to_player, now_ms, rng);
        let steer = (desired - self.vel)
            .clamp(Vec2::splat(-ENEMY_MAX_FORCE), Vec2::splat(ENEMY_MAX_FORCE));
        self.vel += steer;
        self.vel = self.vel.clamp_length_max(self.max_speed());

        // Stop moving into obstacles
        let future = Rect::from_center(self.pos + self.vel, Vec2::splat(self.size));
        for obstacle in obstacles {
            let rect = obstacle.rect();
            if future.intersects(&rect) {
                self.vel = block_velocity(&future, &rect, self.vel);
            }
        }

        self.pos += self.vel;

        // Push out of anything still overlapping
        for obstacle in obstacles {
            if let Some(push) = self.rect().separation(&obstacle.rect()) {
                self.pos += push;
            }
        }

        if self.vel != Vec2::ZERO {
            let diff = normalize_degrees(degrees_of(self.vel) - self.angle);
            self.angle = normalize_degrees(self.angle + diff * FACING_LERP);
        }

        if self.can_shoot(now_ms) && distance < self.kind.stats().fire_range {
            self.shoot(player.pos, now_ms, hostile_bullets, audio);
        }
    }

    pub fn shot_cooldown_ms(&self) -> f32 {
        BASE_SHOT_COOLDOWN_MS / self.firing_rate_factor
    }

    pub fn can_shoot(&self, now_ms: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) as f32 > self.shot_cooldown_ms(),
        }
    }

    /// Fire this type's volley at `target`. Returns the number of bullets.
    pub fn shoot(
        &mut self,
        target: Vec2,
        now_ms: u64,
        hostile_bullets: &mut Vec<Bullet>,
        audio: &mut dyn AudioSink,
    ) -> usize {
        let aim = target - self.pos;
        let length = aim.length();
        // Degenerate aim falls back to the current heading
        let aim_deg = if length > AIM_EPSILON {
            degrees_of(aim)
        } else {
            self.angle
        };

        let kind = self.kind.stats().bullet;
        let start = self.pos;
        let make = |pos: Vec2, deg: f32, speed_factor: f32| {
            Bullet::new(
                pos,
                vec_from_degrees(deg) * ENEMY_BULLET_SPEED * speed_factor,
                ENEMY_BULLET_DAMAGE,
                kind,
            )
        };

        let before = hostile_bullets.len();
        match self.kind {
            EnemyType::Normal | EnemyType::Fast | EnemyType::Tank => {
                hostile_bullets.push(make(start, aim_deg, 1.0));
            }
            EnemyType::Quick => {
                let offset = vec_from_degrees(aim_deg + 90.0) * QUICK_PAIR_OFFSET;
                hostile_bullets.push(make(start + offset, aim_deg, 1.0));
                hostile_bullets.push(make(start - offset, aim_deg, 1.0));
            }
            EnemyType::Boss => {
                hostile_bullets.push(make(start, aim_deg, 1.0));
                hostile_bullets.push(make(start, aim_deg - 90.0, BOSS_SIDE_SPEED_FACTOR));
                hostile_bullets.push(make(start, aim_deg + 90.0, BOSS_SIDE_SPEED_FACTOR));
                hostile_bullets.push(make(start, aim_deg - BOSS_SPREAD_DEGREES, 1.0));
                hostile_bullets.push(make(start, aim_deg + BOSS_SPREAD_DEGREES, 1.0));
            }
        }

        self.last_shot_ms = Some(now_ms);
        audio.play(SoundEffect::EnemyShoot);
        hostile_bullets.len() - before
    }
}
