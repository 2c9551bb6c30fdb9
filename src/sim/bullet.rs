//! Bullets and the bullet tier table

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Bullet power tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletType {
    #[default]
    Normal,
    Powered,
    SuperPowered,
    ExtremePowered,
}

/// Per-tier bullet parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletStats {
    /// Square side length
    pub size: f32,
    /// Multiplier applied to the shooter's base damage
    pub damage_multiplier: f32,
    /// Multiplier applied to velocity during integration
    pub speed_multiplier: f32,
}

const BULLET_STATS: [BulletStats; 4] = [
    BulletStats { size: 20.0, damage_multiplier: 1.0, speed_multiplier: 1.0 },
    BulletStats { size: 25.0, damage_multiplier: 2.5, speed_multiplier: 1.5 },
    BulletStats { size: 30.0, damage_multiplier: 6.0, speed_multiplier: 2.0 },
    BulletStats { size: 35.0, damage_multiplier: 12.0, speed_multiplier: 2.5 },
];

impl BulletType {
    pub fn stats(self) -> &'static BulletStats {
        &BULLET_STATS[self as usize]
    }
}

/// A bullet entity. Player-owned and hostile bullets live in separate
/// collections; the bullet itself does not know its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Displacement per tick before the tier speed multiplier
    pub vel: Vec2,
    pub size: f32,
    pub damage: i32,
    pub kind: BulletType,
    pub active: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, base_damage: i32, kind: BulletType) -> Self {
        let stats = kind.stats();
        Self {
            pos,
            vel,
            size: stats.size,
            damage: (base_damage as f32 * stats.damage_multiplier) as i32,
            kind,
            active: true,
        }
    }

    /// Integrate position by one tick
    pub fn update(&mut self) {
        self.pos += self.vel * self.kind.stats().speed_multiplier;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Deactivate when outside the box of half-extent `range` around `center`
    pub fn cull_outside(&mut self, center: Vec2, range: Vec2) {
        let d = (self.pos - center).abs();
        if d.x > range.x || d.y > range.y {
            self.active = false;
        }
    }
}
