//! Sprite instance records for a GPU backend

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::{BulletType, EnemyType, ObstacleType};

/// Which texture a sprite uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyType),
    Obstacle(ObstacleType),
    PlayerBullet(BulletType),
    HostileBullet(BulletType),
    Orb,
}

impl SpriteKind {
    /// Stable texture index used by the shader
    pub fn code(self) -> u32 {
        match self {
            SpriteKind::Player => 0,
            SpriteKind::Enemy(kind) => 1 + kind as u32,
            SpriteKind::Obstacle(ObstacleType::Neutral) => 6,
            SpriteKind::Obstacle(ObstacleType::Hostile) => 7,
            SpriteKind::PlayerBullet(kind) => 8 + kind as u32,
            SpriteKind::HostileBullet(kind) => 12 + kind as u32,
            SpriteKind::Orb => 16,
        }
    }
}

/// One textured quad in screen space (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 2], // offset 0
    pub size: [f32; 2],   // offset 8
    /// Degrees, clockwise, 0 = sprite art as drawn
    pub rotation: f32, // offset 16
    /// 0-1 opacity
    pub alpha: f32, // offset 20
    pub kind: u32, // offset 24
    _pad: u32,     // pad to 32 bytes
}

impl SpriteInstance {
    pub fn new(kind: SpriteKind, center: Vec2, size: f32, rotation: f32, alpha: f32) -> Self {
        Self {
            center: center.to_array(),
            size: [size, size],
            rotation,
            alpha,
            kind: kind.code(),
            _pad: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::from_array(self.center)
    }
}

/// Reinterpret a batch as raw bytes for a buffer upload
pub fn as_bytes(batch: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(batch)
}
