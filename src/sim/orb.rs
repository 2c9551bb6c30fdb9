//! Experience orbs dropped by destroyed enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::enemy::EnemyType;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec2,
    pub size: f32,
    pub xp_value: i32,
    /// Opacity in [0, 255]; the orb disappears at 0
    pub alpha: f32,
}

impl Orb {
    pub fn new(pos: Vec2, size: f32, xp_value: i32) -> Self {
        Self {
            pos,
            size,
            xp_value,
            alpha: ORB_START_ALPHA,
        }
    }

    /// Orb dropped by an enemy of `kind`
    pub fn for_enemy(kind: EnemyType, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self::new(pos, stats.orb_size, stats.orb_xp)
    }

    /// Fade one tick, then drift toward the player if close enough
    pub fn update(&mut self, player_pos: Vec2) {
        self.alpha = (self.alpha - ORB_FADE_RATE).max(0.0);

        let to_player = player_pos - self.pos;
        let distance = to_player.length();
        if distance > 0.0 && distance < ORB_MAGNET_RADIUS {
            self.pos += to_player / distance * ORB_MAGNET_SPEED.min(distance);
        }
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }
}
