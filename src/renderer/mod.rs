//! Rendering adapter
//!
//! Turns a read-only view of the game state into screen-space sprite
//! instances. Drawing itself is left to whatever implements [`DrawSink`].

pub mod sprite;

pub use sprite::{SpriteInstance, SpriteKind, as_bytes};

use glam::Vec2;

use crate::degrees_of;
use crate::sim::GameState;

/// Receives sprites in back-to-front order
pub trait DrawSink {
    fn draw_sprite(&mut self, sprite: SpriteInstance);
}

impl DrawSink for Vec<SpriteInstance> {
    fn draw_sprite(&mut self, sprite: SpriteInstance) {
        self.push(sprite);
    }
}

/// Player-centred view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position shown at the screen centre
    pub focus: Vec2,
    pub screen_size: Vec2,
}

impl Camera {
    pub fn new(focus: Vec2, screen_size: Vec2) -> Self {
        Self { focus, screen_size }
    }

    /// Camera following the player, or the world origin without one
    pub fn follow(state: &GameState) -> Self {
        let focus = state.player.as_ref().map_or(Vec2::ZERO, |p| p.pos);
        Self::new(
            focus,
            Vec2::new(state.settings.screen_width, state.settings.screen_height),
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.focus + self.screen_size / 2.0
    }

    /// True if a square of side `size` at `screen` overlaps the viewport
    pub fn is_visible(&self, screen: Vec2, size: f32) -> bool {
        let half = size / 2.0;
        screen.x + half >= 0.0
            && screen.y + half >= 0.0
            && screen.x - half <= self.screen_size.x
            && screen.y - half <= self.screen_size.y
    }
}

/// Emit every visible entity: obstacles, orbs, enemies, player bullets,
/// hostile bullets, then the player on top.
pub fn render(state: &GameState, camera: &Camera, sink: &mut dyn DrawSink) {
    let mut emit = |kind: SpriteKind, world: Vec2, size: f32, rotation: f32, alpha: f32| {
        let screen = camera.world_to_screen(world);
        if camera.is_visible(screen, size) {
            sink.draw_sprite(SpriteInstance::new(kind, screen, size, rotation, alpha));
        }
    };

    for obstacle in &state.obstacles {
        emit(SpriteKind::Obstacle(obstacle.kind), obstacle.pos, obstacle.size, obstacle.angle, 1.0);
    }
    for orb in state.orbs.iter().filter(|o| !o.is_faded()) {
        emit(SpriteKind::Orb, orb.pos, orb.size, 0.0, orb.alpha / 255.0);
    }
    // Enemy headings are 0 = +x, sprites point up
    for enemy in &state.enemies {
        emit(SpriteKind::Enemy(enemy.kind), enemy.pos, enemy.size, enemy.angle + 90.0, 1.0);
    }
    for bullet in state.bullets.iter().filter(|b| b.active) {
        let rotation = degrees_of(bullet.vel) + 90.0;
        emit(SpriteKind::PlayerBullet(bullet.kind), bullet.pos, bullet.size, rotation, 1.0);
    }
    for bullet in state.hostile_bullets.iter().filter(|b| b.active) {
        let rotation = degrees_of(bullet.vel) + 90.0;
        emit(SpriteKind::HostileBullet(bullet.kind), bullet.pos, bullet.size, rotation, 1.0);
    }
    if let Some(player) = &state.player {
        emit(SpriteKind::Player, player.pos, player.size, player.angle, 1.0);
    }
}

/// Collect a frame's sprites into a GPU-ready batch
pub fn sprite_batch(state: &GameState) -> Vec<SpriteInstance> {
    let mut batch = Vec::new();
    render(state, &Camera::follow(state), &mut batch);
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Bullet, BulletType, Enemy, EnemyType, Obstacle, ObstacleType, Orb};

    fn state_with_player() -> GameState {
        let mut state = GameState::new(Settings::default());
        state.start_new_game(0);
        state
    }

    #[test]
    fn test_world_to_screen() {
        let camera = Camera::new(Vec2::new(100.0, 50.0), Vec2::new(1920.0, 1000.0));
        assert_eq!(camera.world_to_screen(Vec2::new(100.0, 50.0)), Vec2::new(960.0, 500.0));
        assert_eq!(camera.world_to_screen(Vec2::new(0.0, 0.0)), Vec2::new(860.0, 450.0));
    }

    #[test]
    fn test_draw_order() {
        let mut state = state_with_player();
        state.obstacles.push(Obstacle::new(Vec2::new(200.0, 0.0), 60.0, ObstacleType::Neutral));
        state.orbs.push(Orb::new(Vec2::new(0.0, 100.0), 15.0, 10));
        let mut rng = state.rng.clone();
        state.enemies.push(Enemy::new(EnemyType::Fast, Vec2::new(-200.0, 0.0), 0, &mut rng));
        let up = Vec2::new(0.0, -9.0);
        state.bullets.push(Bullet::new(Vec2::new(0.0, -50.0), up, 50, BulletType::Normal));
        state
            .hostile_bullets
            .push(Bullet::new(Vec2::new(50.0, 0.0), Vec2::new(-3.0, 0.0), 10, BulletType::Powered));

        let batch = sprite_batch(&state);
        let kinds: Vec<u32> = batch.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Obstacle(ObstacleType::Neutral).code(),
                SpriteKind::Orb.code(),
                SpriteKind::Enemy(EnemyType::Fast).code(),
                SpriteKind::PlayerBullet(BulletType::Normal).code(),
                SpriteKind::HostileBullet(BulletType::Powered).code(),
                SpriteKind::Player.code(),
            ]
        );
        // Player sits in the middle of the screen
        assert_eq!(batch[5].center(), Vec2::new(960.0, 500.0));
        // Bullet flying up renders unrotated
        assert!(batch[3].rotation.abs() < 1e-3);
    }

    #[test]
    fn test_skips_inactive_and_offscreen() {
        let mut state = state_with_player();
        let mut spent = Bullet::new(Vec2::ZERO, Vec2::X, 50, BulletType::Normal);
        spent.active = false;
        state.bullets.push(spent);
        state.obstacles.push(Obstacle::new(Vec2::new(5000.0, 0.0), 60.0, ObstacleType::Hostile));
        let mut faded = Orb::new(Vec2::ZERO, 15.0, 10);
        faded.alpha = 0.0;
        state.orbs.push(faded);

        let batch = sprite_batch(&state);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind, SpriteKind::Player.code());
    }

    #[test]
    fn test_orb_alpha_blend() {
        let mut state = state_with_player();
        let mut orb = Orb::new(Vec2::new(10.0, 10.0), 15.0, 10);
        orb.alpha = 127.5;
        state.orbs.push(orb);
        let batch = sprite_batch(&state);
        assert!((batch[0].alpha - 0.5).abs() < 1e-4);
    }
}
