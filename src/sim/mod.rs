//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `TickInput::now_ms` only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod obstacle;
pub mod orb;
pub mod player;
pub mod spawn;
pub mod stage;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, BulletStats, BulletType};
pub use collision::{Rect, block_velocity};
pub use enemy::{Enemy, EnemyState, EnemyStats, EnemyType};
pub use obstacle::{Obstacle, ObstacleType};
pub use orb::Orb;
pub use player::{KeyState, Loadout, Player, ShootingPattern, loadout_for_level};
pub use spawn::{despawn_far_obstacles, pick_enemy_type, populate_obstacles, spawn_enemies};
pub use stage::{StageAdvance, StageData, StageManager, default_stages};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
