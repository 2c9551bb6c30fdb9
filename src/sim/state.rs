//! Game state and the top-level phase machine
//!
//! The orchestrator exclusively owns every entity collection. Other
//! components only ever see borrowed slices during a tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::enemy::{Enemy, EnemyType};
use super::obstacle::Obstacle;
use super::orb::Orb;
use super::player::Player;
use super::stage::{StageData, StageManager};
use crate::settings::Settings;

/// Current phase of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no player
    #[default]
    MainMenu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player died
    GameOver,
    /// Every stage cleared
    Credits,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Absent outside of a run
    pub player: Option<Player>,
    /// Player-owned bullets
    pub bullets: Vec<Bullet>,
    /// Bullets fired by enemies and hostile obstacles
    pub hostile_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub orbs: Vec<Orb>,
    pub stage_manager: StageManager,
    pub last_enemy_spawn_ms: u64,
    /// Set when the credits phase begins
    pub credits_started_ms: Option<u64>,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
}

impl GameState {
    /// Create a state sitting in the main menu with the built-in stages
    pub fn new(settings: Settings) -> Self {
        Self::with_stages(settings, StageManager::default())
    }

    pub fn with_stages(settings: Settings, stage_manager: StageManager) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            phase: GamePhase::MainMenu,
            player: None,
            bullets: Vec::new(),
            hostile_bullets: Vec::new(),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            orbs: Vec::new(),
            stage_manager,
            last_enemy_spawn_ms: 0,
            credits_started_ms: None,
            time_ticks: 0,
        }
    }

    /// Convenience for tests and tools: a state built from a stage list
    pub fn with_stage_list(settings: Settings, stages: Vec<StageData>) -> Self {
        Self::with_stages(settings, StageManager::new(stages))
    }

    /// Begin a fresh run at the world origin
    pub fn start_new_game(&mut self, now_ms: u64) {
        self.clear_entities();
        self.player = Some(Player::default());
        self.stage_manager.start_game();
        self.last_enemy_spawn_ms = now_ms;
        self.credits_started_ms = None;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        log::info!("New game started (seed {})", self.settings.seed);
    }

    /// Drop every transient entity. The player is kept.
    pub fn clear_entities(&mut self) {
        self.bullets.clear();
        self.hostile_bullets.clear();
        self.enemies.clear();
        self.obstacles.clear();
        self.orbs.clear();
    }

    pub fn return_to_menu(&mut self) {
        self.clear_entities();
        self.player = None;
        self.stage_manager.reset();
        self.credits_started_ms = None;
        self.phase = GamePhase::MainMenu;
        log::info!("Returned to main menu");
    }

    /// Flip between Playing and Paused. Other phases are left alone.
    /// Returns true if the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            _ => return false,
        };
        log::info!("{}", if self.phase == GamePhase::Paused { "Paused" } else { "Resumed" });
        true
    }

    pub fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        if let Some(player) = &self.player {
            log::info!(
                "Game over at level {} in stage {:?}",
                player.level,
                self.stage_manager.current_stage().map(|s| s.stage_number)
            );
        }
    }

    pub fn enter_credits(&mut self, now_ms: u64) {
        self.clear_entities();
        self.credits_started_ms = Some(now_ms);
        self.phase = GamePhase::Credits;
        log::info!("All stages cleared");
    }

    pub fn boss_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.kind == EnemyType::Boss).count()
    }
}
