//! Stage progression
//!
//! Difficulty is table driven: each stage fixes a kill goal, the spawn cadence
//! and the enemy mix. The manager only tracks where the run is in that table.

use serde::{Deserialize, Serialize};

use super::enemy::EnemyType;

/// One row of the stage table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageData {
    pub stage_number: u32,
    pub kill_goal: u32,
    pub spawn_interval_ms: u64,
    pub base_spawn_count: u32,
    /// Weights out of `SPAWN_WEIGHT_TOTAL`, walked in order
    pub spawn_weights: Vec<(EnemyType, u32)>,
    pub can_spawn_boss: bool,
    /// Out of `SPAWN_WEIGHT_TOTAL`
    pub boss_spawn_chance: u32,
}

impl StageData {
    /// Stage with a kill goal and a plain NORMAL-only mix
    pub fn with_kill_goal(stage_number: u32, kill_goal: u32) -> Self {
        Self {
            stage_number,
            kill_goal,
            spawn_interval_ms: 2000,
            base_spawn_count: 1,
            spawn_weights: vec![(EnemyType::Normal, 1000)],
            can_spawn_boss: false,
            boss_spawn_chance: 0,
        }
    }
}

fn stage(
    stage_number: u32,
    kill_goal: u32,
    spawn_interval_ms: u64,
    base_spawn_count: u32,
    weights: &[(EnemyType, u32)],
    boss_spawn_chance: u32,
) -> StageData {
    StageData {
        stage_number,
        kill_goal,
        spawn_interval_ms,
        base_spawn_count,
        spawn_weights: weights.to_vec(),
        can_spawn_boss: boss_spawn_chance > 0,
        boss_spawn_chance,
    }
}

/// The built-in six stage campaign
pub fn default_stages() -> Vec<StageData> {
    use EnemyType::*;
    vec![
        stage(1, 10, 2000, 1, &[(Normal, 900), (Fast, 100)], 0),
        stage(2, 20, 1800, 1, &[(Normal, 600), (Fast, 300), (Quick, 100)], 0),
        stage(3, 30, 1600, 2, &[(Normal, 300), (Fast, 350), (Tank, 100), (Quick, 250)], 0),
        stage(4, 50, 1400, 2, &[(Normal, 150), (Fast, 250), (Tank, 250), (Quick, 340)], 10),
        stage(5, 70, 1300, 3, &[(Normal, 60), (Fast, 230), (Tank, 300), (Quick, 400)], 10),
        stage(6, 100, 1200, 3, &[(Fast, 200), (Tank, 420), (Quick, 350)], 30),
    ]
}

/// Result of [`StageManager::advance_stage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAdvance {
    /// Moved on to the stage with this number
    Advanced(u32),
    /// The last stage was cleared
    GameWon,
    /// No run in progress
    NoStage,
}

/// Tracks the current stage, its kill counter and the win flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageManager {
    stages: Vec<StageData>,
    /// `None` until a game is started
    current: Option<usize>,
    kills: u32,
    game_won: bool,
}

impl Default for StageManager {
    fn default() -> Self {
        Self::new(default_stages())
    }
}

impl StageManager {
    pub fn new(stages: Vec<StageData>) -> Self {
        Self {
            stages,
            current: None,
            kills: 0,
            game_won: false,
        }
    }

    pub fn start_game(&mut self) {
        self.current = if self.stages.is_empty() { None } else { Some(0) };
        self.kills = 0;
        self.game_won = false;
    }

    /// Drop back to the not-started state
    pub fn reset(&mut self) {
        self.current = None;
        self.kills = 0;
        self.game_won = false;
    }

    pub fn record_kill(&mut self) {
        if self.game_won || self.current.is_none() {
            return;
        }
        self.kills += 1;
    }

    pub fn should_advance(&self) -> bool {
        match self.current_stage() {
            Some(stage) => !self.game_won && self.kills >= stage.kill_goal,
            None => false,
        }
    }

    /// Move to the next stage, or set the win flag after the last one.
    /// Player rewards are the caller's job.
    pub fn advance_stage(&mut self) -> StageAdvance {
        let Some(index) = self.current else {
            return StageAdvance::NoStage;
        };
        if index + 1 >= self.stages.len() {
            self.game_won = true;
            return StageAdvance::GameWon;
        }
        self.current = Some(index + 1);
        self.kills = 0;
        StageAdvance::Advanced(self.stages[index + 1].stage_number)
    }

    pub fn current_stage(&self) -> Option<&StageData> {
        self.current.and_then(|i| self.stages.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn is_game_won(&self) -> bool {
        self.game_won
    }

    pub fn stages(&self) -> &[StageData] {
        &self.stages
    }
}
