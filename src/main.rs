//! Top-down shooter headless runner
//!
//! Drives the simulation core under a virtual clock with a simple autopilot
//! and prints a JSON summary of the run.
//!
//! Usage: `top-down-shooter [settings.json] [seconds]`

use std::collections::BTreeMap;

use serde::Serialize;

use top_down_shooter::renderer::sprite_batch;
use top_down_shooter::sim::{GamePhase, GameState, KeyState, TickInput, tick};
use top_down_shooter::{AudioSink, Settings, SoundEffect, degrees_of, normalize_degrees};

/// Virtual frame length (about 60 Hz)
const FRAME_MS: u64 = 16;
const DEFAULT_RUN_SECONDS: u64 = 120;

/// Counts sound triggers by name
#[derive(Debug, Default)]
struct TallyAudio {
    counts: BTreeMap<String, u32>,
}

impl AudioSink for TallyAudio {
    fn play(&mut self, effect: SoundEffect) {
        *self.counts.entry(format!("{effect:?}")).or_default() += 1;
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    elapsed_ms: u64,
    phase: GamePhase,
    stage: Option<u32>,
    stage_kills: u32,
    level: Option<u32>,
    health: Option<i32>,
    enemies: usize,
    obstacles: usize,
    orbs: usize,
    sounds: BTreeMap<String, u32>,
}

/// Turn toward the nearest enemy, close in when far, fire constantly
fn autopilot(state: &GameState) -> KeyState {
    let Some(player) = &state.player else {
        return KeyState::default();
    };
    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .total_cmp(&b.pos.distance_squared(player.pos))
    });
    let Some(enemy) = nearest else {
        return KeyState {
            fire: true,
            ..Default::default()
        };
    };

    let to_enemy = enemy.pos - player.pos;
    // Player heading is 0 = up
    let wanted = degrees_of(to_enemy) + 90.0;
    let diff = normalize_degrees(wanted - player.angle);
    KeyState {
        forward: to_enemy.length() > 500.0,
        rotate_left: diff < -3.0,
        rotate_right: diff > 3.0,
        fire: true,
        ..Default::default()
    }
}

fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match Settings::load(path) {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(err) => {
            log::warn!("Could not load settings from {}: {}; using defaults", path, err);
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = load_settings(args.first().map(String::as_str));
    let seconds = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RUN_SECONDS);

    log::info!("Top-down shooter (headless) starting, seed {}", settings.seed);
    let mut state = GameState::new(settings);
    let mut audio = TallyAudio::default();

    let start = TickInput {
        confirm: true,
        ..Default::default()
    };
    tick(&mut state, &start, &mut audio);

    let end_ms = seconds * 1000;
    let mut now_ms = 0;
    let mut ticks = 0;
    while now_ms < end_ms && state.phase == GamePhase::Playing {
        now_ms += FRAME_MS;
        let input = TickInput {
            now_ms,
            keys: autopilot(&state),
            ..Default::default()
        };
        tick(&mut state, &input, &mut audio);
        ticks += 1;

        if ticks % 600 == 0 {
            log::debug!("t={}ms sprites={}", now_ms, sprite_batch(&state).len());
        }
    }

    let summary = RunSummary {
        seed: state.settings.seed,
        ticks,
        elapsed_ms: now_ms,
        phase: state.phase,
        stage: state.stage_manager.current_stage().map(|s| s.stage_number),
        stage_kills: state.stage_manager.kills(),
        level: state.player.as_ref().map(|p| p.level),
        health: state.player.as_ref().map(|p| p.health),
        enemies: state.enemies.len(),
        obstacles: state.obstacles.len(),
        orbs: state.orbs.len(),
        sounds: audio.counts,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize run summary: {}", err),
    }
}
