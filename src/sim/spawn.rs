//! World population: obstacle placement around the player and timed enemy
//! spawning from the current stage's mix.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyType};
use super::obstacle::{Obstacle, ObstacleType};
use super::stage::StageData;
use crate::consts::*;
use crate::{random_float, vec_from_degrees};

/// Remove obstacles that drifted out of the despawn radius.
/// Returns how many were removed.
pub fn despawn_far_obstacles(obstacles: &mut Vec<Obstacle>, player_pos: Vec2) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.pos.distance(player_pos) <= DESPAWN_RADIUS);
    before - obstacles.len()
}

/// Top up obstacles around the player with jittered-grid rejection sampling.
///
/// The square of side `2 * SPAWN_RADIUS` centred on the player is cut into
/// `NUM_GRID_CELLS`² cells. Each accepted candidate claims its cell for the
/// rest of this call. Gives up after `MAX_SPAWN_ATTEMPTS` consecutive
/// rejections. Returns the number of obstacles spawned.
pub fn populate_obstacles<R: Rng + ?Sized>(
    obstacles: &mut Vec<Obstacle>,
    player_pos: Vec2,
    rng: &mut R,
) -> usize {
    let mut occupied = [[false; NUM_GRID_CELLS]; NUM_GRID_CELLS];
    let cell_size = SPAWN_RADIUS * 2.0 / NUM_GRID_CELLS as f32;
    let origin = player_pos - Vec2::splat(SPAWN_RADIUS);
    let half_cell = cell_size / 2.0;

    let mut spawned = 0;
    let mut failures = 0u32;
    while obstacles.len() < MAX_OBSTACLES {
        if failures >= MAX_SPAWN_ATTEMPTS {
            log::debug!("obstacle spawn gave up after {failures} attempts");
            break;
        }

        let gx = rng.random_range(0..NUM_GRID_CELLS);
        let gy = rng.random_range(0..NUM_GRID_CELLS);
        if occupied[gx][gy] {
            failures += 1;
            continue;
        }

        let cell_center = origin + (Vec2::new(gx as f32, gy as f32) + 0.5) * cell_size;
        let candidate = cell_center
            + Vec2::new(
                random_float(rng, -half_cell, half_cell),
                random_float(rng, -half_cell, half_cell),
            );

        // Keep clear of the player and inside the area that survives despawn
        let to_player = candidate.distance(player_pos);
        let crowded = obstacles
            .iter()
            .any(|o| o.pos.distance(candidate) < MIN_SEPARATION_DISTANCE);
        if crowded || to_player < MIN_SEPARATION_DISTANCE || to_player > DESPAWN_RADIUS {
            failures += 1;
            continue;
        }

        occupied[gx][gy] = true;
        failures = 0;

        let size = random_float(rng, OBSTACLE_MIN_SIZE, OBSTACLE_MIN_SIZE + OBSTACLE_SIZE_SPREAD);
        let kind = if rng.random::<f32>() < HOSTILE_OBSTACLE_CHANCE {
            ObstacleType::Hostile
        } else {
            ObstacleType::Neutral
        };
        obstacles.push(Obstacle::new(candidate, size, kind));
        spawned += 1;
    }
    spawned
}

/// Choose an enemy type for one spawn.
///
/// `roll` is a single draw in `0..SPAWN_WEIGHT_TOTAL` used for both checks.
/// A roll under the stage's boss chance yields a BOSS, or a TANK when a boss
/// is already alive. Otherwise the weight table is walked in order and the
/// first running total above the same roll wins, falling back to NORMAL.
pub fn pick_enemy_type(stage: &StageData, boss_alive: bool, roll: u32) -> EnemyType {
    if stage.can_spawn_boss && roll < stage.boss_spawn_chance {
        return if boss_alive {
            EnemyType::Tank
        } else {
            EnemyType::Boss
        };
    }

    let mut total = 0;
    for &(kind, weight) in &stage.spawn_weights {
        total += weight;
        if roll < total {
            return kind;
        }
    }
    EnemyType::Normal
}

/// Spawn the stage's wave on a ring around the player once the spawn
/// interval has elapsed. Returns the number of enemies spawned.
pub fn spawn_enemies<R: Rng + ?Sized>(
    enemies: &mut Vec<Enemy>,
    stage: &StageData,
    player_pos: Vec2,
    spawn_distance: f32,
    now_ms: u64,
    last_spawn_ms: &mut u64,
    rng: &mut R,
) -> usize {
    if now_ms.saturating_sub(*last_spawn_ms) <= stage.spawn_interval_ms {
        return 0;
    }
    *last_spawn_ms = now_ms;

    for _ in 0..stage.base_spawn_count {
        let boss_alive = enemies.iter().any(|e| e.kind == EnemyType::Boss);
        let roll = rng.random_range(0..SPAWN_WEIGHT_TOTAL);
        let kind = pick_enemy_type(stage, boss_alive, roll);

        let heading = random_float(rng, 0.0, 360.0);
        let pos = player_pos + vec_from_degrees(heading) * spawn_distance;
        if kind == EnemyType::Boss {
            log::info!(
                "Boss spawned in stage {} at ({:.0}, {:.0})",
                stage.stage_number,
                pos.x,
                pos.y
            );
        }
        enemies.push(Enemy::new(kind, pos, now_ms, rng));
    }
    stage.base_spawn_count as usize
}
