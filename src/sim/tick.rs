//! Per-tick simulation sequencing
//!
//! One call to [`tick`] handles phase commands and, while playing, runs the
//! combat pipeline in a fixed order: world population, player bullets,
//! hostile bullets, player push-out, AI updates, orbs, then spawning and
//! stage progression. Entities are only removed by `retain` passes after a
//! step finishes iterating.

use glam::Vec2;
use rand::Rng;

use super::obstacle::ObstacleType;
use super::orb::Orb;
use super::player::{KeyState, Player};
use super::spawn::{despawn_far_obstacles, populate_obstacles, spawn_enemies};
use super::stage::StageAdvance;
use super::state::{GamePhase, GameState};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Monotonic clock reading for this tick
    pub now_ms: u64,
    /// Held keys
    pub keys: KeyState,
    /// Pause toggle
    pub pause: bool,
    /// Start / continue
    pub confirm: bool,
    /// Back to the main menu
    pub escape: bool,
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    match state.phase {
        GamePhase::MainMenu => {
            if input.confirm {
                state.start_new_game(input.now_ms);
            }
        }
        GamePhase::Paused => {
            if input.escape {
                state.return_to_menu();
            } else if input.pause {
                state.toggle_pause();
            }
        }
        GamePhase::GameOver | GamePhase::Credits => {
            if input.confirm || input.escape {
                state.return_to_menu();
            }
        }
        GamePhase::Playing => {
            if input.escape {
                state.return_to_menu();
            } else if input.pause {
                state.toggle_pause();
            } else {
                update_playing(state, input, audio);
            }
        }
    }
}

/// Outcome of the combat steps that ends the playing phase
enum RunEnd {
    PlayerDied,
    GameWon,
}

fn update_playing(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) {
    if state.player.is_none() {
        log::warn!("Playing without a player, ending the run");
        state.enter_game_over();
        return;
    }
    if state.stage_manager.current_stage().is_none() {
        log::warn!("Playing without a current stage, returning to menu");
        state.return_to_menu();
        return;
    }

    state.time_ticks += 1;
    match run_combat(state, input, audio) {
        Some(RunEnd::PlayerDied) => {
            audio.play(SoundEffect::PlayerDeath);
            state.enter_game_over();
        }
        Some(RunEnd::GameWon) => state.enter_credits(input.now_ms),
        None => {}
    }
}

fn player_died(player: &Player) -> bool {
    if player.is_dead() {
        log::debug!("Player destroyed at ({:.0}, {:.0})", player.pos.x, player.pos.y);
        return true;
    }
    false
}

fn run_combat(
    state: &mut GameState,
    input: &TickInput,
    audio: &mut dyn AudioSink,
) -> Option<RunEnd> {
    let now = input.now_ms;
    let GameState {
        settings,
        rng,
        player,
        bullets,
        hostile_bullets,
        enemies,
        obstacles,
        orbs,
        stage_manager,
        last_enemy_spawn_ms,
        ..
    } = state;
    let player = player.as_mut()?;
    let cull_range = Vec2::new(settings.screen_width, settings.screen_height);

    player.handle_input(&input.keys, now, bullets, audio);

    // 1. World population
    despawn_far_obstacles(obstacles, player.pos);
    populate_obstacles(obstacles, player.pos, rng);

    // 2. Player bullets against enemies, then obstacles
    for bullet in bullets.iter_mut().filter(|b| b.active) {
        bullet.update();
        let rect = bullet.rect();

        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && e.rect().intersects(&rect))
        {
            enemy.take_damage(bullet.damage);
            bullet.active = false;
            if enemy.is_dead() {
                log::debug!("{:?} enemy destroyed", enemy.kind);
                stage_manager.record_kill();
                audio.play(SoundEffect::EnemyDeath);
                if rng.random::<f32>() < settings.orb_drop_chance {
                    orbs.push(Orb::for_enemy(enemy.kind, enemy.pos));
                }
            }
        } else if let Some(obstacle) = obstacles.iter_mut().find(|o| o.rect().intersects(&rect)) {
            obstacle.take_damage(bullet.damage);
            bullet.active = false;
        }

        bullet.cull_outside(player.pos, cull_range);
    }
    bullets.retain(|b| b.active);
    enemies.retain(|e| !e.is_dead());
    // Neutral obstacles stay even at zero health
    obstacles.retain(|o| !(o.is_destructible() && o.is_dead()));

    // 3. Hostile bullets against the player; neutral obstacles give cover
    for bullet in hostile_bullets.iter_mut().filter(|b| b.active) {
        bullet.update();
        let rect = bullet.rect();

        if rect.intersects(&player.rect()) {
            player.take_damage(bullet.damage);
            bullet.active = false;
            audio.play(SoundEffect::PlayerHit);
        } else if obstacles
            .iter()
            .any(|o| o.kind == ObstacleType::Neutral && o.rect().intersects(&rect))
        {
            bullet.active = false;
        }

        bullet.cull_outside(player.pos, cull_range);
    }
    hostile_bullets.retain(|b| b.active);
    if player_died(player) {
        return Some(RunEnd::PlayerDied);
    }

    // 4. Push the player out of obstacles
    for obstacle in obstacles.iter() {
        let Some(push) = player.rect().separation(&obstacle.rect()) else {
            continue;
        };
        player.pos += push;

        if obstacle.kind == ObstacleType::Hostile {
            let ready = player.last_contact_damage_ms.is_none_or(|last| {
                now.saturating_sub(last) >= settings.hostile_contact_cooldown_ms
            });
            if ready {
                player.take_damage(HOSTILE_CONTACT_DAMAGE);
                player.last_contact_damage_ms = Some(now);
                audio.play(SoundEffect::PlayerHit);
            }
        }
    }
    if player_died(player) {
        return Some(RunEnd::PlayerDied);
    }

    // 5. AI
    for enemy in enemies.iter_mut() {
        enemy.update(player, obstacles, now, hostile_bullets, rng, audio);
    }
    for obstacle in obstacles.iter_mut() {
        obstacle.update(player.pos, now, hostile_bullets, rng, audio);
    }

    // 6. Orbs
    let player_rect = player.rect();
    let mut collected = 0;
    for orb in orbs.iter_mut() {
        orb.update(player.pos);
    }
    orbs.retain(|orb| {
        if orb.rect().intersects(&player_rect) {
            collected += orb.xp_value;
            return false;
        }
        !orb.is_faded()
    });
    if collected > 0 && player.add_experience(collected) > 0 {
        audio.play(SoundEffect::LevelUp);
    }

    // 7. Spawning and stage progression
    if let Some(stage) = stage_manager.current_stage() {
        spawn_enemies(
            enemies,
            stage,
            player.pos,
            settings.enemy_spawn_distance(),
            now,
            last_enemy_spawn_ms,
            rng,
        );
    }

    if stage_manager.should_advance() {
        match stage_manager.advance_stage() {
            StageAdvance::Advanced(number) => {
                log::info!("Stage {} started", number);
                player.level_up();
                audio.play(SoundEffect::StageClear);
            }
            StageAdvance::GameWon => {
                audio.play(SoundEffect::StageClear);
                return Some(RunEnd::GameWon);
            }
            StageAdvance::NoStage => {}
        }
    }

    None
}
