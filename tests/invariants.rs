//! Whole-simulation invariants and gameplay scenarios

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use top_down_shooter::consts::*;
use top_down_shooter::sim::{
    Bullet, BulletType, Enemy, EnemyState, EnemyType, GamePhase, GameState, KeyState, Obstacle,
    ObstacleType, Player, ShootingPattern, StageData, TickInput, populate_obstacles, tick,
};
use top_down_shooter::{Settings, SoundEffect};

fn playing(settings: Settings) -> GameState {
    let mut state = GameState::new(settings);
    state.start_new_game(0);
    state
}

fn at(now_ms: u64) -> TickInput {
    TickInput {
        now_ms,
        ..Default::default()
    }
}

/// Stage that throws bosses at the player as fast as possible
fn boss_rush() -> StageData {
    StageData {
        stage_number: 1,
        kill_goal: u32::MAX,
        spawn_interval_ms: 100,
        base_spawn_count: 3,
        spawn_weights: vec![(EnemyType::Quick, 500), (EnemyType::Tank, 500)],
        can_spawn_boss: true,
        boss_spawn_chance: SPAWN_WEIGHT_TOTAL,
    }
}

#[test]
fn scenario_a_single_shot_along_facing() {
    let mut player = Player::new(Vec2::ZERO);
    assert_eq!(player.angle, 0.0);
    let mut bullets = Vec::new();
    let mut audio: Vec<SoundEffect> = Vec::new();

    let fired = player.shoot(ShootingPattern::Single, 10_000, &mut bullets, &mut audio);

    assert_eq!(fired, 1);
    assert_eq!(bullets.len(), 1);
    let vel = bullets[0].vel;
    assert!((vel.length() - BULLET_SPEED * player.speed_multiplier).abs() < 1e-4);
    // Angle 0 faces up the screen
    assert!(vel.x.abs() < 1e-4);
    assert!(vel.y < 0.0);
    assert_eq!(audio, vec![SoundEffect::PlayerShoot]);
}

#[test]
fn scenario_b_enemy_killed_by_two_hits() {
    let mut state = playing(Settings::default());
    let target = Vec2::new(0.0, -300.0);
    let mut rng = Pcg32::seed_from_u64(1);
    state.enemies.push(Enemy::new(EnemyType::Normal, target, 0, &mut rng));
    assert_eq!(state.enemies[0].health, 100);
    for _ in 0..2 {
        state
            .bullets
            .push(Bullet::new(target, Vec2::ZERO, 60, BulletType::Normal));
    }

    let mut audio: Vec<SoundEffect> = Vec::new();
    tick(&mut state, &at(16), &mut audio);

    assert!(state.enemies.is_empty());
    assert_eq!(state.stage_manager.kills(), 1);
    assert_eq!(state.orbs.len(), 1);
    assert_eq!(state.orbs[0].xp_value, EnemyType::Normal.stats().orb_xp);
    assert!(state.bullets.is_empty());
    assert_eq!(audio.iter().filter(|e| **e == SoundEffect::EnemyDeath).count(), 1);
}

#[test]
fn scenario_b_health_clamps_at_zero() {
    let mut rng = Pcg32::seed_from_u64(1);
    let mut enemy = Enemy::new(EnemyType::Normal, Vec2::ZERO, 0, &mut rng);
    enemy.take_damage(60);
    assert_eq!(enemy.health, 40);
    enemy.take_damage(60);
    assert_eq!(enemy.health, 0);
}

#[test]
fn scenario_c_stage_progression() {
    let mut state = GameState::with_stage_list(
        Settings::default(),
        vec![StageData::with_kill_goal(1, 10), StageData::with_kill_goal(2, 20)],
    );
    let manager = &mut state.stage_manager;
    manager.start_game();
    for _ in 0..10 {
        manager.record_kill();
    }
    assert!(manager.should_advance());
    manager.advance_stage();
    assert_eq!(manager.current_index(), Some(1));
    assert_eq!(manager.kills(), 0);

    manager.advance_stage();
    assert!(manager.is_game_won());
    assert_eq!(manager.current_index(), Some(1));
}

#[test]
fn scenario_d_neutral_obstacle_survives_zero_health() {
    let mut state = playing(Settings::default());
    let rock = Vec2::new(0.0, -400.0);
    let turret = Vec2::new(400.0, 0.0);

    let mut neutral = Obstacle::new(rock, 80.0, ObstacleType::Neutral);
    neutral.take_damage(i32::MAX);
    assert_eq!(neutral.health, 0);
    let mut hostile = Obstacle::new(turret, 80.0, ObstacleType::Hostile);
    hostile.take_damage(i32::MAX);
    state.obstacles.push(neutral);
    state.obstacles.push(hostile);
    state
        .bullets
        .push(Bullet::new(rock, Vec2::ZERO, PLAYER_BULLET_DAMAGE, BulletType::Normal));

    let mut audio: Vec<SoundEffect> = Vec::new();
    tick(&mut state, &at(16), &mut audio);

    assert!(
        state
            .obstacles
            .iter()
            .any(|o| o.kind == ObstacleType::Neutral && o.health == 0 && o.pos.x == rock.x)
    );
    assert!(!state.obstacles.iter().any(|o| o.pos == turret));
    assert!(state.bullets.is_empty());
}

#[test]
fn scenario_e_state_changes_are_rate_limited() {
    let mut rng = Pcg32::seed_from_u64(9);
    let mut enemy = Enemy::new(EnemyType::Normal, Vec2::ZERO, 0, &mut rng);

    let mut transitions = 0;
    for now in [3100, 3600, 4000] {
        if enemy.evaluate_state(RETREAT_DISTANCE - 50.0, now) {
            transitions += 1;
        }
    }
    assert_eq!(transitions, 1);
    assert_eq!(enemy.state, EnemyState::Retreating);
    assert_eq!(enemy.last_state_change_ms, 3100);
}

#[test]
fn game_over_on_player_death() {
    let mut state = playing(Settings::default());
    if let Some(player) = state.player.as_mut() {
        player.health = 1;
    }
    state
        .hostile_bullets
        .push(Bullet::new(Vec2::ZERO, Vec2::ZERO, OBSTACLE_BULLET_DAMAGE, BulletType::Normal));
    let mut audio: Vec<SoundEffect> = Vec::new();
    tick(&mut state, &at(16), &mut audio);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(audio.last(), Some(&SoundEffect::PlayerDeath));
}

proptest! {
    #[test]
    fn prop_damage_never_drives_health_negative(
        hits in prop::collection::vec(0i32..100_000, 1..20),
    ) {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut player = Player::new(Vec2::ZERO);
        let mut enemy = Enemy::new(EnemyType::Boss, Vec2::ZERO, 0, &mut rng);
        let mut neutral = Obstacle::new(Vec2::ZERO, 60.0, ObstacleType::Neutral);
        let mut hostile = Obstacle::new(Vec2::ZERO, 60.0, ObstacleType::Hostile);
        for hit in hits {
            player.take_damage(hit);
            enemy.take_damage(hit);
            neutral.take_damage(hit);
            hostile.take_damage(hit);
            prop_assert!(player.health >= 0);
            prop_assert!(enemy.health >= 0);
            prop_assert!(neutral.health >= 0);
            prop_assert!(hostile.health >= 0);
        }
    }

    #[test]
    fn prop_xp_threshold_strictly_increases(gains in prop::collection::vec(0i32..2_000, 1..30)) {
        let mut player = Player::new(Vec2::ZERO);
        for gain in gains {
            let level = player.level;
            let threshold = player.experience_to_next_level;
            let levels = player.add_experience(gain);
            prop_assert_eq!(player.level, level + levels);
            if levels > 0 {
                prop_assert!(player.experience_to_next_level > threshold);
            } else {
                prop_assert_eq!(player.experience_to_next_level, threshold);
            }
            prop_assert!(player.experience >= 0);
            prop_assert!(player.experience < player.experience_to_next_level);
        }
    }

    #[test]
    fn prop_obstacle_spawn_respects_cap_and_spacing(
        seed in any::<u64>(),
        px in -5_000.0f32..5_000.0,
        py in -5_000.0f32..5_000.0,
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Vec2::new(px, py);
        let mut obstacles = Vec::new();
        populate_obstacles(&mut obstacles, player, &mut rng);

        prop_assert!(obstacles.len() <= MAX_OBSTACLES);
        for (i, a) in obstacles.iter().enumerate() {
            for b in &obstacles[i + 1..] {
                prop_assert!(a.pos.distance(b.pos) >= MIN_SEPARATION_DISTANCE);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_tick_leaves_no_inactive_bullets_and_one_boss(
        seed in any::<u64>(),
        keys in prop::collection::vec(any::<(bool, bool, bool, bool)>(), 300),
    ) {
        let settings = Settings { seed, ..Settings::default() };
        let mut state = GameState::with_stage_list(settings, vec![boss_rush()]);
        state.start_new_game(0);
        let mut audio: Vec<SoundEffect> = Vec::new();

        for (i, (forward, left, right, boost)) in keys.into_iter().enumerate() {
            let input = TickInput {
                now_ms: (i as u64 + 1) * 16,
                keys: KeyState {
                    forward,
                    rotate_left: left,
                    rotate_right: right,
                    boost,
                    fire: true,
                    ..Default::default()
                },
                ..Default::default()
            };
            tick(&mut state, &input, &mut audio);
            audio.clear();

            prop_assert!(state.bullets.iter().all(|b| b.active));
            prop_assert!(state.hostile_bullets.iter().all(|b| b.active));
            prop_assert!(state.boss_count() <= 1);
            prop_assert!(state.obstacles.len() <= MAX_OBSTACLES);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }
}
