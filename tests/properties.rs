//! Property tests for the pure pieces of the simulation

use std::f32::consts::{PI, TAU};

use arena_survivor::config::GameConfig;
use arena_survivor::sim::progression::{confirm_choice, gain_experience};
use arena_survivor::sim::spawner::spawn_enemy_at;
use arena_survivor::sim::{
    Camera, GamePhase, GameState, TickInput, effective_spawn_interval, fan_angles, radial_angles,
    tick,
};
use glam::Vec2;
use proptest::prelude::*;

proptest! {
    #[test]
    fn camera_never_shows_outside_the_map(
        map_w in 10.0f32..5000.0,
        map_h in 10.0f32..5000.0,
        view_w in 10.0f32..2000.0,
        view_h in 10.0f32..2000.0,
        fx in 0.0f32..=1.0,
        fy in 0.0f32..=1.0,
    ) {
        let map = Vec2::new(map_w, map_h);
        let view = Vec2::new(view_w, view_h);
        let player = Vec2::new(fx * map_w, fy * map_h);
        let cam = Camera::follow(player, map, view);

        for (origin, map, view) in [(cam.origin.x, map_w, view_w), (cam.origin.y, map_h, view_h)] {
            if map > view {
                prop_assert!(origin >= 0.0);
                prop_assert!(origin + view <= map + 1e-2);
            } else {
                prop_assert!((origin - (map - view) / 2.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn fan_is_symmetric_around_bearing(
        bearing in -PI..PI,
        count in 1u32..10,
        spread in 0.0f32..PI,
    ) {
        let angles = fan_angles(bearing, count, spread);
        prop_assert_eq!(angles.len(), count as usize);
        let n = angles.len();
        for i in 0..n {
            prop_assert!((angles[i] + angles[n - 1 - i] - 2.0 * bearing).abs() < 1e-4);
        }
        if count == 1 {
            prop_assert_eq!(angles[0], bearing);
        } else {
            prop_assert!((angles[0] - (bearing - spread / 2.0)).abs() < 1e-4);
            prop_assert!((angles[n - 1] - (bearing + spread / 2.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn radial_burst_is_evenly_spaced(count in 1u32..64) {
        let angles = radial_angles(count);
        prop_assert_eq!(angles.len(), count as usize);
        prop_assert_eq!(angles[0], 0.0);
        let step = TAU / count as f32;
        for pair in angles.windows(2) {
            prop_assert!((pair[1] - pair[0] - step).abs() < 1e-4);
        }
    }

    #[test]
    fn spawn_interval_never_below_floor(level in 1u32..200) {
        let spawning = GameConfig::default().spawning;
        let interval = effective_spawn_interval(level, &spawning);
        prop_assert!(interval >= spawning.min_spawn_interval);
        prop_assert!(interval <= spawning.base_spawn_interval);
    }

    #[test]
    fn level_ups_are_never_missed(gains in prop::collection::vec(0.0f32..80.0, 1..40)) {
        let mut config = GameConfig::default();
        config.upgrades.clear();
        let mut state = GameState::new(config, 5);
        state.phase = GamePhase::Playing;

        for gain in gains {
            let level_before = state.player.level;
            let threshold_before = state.player.next_level_exp;
            gain_experience(&mut state, gain);
            while state.phase == GamePhase::LevelUp {
                prop_assert!(confirm_choice(&mut state, 0));
            }
            prop_assert!(state.player.experience >= 0.0);
            prop_assert!(state.player.experience < state.player.next_level_exp);
            prop_assert!(state.player.level >= level_before);
            prop_assert!(state.player.next_level_exp >= threshold_before);
        }
    }

    #[test]
    fn health_stays_in_bounds_under_contact(
        steps in prop::collection::vec(0.0f32..0.5, 1..60),
        damage in 0.0f32..200.0,
    ) {
        let mut config = GameConfig::default();
        config.enemies.truncate(1);
        config.enemies[0].damage = damage;
        config.enemies[0].speed = 0.0;
        config.enemies[0].health = 1.0e9;
        config.spawning.initial_enemy_count = 0;
        let mut state = GameState::new(config, 8);
        tick(&mut state, &TickInput { restart: true, ..Default::default() }, 0.0);
        let p = state.player.pos;
        spawn_enemy_at(&mut state, 0, p);

        for dt in steps {
            tick(&mut state, &TickInput::default(), dt);
            prop_assert!(state.player.health >= 0.0);
            prop_assert!(state.player.health <= state.player.max_health);
            prop_assert!(state.enemies.len() <= state.max_enemies as usize);
            if state.player.health == 0.0 {
                prop_assert_eq!(state.phase, GamePhase::GameOver);
            }
        }
    }
}
