//! Enemy spawning and item drops

use glam::Vec2;
use rand::Rng;

use super::camera::Camera;
use super::progression::level_scale;
use super::select::weighted_index;
use super::state::{Enemy, GameState, Item, clamp_to_map};

/// Create one enemy of archetype `index` at `pos`, scaled to the player's
/// current level. Returns the new enemy's id.
pub fn spawn_enemy_at(state: &mut GameState, index: usize, pos: Vec2) -> u32 {
    let id = state.next_entity_id();
    let level = state.player.level;
    let archetype = &state.config.enemies[index];
    let progression = &state.config.progression;

    let health = archetype.health * level_scale(level, progression.enemy_health_per_level);
    let enemy = Enemy {
        id,
        archetype: archetype.name.clone(),
        pos,
        health,
        max_health: health,
        speed: archetype.speed * level_scale(level, progression.enemy_speed_per_level),
        damage: archetype.damage * level_scale(level, progression.enemy_damage_per_level),
        exp_reward: archetype.exp_reward,
        radius: archetype.size,
    };
    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}) hp {:.1}",
        enemy.archetype,
        id,
        pos.x,
        pos.y,
        health
    );
    state.enemies.push(enemy);
    id
}

/// Advance the spawn timer and create at most one enemy.
///
/// The timer only resets when an enemy is actually created, so a full
/// population spawns as soon as room frees up.
pub fn try_spawn_enemy(state: &mut GameState, dt: f32) -> bool {
    state.spawn_accumulator += dt;
    if state.spawn_accumulator < state.spawn_interval
        || state.enemies.len() >= state.max_enemies as usize
    {
        return false;
    }

    let Some(index) = weighted_index(&state.config.enemies, &mut state.rng) else {
        return false;
    };
    state.spawn_accumulator = 0.0;

    let radius = state.config.enemies[index].size;
    let margin = state.config.spawning.spawn_margin + radius;
    let viewport = state.viewport_size();
    let pos = edge_spawn_position(&mut state.rng, &state.camera, viewport, margin);
    let pos = clamp_to_map(pos, radius, state.map_size());
    spawn_enemy_at(state, index, pos);
    true
}

/// Scatter the opening population around the player
pub fn spawn_initial_population(state: &mut GameState) {
    let spawning = state.config.spawning.clone();
    let center = state.player.pos;

    for _ in 0..spawning.initial_enemy_count {
        if state.enemies.len() >= state.max_enemies as usize {
            break;
        }
        let Some(index) = weighted_index(&state.config.enemies, &mut state.rng) else {
            return;
        };

        let mut offset = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * spawning.initial_spawn_window;
        if offset.length() < spawning.initial_spawn_safe_radius {
            let dir = offset.normalize_or_zero();
            let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
            offset = dir * spawning.initial_spawn_safe_radius;
        }

        let radius = state.config.enemies[index].size;
        let pos = clamp_to_map(center + offset, radius, state.map_size());
        spawn_enemy_at(state, index, pos);
    }
}

/// A point just outside one viewport edge, side chosen uniformly
pub fn edge_spawn_position(
    rng: &mut impl Rng,
    camera: &Camera,
    viewport: Vec2,
    margin: f32,
) -> Vec2 {
    let min = camera.origin;
    let max = camera.origin + viewport;
    let t = rng.random::<f32>();
    match rng.random_range(0..4u8) {
        // top
        0 => Vec2::new(min.x + t * viewport.x, min.y - margin),
        // right
        1 => Vec2::new(max.x + margin, min.y + t * viewport.y),
        // bottom
        2 => Vec2::new(min.x + t * viewport.x, max.y + margin),
        // left
        _ => Vec2::new(min.x - margin, min.y + t * viewport.y),
    }
}

/// Maybe drop an item where an enemy died
pub fn try_drop_item(state: &mut GameState, pos: Vec2) -> bool {
    let drops = &state.config.drops;
    if state.items.len() >= drops.max_items as usize {
        return false;
    }
    if state.rng.random::<f32>() >= drops.item_drop_chance {
        return false;
    }
    let Some(index) = weighted_index(&state.config.items, &mut state.rng) else {
        return false;
    };

    let archetype = &state.config.items[index];
    let item = Item {
        pos,
        kind: archetype.kind,
        radius: state.config.drops.item_size,
        effect_duration: archetype.duration,
        effect_value: archetype.value,
        lifetime: archetype.lifetime,
    };
    log::debug!("Dropped {} at ({:.0}, {:.0})", item.kind.as_str(), pos.x, pos.y);
    state.items.push(item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyArchetype, GameConfig, ItemArchetype, ItemKind};
    use crate::sim::state::GamePhase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state(config: GameConfig) -> GameState {
        let mut state = GameState::new(config, 9);
        state.phase = GamePhase::Playing;
        state.update_camera();
        state
    }

    fn single_enemy_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.enemies = vec![EnemyArchetype::new("grunt", 20.0, 50.0, 10.0, 3.0)];
        config.spawning.base_spawn_interval = 1.0;
        config.spawning.base_max_enemies = 3;
        config
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let mut state = playing_state(single_enemy_config());
        assert!(!try_spawn_enemy(&mut state, 0.6));
        assert!(state.enemies.is_empty());
        assert!(try_spawn_enemy(&mut state, 0.5));
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_accumulator, 0.0);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut state = playing_state(single_enemy_config());
        for _ in 0..10 {
            try_spawn_enemy(&mut state, 1.0);
        }
        assert_eq!(state.enemies.len(), 3);

        // Timer keeps running while capped; spawns as soon as room frees up
        state.enemies.pop();
        assert!(try_spawn_enemy(&mut state, 0.0));
        assert_eq!(state.enemies.len(), 3);
    }

    #[test]
    fn test_existing_population_may_exceed_lowered_cap() {
        let mut state = playing_state(single_enemy_config());
        for _ in 0..3 {
            try_spawn_enemy(&mut state, 1.0);
        }
        state.max_enemies = 1;
        assert!(!try_spawn_enemy(&mut state, 5.0));
        assert_eq!(state.enemies.len(), 3);
    }

    #[test]
    fn test_empty_archetypes_spawn_nothing() {
        let mut config = single_enemy_config();
        config.enemies.clear();
        let mut state = playing_state(config);
        assert!(!try_spawn_enemy(&mut state, 10.0));
        spawn_initial_population(&mut state);
        assert!(state.enemies.is_empty());

        let mut config = single_enemy_config();
        config.enemies[0].weight = 0.0;
        let mut state = playing_state(config);
        assert!(!try_spawn_enemy(&mut state, 10.0));
    }

    #[test]
    fn test_enemy_stats_scale_with_level_and_freeze() {
        let mut config = single_enemy_config();
        config.progression.enemy_health_per_level = 0.5;
        config.progression.enemy_speed_per_level = 0.1;
        config.progression.enemy_damage_per_level = 0.25;
        let mut state = playing_state(config);

        state.player.level = 3;
        spawn_enemy_at(&mut state, 0, Vec2::ZERO);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.health, 40.0);
        assert_eq!(enemy.max_health, 40.0);
        assert!((enemy.speed - 60.0).abs() < 1e-4);
        assert_eq!(enemy.damage, 15.0);
        assert_eq!(enemy.exp_reward, 3.0);

        // Later level-ups don't touch existing enemies
        state.player.level = 10;
        assert_eq!(state.enemies[0].health, 40.0);
    }

    #[test]
    fn test_spawn_lands_outside_viewport_inside_map() {
        let mut state = playing_state(single_enemy_config());
        let viewport = state.viewport_size();
        let map = state.map_size();
        for _ in 0..50 {
            state.enemies.clear();
            assert!(try_spawn_enemy(&mut state, 1.0));
            let enemy = &state.enemies[0];
            assert!(!state.camera.is_visible(enemy.pos, 0.0, viewport));
            assert!(enemy.pos.x >= 0.0 && enemy.pos.x <= map.x);
            assert!(enemy.pos.y >= 0.0 && enemy.pos.y <= map.y);
        }
    }

    #[test]
    fn test_spawn_at_map_edge_is_clamped() {
        let mut state = playing_state(single_enemy_config());
        state.player.pos = Vec2::new(5.0, 5.0);
        state.update_camera();
        for _ in 0..50 {
            state.enemies.clear();
            assert!(try_spawn_enemy(&mut state, 1.0));
            let pos = state.enemies[0].pos;
            assert!(pos.x >= 0.0 && pos.y >= 0.0);
        }
    }

    #[test]
    fn test_edge_positions_cover_all_sides() {
        let mut rng = Pcg32::seed_from_u64(5);
        let camera = Camera { origin: Vec2::new(100.0, 100.0) };
        let viewport = Vec2::new(800.0, 600.0);
        let mut sides = [false; 4];
        for _ in 0..200 {
            let p = edge_spawn_position(&mut rng, &camera, viewport, 10.0);
            if p.y == 90.0 {
                sides[0] = true;
            } else if p.x == 910.0 {
                sides[1] = true;
            } else if p.y == 710.0 {
                sides[2] = true;
            } else if p.x == 90.0 {
                sides[3] = true;
            } else {
                panic!("position {p} not on any edge");
            }
        }
        assert!(sides.iter().all(|&s| s));
    }

    #[test]
    fn test_initial_population_around_player() {
        let mut config = single_enemy_config();
        config.spawning.initial_enemy_count = 3;
        config.spawning.initial_spawn_window = 400.0;
        config.spawning.initial_spawn_safe_radius = 100.0;
        let mut state = playing_state(config);
        spawn_initial_population(&mut state);
        assert_eq!(state.enemies.len(), 3);
        for enemy in &state.enemies {
            let d = enemy.pos - state.player.pos;
            assert!(d.length() >= 100.0 - 1e-3);
            assert!(d.x.abs() <= 200.0 + 1e-3 && d.y.abs() <= 200.0 + 1e-3);
        }
    }

    #[test]
    fn test_item_drop_rules() {
        let mut config = GameConfig::default();
        config.items = vec![ItemArchetype {
            kind: ItemKind::Magnet,
            duration: 4.0,
            value: 100.0,
            weight: 1.0,
            lifetime: 8.0,
        }];
        config.drops.item_drop_chance = 1.0;
        config.drops.max_items = 2;
        let mut state = playing_state(config);

        assert!(try_drop_item(&mut state, Vec2::new(10.0, 20.0)));
        let item = &state.items[0];
        assert_eq!(item.kind, ItemKind::Magnet);
        assert_eq!(item.pos, Vec2::new(10.0, 20.0));
        assert_eq!(item.effect_duration, 4.0);
        assert_eq!(item.effect_value, 100.0);
        assert_eq!(item.lifetime, 8.0);

        assert!(try_drop_item(&mut state, Vec2::ZERO));
        // At max
        assert!(!try_drop_item(&mut state, Vec2::ZERO));
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_item_drop_chance_zero_and_empty_list() {
        let mut config = GameConfig::default();
        config.drops.item_drop_chance = 0.0;
        let mut state = playing_state(config);
        for _ in 0..100 {
            assert!(!try_drop_item(&mut state, Vec2::ZERO));
        }

        let mut config = GameConfig::default();
        config.drops.item_drop_chance = 1.0;
        config.items.clear();
        let mut state = playing_state(config);
        assert!(!try_drop_item(&mut state, Vec2::ZERO));
    }
}
