//! Per-frame simulation step
//!
//! The host calls [`tick`] once per animation frame with the wall-clock delta.
//! There is no sub-stepping: a huge `dt` after the tab was backgrounded moves
//! everything in one jump.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::combat::{integrate_projectiles, update_attacks, update_effects};
use super::progression::confirm_choice;
use super::spawner::try_spawn_enemy;
use super::state::{GamePhase, GameState};

/// Movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Normalized movement direction (screen space, +y is down)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: HeldKeys,
    /// Shoot now (Playing only, ignored during special attack)
    pub fire: bool,
    /// Upgrade picked on the LevelUp screen
    pub confirm_choice: Option<usize>,
    /// Start from Title or restart from GameOver
    pub restart: bool,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = dt.max(0.0);

    match state.phase {
        GamePhase::Title => {
            if input.restart {
                state.start_session();
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.start_session();
            } else {
                state.elapsed += dt;
            }
            return;
        }
        GamePhase::LevelUp => {
            state.elapsed += dt;
            if let Some(choice) = input.confirm_choice {
                confirm_choice(state, choice);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.restart {
        log::debug!("Ignoring restart while playing");
    }

    state.elapsed += dt;

    // Player
    state.player.set_direction(input.keys.direction());
    update_effects(state, dt);
    let map_size = state.map_size();
    state.player.advance(dt, map_size);
    state.update_camera();

    // Attacks and projectiles
    update_attacks(state, dt, input.fire);
    integrate_projectiles(state, dt);

    // Enemies chase the player
    let target = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.pursue(target, dt);
    }

    update_pickups(state, dt);

    resolve_collisions(state, dt);
    if state.phase != GamePhase::Playing {
        return;
    }

    try_spawn_enemy(state, dt);
}

/// Pull gems and items inside the magnet radius toward the player and expire
/// old ones
fn update_pickups(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let radius = state.player.current_magnet_radius;
    let step = state.config.drops.pickup_attract_speed * dt;

    for gem in &mut state.gems {
        attract(&mut gem.pos, target, radius, step);
        gem.lifetime -= dt;
    }
    state.gems.retain(|g| g.lifetime > 0.0);

    for item in &mut state.items {
        attract(&mut item.pos, target, radius, step);
        item.lifetime -= dt;
    }
    state.items.retain(|i| i.lifetime > 0.0);
}

fn attract(pos: &mut Vec2, target: Vec2, radius: f32, step: f32) {
    let to_target = target - *pos;
    let dist_sq = to_target.length_squared();
    if dist_sq >= radius * radius || dist_sq == 0.0 {
        return;
    }
    let dist = dist_sq.sqrt();
    if dist <= step {
        *pos = target;
    } else {
        *pos += to_target / dist * step;
    }
}
