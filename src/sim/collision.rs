//! Collision detection and response
//!
//! Everything is a circle. Sweeps never remove from a collection while
//! iterating it: hits are marked in removal masks and applied afterwards.

use glam::Vec2;

use super::combat::apply_item_effect;
use super::progression::gain_experience;
use super::spawner::try_drop_item;
use super::state::{ExperienceGem, GameEvent, GamePhase, GameState};

/// Strict circle overlap (touching edges don't count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Resolve all contacts for this frame, after movement.
///
/// Order: projectiles vs enemies, enemies vs player, player vs gems, player
/// vs items. Stops right after the player dies.
pub fn resolve_collisions(state: &mut GameState, dt: f32) {
    resolve_projectile_hits(state);
    resolve_contact_damage(state, dt);
    if state.phase == GamePhase::GameOver {
        return;
    }
    collect_gems(state);
    collect_items(state);
}

/// Each projectile damages at most one enemy; each enemy dies at most once
fn resolve_projectile_hits(state: &mut GameState) {
    if state.projectiles.is_empty() || state.enemies.is_empty() {
        return;
    }

    let mut spent = vec![false; state.projectiles.len()];
    let mut dead = vec![false; state.enemies.len()];
    let mut deaths: Vec<usize> = Vec::new();

    for (pi, projectile) in state.projectiles.iter().enumerate() {
        for (ei, enemy) in state.enemies.iter_mut().enumerate() {
            if dead[ei] || !circles_overlap(projectile.pos, projectile.radius, enemy.pos, enemy.radius)
            {
                continue;
            }
            enemy.health -= projectile.damage;
            spent[pi] = true;
            if enemy.health <= 0.0 {
                enemy.health = 0.0;
                dead[ei] = true;
                deaths.push(ei);
            }
            break;
        }
    }

    for ei in deaths {
        let (id, pos, value) = {
            let enemy = &state.enemies[ei];
            (enemy.id, enemy.pos, enemy.exp_reward)
        };
        state.gems.push(ExperienceGem {
            pos,
            value,
            lifetime: state.config.drops.gem_lifetime,
            radius: state.config.drops.gem_size,
        });
        try_drop_item(state, pos);
        state.kills += 1;
        state.events.push(GameEvent::EnemyKilled { id, pos });
        log::debug!("Enemy #{} killed at ({:.0}, {:.0})", id, pos.x, pos.y);
    }

    let mut spent = spent.into_iter();
    state.projectiles.retain(|_| !spent.next().unwrap_or(false));
    let mut dead = dead.into_iter();
    state.enemies.retain(|_| !dead.next().unwrap_or(false));
}

/// Overlapping enemies drain health continuously
fn resolve_contact_damage(state: &mut GameState, dt: f32) {
    let player = &state.player;
    let dps: f32 = state
        .enemies
        .iter()
        .filter(|e| circles_overlap(player.pos, player.size, e.pos, e.radius))
        .map(|e| e.damage)
        .sum();
    if dps <= 0.0 {
        return;
    }

    let player = &mut state.player;
    player.take_damage(dps * dt);
    if player.hit_feedback_cooldown <= 0.0 {
        player.hit_feedback_cooldown = state.config.player.hit_feedback_cooldown;
        state.events.push(GameEvent::PlayerHit {
            health: player.health,
        });
    }

    if player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.survival_time = Some(state.elapsed);
        state.events.push(GameEvent::GameOver {
            survival_time: state.elapsed,
        });
        log::info!(
            "Game over at {:.1}s: level {}, {} kills",
            state.elapsed,
            state.player.level,
            state.kills
        );
    }
}

fn collect_gems(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_size = state.player.size;
    let mut collected = 0.0;
    state.gems.retain(|gem| {
        if circles_overlap(player_pos, player_size, gem.pos, gem.radius) {
            collected += gem.value;
            false
        } else {
            true
        }
    });
    if collected > 0.0 {
        gain_experience(state, collected);
    }
}

fn collect_items(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_size = state.player.size;
    let (picked, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|item| circles_overlap(player_pos, player_size, item.pos, item.radius));
    state.items = remaining;

    for item in picked {
        apply_item_effect(&mut state.player, &item);
        state.events.push(GameEvent::ItemCollected { kind: item.kind });
        log::debug!("Collected {}", item.kind.as_str());
    }
}
