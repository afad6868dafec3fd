//! Targeting, firing patterns and timed buffs

use std::f32::consts::TAU;

use super::state::{GameEvent, GameState, Item, Player, Projectile};
use crate::config::ItemKind;
use crate::{bearing, direction_from_angle};

/// Bearings for a symmetric fan of `count` shots centred on `bearing`
pub fn fan_angles(bearing: f32, count: u32, spread: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![bearing],
        n => {
            let step = spread / (n - 1) as f32;
            let start = bearing - spread / 2.0;
            (0..n).map(|i| start + step * i as f32).collect()
        }
    }
}

/// Bearings for `count` shots evenly spaced around a full circle
pub fn radial_angles(count: u32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count).map(|i| step * i as f32).collect()
}

/// Spawn one projectile per bearing at the player
fn fire(state: &mut GameState, angles: &[f32], radial: bool) {
    let cfg = &state.config.projectiles;
    let origin = state.player.pos;
    let damage = state.player.damage;
    state.projectiles.extend(angles.iter().map(|&theta| Projectile {
        pos: origin,
        vel: direction_from_angle(theta) * cfg.speed,
        damage,
        lifetime: cfg.lifetime,
        radius: cfg.size,
    }));
    if !angles.is_empty() {
        state.events.push(GameEvent::ProjectilesFired {
            count: angles.len() as u32,
            radial,
        });
    }
}

/// Run the player's attack cadence for this frame.
///
/// Radial bursts replace aimed shots while the special attack is active;
/// the aimed cooldown is frozen meanwhile. Aimed shots go at the nearest
/// enemy. A manual `fire_requested` is latched on the player until the
/// cooldown next runs out; with no enemy around it shoots along the
/// player's facing instead of skipping the shot.
pub fn update_attacks(state: &mut GameState, dt: f32, fire_requested: bool) {
    if state.player.is_special_attacking {
        state.player.special_attack_fire_cooldown -= dt;
        if state.player.special_attack_fire_cooldown <= 0.0 {
            state.player.special_attack_fire_cooldown =
                state.config.projectiles.special_fire_interval;
            let angles = radial_angles(state.config.projectiles.special_count);
            fire(state, &angles, true);
        }
        return;
    }

    if fire_requested {
        state.player.fire_pending = true;
    }
    state.player.current_attack_cooldown -= dt;
    if state.player.current_attack_cooldown > 0.0 {
        return;
    }
    // Reset whether or not we shoot; idle time isn't banked
    state.player.current_attack_cooldown = state.player.attack_cooldown;

    let origin = state.player.pos;
    let aim = match state.nearest_enemy(origin) {
        Some(i) => Some(bearing(origin, state.enemies[i].pos)),
        None if state.player.fire_pending => {
            Some(state.player.facing.y.atan2(state.player.facing.x))
        }
        None => None,
    };
    if let Some(aim) = aim {
        state.player.fire_pending = false;
        let angles = fan_angles(
            aim,
            state.player.number_of_attacks,
            state.config.projectiles.spread_angle(),
        );
        fire(state, &angles, false);
    }
}

/// Move projectiles and drop the expired ones
pub fn integrate_projectiles(state: &mut GameState, dt: f32) {
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
        projectile.lifetime -= dt;
    }
    state.projectiles.retain(|p| p.lifetime > 0.0);
}

/// Count down buff timers, reverting effects that run out
pub fn update_effects(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    player.hit_feedback_cooldown = (player.hit_feedback_cooldown - dt).max(0.0);

    if player.magnet_effect_timer > 0.0 {
        player.magnet_effect_timer -= dt;
        if player.magnet_effect_timer <= 0.0 {
            player.magnet_effect_timer = 0.0;
            player.current_magnet_radius = player.base_magnet_radius;
            state.events.push(GameEvent::EffectExpired {
                kind: ItemKind::Magnet,
            });
            log::debug!("Magnet expired");
        }
    }

    let player = &mut state.player;
    if player.special_attack_effect_timer > 0.0 {
        player.special_attack_effect_timer -= dt;
        if player.special_attack_effect_timer <= 0.0 {
            player.special_attack_effect_timer = 0.0;
            player.is_special_attacking = false;
            state.events.push(GameEvent::EffectExpired {
                kind: ItemKind::SpecialAttack,
            });
            log::debug!("Special attack expired");
        }
    }
}

/// Apply a picked-up item to the player
pub fn apply_item_effect(player: &mut Player, item: &Item) {
    match item.kind {
        ItemKind::Magnet => {
            player.current_magnet_radius = player.base_magnet_radius + item.effect_value;
            player.magnet_effect_timer = item.effect_duration;
        }
        ItemKind::SpecialAttack => {
            player.special_attack_effect_timer = item.effect_duration;
            player.is_special_attacking = item.effect_duration > 0.0;
            // Burst on the next attack step
            player.special_attack_fire_cooldown = 0.0;
        }
        ItemKind::HealthPotion => player.heal(item.effect_value),
    }
}
