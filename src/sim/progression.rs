//! Experience, leveling and the difficulty curve

use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::config::{GameConfig, SpawnConfig, UpgradeKind};

/// Population cap at `level`
pub fn effective_max_enemies(level: u32, spawning: &SpawnConfig) -> u32 {
    spawning.base_max_enemies + level.saturating_sub(1) * spawning.max_enemies_per_level
}

/// Seconds between spawns at `level`: geometric decay with a floor
pub fn effective_spawn_interval(level: u32, spawning: &SpawnConfig) -> f32 {
    let decay = spawning
        .spawn_interval_reduction
        .powi(level.saturating_sub(1) as i32);
    (spawning.base_spawn_interval * decay).max(spawning.min_spawn_interval)
}

/// Stat multiplier for enemies spawned at `level`
pub fn level_scale(level: u32, per_level: f32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * per_level
}

/// Add experience; levels up when the threshold is reached during play
pub fn gain_experience(state: &mut GameState, amount: f32) {
    state.player.experience += amount;
    if state.phase == GamePhase::Playing && state.player.experience >= state.player.next_level_exp
    {
        level_up(state);
    }
}

/// Consume one threshold's worth of experience and enter LevelUp
pub fn level_up(state: &mut GameState) {
    let config = &state.config;
    let player = &mut state.player;

    player.experience = (player.experience - player.next_level_exp).max(0.0);
    player.level += 1;
    player.next_level_exp *= config.progression.exp_growth_multiplier;
    player.attack_cooldown = (player.attack_cooldown
        * config.progression.attack_speed_multiplier)
        .max(config.progression.min_attack_cooldown);
    if player.level % config.progression.attacks_every_n_levels == 0 {
        player.number_of_attacks += 1;
    }

    let level = player.level;
    state.max_enemies = effective_max_enemies(level, &config.spawning);
    state.spawn_interval = effective_spawn_interval(level, &config.spawning);

    offer_upgrades(state);
    state.phase = GamePhase::LevelUp;
    state.events.push(GameEvent::LevelUp { level });

    log::info!(
        "Level {} reached: next at {:.1} exp, cooldown {:.2}s, {} attacks, cap {}, spawn every {:.2}s",
        level,
        state.player.next_level_exp,
        state.player.attack_cooldown,
        state.player.number_of_attacks,
        state.max_enemies,
        state.spawn_interval
    );
}

/// Draw distinct upgrade options for the LevelUp screen
fn offer_upgrades(state: &mut GameState) {
    let pool = &state.config.upgrades;
    let amount = (state.config.progression.upgrade_choices_per_level as usize).min(pool.len());
    state.upgrade_choices = rand::seq::index::sample(&mut state.rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect();
}

/// Apply the chosen upgrade and resume play.
///
/// Returns false (and stays in LevelUp) for an out-of-range choice. With no
/// options on offer any confirm resumes play.
pub fn confirm_choice(state: &mut GameState, choice: usize) -> bool {
    if state.phase != GamePhase::LevelUp {
        return false;
    }

    if !state.upgrade_choices.is_empty() {
        let Some(option) = state.upgrade_choices.get(choice).cloned() else {
            log::warn!(
                "Ignoring upgrade choice {} ({} on offer)",
                choice,
                state.upgrade_choices.len()
            );
            return false;
        };
        apply_upgrade(&mut state.player, option.upgrade, &state.config);
        log::info!("Upgrade chosen: {}", option.name);
    }

    state.upgrade_choices.clear();
    state.phase = GamePhase::Playing;

    // Surplus may already cover the next threshold
    if state.player.experience >= state.player.next_level_exp {
        level_up(state);
    }
    true
}

/// Apply one upgrade to the player
pub fn apply_upgrade(player: &mut Player, upgrade: UpgradeKind, config: &GameConfig) {
    match upgrade {
        UpgradeKind::MaxHealth { percent } => {
            let bonus = player.max_health * percent / 100.0;
            player.max_health += bonus;
            player.heal(bonus);
        }
        UpgradeKind::Damage { amount } => player.damage += amount,
        UpgradeKind::MoveSpeed { percent } => player.speed *= 1.0 + percent / 100.0,
        UpgradeKind::AttackSpeed { percent } => {
            player.attack_cooldown = (player.attack_cooldown * (1.0 - percent / 100.0))
                .max(config.progression.min_attack_cooldown);
        }
        UpgradeKind::MagnetRadius { amount } => {
            player.base_magnet_radius += amount;
            player.current_magnet_radius += amount;
        }
        UpgradeKind::ExtraProjectile => player.number_of_attacks += 1,
    }
}
