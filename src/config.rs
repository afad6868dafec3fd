//! Game balance configuration
//!
//! Supplied once at session start. Every table has defaults so a partial JSON
//! file only needs to list what it overrides. Values are validated at load
//! time; the simulation assumes a validated config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// World and viewport dimensions (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub map_width: f32,
    pub map_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_width: 2400.0,
            map_height: 1800.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

/// Player base stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Pixels per second
    pub speed: f32,
    /// Damage per projectile
    pub damage: f32,
    /// Seconds between auto-shots
    pub attack_cooldown: f32,
    /// Collision radius
    pub size: f32,
    pub draw_width: f32,
    pub draw_height: f32,
    /// Pickup attraction radius without a magnet buff
    pub magnet_radius: f32,
    /// Projectiles per auto-shot at level 1
    pub number_of_attacks: u32,
    /// Experience needed for level 2
    pub next_level_exp: f32,
    /// Minimum seconds between two "player hit" feedback events
    pub hit_feedback_cooldown: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 200.0,
            damage: 10.0,
            attack_cooldown: 0.8,
            size: 16.0,
            draw_width: 48.0,
            draw_height: 48.0,
            magnet_radius: 80.0,
            number_of_attacks: 1,
            next_level_exp: 10.0,
            hit_feedback_cooldown: 0.5,
        }
    }
}

/// Projectile and firing pattern settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    /// Seconds before a projectile expires
    pub lifetime: f32,
    pub size: f32,
    /// Total fan width in degrees for multi-projectile shots
    pub spread_angle_deg: f32,
    /// Projectiles per radial burst during special attack
    pub special_count: u32,
    /// Seconds between radial bursts
    pub special_fire_interval: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 400.0,
            lifetime: 2.0,
            size: 5.0,
            spread_angle_deg: 30.0,
            special_count: 12,
            special_fire_interval: 0.3,
        }
    }
}

impl ProjectileConfig {
    pub fn spread_angle(&self) -> f32 {
        self.spread_angle_deg.to_radians()
    }
}

/// Enemy template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub health: f32,
    pub speed: f32,
    /// Contact damage per second
    pub damage: f32,
    pub exp_reward: f32,
    pub weight: f32,
    pub size: f32,
}

impl EnemyArchetype {
    pub fn new(name: &str, health: f32, speed: f32, damage: f32, exp_reward: f32) -> Self {
        Self {
            name: name.to_string(),
            health,
            speed,
            damage,
            exp_reward,
            weight: 1.0,
            size: 14.0,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Widens the pickup attraction radius for a while
    Magnet,
    /// Replaces aimed shots with radial bursts for a while
    SpecialAttack,
    /// Instant heal
    HealthPotion,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Magnet => "magnet",
            ItemKind::SpecialAttack => "special_attack",
            ItemKind::HealthPotion => "health_potion",
        }
    }
}

/// Item template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemArchetype {
    pub kind: ItemKind,
    /// Effect duration in seconds (ignored by instant effects)
    #[serde(default)]
    pub duration: f32,
    /// Effect magnitude (extra radius, heal amount)
    #[serde(default)]
    pub value: f32,
    pub weight: f32,
    /// Seconds the item stays on the ground
    pub lifetime: f32,
}

/// Enemy population and cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Enemies scattered around the player when a session starts
    pub initial_enemy_count: u32,
    /// Side of the square window the initial population is scattered in
    pub initial_spawn_window: f32,
    /// Initial enemies are pushed at least this far from the player
    pub initial_spawn_safe_radius: f32,
    /// Distance outside the viewport edge for regular spawns
    pub spawn_margin: f32,
    pub base_max_enemies: u32,
    pub max_enemies_per_level: u32,
    /// Seconds between spawns at level 1
    pub base_spawn_interval: f32,
    /// Interval multiplier per level above 1
    pub spawn_interval_reduction: f32,
    pub min_spawn_interval: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_enemy_count: 5,
            initial_spawn_window: 600.0,
            initial_spawn_safe_radius: 150.0,
            spawn_margin: 20.0,
            base_max_enemies: 15,
            max_enemies_per_level: 5,
            base_spawn_interval: 1.0,
            spawn_interval_reduction: 0.92,
            min_spawn_interval: 0.2,
        }
    }
}

/// Drops and pickups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Probability an enemy death rolls an item
    pub item_drop_chance: f32,
    pub max_items: u32,
    pub item_size: f32,
    pub gem_lifetime: f32,
    pub gem_size: f32,
    /// Speed at which gems/items inside the magnet radius fly to the player
    pub pickup_attract_speed: f32,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            item_drop_chance: 0.1,
            max_items: 5,
            item_size: 12.0,
            gem_lifetime: 30.0,
            gem_size: 6.0,
            pickup_attract_speed: 300.0,
        }
    }
}

/// Leveling and difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Threshold multiplier applied on each level-up
    pub exp_growth_multiplier: f32,
    pub enemy_health_per_level: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_damage_per_level: f32,
    /// Attack cooldown multiplier applied on each level-up
    pub attack_speed_multiplier: f32,
    pub min_attack_cooldown: f32,
    /// Every n-th level adds one projectile per shot
    pub attacks_every_n_levels: u32,
    pub upgrade_choices_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exp_growth_multiplier: 1.5,
            enemy_health_per_level: 0.1,
            enemy_speed_per_level: 0.03,
            enemy_damage_per_level: 0.08,
            attack_speed_multiplier: 0.9,
            min_attack_cooldown: 0.15,
            attacks_every_n_levels: 3,
            upgrade_choices_per_level: 3,
        }
    }
}

/// Closed set of level-up upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Raise max health by a percentage, healing by the same amount
    MaxHealth { percent: f32 },
    /// Flat damage per projectile
    Damage { amount: f32 },
    MoveSpeed { percent: f32 },
    /// Shorten the attack cooldown by a percentage (still floored)
    AttackSpeed { percent: f32 },
    /// Flat increase to the base pickup radius
    MagnetRadius { amount: f32 },
    /// One more projectile per shot
    ExtraProjectile,
}

/// A named upgrade offered on level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub name: String,
    pub upgrade: UpgradeKind,
}

impl UpgradeOption {
    pub fn new(name: &str, upgrade: UpgradeKind) -> Self {
        Self {
            name: name.to_string(),
            upgrade,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub projectiles: ProjectileConfig,
    pub enemies: Vec<EnemyArchetype>,
    pub spawning: SpawnConfig,
    pub items: Vec<ItemArchetype>,
    pub drops: DropConfig,
    pub progression: ProgressionConfig,
    pub upgrades: Vec<UpgradeOption>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            projectiles: ProjectileConfig::default(),
            enemies: vec![
                EnemyArchetype::new("slime", 20.0, 60.0, 10.0, 1.0)
                    .with_weight(60.0)
                    .with_size(14.0),
                EnemyArchetype::new("bat", 12.0, 110.0, 6.0, 2.0)
                    .with_weight(30.0)
                    .with_size(12.0),
                EnemyArchetype::new("golem", 80.0, 40.0, 20.0, 5.0)
                    .with_weight(10.0)
                    .with_size(24.0),
            ],
            spawning: SpawnConfig::default(),
            items: vec![
                ItemArchetype {
                    kind: ItemKind::Magnet,
                    duration: 10.0,
                    value: 300.0,
                    weight: 40.0,
                    lifetime: 15.0,
                },
                ItemArchetype {
                    kind: ItemKind::SpecialAttack,
                    duration: 5.0,
                    value: 0.0,
                    weight: 20.0,
                    lifetime: 15.0,
                },
                ItemArchetype {
                    kind: ItemKind::HealthPotion,
                    duration: 0.0,
                    value: 30.0,
                    weight: 40.0,
                    lifetime: 15.0,
                },
            ],
            drops: DropConfig::default(),
            progression: ProgressionConfig::default(),
            upgrades: vec![
                UpgradeOption::new("Vitality", UpgradeKind::MaxHealth { percent: 20.0 }),
                UpgradeOption::new("Power", UpgradeKind::Damage { amount: 5.0 }),
                UpgradeOption::new("Swiftness", UpgradeKind::MoveSpeed { percent: 10.0 }),
                UpgradeOption::new("Haste", UpgradeKind::AttackSpeed { percent: 10.0 }),
                UpgradeOption::new("Attraction", UpgradeKind::MagnetRadius { amount: 30.0 }),
                UpgradeOption::new("Multishot", UpgradeKind::ExtraProjectile),
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {} ({} enemy types, {} item types, {} upgrades)",
            path.display(),
            config.enemies.len(),
            config.items.len(),
            config.upgrades.len()
        );
        Ok(config)
    }

    /// Check every value is inside its allowed range
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        positive("world.map_width", w.map_width)?;
        positive("world.map_height", w.map_height)?;
        positive("world.viewport_width", w.viewport_width)?;
        positive("world.viewport_height", w.viewport_height)?;

        let p = &self.player;
        positive("player.max_health", p.max_health)?;
        positive("player.speed", p.speed)?;
        non_negative("player.damage", p.damage)?;
        positive("player.attack_cooldown", p.attack_cooldown)?;
        positive("player.size", p.size)?;
        non_negative("player.draw_width", p.draw_width)?;
        non_negative("player.draw_height", p.draw_height)?;
        non_negative("player.magnet_radius", p.magnet_radius)?;
        positive("player.next_level_exp", p.next_level_exp)?;
        non_negative("player.hit_feedback_cooldown", p.hit_feedback_cooldown)?;

        let pr = &self.projectiles;
        positive("projectiles.speed", pr.speed)?;
        positive("projectiles.lifetime", pr.lifetime)?;
        positive("projectiles.size", pr.size)?;
        non_negative("projectiles.spread_angle_deg", pr.spread_angle_deg)?;
        positive("projectiles.special_fire_interval", pr.special_fire_interval)?;

        for (i, e) in self.enemies.iter().enumerate() {
            let field = |name: &str| format!("enemies[{i}].{name}");
            positive(&field("health"), e.health)?;
            non_negative(&field("speed"), e.speed)?;
            non_negative(&field("damage"), e.damage)?;
            non_negative(&field("exp_reward"), e.exp_reward)?;
            non_negative(&field("weight"), e.weight)?;
            positive(&field("size"), e.size)?;
        }

        let s = &self.spawning;
        non_negative("spawning.initial_spawn_window", s.initial_spawn_window)?;
        non_negative("spawning.initial_spawn_safe_radius", s.initial_spawn_safe_radius)?;
        non_negative("spawning.spawn_margin", s.spawn_margin)?;
        positive("spawning.base_spawn_interval", s.base_spawn_interval)?;
        unit_interval("spawning.spawn_interval_reduction", s.spawn_interval_reduction)?;
        positive("spawning.min_spawn_interval", s.min_spawn_interval)?;

        for (i, item) in self.items.iter().enumerate() {
            let field = |name: &str| format!("items[{i}].{name}");
            non_negative(&field("duration"), item.duration)?;
            non_negative(&field("value"), item.value)?;
            non_negative(&field("weight"), item.weight)?;
            positive(&field("lifetime"), item.lifetime)?;
        }

        let d = &self.drops;
        finite("drops.item_drop_chance", d.item_drop_chance)?;
        if !(0.0..=1.0).contains(&d.item_drop_chance) {
            return Err(ConfigError::invalid(
                "drops.item_drop_chance",
                format!("must be within [0, 1], got {}", d.item_drop_chance),
            ));
        }
        positive("drops.item_size", d.item_size)?;
        positive("drops.gem_lifetime", d.gem_lifetime)?;
        positive("drops.gem_size", d.gem_size)?;
        non_negative("drops.pickup_attract_speed", d.pickup_attract_speed)?;

        let g = &self.progression;
        finite("progression.exp_growth_multiplier", g.exp_growth_multiplier)?;
        if g.exp_growth_multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "progression.exp_growth_multiplier",
                format!("must be >= 1, got {}", g.exp_growth_multiplier),
            ));
        }
        non_negative("progression.enemy_health_per_level", g.enemy_health_per_level)?;
        non_negative("progression.enemy_speed_per_level", g.enemy_speed_per_level)?;
        non_negative("progression.enemy_damage_per_level", g.enemy_damage_per_level)?;
        unit_interval("progression.attack_speed_multiplier", g.attack_speed_multiplier)?;
        positive("progression.min_attack_cooldown", g.min_attack_cooldown)?;
        if g.attacks_every_n_levels == 0 {
            return Err(ConfigError::invalid(
                "progression.attacks_every_n_levels",
                "must be at least 1",
            ));
        }

        for (i, option) in self.upgrades.iter().enumerate() {
            let field = format!("upgrades[{i}]");
            match option.upgrade {
                UpgradeKind::MaxHealth { percent } | UpgradeKind::MoveSpeed { percent } => {
                    non_negative(&field, percent)?
                }
                UpgradeKind::AttackSpeed { percent } => {
                    non_negative(&field, percent)?;
                    if percent >= 100.0 {
                        return Err(ConfigError::invalid(field, "attack speed percent must be < 100"));
                    }
                }
                UpgradeKind::Damage { amount } | UpgradeKind::MagnetRadius { amount } => {
                    non_negative(&field, amount)?
                }
                UpgradeKind::ExtraProjectile => {}
            }
        }

        Ok(())
    }
}

fn finite(field: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

/// (0, 1]
fn unit_interval(field: &str, value: f32) -> Result<()> {
    positive(field, value)?;
    if value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be <= 1, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "world": { "map_width": 500.0 } }"#).unwrap();
        assert_eq!(config.world.map_width, 500.0);
        assert_eq!(config.world.map_height, 1800.0);
        assert_eq!(config.enemies.len(), 3);
    }

    #[test]
    fn test_item_and_upgrade_tags_parse() {
        let json = r#"{
            "items": [
                { "kind": "health_potion", "value": 25.0, "weight": 1.0, "lifetime": 10.0 }
            ],
            "upgrades": [
                { "name": "Tough", "upgrade": { "kind": "max_health", "percent": 15.0 } },
                { "name": "More", "upgrade": { "kind": "extra_projectile" } }
            ]
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.items[0].kind, ItemKind::HealthPotion);
        assert_eq!(config.items[0].duration, 0.0);
        assert_eq!(
            config.upgrades[0].upgrade,
            UpgradeKind::MaxHealth { percent: 15.0 }
        );
        assert_eq!(config.upgrades[1].upgrade, UpgradeKind::ExtraProjectile);
    }

    #[test]
    fn test_unknown_item_kind_is_parse_error() {
        let json = r#"{ "items": [ { "kind": "teleport", "weight": 1.0, "lifetime": 5.0 } ] }"#;
        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_archetype_lists_are_allowed() {
        let config = GameConfig::from_json(r#"{ "enemies": [], "items": [] }"#).unwrap();
        assert!(config.enemies.is_empty());
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut config = GameConfig::default();
        config.drops.item_drop_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "drops.item_drop_chance"
        ));

        let mut config = GameConfig::default();
        config.enemies[1].weight = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "enemies[1].weight"
        ));

        let mut config = GameConfig::default();
        config.progression.exp_growth_multiplier = 0.5;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.spawning.spawn_interval_reduction = 1.2;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.player.attack_cooldown = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.progression.attacks_every_n_levels = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
