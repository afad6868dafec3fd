//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]. Restarting builds a
//! fresh session from the same config instead of patching fields in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::progression;
use crate::config::{GameConfig, ItemKind, UpgradeOption};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start signal
    Title,
    /// Active gameplay
    Playing,
    /// Simulation frozen until one upgrade is chosen
    LevelUp,
    /// Player died; waiting for a restart signal
    GameOver,
}

/// Something that happened this frame, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectilesFired { count: u32, radial: bool },
    EnemyKilled { id: u32, pos: Vec2 },
    PlayerHit { health: f32 },
    ItemCollected { kind: ItemKind },
    EffectExpired { kind: ItemKind },
    LevelUp { level: u32 },
    GameOver { survival_time: f32 },
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Normalized movement direction (zero when idle)
    pub direction: Vec2,
    /// Last non-zero movement direction
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Seconds between auto-shots
    pub attack_cooldown: f32,
    /// Countdown to the next auto-shot
    pub current_attack_cooldown: f32,
    pub level: u32,
    pub experience: f32,
    pub next_level_exp: f32,
    /// Collision radius
    pub size: f32,
    pub draw_width: f32,
    pub draw_height: f32,
    pub number_of_attacks: u32,
    pub base_magnet_radius: f32,
    pub current_magnet_radius: f32,
    pub magnet_effect_timer: f32,
    pub special_attack_effect_timer: f32,
    pub is_special_attacking: bool,
    pub special_attack_fire_cooldown: f32,
    /// Gates repeated hit feedback while in contact
    pub hit_feedback_cooldown: f32,
    /// Manual shot requested, held until the attack cooldown allows it
    #[serde(default)]
    pub fire_pending: bool,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let p = &config.player;
        Self {
            pos: Vec2::new(config.world.map_width / 2.0, config.world.map_height / 2.0),
            direction: Vec2::ZERO,
            facing: Vec2::X,
            health: p.max_health,
            max_health: p.max_health,
            speed: p.speed,
            damage: p.damage,
            attack_cooldown: p.attack_cooldown,
            current_attack_cooldown: p.attack_cooldown,
            level: 1,
            experience: 0.0,
            next_level_exp: p.next_level_exp,
            size: p.size,
            draw_width: p.draw_width,
            draw_height: p.draw_height,
            number_of_attacks: p.number_of_attacks,
            base_magnet_radius: p.magnet_radius,
            current_magnet_radius: p.magnet_radius,
            magnet_effect_timer: 0.0,
            special_attack_effect_timer: 0.0,
            is_special_attacking: false,
            special_attack_fire_cooldown: 0.0,
            hit_feedback_cooldown: 0.0,
            fire_pending: false,
        }
    }

    /// Set movement direction (normalized); remembers facing
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
        if self.direction != Vec2::ZERO {
            self.facing = self.direction;
        }
    }

    /// Move along the current direction, staying inside the map
    pub fn advance(&mut self, dt: f32, map_size: Vec2) {
        self.pos += self.direction * self.speed * dt;
        self.pos = clamp_to_map(self.pos, self.size, map_size);
    }

    /// Apply damage, clamping health at zero
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Heal, clamping health at max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_effect_timer > 0.0
    }
}

/// An enemy instance (stats frozen at spawn)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: String,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Contact damage per second
    pub damage: f32,
    pub exp_reward: f32,
    pub radius: f32,
}

impl Enemy {
    /// Walk straight toward `target`
    pub fn pursue(&mut self, target: Vec2, dt: f32) {
        let to_target = target - self.pos;
        let dist = to_target.length();
        let step = self.speed * dt;
        if dist <= step {
            self.pos = target;
        } else if dist > 0.0 {
            self.pos += to_target / dist * step;
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    /// Seconds remaining
    pub lifetime: f32,
    pub radius: f32,
}

/// Experience dropped by a dead enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceGem {
    pub pos: Vec2,
    pub value: f32,
    pub lifetime: f32,
    pub radius: f32,
}

/// A buff pickup on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
    pub radius: f32,
    pub effect_duration: f32,
    pub effect_value: f32,
    pub lifetime: f32,
}

/// Values the HUD shows each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub experience: f32,
    pub next_level_exp: f32,
    pub health: f32,
    pub max_health: f32,
    pub enemy_count: usize,
    pub elapsed: f32,
    pub survival_time: Option<f32>,
    pub kills: u32,
}

/// Complete simulation context (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Seconds since the session started (advances in every phase but Title)
    pub elapsed: f32,
    /// Recorded when the player dies
    pub survival_time: Option<f32>,
    pub kills: u32,
    pub player: Player,
    pub camera: Camera,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<ExperienceGem>,
    pub items: Vec<Item>,
    /// Options offered while in LevelUp
    pub upgrade_choices: Vec<UpgradeOption>,
    /// Current population cap
    pub max_enemies: u32,
    /// Current seconds between spawns
    pub spawn_interval: f32,
    pub spawn_accumulator: f32,
    /// Events raised during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Live RNG stream, so a restored snapshot continues identically
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a session in the Title phase
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(&config);
        let max_enemies = progression::effective_max_enemies(1, &config.spawning);
        let spawn_interval = progression::effective_spawn_interval(1, &config.spawning);
        let mut state = Self {
            seed,
            config,
            phase: GamePhase::Title,
            elapsed: 0.0,
            survival_time: None,
            kills: 0,
            player,
            camera: Camera::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            items: Vec::new(),
            upgrade_choices: Vec::new(),
            max_enemies,
            spawn_interval,
            spawn_accumulator: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.update_camera();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Throw away the current session and start playing a fresh one.
    ///
    /// The RNG stream carries on so consecutive runs differ.
    pub fn start_session(&mut self) {
        let rng = self.rng.clone();
        let seed = self.seed;
        *self = GameState::new(self.config.clone(), seed);
        self.rng = rng;
        self.phase = GamePhase::Playing;
        super::spawner::spawn_initial_population(self);
        log::info!(
            "Session started: {} enemies, cap {}, spawn every {:.2}s",
            self.enemies.len(),
            self.max_enemies,
            self.spawn_interval
        );
    }

    pub fn map_size(&self) -> Vec2 {
        Vec2::new(self.config.world.map_width, self.config.world.map_height)
    }

    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(
            self.config.world.viewport_width,
            self.config.world.viewport_height,
        )
    }

    /// Recompute the camera from the player position
    pub fn update_camera(&mut self) {
        self.camera = Camera::follow(self.player.pos, self.map_size(), self.viewport_size());
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.phase,
            level: self.player.level,
            experience: self.player.experience,
            next_level_exp: self.player.next_level_exp,
            health: self.player.health,
            max_health: self.player.max_health,
            enemy_count: self.enemies.len(),
            elapsed: self.elapsed,
            survival_time: self.survival_time,
            kills: self.kills,
        }
    }

    /// Index of the enemy nearest to `pos` (squared distance)
    pub fn nearest_enemy(&self, pos: Vec2) -> Option<usize> {
        self.enemies
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance_squared(pos)
                    .partial_cmp(&b.pos.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }
}

/// Keep a circle of `radius` inside the map where it fits
pub fn clamp_to_map(pos: Vec2, radius: f32, map_size: Vec2) -> Vec2 {
    Vec2::new(
        clamp_axis(pos.x, radius, map_size.x),
        clamp_axis(pos.y, radius, map_size.y),
    )
}

fn clamp_axis(v: f32, radius: f32, extent: f32) -> f32 {
    if extent <= 2.0 * radius {
        extent / 2.0
    } else {
        v.clamp(radius, extent - radius)
    }
}
