//! Simulation module
//!
//! All gameplay logic lives here. Given the same seed, config and inputs a
//! session plays out identically:
//! - Seeded RNG only
//! - Stable iteration order (insertion order, enemies by id)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod collision;
pub mod combat;
pub mod progression;
pub mod select;
pub mod spawner;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{circles_overlap, resolve_collisions};
pub use combat::{fan_angles, radial_angles};
pub use progression::{effective_max_enemies, effective_spawn_interval, level_scale};
pub use select::{Weighted, weighted_index, weighted_pick};
pub use state::{
    Enemy, ExperienceGem, GameEvent, GamePhase, GameState, HudSnapshot, Item, Player, Projectile,
};
pub use tick::{HeldKeys, TickInput, tick};
