//! Arena Survivor - a top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, combat, progression, camera, tick)
//! - `config`: Data-driven game balance, loaded and validated at startup
//! - `error`: Configuration load errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame timestep used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default RNG seed when the host doesn't provide one
    pub const DEFAULT_SEED: u64 = 0x5EED_A7E7A;
}

/// Unit vector pointing along `theta` (radians, +x = 0, +y = π/2)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Bearing in radians from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
