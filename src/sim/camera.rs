//! Viewport framing
//!
//! The camera is the world-space top-left corner of the viewport. It is
//! derived from the player position every frame and never shows anything
//! outside the map.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport origin in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub origin: Vec2,
}

impl Camera {
    /// Frame the player, clamped to the map
    pub fn follow(target: Vec2, map_size: Vec2, viewport: Vec2) -> Self {
        Self {
            origin: Vec2::new(
                frame_axis(target.x, map_size.x, viewport.x),
                frame_axis(target.y, map_size.y, viewport.y),
            ),
        }
    }

    /// Convert a world position to viewport coordinates
    pub fn world_to_screen(&self, pos: Vec2) -> Vec2 {
        pos - self.origin
    }

    /// Whether a circle overlaps the viewport rectangle
    pub fn is_visible(&self, pos: Vec2, radius: f32, viewport: Vec2) -> bool {
        let local = self.world_to_screen(pos);
        local.x + radius >= 0.0
            && local.y + radius >= 0.0
            && local.x - radius <= viewport.x
            && local.y - radius <= viewport.y
    }
}

/// One axis: center small maps, otherwise clamp
fn frame_axis(target: f32, map: f32, viewport: f32) -> f32 {
    if map <= viewport {
        (map - viewport) / 2.0
    } else {
        (target - viewport / 2.0).clamp(0.0, map - viewport)
    }
}
