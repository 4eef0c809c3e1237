//! Player anchor movement
//!
//! The anchor chases the pointer with a speed that grows with how far the
//! pointer has been dragged away, like pulling on a leash.

use glam::Vec2;

use crate::direction_to;

/// Pointer distance below which the anchor stays put
pub const DEAD_ZONE: f32 = 15.0;
/// Pointer distance at which the leash reaches full base speed
pub const LEASH_LENGTH: f32 = 60.0;
/// Base movement speed (units/sec) at full leash tension
pub const BASE_SPEED: f32 = 120.0;
/// Speed gained per speed-boost upgrade level
pub const SPEED_PER_LEVEL: f32 = 0.3;

/// Movement speed for the current pointer distance and speed modifiers
pub fn move_speed(pointer_distance: f32, speed_level: u8, temp_multiplier: f32) -> f32 {
    let tension = (pointer_distance / LEASH_LENGTH).min(2.0);
    BASE_SPEED * tension * (1.0 + speed_level as f32 * SPEED_PER_LEVEL) * temp_multiplier
}

/// Move the anchor toward the pointer, then keep it inside the canvas.
pub fn update_player(
    player: &mut Vec2,
    pointer: Vec2,
    speed_level: u8,
    temp_multiplier: f32,
    player_size: f32,
    canvas: Vec2,
    dt_ms: f32,
) {
    let dt = dt_ms / 1000.0;
    let dist = player.distance(pointer);
    if dist > DEAD_ZONE {
        let speed = move_speed(dist, speed_level, temp_multiplier);
        *player += direction_to(*player, pointer) * speed * dt;
    }

    let padding = Vec2::splat(player_size + 10.0);
    *player = player.clamp(padding, (canvas - padding).max(padding));
}
