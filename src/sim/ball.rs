//! The flail ball hanging off the chain tail

use glam::Vec2;

use super::chain::{ChainSegment, target_distance};
use crate::consts::*;
use crate::unit;

/// Ball radius including growth upgrades
pub fn ball_radius(base_radius: f32, size_level: u8) -> f32 {
    base_radius + size_level as f32 * BALL_GROWTH_PER_LEVEL
}

/// Advance the ball one tick in normal mode.
///
/// The ball is deliberately never clamped to the canvas: it may swing
/// off-screen as far as the chain lets it.
pub fn update_ball(
    ball: &mut Vec2,
    velocity: &mut Vec2,
    tail: &mut ChainSegment,
    retracting: bool,
    segment_distance: f32,
    dt_ms: f32,
) {
    let dt = dt_ms / 1000.0;
    let target = target_distance(segment_distance, retracting);

    let dist = tail.pos.distance(*ball);
    if (dist - target).abs() > CONSTRAINT_SLACK && dist > f32::EPSILON {
        let percent = (dist - target) / dist;
        let offset = (*ball - tail.pos) * percent * 0.5;

        *ball -= offset;
        tail.pos += offset;
        *velocity -= offset * BALL_CORRECTION_KICK;
    }

    // Momentum handed down the chain
    *velocity += tail.velocity() * BALL_MOMENTUM_TRANSFER;

    *ball += *velocity * dt;
    *velocity *= BALL_DAMPING;
}

/// Hyper-spin: pin the ball to the end of the spinning arm and keep a
/// circular velocity vector for impacts and rendering.
pub fn update_ball_hyper_spin(
    ball: &mut Vec2,
    velocity: &mut Vec2,
    anchor: Vec2,
    arm_length: f32,
    angle: f32,
    dt_ms: f32,
) {
    let dt = dt_ms / 1000.0;
    *ball = anchor + unit(angle) * arm_length;

    let to_anchor = (anchor - *ball).normalize_or_zero();
    let tangent = Vec2::new(-to_anchor.y, to_anchor.x);

    *velocity += tangent * HYPER_SPIN_FORCE * dt;
    *velocity += to_anchor * HYPER_SPIN_CENTRIPETAL * dt;
    *velocity *= HYPER_SPIN_DAMPING;
}
