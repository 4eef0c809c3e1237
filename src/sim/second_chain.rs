//! Second chain: a short kinematic arm orbiting the player
//!
//! Unlike the primary chain this one is not simulated. It is a rigid arm
//! swept around the player at a fixed angular speed, and its ball velocity is
//! the finite difference of the ball position across the tick. That velocity
//! only feeds rendering and impact direction, so nothing is integrated from it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chain::{ChainSegment, target_distance};
use crate::consts::*;
use crate::unit;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondChain {
    pub segments: Vec<ChainSegment>,
    pub ball: Vec2,
    pub ball_velocity: Vec2,
    /// Current sweep angle (radians)
    pub angle: f32,
}

impl SecondChain {
    /// A new arm laid out straight down, offset to the player's side
    pub fn new(anchor: Vec2, links: usize, spacing: f32) -> Self {
        let origin = anchor + Vec2::new(50.0, 0.0);
        let segments = (0..links)
            .map(|i| ChainSegment::at(origin + Vec2::new(0.0, i as f32 * spacing)))
            .collect();
        Self {
            segments,
            ball: origin + Vec2::new(0.0, links as f32 * spacing),
            ball_velocity: Vec2::ZERO,
            angle: 0.0,
        }
    }

    /// Radians per second for the given speed upgrade level
    pub fn rotation_speed(speed_level: u8) -> f32 {
        SECOND_CHAIN_ROTATION * (1.0 + speed_level as f32 * 0.5)
    }

    /// Normal mode: sweep the arm and derive the ball velocity from its motion
    pub fn update(
        &mut self,
        anchor: Vec2,
        retracting: bool,
        segment_distance: f32,
        speed_level: u8,
        dt_ms: f32,
    ) {
        let dt = dt_ms / 1000.0;
        let target = target_distance(segment_distance, retracting);

        self.angle += Self::rotation_speed(speed_level) * dt;
        if self.angle > std::f32::consts::TAU {
            self.angle -= std::f32::consts::TAU;
        }

        let ball = self.place_arm(anchor, target, self.angle);
        if dt > 0.0 {
            self.ball_velocity = (ball - self.ball) / dt;
        }
        self.ball = ball;
    }

    /// Hyper-spin: counter-rotate against the primary chain at the same rate
    pub fn update_hyper_spin(&mut self, anchor: Vec2, segment_distance: f32, primary_angle: f32) {
        let angle = -primary_angle;
        self.ball = self.place_arm(anchor, segment_distance, angle);

        // Explicit tangential velocity so impacts still read as a fast spin
        let tangent = Vec2::new(-angle.sin(), angle.cos());
        self.ball_velocity = tangent * -SECOND_CHAIN_SPIN_SPEED;
        self.angle = angle;
    }

    /// Lay the links out along `angle`; returns the ball position at the arm's end
    fn place_arm(&mut self, anchor: Vec2, spacing: f32, angle: f32) -> Vec2 {
        let dir = unit(angle);
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.old_pos = segment.pos;
            segment.pos = anchor + dir * ((i + 1) as f32 * spacing);
        }
        anchor + dir * (self.segments.len() as f32 * spacing)
    }
}
