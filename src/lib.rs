//! Flail Frenzy - A chain-and-ball arena survival game
//!
//! Core modules:
//! - `sim`: Simulation engine (chain physics, collisions, enemy/boss director)
//! - `config`: Startup configuration (chain geometry, canvas, frame clamp)
//! - `session`: Run lifecycle wrapper that owns the simulation and fires the score hook
//! - `submit`: End-of-run score submission contract

pub mod config;
pub mod session;
pub mod sim;
pub mod submit;

pub use config::{ConfigError, GameConfig};
pub use session::GameSession;
pub use submit::{LogSubmitter, ScoreSubmission, ScoreSubmitter, SubmitError};

use glam::Vec2;

/// Balancing constants (not user-configurable)
pub mod consts {
    /// Verlet velocity damping for chain segments
    pub const CHAIN_DAMPING: f32 = 0.998;
    /// Relaxation passes per tick
    pub const CONSTRAINT_ITERATIONS: usize = 4;
    /// Segment distance multiplier while the pointer is held
    pub const RETRACT_RATIO: f32 = 0.6;
    /// Share of the first-link correction fed back into the anchor while retracting
    pub const RETRACT_PULL: f32 = 0.3;
    /// Distance error below which a link is left alone
    pub const CONSTRAINT_SLACK: f32 = 1.0;

    /// Ball velocity kick per unit of constraint correction
    pub const BALL_CORRECTION_KICK: f32 = 8.0;
    /// Share of the chain tail's implicit velocity handed to the ball
    pub const BALL_MOMENTUM_TRANSFER: f32 = 0.3;
    /// Per-tick ball velocity damping
    pub const BALL_DAMPING: f32 = 0.995;
    /// Ball radius growth per ball-size upgrade
    pub const BALL_GROWTH_PER_LEVEL: f32 = 8.0;

    /// Hyper-spin angular rate (radians per millisecond, ~0.79 s per turn)
    pub const HYPER_SPIN_RATE: f64 = 0.008;
    /// Tangential acceleration applied to the ball during hyper-spin
    pub const HYPER_SPIN_FORCE: f32 = 800.0;
    /// Centripetal acceleration applied to the ball during hyper-spin
    pub const HYPER_SPIN_CENTRIPETAL: f32 = 400.0;
    /// Per-tick ball velocity damping during hyper-spin
    pub const HYPER_SPIN_DAMPING: f32 = 0.85;
    /// Tangential speed reported for the second ball during hyper-spin
    pub const SECOND_CHAIN_SPIN_SPEED: f32 = 600.0;
    /// Second chain base rotation (radians per second)
    pub const SECOND_CHAIN_ROTATION: f32 = 1.5;

    /// Chain segments added per extension upgrade
    pub const LINKS_PER_EXTENSION: usize = 3;

    /// Starting (and base maximum) health
    pub const BASE_HEALTH: i32 = 100;
    /// Score needed per wave before the wave counter advances
    pub const SCORE_PER_WAVE: u64 = 150;

    /// Milliseconds between boss spawns
    pub const BOSS_SPAWN_INTERVAL_MS: f32 = 60_000.0;
    /// Chain immunity window in milliseconds
    pub const CHAIN_IMMUNITY_MS: f64 = 75.0;
    /// Radius of the electrified chain-lightning arc
    pub const LIGHTNING_RADIUS: f32 = 120.0;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` toward `to` (zero if coincident)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Unit vector at the given angle (radians)
#[inline]
pub fn unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
