//! Cosmetic particles
//!
//! Gameplay code never spawns particles directly. Collision and pickup code
//! return `VisualEffect` requests and the tick hands them to the particle
//! system, so the gameplay passes stay testable without any presentation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum live particles (oldest are dropped first)
pub const MAX_PARTICLES: usize = 1024;

/// Palette used by effect requests
pub mod palette {
    pub const DEATH_BURST: u32 = 0x4488ff;
    pub const PLAYER_HIT: u32 = 0xff4444;
    pub const PUSHER_DEFLECT: u32 = 0xff6600;
    pub const CHAIN_WRAP: u32 = 0x888888;
    pub const LIGHTNING_STRIKE: u32 = 0xffff00;
    pub const LIGHTNING_FLASH: u32 = 0xffffff;
    pub const SPARK: u32 = 0xffff88;
    pub const SECOND_CHAIN_HIT: u32 = 0x9b59b6;
    pub const SECOND_CHAIN_KILL: u32 = 0x8e44ad;
}

/// A request for visual feedback, produced by gameplay code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisualEffect {
    /// Radial burst of particles
    Explosion { pos: Vec2, color: u32 },
    /// Jagged arc between two enemies (electrified chain lightning)
    Lightning { from: Vec2, to: Vec2 },
    /// Crackle around the electrified ball
    Sparks { pos: Vec2 },
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub size: f32,
}

impl Particle {
    /// Fade factor 0-1 for rendering
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Owns the live particle pool
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn push<R: Rng>(&mut self, rng: &mut R, pos: Vec2, vel: Vec2, color: u32, life: f32) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(Particle {
            pos,
            vel,
            life,
            max_life: life,
            color,
            size: rng.random::<f32>() * 4.0 + 2.0,
        });
    }

    /// Turn an effect request into particles
    pub fn emit<R: Rng>(&mut self, effect: &VisualEffect, rng: &mut R) {
        match *effect {
            VisualEffect::Explosion { pos, color } => {
                for i in 0..12 {
                    let angle = i as f32 / 12.0 * std::f32::consts::TAU;
                    let speed = rng.random::<f32>() * 150.0 + 75.0;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                    self.push(rng, pos, vel, color, 80.0);
                }
            }
            VisualEffect::Lightning { from, to } => {
                let segments = 8;
                for i in 0..=segments {
                    let t = i as f32 / segments as f32;
                    // Same jitter on both axes gives the diagonal zig-zag look
                    let jitter = (rng.random::<f32>() - 0.5) * 20.0;
                    let pos = from + (to - from) * t + Vec2::splat(jitter);
                    let vel = Vec2::new(
                        (rng.random::<f32>() - 0.5) * 50.0,
                        (rng.random::<f32>() - 0.5) * 50.0,
                    );
                    self.push(rng, pos, vel, palette::LIGHTNING_STRIKE, 30.0);
                }
                self.push(rng, from, Vec2::ZERO, palette::LIGHTNING_FLASH, 20.0);
                self.push(rng, to, Vec2::ZERO, palette::LIGHTNING_FLASH, 20.0);
            }
            VisualEffect::Sparks { pos } => {
                for _ in 0..6 {
                    let angle = rng.random::<f32>() * std::f32::consts::TAU;
                    let dist = rng.random::<f32>() * 40.0 + 20.0;
                    let spark_pos = pos + Vec2::new(angle.cos(), angle.sin()) * dist;
                    let vel = Vec2::new(
                        (rng.random::<f32>() - 0.5) * 100.0,
                        (rng.random::<f32>() - 0.5) * 100.0,
                    );
                    self.push(rng, spark_pos, vel, palette::SPARK, 25.0);
                }
            }
        }
    }

    pub fn emit_all<R: Rng>(&mut self, effects: &[VisualEffect], rng: &mut R) {
        for effect in effects {
            self.emit(effect, rng);
        }
    }

    /// Advance particles one tick (`dt_ms` is the clamped physics step)
    pub fn update(&mut self, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel *= 0.98;
            particle.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_explosion_spawns_twelve() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        ps.emit(
            &VisualEffect::Explosion {
                pos: Vec2::new(10.0, 10.0),
                color: 0xff0000,
            },
            &mut rng,
        );
        assert_eq!(ps.len(), 12);
        for p in ps.particles() {
            let speed = p.vel.length();
            assert!((75.0..=225.0).contains(&speed));
            assert!((2.0..=6.0).contains(&p.size));
            assert_eq!(p.max_life, 80.0);
        }
    }

    #[test]
    fn test_lightning_has_flashes() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ps = ParticleSystem::new();
        ps.emit(
            &VisualEffect::Lightning {
                from: Vec2::ZERO,
                to: Vec2::new(100.0, 0.0),
            },
            &mut rng,
        );
        assert_eq!(ps.len(), 11);
        let flashes = ps
            .particles()
            .iter()
            .filter(|p| p.color == palette::LIGHTNING_FLASH)
            .count();
        assert_eq!(flashes, 2);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::new();
        ps.emit(&VisualEffect::Sparks { pos: Vec2::ZERO }, &mut rng);
        assert_eq!(ps.len(), 6);
        for _ in 0..24 {
            ps.update(16.0);
        }
        assert_eq!(ps.len(), 6);
        ps.update(16.0);
        assert!(ps.is_empty());
    }

    #[test]
    fn test_pool_is_capped() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ps = ParticleSystem::new();
        for _ in 0..200 {
            ps.emit(
                &VisualEffect::Explosion {
                    pos: Vec2::ZERO,
                    color: 0,
                },
                &mut rng,
            );
        }
        assert_eq!(ps.len(), MAX_PARTICLES);
    }
}
