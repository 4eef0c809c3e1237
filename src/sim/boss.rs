//! UFO bosses: archetype table, movement patterns and attack builders
//!
//! Each boss that spawns takes the next archetype from a fixed order
//! (the last one repeats). The archetype decides how it moves, what it
//! fires and which minions it calls in.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, Projectile, ProjectilePattern};
use crate::{direction_to, unit};

/// Base projectile speed before the archetype multiplier
pub const PROJECTILE_BASE_SPEED: f32 = 200.0;
/// Total fan angle for spread shots
pub const SPREAD_ARC: f32 = PI / 6.0;
/// Homing steering acceleration (units/sec²)
pub const HOMING_FORCE: f32 = 100.0;
/// Homing projectile top speed
pub const HOMING_MAX_SPEED: f32 = 300.0;
/// Extra ring distance beyond the boss radius where minions appear
pub const MINION_RING_GAP: f32 = 50.0;
/// Health fraction below which a boss speeds up
pub const ENRAGE_THRESHOLD: f32 = 0.5;
pub const ENRAGE_SPEED: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UfoArchetype {
    Scout,
    Destroyer,
    Mothership,
    Harvester,
    Dreadnought,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    /// Darts side to side while closing in
    Evasive,
    /// Weaves slightly on a direct approach
    Aggressive,
    /// Slow straight approach
    Deliberate,
    /// Approaches, then orbits at close range
    Circling,
    /// Straight approach, easing off when near
    Unstoppable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinionKind {
    Weak,
    Basic,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossAbility {
    SpreadShot,
    EvasiveManeuvers,
    RapidFire,
    PlasmaCannons,
    HomingMissiles,
    MinionSpawn,
    ShieldRegeneration,
    EnergyDrain,
    TractorBeam,
    DeathRay,
    ArmorPlating,
    EliteMinions,
}

impl BossAbility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpreadShot => "spread_shot",
            Self::EvasiveManeuvers => "evasive_maneuvers",
            Self::RapidFire => "rapid_fire",
            Self::PlasmaCannons => "plasma_cannons",
            Self::HomingMissiles => "homing_missiles",
            Self::MinionSpawn => "minion_spawn",
            Self::ShieldRegeneration => "shield_regeneration",
            Self::EnergyDrain => "energy_drain",
            Self::TractorBeam => "tractor_beam",
            Self::DeathRay => "death_ray",
            Self::ArmorPlating => "armor_plating",
            Self::EliteMinions => "elite_minions",
        }
    }
}

/// Fixed balancing data for one archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossProfile {
    pub pattern: ProjectilePattern,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    pub minion_cooldown_ms: f64,
    pub minion: MinionKind,
    pub abilities: &'static [BossAbility],
    pub color: u32,
    pub movement: MovementPattern,
    /// Multiplier on the shared boss AI speed
    pub speed_factor: f32,
}

impl UfoArchetype {
    /// Spawn order; the last entry repeats once exhausted
    pub const ORDER: [Self; 5] = [
        Self::Scout,
        Self::Destroyer,
        Self::Mothership,
        Self::Harvester,
        Self::Dreadnought,
    ];

    /// Archetype for the boss with the given 0-based spawn index
    pub fn for_boss_index(index: u32) -> Self {
        Self::ORDER[(index as usize).min(Self::ORDER.len() - 1)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scout => "scout",
            Self::Destroyer => "destroyer",
            Self::Mothership => "mothership",
            Self::Harvester => "harvester",
            Self::Dreadnought => "dreadnought",
        }
    }

    pub fn profile(self) -> BossProfile {
        use BossAbility::*;
        match self {
            Self::Scout => BossProfile {
                pattern: ProjectilePattern::Spread,
                projectile_count: 3,
                projectile_speed: 1.0,
                minion_cooldown_ms: 15_000.0,
                minion: MinionKind::Weak,
                abilities: &[SpreadShot, EvasiveManeuvers],
                color: 0x00ff88,
                movement: MovementPattern::Evasive,
                speed_factor: 0.8,
            },
            Self::Destroyer => BossProfile {
                pattern: ProjectilePattern::Rapid,
                projectile_count: 5,
                projectile_speed: 1.5,
                minion_cooldown_ms: 15_000.0,
                minion: MinionKind::Weak,
                abilities: &[RapidFire, PlasmaCannons],
                color: 0xff4400,
                movement: MovementPattern::Aggressive,
                speed_factor: 1.2,
            },
            Self::Mothership => BossProfile {
                pattern: ProjectilePattern::Homing,
                projectile_count: 1,
                projectile_speed: 1.0,
                minion_cooldown_ms: 8000.0,
                minion: MinionKind::Basic,
                abilities: &[HomingMissiles, MinionSpawn, ShieldRegeneration],
                color: 0x8800ff,
                movement: MovementPattern::Deliberate,
                speed_factor: 0.7,
            },
            Self::Harvester => BossProfile {
                pattern: ProjectilePattern::Spread,
                projectile_count: 6,
                projectile_speed: 1.0,
                minion_cooldown_ms: 10_000.0,
                minion: MinionKind::Fast,
                abilities: &[EnergyDrain, MinionSpawn, TractorBeam],
                color: 0xffff00,
                movement: MovementPattern::Circling,
                speed_factor: 0.9,
            },
            Self::Dreadnought => BossProfile {
                pattern: ProjectilePattern::Rapid,
                projectile_count: 8,
                projectile_speed: 2.0,
                minion_cooldown_ms: 6000.0,
                minion: MinionKind::Fast,
                abilities: &[RapidFire, MinionSpawn, DeathRay, ArmorPlating],
                color: 0xff0044,
                movement: MovementPattern::Unstoppable,
                speed_factor: 0.8,
            },
        }
    }
}

/// Minion stats: health, size, speed, color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinionStats {
    pub health: i32,
    pub size: f32,
    pub speed: f32,
    pub color: u32,
}

impl MinionKind {
    pub fn stats(self) -> MinionStats {
        match self {
            Self::Weak => MinionStats { health: 1, size: 16.0, speed: 60.0, color: 0x666666 },
            Self::Basic => MinionStats { health: 3, size: 20.0, speed: 80.0, color: 0xffaa44 },
            Self::Fast => MinionStats { health: 2, size: 15.0, speed: 120.0, color: 0x44ff44 },
        }
    }

    /// Minions fight (and score) as the regular type of the same name
    pub fn enemy_kind(self) -> EnemyKind {
        match self {
            Self::Weak => EnemyKind::Weak,
            Self::Basic => EnemyKind::Basic,
            Self::Fast => EnemyKind::Fast,
        }
    }
}

/// Boss-only state carried in `EnemyKind::Boss`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub archetype: UfoArchetype,
    pub movement: MovementPattern,

    // === Attacks ===
    pub projectile_pattern: ProjectilePattern,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    pub shoot_cooldown_ms: f64,
    /// None until the first volley (fires on the first tick)
    pub last_shot_ms: Option<f64>,

    // === Minions ===
    pub minion_cooldown_ms: f64,
    pub minion_kind: MinionKind,
    pub last_minion_ms: Option<f64>,

    pub abilities: Vec<BossAbility>,

    // === Animation ===
    pub hover_offset: f32,
    pub rotation_angle: f32,
}

impl BossState {
    /// State for the boss with the given 0-based spawn index
    pub fn new(index: u32) -> Self {
        let archetype = UfoArchetype::for_boss_index(index);
        let profile = archetype.profile();
        Self {
            archetype,
            movement: profile.movement,
            projectile_pattern: profile.pattern,
            projectile_count: profile.projectile_count,
            projectile_speed: profile.projectile_speed,
            shoot_cooldown_ms: shoot_cooldown_ms(index),
            last_shot_ms: None,
            minion_cooldown_ms: profile.minion_cooldown_ms,
            minion_kind: profile.minion,
            last_minion_ms: None,
            abilities: profile.abilities.to_vec(),
            hover_offset: 0.0,
            rotation_angle: 0.0,
        }
    }

    pub fn has_ability(&self, ability: BossAbility) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn minion_count(&self) -> usize {
        if self.has_ability(BossAbility::EliteMinions) { 3 } else { 2 }
    }

    pub fn shot_ready(&self, now_ms: f64) -> bool {
        self.last_shot_ms
            .is_none_or(|last| now_ms - last > self.shoot_cooldown_ms)
    }

    pub fn minions_ready(&self, now_ms: f64) -> bool {
        self.last_minion_ms
            .is_none_or(|last| now_ms - last > self.minion_cooldown_ms)
    }

    /// Advance the hover / rotation animation phases
    pub fn animate(&mut self, dt_secs: f32) {
        self.hover_offset += dt_secs * 0.003;
        self.rotation_angle += dt_secs * 0.001;
    }
}

/// Boss health for the given spawn index
pub fn boss_health(index: u32) -> i32 {
    (20 + 10 * index as i32) * 10
}

/// Boss radius for the given spawn index
pub fn boss_size(index: u32) -> f32 {
    50.0 + 5.0 * index as f32
}

/// Time between volleys; later bosses fire faster, down to a floor
pub fn shoot_cooldown_ms(index: u32) -> f64 {
    (2000.0 - 200.0 * index as f64).max(200.0)
}

/// Shared AI speed, rising with every boss spawned this run
pub fn ai_base_speed(bosses_spawned: u32) -> f32 {
    40.0 + 10.0 * bosses_spawned as f32
}

/// Velocity for one AI step.
///
/// `speed` already includes the archetype factor; `now_ms` drives the
/// weave / dart oscillation.
pub fn movement_velocity(
    pattern: MovementPattern,
    id: u32,
    pos: Vec2,
    player: Vec2,
    speed: f32,
    now_ms: f64,
) -> Vec2 {
    let t = (now_ms * 0.001) as f32;
    let phase = id as f32;
    let dir = direction_to(pos, player);
    let perp = Vec2::new(-dir.y, dir.x);
    let dist = pos.distance(player);

    match pattern {
        MovementPattern::Evasive => {
            let dart = if (t * 2.0 + phase).sin() > 0.0 { 1.0 } else { -1.0 };
            dir * speed + perp * speed * 0.8 * dart
        }
        MovementPattern::Aggressive => {
            let weave = (t * 1.5 + phase).sin() * 30.0;
            dir * speed + perp * weave
        }
        MovementPattern::Deliberate => dir * speed,
        MovementPattern::Circling => {
            if dist > 150.0 {
                dir * speed
            } else {
                perp * speed * 0.8
            }
        }
        MovementPattern::Unstoppable => {
            let advance = if dist > 100.0 { speed } else { speed * 0.5 };
            dir * advance
        }
    }
}

/// Build one volley aimed at `target`
pub fn fire<R: Rng>(boss: &BossState, origin: Vec2, size: f32, target: Vec2, rng: &mut R) -> Vec<Projectile> {
    let speed = PROJECTILE_BASE_SPEED * boss.projectile_speed;
    let dir = direction_to(origin, target);
    let base_angle = dir.y.atan2(dir.x);

    match boss.projectile_pattern {
        ProjectilePattern::Single => vec![Projectile {
            pattern: ProjectilePattern::Single,
            pos: origin,
            vel: dir * speed,
            size: 8.0,
            damage: 15,
            life_ms: 5000.0,
            color: 0xff0088,
        }],
        ProjectilePattern::Spread => {
            let count = boss.projectile_count.max(1);
            let step = if count > 1 { SPREAD_ARC / (count - 1) as f32 } else { 0.0 };
            let middle = (count - 1) as f32 / 2.0;
            (0..count)
                .map(|i| Projectile {
                    pattern: ProjectilePattern::Spread,
                    pos: origin,
                    vel: unit(base_angle + (i as f32 - middle) * step) * speed,
                    size: 6.0,
                    damage: 12,
                    life_ms: 5000.0,
                    color: 0xff4488,
                })
                .collect()
        }
        ProjectilePattern::Homing => vec![Projectile {
            pattern: ProjectilePattern::Homing,
            pos: origin,
            vel: dir * speed * 0.7,
            size: 10.0,
            damage: 20,
            life_ms: 7000.0,
            color: 0xff8800,
        }],
        ProjectilePattern::Rapid => (0..boss.projectile_count.max(1))
            .map(|_| {
                let jitter = (rng.random::<f32>() - 0.5) * 0.3;
                let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * size;
                Projectile {
                    pattern: ProjectilePattern::Rapid,
                    pos: origin + offset,
                    vel: unit(base_angle + jitter) * speed,
                    size: 5.0,
                    damage: 8,
                    life_ms: 4000.0,
                    color: 0xff0044,
                }
            })
            .collect(),
    }
}

/// Steer a homing projectile toward the target, capped at its top speed
pub fn steer_homing(projectile: &mut Projectile, target: Vec2, dt_secs: f32) {
    projectile.vel += direction_to(projectile.pos, target) * HOMING_FORCE * dt_secs;
    projectile.vel = projectile.vel.clamp_length_max(HOMING_MAX_SPEED);
}

/// Evenly spaced minion spawn points on a ring around the boss
pub fn minion_ring(center: Vec2, boss_size: f32, count: usize) -> Vec<Vec2> {
    let radius = boss_size + MINION_RING_GAP;
    (0..count)
        .map(|i| center + unit(i as f32 / count as f32 * std::f32::consts::TAU) * radius)
        .collect()
}
