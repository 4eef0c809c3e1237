//! Power-ups: catalogs, upgrade caps, spawn director and pickup
//!
//! Permanent power-ups bump `PlayerUpgrades` counters (each capped) and
//! temporary ones register a timed entry in `ActiveEffects`. Edge spawns drift
//! toward the middle of the arena; boss drops appear where the boss died.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::TimedEffect;
use super::particles::VisualEffect;
use super::state::{DeferredAction, SimulationState};

// === Upgrade caps ===
pub const MAX_CHAIN_DAMAGE: u8 = 3;
pub const MAX_BALL_DAMAGE: u8 = 3;
pub const MAX_SPEED_BOOST: u8 = 3;
pub const MAX_BALL_SIZE: u8 = 2;
pub const MAX_CHAIN_EXTENSIONS: u8 = 2;
pub const MAX_SECOND_CHAIN_DAMAGE: u8 = 3;
pub const MAX_SECOND_CHAIN_SPEED: u8 = 2;

/// Size of an edge-spawned power-up
pub const POWERUP_SIZE: f32 = 20.0;
/// Size of a boss drop
pub const BOSS_DROP_SIZE: f32 = 25.0;
/// Share of spawns that are permanent
pub const PERMANENT_CHANCE: f32 = 0.4;
/// Acceleration toward the arena center (per axis)
pub const DRIFT_FORCE: f32 = 10.0;
pub const DRIFT_DAMPING: f32 = 0.99;
/// Distance outside the canvas where power-ups are dropped
pub const CULL_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    VeryRare,
}

impl Rarity {
    /// Regular spawn roll; thresholds are cumulative and loosen with the wave
    pub fn roll(roll: f32, wave: u32) -> Self {
        let wave = wave as f32;
        if roll < 0.08 + wave * 0.008 {
            Self::VeryRare
        } else if roll < 0.25 + wave * 0.015 {
            Self::Rare
        } else {
            Self::Common
        }
    }

    /// Boss drop roll: 30% very rare, 40% rare, 30% common
    pub fn roll_boss_drop(roll: f32) -> Self {
        if roll < 0.3 {
            Self::VeryRare
        } else if roll < 0.7 {
            Self::Rare
        } else {
            Self::Common
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpType {
    Permanent,
    Temporary,
}

/// Counter changes carried by a permanent power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpgradeEffect {
    pub chain_damage: u8,
    pub ball_damage: u8,
    pub health_increase: i32,
    pub speed_boost: u8,
    pub ball_size: u8,
    pub chain_extension: bool,
    pub second_chain: bool,
    pub second_chain_damage: u8,
    pub second_chain_speed: u8,
}

impl UpgradeEffect {
    const NONE: Self = Self {
        chain_damage: 0,
        ball_damage: 0,
        health_increase: 0,
        speed_boost: 0,
        ball_size: 0,
        chain_extension: false,
        second_chain: false,
        second_chain_damage: 0,
        second_chain_speed: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    // Permanent
    HealingHeart,
    HealthBoost,
    SpeedBoost,
    BallSpikes,
    ChainSpikes,
    MajorHealthBoost,
    MajorSpeedBoost,
    BallGrowth,
    ChainExtension,
    MegaSpikes,
    SecondChain,
    ChainMastery,
    ChainVelocity,
    // Temporary
    SpeedBurst,
    BerserkMode,
    ElectricBall,
    HyperSpin,
}

use PowerUpKind::*;

pub const PERMANENT_COMMON: &[PowerUpKind] = &[HealingHeart, HealthBoost, SpeedBoost];
pub const PERMANENT_RARE: &[PowerUpKind] = &[
    BallSpikes,
    ChainSpikes,
    MajorHealthBoost,
    MajorSpeedBoost,
    BallGrowth,
    ChainExtension,
];
pub const PERMANENT_VERY_RARE: &[PowerUpKind] = &[MegaSpikes, SecondChain, ChainMastery, ChainVelocity];
pub const TEMPORARY_COMMON: &[PowerUpKind] = &[SpeedBurst];
pub const TEMPORARY_RARE: &[PowerUpKind] = &[BerserkMode, ElectricBall];
pub const TEMPORARY_VERY_RARE: &[PowerUpKind] = &[HyperSpin];

impl PowerUpKind {
    pub const ALL: [Self; 17] = [
        HealingHeart,
        HealthBoost,
        SpeedBoost,
        BallSpikes,
        ChainSpikes,
        MajorHealthBoost,
        MajorSpeedBoost,
        BallGrowth,
        ChainExtension,
        MegaSpikes,
        SecondChain,
        ChainMastery,
        ChainVelocity,
        SpeedBurst,
        BerserkMode,
        ElectricBall,
        HyperSpin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HealingHeart => "Healing Heart",
            HealthBoost => "Health Boost",
            SpeedBoost => "Speed Boost",
            BallSpikes => "Ball Spikes",
            ChainSpikes => "Chain Spikes",
            MajorHealthBoost => "Major Health Boost",
            MajorSpeedBoost => "Major Speed Boost",
            BallGrowth => "Ball Growth",
            ChainExtension => "Chain Extension",
            MegaSpikes => "Mega Spikes",
            SecondChain => "Second Chain",
            ChainMastery => "Chain Mastery",
            ChainVelocity => "Chain Velocity",
            SpeedBurst => "Speed Burst",
            BerserkMode => "Berserk Mode",
            ElectricBall => "Electric Ball",
            HyperSpin => "Hyper Spin",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            HealingHeart | HealthBoost | MajorHealthBoost => "health",
            SpeedBoost | MajorSpeedBoost | SpeedBurst => "speed",
            BallSpikes | ChainSpikes | MegaSpikes => "damage",
            BallGrowth => "size",
            ChainExtension | SecondChain | ChainMastery | ChainVelocity => "chain",
            BerserkMode => "berserk",
            ElectricBall => "electric",
            HyperSpin => "spin",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            HealingHeart | HealthBoost | MajorHealthBoost => 0x4ecdc4,
            SpeedBoost | MajorSpeedBoost => 0x45b7d1,
            BallSpikes => 0xff8c42,
            ChainSpikes => 0xff6b6b,
            BallGrowth => 0xf9ca24,
            ChainExtension => 0x888888,
            MegaSpikes => 0xe74c3c,
            SecondChain => 0x9b59b6,
            ChainMastery => 0x8e44ad,
            ChainVelocity => 0x6c5ce7,
            SpeedBurst => 0x74b9ff,
            BerserkMode => 0xfd79a8,
            ElectricBall => 0xfdcb6e,
            HyperSpin => 0xa29bfe,
        }
    }

    pub fn power_type(self) -> PowerUpType {
        if self.timed().is_some() {
            PowerUpType::Temporary
        } else {
            PowerUpType::Permanent
        }
    }

    /// Counter changes for permanent kinds
    pub fn upgrade(self) -> Option<UpgradeEffect> {
        let none = UpgradeEffect::NONE;
        let effect = match self {
            HealingHeart => UpgradeEffect { health_increase: 15, ..none },
            HealthBoost => UpgradeEffect { health_increase: 25, ..none },
            SpeedBoost => UpgradeEffect { speed_boost: 1, ..none },
            BallSpikes => UpgradeEffect { ball_damage: 1, ..none },
            ChainSpikes => UpgradeEffect { chain_damage: 1, ..none },
            MajorHealthBoost => UpgradeEffect { health_increase: 50, ..none },
            MajorSpeedBoost => UpgradeEffect { speed_boost: 2, ..none },
            BallGrowth => UpgradeEffect { ball_size: 1, ..none },
            ChainExtension => UpgradeEffect { chain_extension: true, ..none },
            MegaSpikes => UpgradeEffect { chain_damage: 2, ball_damage: 2, ..none },
            SecondChain => UpgradeEffect { second_chain: true, ..none },
            ChainMastery => UpgradeEffect { second_chain_damage: 1, ..none },
            ChainVelocity => UpgradeEffect { second_chain_speed: 1, ..none },
            SpeedBurst | BerserkMode | ElectricBall | HyperSpin => return None,
        };
        Some(effect)
    }

    /// Effect and duration (ms) for temporary kinds
    pub fn timed(self) -> Option<(TimedEffect, f64)> {
        match self {
            SpeedBurst => Some((TimedEffect::SpeedBurst { multiplier: 2.0 }, 5000.0)),
            BerserkMode => Some((
                TimedEffect::Berserk {
                    damage: 3.0,
                    vulnerability: 1.5,
                },
                8000.0,
            )),
            ElectricBall => Some((TimedEffect::Electrified, 12_000.0)),
            HyperSpin => Some((TimedEffect::HyperSpin, 10_000.0)),
            _ => None,
        }
    }
}

/// Run-long upgrade counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpgrades {
    pub chain_damage: u8,
    pub ball_damage: u8,
    /// Total max health gained from pickups (uncapped)
    pub health_increase: i32,
    pub speed_boost: u8,
    pub ball_size: u8,
    pub chain_extensions: u8,
    pub has_second_chain: bool,
    pub second_chain_damage: u8,
    pub second_chain_speed: u8,
}

impl PlayerUpgrades {
    /// Add an upgrade, clamping every counter to its cap
    pub fn apply(&mut self, effect: &UpgradeEffect) {
        fn bump(counter: &mut u8, by: u8, cap: u8) {
            *counter = counter.saturating_add(by).min(cap);
        }
        bump(&mut self.chain_damage, effect.chain_damage, MAX_CHAIN_DAMAGE);
        bump(&mut self.ball_damage, effect.ball_damage, MAX_BALL_DAMAGE);
        bump(&mut self.speed_boost, effect.speed_boost, MAX_SPEED_BOOST);
        bump(&mut self.ball_size, effect.ball_size, MAX_BALL_SIZE);
        bump(
            &mut self.chain_extensions,
            effect.chain_extension as u8,
            MAX_CHAIN_EXTENSIONS,
        );
        bump(
            &mut self.second_chain_damage,
            effect.second_chain_damage,
            MAX_SECOND_CHAIN_DAMAGE,
        );
        bump(
            &mut self.second_chain_speed,
            effect.second_chain_speed,
            MAX_SECOND_CHAIN_SPEED,
        );
        self.health_increase += effect.health_increase;
        self.has_second_chain |= effect.second_chain;
    }
}

/// A power-up floating in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Permanent kinds the player can currently be offered at this rarity
pub fn permanent_pool(rarity: Rarity, upgrades: &PlayerUpgrades) -> Vec<PowerUpKind> {
    let mut pool: Vec<PowerUpKind> = match rarity {
        Rarity::Common => PERMANENT_COMMON.to_vec(),
        Rarity::Rare => PERMANENT_RARE
            .iter()
            .copied()
            .filter(|kind| *kind != ChainExtension || upgrades.chain_extensions < MAX_CHAIN_EXTENSIONS)
            .collect(),
        Rarity::VeryRare => {
            let mega = upgrades.ball_damage >= MAX_BALL_DAMAGE && upgrades.chain_damage >= MAX_CHAIN_DAMAGE;
            let mut pool: Vec<PowerUpKind> = PERMANENT_VERY_RARE
                .iter()
                .copied()
                .filter(|kind| match kind {
                    MegaSpikes => mega,
                    SecondChain => upgrades.chain_extensions >= MAX_CHAIN_EXTENSIONS,
                    ChainMastery => {
                        upgrades.has_second_chain && upgrades.second_chain_damage < MAX_SECOND_CHAIN_DAMAGE
                    }
                    ChainVelocity => {
                        upgrades.has_second_chain && upgrades.second_chain_speed < MAX_SECOND_CHAIN_SPEED
                    }
                    _ => true,
                })
                .collect();
            if !mega {
                pool.extend_from_slice(PERMANENT_RARE);
            }
            pool
        }
    };
    if pool.is_empty() {
        pool = PERMANENT_COMMON.to_vec();
    }
    pool
}

pub fn temporary_pool(rarity: Rarity) -> &'static [PowerUpKind] {
    match rarity {
        Rarity::Common => TEMPORARY_COMMON,
        Rarity::Rare => TEMPORARY_RARE,
        Rarity::VeryRare => TEMPORARY_VERY_RARE,
    }
}

/// Time between edge spawns; shrinks with the wave down to a floor
pub fn spawn_interval_ms(wave: u32) -> f32 {
    (15_000.0 - wave as f32 * 1000.0).max(8000.0)
}

fn pick<R: Rng>(pool: &[PowerUpKind], rng: &mut R) -> PowerUpKind {
    pool[rng.random_range(0..pool.len())]
}

fn choose_kind<R: Rng>(power_type: PowerUpType, rarity: Rarity, upgrades: &PlayerUpgrades, rng: &mut R) -> PowerUpKind {
    match power_type {
        PowerUpType::Permanent => pick(&permanent_pool(rarity, upgrades), rng),
        PowerUpType::Temporary => pick(temporary_pool(rarity), rng),
    }
}

/// Spawn a power-up just outside a random edge, drifting inward
pub fn spawn_edge_powerup(state: &mut SimulationState) {
    let canvas = state.canvas();
    let rng = &mut state.rng;

    let rarity = Rarity::roll(rng.random::<f32>(), state.game.wave);
    let power_type = if rng.random::<f32>() < PERMANENT_CHANCE {
        PowerUpType::Permanent
    } else {
        PowerUpType::Temporary
    };
    let kind = choose_kind(power_type, rarity, &state.upgrades, rng);

    let lateral = (rng.random::<f32>() - 0.5) * 40.0;
    let (pos, vel) = match rng.random_range(0..4) {
        0 => (
            Vec2::new(rng.random::<f32>() * canvas.x, -50.0),
            Vec2::new(lateral, 30.0),
        ),
        1 => (
            Vec2::new(canvas.x + 50.0, rng.random::<f32>() * canvas.y),
            Vec2::new(-30.0, lateral),
        ),
        2 => (
            Vec2::new(rng.random::<f32>() * canvas.x, canvas.y + 50.0),
            Vec2::new(lateral, -30.0),
        ),
        _ => (
            Vec2::new(-50.0, rng.random::<f32>() * canvas.y),
            Vec2::new(30.0, lateral),
        ),
    };

    let id = state.next_entity_id();
    log::debug!("power-up {:?} ({:?}) spawned at {:?}", kind, rarity, pos);
    state.powerups.push(PowerUp {
        id,
        kind,
        rarity,
        pos,
        vel,
        size: POWERUP_SIZE,
    });
}

/// Guaranteed permanent drop where a boss died
pub fn spawn_boss_drop(state: &mut SimulationState, pos: Vec2) {
    let rng = &mut state.rng;
    let rarity = Rarity::roll_boss_drop(rng.random::<f32>());
    let kind = choose_kind(PowerUpType::Permanent, rarity, &state.upgrades, rng);
    let vel = Vec2::new(
        (rng.random::<f32>() - 0.5) * 20.0,
        (rng.random::<f32>() - 0.5) * 20.0,
    );
    let id = state.next_entity_id();
    log::debug!("boss drop {:?} ({:?}) at {:?}", kind, rarity, pos);
    state.powerups.push(PowerUp {
        id,
        kind,
        rarity,
        pos,
        vel,
        size: BOSS_DROP_SIZE,
    });
}

/// Integrate one power-up and pull it toward the arena center
pub fn drift(powerup: &mut PowerUp, center: Vec2, dt_secs: f32) {
    powerup.pos += powerup.vel * dt_secs;

    let pull = Vec2::new(
        if powerup.pos.x < center.x { 1.0 } else { -1.0 },
        if powerup.pos.y < center.y { 1.0 } else { -1.0 },
    );
    powerup.vel += pull * DRIFT_FORCE * dt_secs;
    powerup.vel *= DRIFT_DAMPING;
}

/// Spawn timer, drift and off-screen culling
pub fn update_powerups(state: &mut SimulationState, dt_ms: f32) {
    state.timers.powerup_ms += dt_ms;
    if state.timers.powerup_ms >= spawn_interval_ms(state.game.wave) {
        spawn_edge_powerup(state);
        state.timers.powerup_ms = 0.0;
    }

    let dt = dt_ms / 1000.0;
    let canvas = state.canvas();
    let center = canvas / 2.0;
    for powerup in &mut state.powerups {
        drift(powerup, center, dt);
    }
    state.powerups.retain(|p| {
        p.pos.x > -CULL_MARGIN
            && p.pos.x < canvas.x + CULL_MARGIN
            && p.pos.y > -CULL_MARGIN
            && p.pos.y < canvas.y + CULL_MARGIN
    });
}

/// Remove and return the first power-up touching the player
pub fn take_pickup(powerups: &mut Vec<PowerUp>, player: Vec2, player_size: f32) -> Option<PowerUp> {
    let index = powerups
        .iter()
        .position(|p| player.distance(p.pos) < player_size + p.size)?;
    Some(powerups.remove(index))
}

/// Apply a collected power-up to the run
pub fn apply_power_up(state: &mut SimulationState, power_up: &PowerUp) -> VisualEffect {
    if let Some(effect) = power_up.kind.upgrade() {
        state.upgrades.apply(&effect);
        if effect.health_increase > 0 {
            state.game.raise_max_health(effect.health_increase);
        }
        if effect.chain_extension {
            state.deferred.push_back(DeferredAction::RebuildChain);
        }
        if effect.second_chain {
            state.deferred.push_back(DeferredAction::AttachSecondChain);
        }
    } else if let Some((effect, duration_ms)) = power_up.kind.timed() {
        state.effects.activate(effect, state.clock.now_ms, duration_ms);
    }

    VisualEffect::Explosion {
        pos: power_up.pos,
        color: power_up.kind.color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn power_up(kind: PowerUpKind) -> PowerUp {
        PowerUp {
            id: 1,
            kind,
            rarity: Rarity::Common,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: POWERUP_SIZE,
        }
    }

    #[test]
    fn test_rarity_thresholds_are_cumulative() {
        assert_eq!(Rarity::roll(0.0, 1), Rarity::VeryRare);
        assert_eq!(Rarity::roll(0.087, 1), Rarity::VeryRare);
        assert_eq!(Rarity::roll(0.1, 1), Rarity::Rare);
        assert_eq!(Rarity::roll(0.26, 1), Rarity::Rare);
        assert_eq!(Rarity::roll(0.27, 1), Rarity::Common);
        assert_eq!(Rarity::roll_boss_drop(0.29), Rarity::VeryRare);
        assert_eq!(Rarity::roll_boss_drop(0.5), Rarity::Rare);
        assert_eq!(Rarity::roll_boss_drop(0.71), Rarity::Common);
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(spawn_interval_ms(1), 14_000.0);
        assert_eq!(spawn_interval_ms(7), 8000.0);
        assert_eq!(spawn_interval_ms(30), 8000.0);
    }

    #[test]
    fn test_very_rare_pool_falls_back_to_rare() {
        let pool = permanent_pool(Rarity::VeryRare, &PlayerUpgrades::default());
        assert!(!pool.contains(&MegaSpikes));
        assert!(!pool.contains(&SecondChain));
        assert!(!pool.contains(&ChainMastery));
        assert_eq!(pool, PERMANENT_RARE.to_vec());
    }

    #[test]
    fn test_very_rare_pool_when_maxed() {
        let upgrades = PlayerUpgrades {
            chain_damage: 3,
            ball_damage: 3,
            chain_extensions: 2,
            ..Default::default()
        };
        assert_eq!(permanent_pool(Rarity::VeryRare, &upgrades), vec![MegaSpikes, SecondChain]);

        let upgrades = PlayerUpgrades {
            has_second_chain: true,
            second_chain_speed: 2,
            ..upgrades
        };
        let pool = permanent_pool(Rarity::VeryRare, &upgrades);
        assert!(pool.contains(&ChainMastery));
        assert!(!pool.contains(&ChainVelocity));
    }

    #[test]
    fn test_rare_pool_drops_extension_at_cap() {
        let upgrades = PlayerUpgrades {
            chain_extensions: 2,
            ..Default::default()
        };
        let pool = permanent_pool(Rarity::Rare, &upgrades);
        assert_eq!(pool.len(), 5);
        assert!(!pool.contains(&ChainExtension));
    }

    #[test]
    fn test_health_pickup_heals_and_raises_max() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.game.apply_damage(30);
        apply_power_up(&mut state, &power_up(MajorHealthBoost));
        assert_eq!(state.game.health, 120);
        assert_eq!(state.game.max_health, 150);
        assert_eq!(state.upgrades.health_increase, 50);
    }

    #[test]
    fn test_chain_pickups_queue_deferred_work() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        apply_power_up(&mut state, &power_up(ChainExtension));
        apply_power_up(&mut state, &power_up(SecondChain));
        assert_eq!(
            state.deferred.iter().copied().collect::<Vec<_>>(),
            vec![DeferredAction::RebuildChain, DeferredAction::AttachSecondChain]
        );
        // Nothing changes until the queue drains
        assert_eq!(state.chain.len(), 10);
        assert!(state.second_chain.is_none());
    }

    #[test]
    fn test_temporary_pickup_registers_effect() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.clock.now_ms = 2000.0;
        apply_power_up(&mut state, &power_up(HyperSpin));
        assert_eq!(state.effects.hyper_spin.map(|e| e.end_ms), Some(12_000.0));
        assert_eq!(state.upgrades, PlayerUpgrades::default());
    }

    #[test]
    fn test_pickup_takes_first_overlap() {
        let mut pool = vec![power_up(SpeedBoost), power_up(HyperSpin)];
        pool[0].pos = Vec2::new(500.0, 500.0);
        pool[1].pos = Vec2::new(410.0, 300.0);
        let taken = take_pickup(&mut pool, Vec2::new(400.0, 300.0), 18.0);
        assert_eq!(taken.map(|p| p.kind), Some(HyperSpin));
        assert_eq!(pool.len(), 1);
        assert!(take_pickup(&mut pool, Vec2::new(400.0, 300.0), 18.0).is_none());
    }

    #[test]
    fn test_drift_pulls_toward_center() {
        let mut p = power_up(SpeedBoost);
        p.pos = Vec2::new(-50.0, 100.0);
        p.vel = Vec2::new(30.0, 0.0);
        drift(&mut p, Vec2::new(400.0, 300.0), 0.5);
        assert!(p.pos.x > -50.0);
        assert!(p.vel.x > 30.0 * DRIFT_DAMPING);
        assert!(p.vel.y > 0.0);
    }

    #[test]
    fn test_boss_drop_is_permanent_at_position() {
        let mut state = SimulationState::new(GameConfig::default(), 9);
        for _ in 0..50 {
            spawn_boss_drop(&mut state, Vec2::new(123.0, 456.0));
        }
        assert_eq!(state.powerups.len(), 50);
        for drop in &state.powerups {
            assert_eq!(drop.kind.power_type(), PowerUpType::Permanent);
            assert_eq!(drop.pos, Vec2::new(123.0, 456.0));
            assert_eq!(drop.size, BOSS_DROP_SIZE);
            assert!(drop.vel.abs().max_element() <= 10.0);
        }
    }

    #[test]
    fn test_powerup_director_spawns_on_interval() {
        let mut state = SimulationState::new(GameConfig::default(), 4);
        for _ in 0..874 {
            update_powerups(&mut state, 16.0);
        }
        assert!(state.powerups.is_empty());
        update_powerups(&mut state, 16.0);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.timers.powerup_ms, 0.0);
    }

    proptest! {
        #[test]
        fn prop_upgrades_never_exceed_caps(
            picks in prop::collection::vec(prop::sample::select(PowerUpKind::ALL.to_vec()), 0..200)
        ) {
            let mut upgrades = PlayerUpgrades::default();
            for kind in picks {
                if let Some(effect) = kind.upgrade() {
                    upgrades.apply(&effect);
                }
                prop_assert!(upgrades.chain_damage <= MAX_CHAIN_DAMAGE);
                prop_assert!(upgrades.ball_damage <= MAX_BALL_DAMAGE);
                prop_assert!(upgrades.speed_boost <= MAX_SPEED_BOOST);
                prop_assert!(upgrades.ball_size <= MAX_BALL_SIZE);
                prop_assert!(upgrades.chain_extensions <= MAX_CHAIN_EXTENSIONS);
                prop_assert!(upgrades.second_chain_damage <= MAX_SECOND_CHAIN_DAMAGE);
                prop_assert!(upgrades.second_chain_speed <= MAX_SECOND_CHAIN_SPEED);
            }
        }
    }
}
