//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `SimulationState`. Subsystems are free
//! functions that borrow the pieces they need; nothing keeps hidden state.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::ball_radius;
use super::boss::{BossState, UfoArchetype};
use super::chain::{ChainSegment, build_chain, chain_links};
use super::clock::SimulationClock;
use super::effects::ActiveEffects;
use super::particles::ParticleSystem;
use super::powerups::{PlayerUpgrades, PowerUp, PowerUpKind};
use super::second_chain::SecondChain;
use crate::config::GameConfig;
use crate::consts::*;

/// Score, health and run lifecycle flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub wave: u32,
    pub health: i32,
    pub max_health: i32,
    /// Survival time in seconds (excludes paused time)
    pub game_time: f32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub is_window_focused: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            wave: 1,
            health: BASE_HEALTH,
            max_health: BASE_HEALTH,
            game_time: 0.0,
            is_game_over: false,
            is_paused: false,
            is_window_focused: true,
        }
    }
}

impl GameState {
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Subtract health, clamped to `[0, max_health]`. Reaching 0 ends the run.
    pub fn apply_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health == 0 {
            self.is_game_over = true;
        }
    }

    /// Raise max health and heal by the same amount
    pub fn raise_max_health(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health + amount);
        self.max_health += amount;
    }

    /// Advance one wave if the score has outgrown the current one
    pub fn advance_wave(&mut self) -> bool {
        if self.score > self.wave as u64 * SCORE_PER_WAVE {
            self.wave += 1;
            true
        } else {
            false
        }
    }

    pub fn advance_time(&mut self, elapsed_ms: f32) {
        self.game_time += elapsed_ms / 1000.0;
    }
}

/// Enemy variant with its type-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyKind {
    Weak,
    Basic,
    Heavy,
    Fast,
    Triangle,
    Square,
    NinjaStar { spin_angle: f32, chain_wrapped: bool },
    Pusher { push_force: f32 },
    Boss(Box<BossState>),
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Basic => "basic",
            Self::Heavy => "heavy",
            Self::Fast => "fast",
            Self::Triangle => "triangle",
            Self::Square => "square",
            Self::NinjaStar { .. } => "ninja_star",
            Self::Pusher { .. } => "pusher",
            Self::Boss(_) => "boss",
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Self::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossState> {
        match self {
            Self::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    /// Points for a ball kill
    pub fn ball_points(&self) -> u64 {
        match self {
            Self::Weak => 5,
            Self::Basic => 20,
            Self::Heavy => 50,
            Self::Fast => 30,
            Self::Triangle => 40,
            Self::Square => 60,
            Self::NinjaStar { .. } => 25,
            Self::Pusher { .. } => 30,
            Self::Boss(_) => 200,
        }
    }

    /// Points for a primary chain kill
    pub fn chain_points(&self) -> u64 {
        match self {
            Self::Weak => 3,
            Self::Basic => 8,
            Self::Heavy => 15,
            Self::Fast => 12,
            Self::Triangle => 16,
            Self::Square => 20,
            Self::NinjaStar { .. } => 25,
            Self::Pusher { .. } => 30,
            Self::Boss(_) => 50,
        }
    }

    /// Points for a second chain kill
    pub fn second_chain_points(&self) -> u64 {
        match self {
            Self::Weak => 2,
            Self::Basic => 6,
            Self::Heavy => 12,
            Self::Fast => 10,
            Self::Triangle => 14,
            Self::Square => 18,
            Self::NinjaStar { .. } => 20,
            Self::Pusher { .. } => 25,
            Self::Boss(_) => 40,
        }
    }

    /// Damage dealt to the player on contact (before berserk vulnerability)
    pub fn contact_damage(&self) -> i32 {
        match self {
            Self::Weak => 5,
            Self::Basic => 10,
            Self::Heavy => 20,
            Self::Fast => 15,
            Self::Triangle => 18,
            Self::Square => 25,
            Self::NinjaStar { .. } => 12,
            Self::Pusher { .. } => 15,
            Self::Boss(_) => 30,
        }
    }

    /// Chain damage after type resistances
    pub fn chain_damage_taken(&self, nominal: i32) -> i32 {
        match self {
            Self::Heavy => (nominal as f32 * 0.15).ceil() as i32,
            Self::Fast => (nominal as f32 * 0.8).ceil() as i32,
            _ => nominal,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub size: f32,
    pub color: u32,
    pub kind: EnemyKind,
    /// Last time any chain segment damaged this enemy (simulation ms)
    pub last_chain_hit_ms: Option<f64>,
    /// Set once the enemy has been fully inside the canvas; enables wall bounces
    pub entered_play_area: bool,
    /// Sliding from a ball hit; friction applies until it slows down
    pub knocked_back: bool,
    /// Spawned by a boss rather than the wave director
    pub minion: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, vel: Vec2, health: i32, size: f32, color: u32) -> Self {
        Self {
            id,
            pos,
            vel,
            health,
            max_health: health,
            size,
            color,
            kind,
            last_chain_hit_ms: None,
            entered_play_area: false,
            knocked_back: false,
            minion: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0 {
            self.health as f32 / self.max_health as f32
        } else {
            0.0
        }
    }

    /// Still inside the chain immunity window at `now_ms`
    pub fn chain_immune(&self, now_ms: f64, window_ms: f64) -> bool {
        self.last_chain_hit_ms
            .is_some_and(|last| now_ms - last < window_ms)
    }
}

/// Boss projectile shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectilePattern {
    Single,
    Spread,
    Homing,
    Rapid,
}

/// A boss projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pattern: ProjectilePattern,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: i32,
    /// Remaining life in ms
    pub life_ms: f32,
    pub color: u32,
}

/// Spawn timers for the enemy, boss and power-up directors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub enemy_ms: f32,
    pub boss_ms: f32,
    pub bosses_spawned: u32,
    pub powerup_ms: f32,
}

/// Work queued by one tick and performed at the start of the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Rebuild the primary chain at the current link count
    RebuildChain,
    /// Create the second chain around the player
    AttachSecondChain,
}

/// Events emitted by a tick for the HUD, audio and session hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    HealthChanged { health: i32, max_health: i32 },
    WaveAdvanced { wave: u32 },
    BossSpawned { archetype: UfoArchetype },
    BossDefeated { archetype: UfoArchetype },
    PowerUpCollected { kind: PowerUpKind },
    Paused,
    Resumed,
    GameOver { score: u64, wave: u32, survival_time_secs: f32 },
}

/// The whole simulation: one owner for every entity pool and timer
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub game: GameState,
    pub clock: SimulationClock,
    pub help_visible: bool,

    // === Player and weapons ===
    pub player: Vec2,
    pub chain: Vec<ChainSegment>,
    pub ball: Vec2,
    pub ball_velocity: Vec2,
    pub second_chain: Option<SecondChain>,
    pub upgrades: PlayerUpgrades,
    pub effects: ActiveEffects,

    // === Entities ===
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    pub particles: ParticleSystem,

    // === Directors ===
    pub timers: SpawnTimers,
    pub deferred: VecDeque<DeferredAction>,
    next_id: u32,
}

impl SimulationState {
    /// Fresh run: player centered, chain hanging straight down
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = config.center();
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            game: GameState::default(),
            clock: SimulationClock::new(),
            help_visible: false,
            player,
            chain: Vec::new(),
            ball: player,
            ball_velocity: Vec2::ZERO,
            second_chain: None,
            upgrades: PlayerUpgrades::default(),
            effects: ActiveEffects::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            particles: ParticleSystem::new(),
            timers: SpawnTimers::default(),
            deferred: VecDeque::new(),
            next_id: 1,
        };
        state.rebuild_chain();
        state
    }

    /// Start over with a new seed, keeping the config
    pub fn restart(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::new(config, seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.config.canvas_width, self.config.canvas_height)
    }

    /// Primary chain link count including extension upgrades
    pub fn chain_link_count(&self) -> usize {
        chain_links(self.config.chain_length, self.upgrades.chain_extensions)
    }

    /// Ball radius including growth upgrades
    pub fn ball_radius(&self) -> f32 {
        ball_radius(self.config.ball_radius, self.upgrades.ball_size)
    }

    /// Lay the primary chain out again from the player, ball one link past the tail
    pub fn rebuild_chain(&mut self) {
        let links = self.chain_link_count();
        let spacing = self.config.chain_segment_distance;
        self.chain = build_chain(self.player, links, spacing);
        self.ball = self.player + Vec2::new(0.0, links as f32 * spacing);
        self.ball_velocity = Vec2::ZERO;
    }

    /// Create the second chain if it has been unlocked
    pub fn attach_second_chain(&mut self) {
        if self.upgrades.has_second_chain {
            self.second_chain = Some(SecondChain::new(
                self.player,
                self.config.second_chain_length,
                self.config.second_chain_distance,
            ));
        }
    }

    /// Perform everything queued by the previous tick
    pub fn drain_deferred(&mut self) {
        while let Some(action) = self.deferred.pop_front() {
            match action {
                DeferredAction::RebuildChain => self.rebuild_chain(),
                DeferredAction::AttachSecondChain => self.attach_second_chain(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_run_layout() {
        let state = SimulationState::new(GameConfig::default(), 7);
        assert_eq!(state.player, Vec2::new(400.0, 300.0));
        assert_eq!(state.chain.len(), 10);
        assert_eq!(state.chain[9].pos, Vec2::new(400.0, 615.0));
        assert_eq!(state.ball, Vec2::new(400.0, 650.0));
        assert_eq!(state.game.health, 100);
        assert_eq!(state.game.wave, 1);
        assert!(state.second_chain.is_none());
    }

    #[test]
    fn test_wave_advances_only_past_threshold() {
        let mut game = GameState::default();
        game.add_score(150);
        assert!(!game.advance_wave());
        game.add_score(1);
        assert!(game.advance_wave());
        assert_eq!(game.wave, 2);
        assert!(!game.advance_wave());
    }

    #[test]
    fn test_raise_max_health_heals() {
        let mut game = GameState::default();
        game.apply_damage(40);
        game.raise_max_health(25);
        assert_eq!(game.health, 85);
        assert_eq!(game.max_health, 125);
    }

    #[test]
    fn test_game_over_at_zero() {
        let mut game = GameState::default();
        game.apply_damage(99);
        assert!(!game.is_game_over);
        game.apply_damage(30);
        assert_eq!(game.health, 0);
        assert!(game.is_game_over);
    }

    #[test]
    fn test_deferred_rebuild_uses_current_player() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.player = Vec2::new(100.0, 120.0);
        state.upgrades.chain_extensions = 1;
        state.deferred.push_back(DeferredAction::RebuildChain);
        state.drain_deferred();
        assert!(state.deferred.is_empty());
        assert_eq!(state.chain.len(), 13);
        assert_eq!(state.chain[0].pos, Vec2::new(100.0, 120.0));
        assert_eq!(state.ball, Vec2::new(100.0, 120.0 + 13.0 * 35.0));
    }

    #[test]
    fn test_second_chain_requires_unlock() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.attach_second_chain();
        assert!(state.second_chain.is_none());
        state.upgrades.has_second_chain = true;
        state.attach_second_chain();
        assert_eq!(state.second_chain.as_ref().map(|c| c.segments.len()), Some(4));
    }

    #[test]
    fn test_chain_immunity_window() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, Vec2::ZERO, Vec2::ZERO, 5, 22.0, 0);
        assert!(!enemy.chain_immune(0.0, 75.0));
        enemy.last_chain_hit_ms = Some(1000.0);
        assert!(enemy.chain_immune(1074.0, 75.0));
        assert!(!enemy.chain_immune(1075.0, 75.0));
        assert!(!enemy.chain_immune(1001.0, 0.0));
    }

    #[test]
    fn test_chain_resistances() {
        assert_eq!(EnemyKind::Heavy.chain_damage_taken(1), 1);
        assert_eq!(EnemyKind::Heavy.chain_damage_taken(10), 2);
        assert_eq!(EnemyKind::Fast.chain_damage_taken(2), 2);
        assert_eq!(EnemyKind::Fast.chain_damage_taken(5), 4);
        assert_eq!(EnemyKind::Square.chain_damage_taken(5), 5);
    }

    proptest! {
        #[test]
        fn prop_health_stays_clamped(
            hits in prop::collection::vec(0i32..80, 1..40),
            boosts in prop::collection::vec(0i32..50, 1..40),
        ) {
            let mut game = GameState::default();
            for (hit, boost) in hits.into_iter().zip(boosts) {
                if !game.is_game_over {
                    game.raise_max_health(boost);
                }
                game.apply_damage(hit);
                prop_assert!(game.health >= 0 && game.health <= game.max_health);
                prop_assert_eq!(game.is_game_over, game.health == 0);
            }
        }
    }
}
