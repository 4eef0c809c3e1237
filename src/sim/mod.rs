//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one `Pcg32` owned by `SimulationState`)
//! - One mutable aggregate, passed into free functions per subsystem
//! - No rendering or platform dependencies; visual feedback leaves as requests

pub mod ball;
pub mod boss;
pub mod chain;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod enemies;
pub mod particles;
pub mod player;
pub mod powerups;
pub mod second_chain;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use boss::{BossAbility, BossState, MovementPattern, UfoArchetype};
pub use chain::ChainSegment;
pub use clock::SimulationClock;
pub use collision::{CollisionOutcome, resolve_collisions};
pub use effects::{ActiveEffects, TimedEffect};
pub use particles::{Particle, ParticleSystem, VisualEffect};
pub use powerups::{PlayerUpgrades, PowerUp, PowerUpKind, Rarity};
pub use second_chain::SecondChain;
pub use snapshot::RenderSnapshot;
pub use state::{
    DeferredAction, Enemy, EnemyKind, GameEvent, GameState, Projectile, ProjectilePattern,
    SimulationState,
};
pub use tick::{FocusChange, TickInput, tick};
