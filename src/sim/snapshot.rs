//! Read-only view of a finished tick for the render adapter

use glam::Vec2;
use serde::Serialize;

use super::effects::ActiveEffects;
use super::particles::Particle;
use super::powerups::{PlayerUpgrades, PowerUp};
use super::state::{Enemy, GameState, Projectile, SimulationState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondChainView {
    pub segments: Vec<Vec2>,
    pub ball: Vec2,
    pub ball_velocity: Vec2,
    pub ball_radius: f32,
}

/// Everything a painter needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub now_ms: f64,
    pub canvas: Vec2,
    pub player: Vec2,
    pub player_size: f32,
    pub chain: Vec<Vec2>,
    pub ball: Vec2,
    pub ball_velocity: Vec2,
    pub ball_radius: f32,
    pub second_chain: Option<SecondChainView>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<PowerUp>,
    pub game: GameState,
    pub upgrades: PlayerUpgrades,
    pub effects: ActiveEffects,
    pub help_visible: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            now_ms: state.clock.now_ms,
            canvas: state.canvas(),
            player: state.player,
            player_size: state.config.player_size,
            chain: state.chain.iter().map(|s| s.pos).collect(),
            ball: state.ball,
            ball_velocity: state.ball_velocity,
            ball_radius: state.ball_radius(),
            second_chain: state.second_chain.as_ref().map(|second| SecondChainView {
                segments: second.segments.iter().map(|s| s.pos).collect(),
                ball: second.ball,
                ball_velocity: second.ball_velocity,
                ball_radius: state.config.second_ball_radius,
            }),
            enemies: state.enemies.clone(),
            projectiles: state.projectiles.clone(),
            particles: state.particles.particles().to_vec(),
            powerups: state.powerups.clone(),
            game: state.game.clone(),
            upgrades: state.upgrades.clone(),
            effects: state.effects.clone(),
            help_visible: state.help_visible,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::EnemyKind;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = SimulationState::new(GameConfig::default(), 3);
        state.help_visible = true;
        let snapshot = RenderSnapshot::capture(&state);
        assert_eq!(snapshot.chain.len(), 10);
        assert_eq!(snapshot.chain[0], state.player);
        assert_eq!(snapshot.ball, state.ball);
        assert_eq!(snapshot.ball_radius, 25.0);
        assert!(snapshot.second_chain.is_none());
        assert!(snapshot.help_visible);

        state.upgrades.has_second_chain = true;
        state.attach_second_chain();
        let snapshot = RenderSnapshot::capture(&state);
        let second = snapshot.second_chain.as_ref().map(|s| s.segments.len());
        assert_eq!(second, Some(4));
    }

    #[test]
    fn test_json_tags_enemy_kinds() {
        let mut state = SimulationState::new(GameConfig::default(), 3);
        state.enemies.push(crate::sim::state::Enemy::new(
            7,
            EnemyKind::Pusher { push_force: 300.0 },
            Vec2::new(1.0, 2.0),
            Vec2::ZERO,
            10,
            26.0,
            0xff6600,
        ));
        let json = RenderSnapshot::capture(&state).to_json().unwrap();
        assert!(json.contains("\"type\":\"pusher\""));
        assert!(json.contains("\"help_visible\":false"));
    }
}
