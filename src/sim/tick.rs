//! Per-frame simulation tick
//!
//! Order within a frame: focus / pause bookkeeping, clock, deferred actions,
//! effect expiry, player, weapons, enemy director, particles, power-ups,
//! pickup, collisions, then score / health / wave bookkeeping.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::{update_ball, update_ball_hyper_spin};
use super::chain::{hyper_spin_angle, update_chain, update_chain_hyper_spin};
use super::collision::{CollisionOutcome, resolve_collisions};
use super::enemies::{remove_indices, update_enemies};
use super::particles::VisualEffect;
use super::player::update_player;
use super::powerups::{apply_power_up, spawn_boss_drop, take_pickup, update_powerups};
use super::state::{GameEvent, SimulationState};

/// Chance per tick of a spark burst around the electrified ball
pub const SPARK_CHANCE: f32 = 0.3;

/// Window focus transitions reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusChange {
    Lost,
    Gained,
}

/// Input sampled once at the start of a tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Pointer in canvas coordinates (None leaves the player where it is)
    pub pointer: Option<Vec2>,
    /// Pointer held: retract the chain
    pub pointer_down: bool,
    pub toggle_pause: bool,
    pub toggle_help: bool,
    pub focus: Option<FocusChange>,
}

/// Advance the simulation by one display frame
pub fn tick(state: &mut SimulationState, input: &TickInput, frame_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.toggle_help {
        state.help_visible = !state.help_visible;
    }

    match input.focus {
        Some(FocusChange::Lost) => {
            state.game.is_window_focused = false;
            state.clock.focus_lost();
        }
        Some(FocusChange::Gained) => {
            state.game.is_window_focused = true;
            state.clock.focus_gained();
        }
        None => {}
    }
    if state.clock.poll_auto_pause(frame_ms, state.config.pause_delay_ms)
        && !state.game.is_paused
        && !state.game.is_game_over
    {
        log::info!("focus lost, auto-pausing");
        set_paused(state, true, &mut events);
    }

    if input.toggle_pause && !state.game.is_game_over {
        let paused = !state.game.is_paused;
        set_paused(state, paused, &mut events);
    }

    // Don't tick if paused or game over
    if state.game.is_paused || state.game.is_game_over {
        return events;
    }

    let step = state.clock.begin_frame(frame_ms, state.config.max_step_ms);
    let dt_ms = step.physics_ms;

    state.drain_deferred();
    if state.effects.expire(state.clock.now_ms) {
        log::debug!("timed effect expired");
    }

    if let Some(pointer) = input.pointer {
        let canvas = state.canvas();
        update_player(
            &mut state.player,
            pointer,
            state.upgrades.speed_boost,
            state.effects.speed_multiplier(),
            state.config.player_size,
            canvas,
            dt_ms,
        );
    }

    update_weapons(state, input.pointer_down, dt_ms);

    events.extend(update_enemies(state, dt_ms));
    state.particles.update(dt_ms);
    update_powerups(state, dt_ms);

    if state.effects.electrified_active() && state.rng.random::<f32>() < SPARK_CHANCE {
        let sparks = VisualEffect::Sparks { pos: state.ball };
        state.particles.emit(&sparks, &mut state.rng);
    }

    collect_pickup(state, &mut events);

    let outcome = resolve_collisions(state);
    apply_collisions(state, outcome, &mut events);

    if state.game.advance_wave() {
        log::info!("wave {}", state.game.wave);
        events.push(GameEvent::WaveAdvanced {
            wave: state.game.wave,
        });
    }
    state.game.advance_time(step.elapsed_ms);

    if state.game.is_game_over {
        log::info!(
            "game over: score {} wave {} after {:.1}s",
            state.game.score,
            state.game.wave,
            state.game.game_time
        );
        events.push(GameEvent::GameOver {
            score: state.game.score,
            wave: state.game.wave,
            survival_time_secs: state.game.game_time,
        });
    }

    events
}

fn set_paused(state: &mut SimulationState, paused: bool, events: &mut Vec<GameEvent>) {
    state.game.is_paused = paused;
    if paused {
        state.clock.mark_paused();
        log::info!("paused");
        events.push(GameEvent::Paused);
    } else {
        log::info!("resumed");
        events.push(GameEvent::Resumed);
    }
}

/// Chains and balls, either free physics or the hyper-spin override
fn update_weapons(state: &mut SimulationState, retracting: bool, dt_ms: f32) {
    let spacing = state.config.chain_segment_distance;
    let second_spacing = state.config.second_chain_distance;
    let anchor = state.player;

    if state.effects.hyper_spin_active() {
        let angle = hyper_spin_angle(state.clock.now_ms);
        update_chain_hyper_spin(&mut state.chain, anchor, spacing, angle);
        let arm_length = state.chain.len() as f32 * spacing;
        update_ball_hyper_spin(
            &mut state.ball,
            &mut state.ball_velocity,
            anchor,
            arm_length,
            angle,
            dt_ms,
        );
        if let Some(second) = state.second_chain.as_mut() {
            second.update_hyper_spin(anchor, second_spacing, angle);
        }
        return;
    }

    update_chain(&mut state.chain, &mut state.player, retracting, spacing);
    if let Some(tail) = state.chain.last_mut() {
        update_ball(
            &mut state.ball,
            &mut state.ball_velocity,
            tail,
            retracting,
            spacing,
            dt_ms,
        );
    }
    if let Some(second) = state.second_chain.as_mut() {
        second.update(
            state.player,
            retracting,
            second_spacing,
            state.upgrades.second_chain_speed,
            dt_ms,
        );
    }
}

fn collect_pickup(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let Some(power_up) = take_pickup(&mut state.powerups, state.player, state.config.player_size)
    else {
        return;
    };
    let health_before = (state.game.health, state.game.max_health);
    let effect = apply_power_up(state, &power_up);
    state.particles.emit(&effect, &mut state.rng);

    log::info!("picked up {}", power_up.kind.name());
    events.push(GameEvent::PowerUpCollected {
        kind: power_up.kind,
    });
    if (state.game.health, state.game.max_health) != health_before {
        events.push(GameEvent::HealthChanged {
            health: state.game.health,
            max_health: state.game.max_health,
        });
    }
}

fn apply_collisions(state: &mut SimulationState, outcome: CollisionOutcome, events: &mut Vec<GameEvent>) {
    state.particles.emit_all(&outcome.effects, &mut state.rng);

    let points = outcome.total_points();
    if points > 0 {
        state.game.add_score(points);
        events.push(GameEvent::ScoreChanged {
            score: state.game.score,
        });
    }

    if outcome.player_damage > 0 {
        state.game.apply_damage(outcome.player_damage);
        events.push(GameEvent::HealthChanged {
            health: state.game.health,
            max_health: state.game.max_health,
        });
    }

    // Boss drops are looked up before anything is removed
    let removed = outcome.removed_enemies();
    for &index in &removed {
        let defeated = state
            .enemies
            .get(index)
            .and_then(|enemy| enemy.kind.boss().map(|boss| (boss.archetype, enemy.pos)));
        if let Some((archetype, pos)) = defeated {
            spawn_boss_drop(state, pos);
            log::info!("boss defeated: {}", archetype.as_str());
            events.push(GameEvent::BossDefeated { archetype });
        }
    }

    remove_indices(&mut state.enemies, removed);
    remove_indices(&mut state.projectiles, outcome.hit_projectiles);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::enemies::spawn_boss;
    use crate::sim::powerups::{POWERUP_SIZE, PowerUp, PowerUpKind, Rarity};
    use crate::sim::state::{Enemy, EnemyKind};

    const FRAME_MS: f32 = 16.0;

    fn sim() -> SimulationState {
        SimulationState::new(GameConfig::default(), 12345)
    }

    fn power_up_at(kind: PowerUpKind, pos: Vec2) -> PowerUp {
        PowerUp {
            id: 99,
            kind,
            rarity: Rarity::Common,
            pos,
            vel: Vec2::ZERO,
            size: POWERUP_SIZE,
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = sim();
        tick(&mut state, &TickInput::default(), FRAME_MS);
        let now = state.clock.now_ms;

        let toggle = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        let events = tick(&mut state, &toggle, FRAME_MS);
        assert_eq!(events, vec![GameEvent::Paused]);
        assert!(state.game.is_paused);

        // Nothing moves while paused
        tick(&mut state, &TickInput::default(), 5000.0);
        assert_eq!(state.clock.now_ms, now);
        assert_eq!(state.game.game_time, FRAME_MS / 1000.0);

        // Resume: the long frame is not replayed
        let events = tick(&mut state, &toggle, 4000.0);
        assert_eq!(events.first(), Some(&GameEvent::Resumed));
        assert_eq!(state.clock.now_ms, now + 16.0);
    }

    #[test]
    fn test_auto_pause_after_focus_loss() {
        let mut state = sim();
        let lost = TickInput {
            focus: Some(FocusChange::Lost),
            ..Default::default()
        };
        tick(&mut state, &lost, 1000.0);
        assert!(!state.game.is_window_focused);
        tick(&mut state, &TickInput::default(), 1000.0);
        assert!(!state.game.is_paused);

        let events = tick(&mut state, &TickInput::default(), 1000.0);
        assert!(state.game.is_paused);
        assert_eq!(events, vec![GameEvent::Paused]);
    }

    #[test]
    fn test_focus_return_cancels_auto_pause() {
        let mut state = sim();
        let lost = TickInput {
            focus: Some(FocusChange::Lost),
            ..Default::default()
        };
        let gained = TickInput {
            focus: Some(FocusChange::Gained),
            ..Default::default()
        };
        tick(&mut state, &lost, 2000.0);
        tick(&mut state, &gained, 16.0);
        tick(&mut state, &TickInput::default(), 2000.0);
        assert!(!state.game.is_paused);
        assert!(state.game.is_window_focused);
    }

    #[test]
    fn test_help_toggles_even_while_paused() {
        let mut state = sim();
        state.game.is_paused = true;
        let help = TickInput {
            toggle_help: true,
            ..Default::default()
        };
        tick(&mut state, &help, FRAME_MS);
        assert!(state.help_visible);
        tick(&mut state, &help, FRAME_MS);
        assert!(!state.help_visible);
    }

    #[test]
    fn test_retract_pulls_player_toward_chain() {
        let mut state = sim();
        let start = state.player;
        let retract = TickInput {
            pointer_down: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &retract, FRAME_MS);
        }
        assert!(state.enemies.is_empty());
        assert!(state.player.y > start.y);
        assert!(state.chain[0].pos.distance(state.chain[1].pos) < 35.0);
    }

    #[test]
    fn test_player_follows_pointer() {
        let mut state = sim();
        let input = TickInput {
            pointer: Some(Vec2::new(600.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_MS);
        assert!(state.player.x > 400.0);
        assert_eq!(state.chain[0].pos, state.player);
    }

    #[test]
    fn test_contact_damage_and_game_over_once() {
        let mut state = sim();
        state.game.health = 5;
        let player = state.player;
        state.enemies.push(Enemy::new(
            1,
            EnemyKind::Basic,
            player,
            Vec2::ZERO,
            5,
            22.0,
            0xffaa44,
        ));

        let events = tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.game.is_game_over);
        assert_eq!(state.game.health, 0);
        assert!(state.enemies.is_empty());
        assert!(events.contains(&GameEvent::HealthChanged {
            health: 0,
            max_health: 100
        }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { score: 0, wave: 1, .. }))
        );

        // Frozen afterwards, pause ignored
        let toggle = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &toggle, FRAME_MS).is_empty());
        assert!(!state.game.is_paused);
    }

    #[test]
    fn test_boss_kill_drops_powerup() {
        let mut state = sim();
        spawn_boss(&mut state);
        let ball = state.ball;
        state.enemies[0].pos = ball;
        state.enemies[0].vel = Vec2::ZERO;
        state.enemies[0].health = 1;

        let events = tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossDefeated { .. })));
        assert!(state.enemies.iter().all(|e| !e.kind.is_boss()));
        assert_eq!(state.powerups.len(), 1);
        assert!(state.powerups[0].kind.upgrade().is_some());
        assert!(state.game.score >= 200);
    }

    #[test]
    fn test_pickup_reports_and_heals() {
        let mut state = sim();
        state.game.health = 50;
        let player = state.player;
        state.powerups.push(power_up_at(PowerUpKind::HealingHeart, player));

        let events = tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.powerups.is_empty());
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::HealingHeart
        }));
        assert_eq!(state.game.health, 65);
    }

    #[test]
    fn test_chain_extension_rebuilds_next_tick() {
        let mut state = sim();
        let player = state.player;
        state.powerups.push(power_up_at(PowerUpKind::ChainExtension, player));

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.upgrades.chain_extensions, 1);
        assert_eq!(state.chain.len(), 10);

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.chain.len(), 13);
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_score_advances_wave() {
        let mut state = sim();
        state.game.score = 150;
        let ball = state.ball;
        state.enemies.push(Enemy::new(
            1,
            EnemyKind::Weak,
            ball,
            Vec2::ZERO,
            1,
            16.0,
            0x888888,
        ));
        let events = tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.game.score, 155);
        assert_eq!(state.game.wave, 2);
        assert!(events.contains(&GameEvent::WaveAdvanced { wave: 2 }));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = sim();
        let mut state2 = sim();

        for i in 0..600 {
            let input = TickInput {
                pointer: Some(Vec2::new(200.0 + (i % 400) as f32, 300.0)),
                pointer_down: i % 90 < 20,
                ..Default::default()
            };
            let events1 = tick(&mut state1, &input, FRAME_MS);
            let events2 = tick(&mut state2, &input, FRAME_MS);
            assert_eq!(events1, events2);
        }

        assert_eq!(state1.game, state2.game);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.particles.len(), state2.particles.len());
    }
}
