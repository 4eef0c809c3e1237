//! Collision resolution
//!
//! Passes run in a fixed order: ball, primary chain, second chain, player vs
//! enemies, player vs projectiles. Each pass mutates enemy health / velocity
//! and weapon velocity directly but never removes anything. Removals, score
//! and player damage are reported in `CollisionOutcome` for the tick to apply,
//! and visual feedback comes back as `VisualEffect` requests.
//!
//! Enemies already at zero health are skipped by later passes, so a kill is
//! only ever scored once.

use std::collections::BTreeSet;

use glam::Vec2;

use super::chain::ChainSegment;
use super::effects::ActiveEffects;
use super::particles::{VisualEffect, palette};
use super::powerups::PlayerUpgrades;
use super::state::{Enemy, EnemyKind, Projectile, SimulationState};
use crate::consts::{CHAIN_IMMUNITY_MS, LIGHTNING_RADIUS};
use crate::direction_to;

/// Ball impulse when the struck enemy survives
pub const IMPACT_SURVIVED: f32 = 80.0;
/// Ball impulse when the struck enemy dies
pub const IMPACT_KILLED: f32 = 100.0;
/// Knockback on a surviving enemy, before the damage term
pub const KNOCKBACK_BASE: f32 = 150.0;
pub const KNOCKBACK_PER_DAMAGE: f32 = 30.0;
/// Share of the nominal ball damage a pusher takes
pub const PUSHER_DAMAGE_SHARE: f32 = 0.2;
/// Share of the ball damage arced to neighbors while electrified
pub const LIGHTNING_DAMAGE_SHARE: f32 = 0.5;
/// Chain segment hit radius beyond the enemy size
pub const CHAIN_HIT_RADIUS: f32 = 12.0;
/// Ninja-star wrap radius beyond the enemy size
pub const CHAIN_WRAP_RADIUS: f32 = 15.0;
/// Ball speed kept after a chain wraps a ninja star
pub const WRAP_BRAKE: f32 = 0.3;

/// Kills and points from one weapon
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    pub destroyed: Vec<usize>,
    pub points: u64,
}

impl HitReport {
    fn kill(&mut self, index: usize, points: u64) {
        self.destroyed.push(index);
        self.points += points;
    }
}

/// Everything one round of collision resolution produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub ball: HitReport,
    pub chain: HitReport,
    pub second_chain: HitReport,
    /// Pushers that deflected the ball
    pub pushed: Vec<usize>,
    /// Ninja stars the chain wrapped this round
    pub wrapped: Vec<usize>,
    /// Non-boss enemies that touched the player (removed without points)
    pub contact: Vec<usize>,
    pub player_damage: i32,
    pub hit_projectiles: Vec<usize>,
    pub effects: Vec<VisualEffect>,
}

impl CollisionOutcome {
    pub fn total_points(&self) -> u64 {
        self.ball.points + self.chain.points + self.second_chain.points
    }

    /// Every enemy index to remove, deduplicated, as seen before any removal
    pub fn removed_enemies(&self) -> BTreeSet<usize> {
        self.ball
            .destroyed
            .iter()
            .chain(&self.chain.destroyed)
            .chain(&self.second_chain.destroyed)
            .chain(&self.contact)
            .copied()
            .collect()
    }
}

/// Ball damage multiplier (berserk included)
pub fn ball_damage_multiplier(upgrades: &PlayerUpgrades, effects: &ActiveEffects) -> f32 {
    (2.0 + upgrades.ball_damage as f32 * 0.5) * effects.damage_multiplier()
}

/// Primary chain damage multiplier (berserk included)
pub fn chain_damage_multiplier(upgrades: &PlayerUpgrades, effects: &ActiveEffects) -> f32 {
    (1.0 + upgrades.chain_damage as f32 * 0.3) * effects.damage_multiplier()
}

/// Second chain damage multiplier (berserk included)
pub fn second_chain_damage_multiplier(upgrades: &PlayerUpgrades, effects: &ActiveEffects) -> f32 {
    (0.8 + upgrades.second_chain_damage as f32 * 0.4) * effects.damage_multiplier()
}

/// Ball vs enemies
pub fn resolve_ball(
    ball: Vec2,
    radius: f32,
    ball_velocity: &mut Vec2,
    enemies: &mut [Enemy],
    multiplier: f32,
    electrified: bool,
    out: &mut CollisionOutcome,
) {
    let damage = multiplier.ceil() as i32;

    for i in 0..enemies.len() {
        let enemy = &mut enemies[i];
        if enemy.is_dead() || ball.distance(enemy.pos) >= radius + enemy.size {
            continue;
        }
        let pos = enemy.pos;
        let away = direction_to(pos, ball);

        // Pushers bat the ball away and only take a fraction of the hit
        if let EnemyKind::Pusher { push_force } = enemy.kind {
            *ball_velocity += away * push_force;
            out.pushed.push(i);
            out.effects.push(VisualEffect::Explosion {
                pos,
                color: palette::PUSHER_DEFLECT,
            });
            enemy.health -= (damage as f32 * PUSHER_DAMAGE_SHARE).ceil() as i32;
            if enemy.is_dead() {
                out.ball.kill(i, enemy.kind.ball_points());
                out.effects.push(VisualEffect::Explosion {
                    pos,
                    color: palette::DEATH_BURST,
                });
            }
            continue;
        }

        enemy.health -= damage;
        let color = enemy.color;

        if electrified {
            let arc = (damage as f32 * LIGHTNING_DAMAGE_SHARE).ceil() as i32;
            for (j, target) in enemies.iter_mut().enumerate() {
                if j == i || target.is_dead() || pos.distance(target.pos) >= LIGHTNING_RADIUS {
                    continue;
                }
                target.health -= arc;
                out.effects.push(VisualEffect::Lightning { from: pos, to: target.pos });
                out.effects.push(VisualEffect::Explosion {
                    pos: target.pos,
                    color: palette::LIGHTNING_STRIKE,
                });
            }
        }
        out.effects.push(VisualEffect::Explosion { pos, color });

        let enemy = &mut enemies[i];
        if enemy.is_dead() {
            *ball_velocity += away * IMPACT_KILLED;
            out.ball.kill(i, enemy.kind.ball_points());
            out.effects.push(VisualEffect::Explosion {
                pos,
                color: palette::DEATH_BURST,
            });
        } else {
            *ball_velocity += away * IMPACT_SURVIVED;
            // Bosses are immovable
            if !enemy.kind.is_boss() {
                enemy.vel -= away * (KNOCKBACK_BASE + multiplier * KNOCKBACK_PER_DAMAGE);
                enemy.knocked_back = true;
            }
        }
    }
}

/// Which chain a pass is resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainWeapon {
    Primary,
    Second,
}

impl ChainWeapon {
    fn points(self, kind: &EnemyKind) -> u64 {
        match self {
            Self::Primary => kind.chain_points(),
            Self::Second => kind.second_chain_points(),
        }
    }

    /// Only the primary chain entangles ninja stars
    fn wraps(self) -> bool {
        self == Self::Primary
    }
}

/// Parameters shared by every segment of one chain pass
#[derive(Debug, Clone, Copy)]
pub struct ChainPass {
    pub weapon: ChainWeapon,
    pub multiplier: f32,
    pub now_ms: f64,
    /// 0 during hyper-spin
    pub immunity_ms: f64,
}

/// Chain segments vs enemies
pub fn resolve_chain(
    pass: ChainPass,
    segments: &[ChainSegment],
    enemies: &mut [Enemy],
    ball_velocity: &mut Vec2,
    out: &mut CollisionOutcome,
) {
    let nominal = pass.multiplier.ceil() as i32;

    for segment in segments {
        for (i, enemy) in enemies.iter_mut().enumerate() {
            if enemy.is_dead() || enemy.chain_immune(pass.now_ms, pass.immunity_ms) {
                continue;
            }
            let dist = segment.pos.distance(enemy.pos);

            // First contact entangles instead of cutting
            if pass.weapon.wraps() && dist < CHAIN_WRAP_RADIUS + enemy.size {
                if let EnemyKind::NinjaStar { chain_wrapped, .. } = &mut enemy.kind {
                    if !*chain_wrapped {
                        *chain_wrapped = true;
                        enemy.last_chain_hit_ms = Some(pass.now_ms);
                        *ball_velocity *= WRAP_BRAKE;
                        out.wrapped.push(i);
                        out.effects.push(VisualEffect::Explosion {
                            pos: enemy.pos,
                            color: palette::CHAIN_WRAP,
                        });
                        continue;
                    }
                }
            }

            if dist >= CHAIN_HIT_RADIUS + enemy.size {
                continue;
            }
            enemy.health -= enemy.kind.chain_damage_taken(nominal);
            enemy.last_chain_hit_ms = Some(pass.now_ms);

            let (hit_color, kill_color, report) = match pass.weapon {
                ChainWeapon::Primary => (enemy.color, palette::DEATH_BURST, &mut out.chain),
                ChainWeapon::Second => (
                    palette::SECOND_CHAIN_HIT,
                    palette::SECOND_CHAIN_KILL,
                    &mut out.second_chain,
                ),
            };
            out.effects.push(VisualEffect::Explosion {
                pos: enemy.pos,
                color: hit_color,
            });
            if enemy.is_dead() {
                report.kill(i, pass.weapon.points(&enemy.kind));
                out.effects.push(VisualEffect::Explosion {
                    pos: enemy.pos,
                    color: kill_color,
                });
            }
        }
    }
}

/// Enemies touching the player
pub fn resolve_player_contact(
    player: Vec2,
    player_size: f32,
    enemies: &[Enemy],
    vulnerability: f32,
    out: &mut CollisionOutcome,
) {
    for (i, enemy) in enemies.iter().enumerate() {
        if enemy.is_dead() || player.distance(enemy.pos) >= player_size + enemy.size {
            continue;
        }
        out.player_damage += (enemy.kind.contact_damage() as f32 * vulnerability).ceil() as i32;
        out.effects.push(VisualEffect::Explosion {
            pos: player,
            color: palette::PLAYER_HIT,
        });
        if !enemy.kind.is_boss() {
            out.contact.push(i);
        }
    }
}

/// Projectiles touching the player
pub fn resolve_projectiles(player: Vec2, player_size: f32, projectiles: &[Projectile], out: &mut CollisionOutcome) {
    for (i, projectile) in projectiles.iter().enumerate() {
        if player.distance(projectile.pos) < player_size + projectile.size {
            out.player_damage += projectile.damage;
            out.hit_projectiles.push(i);
            out.effects.push(VisualEffect::Explosion {
                pos: projectile.pos,
                color: projectile.color,
            });
        }
    }
}

/// Run every collision pass against the current state
pub fn resolve_collisions(state: &mut SimulationState) -> CollisionOutcome {
    let mut out = CollisionOutcome::default();
    let now_ms = state.clock.now_ms;
    let immunity_ms = if state.effects.hyper_spin_active() {
        0.0
    } else {
        CHAIN_IMMUNITY_MS
    };
    let radius = state.ball_radius();

    resolve_ball(
        state.ball,
        radius,
        &mut state.ball_velocity,
        &mut state.enemies,
        ball_damage_multiplier(&state.upgrades, &state.effects),
        state.effects.electrified_active(),
        &mut out,
    );

    let primary = ChainPass {
        weapon: ChainWeapon::Primary,
        multiplier: chain_damage_multiplier(&state.upgrades, &state.effects),
        now_ms,
        immunity_ms,
    };
    resolve_chain(
        primary,
        &state.chain,
        &mut state.enemies,
        &mut state.ball_velocity,
        &mut out,
    );

    if let Some(second) = state.second_chain.as_mut() {
        let pass = ChainPass {
            weapon: ChainWeapon::Second,
            multiplier: second_chain_damage_multiplier(&state.upgrades, &state.effects),
            now_ms,
            immunity_ms,
        };
        resolve_chain(
            pass,
            &second.segments,
            &mut state.enemies,
            &mut second.ball_velocity,
            &mut out,
        );
    }

    resolve_player_contact(
        state.player,
        state.config.player_size,
        &state.enemies,
        state.effects.vulnerability_multiplier(),
        &mut out,
    );
    resolve_projectiles(
        state.player,
        state.config.player_size,
        &state.projectiles,
        &mut out,
    );

    out
}
