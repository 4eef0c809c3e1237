//! Enemy director: wave spawns, bosses, minions, projectiles
//!
//! Update order per tick:
//! 1. boss AI (steering, enrage)
//! 2. purge enemies killed since the last tick
//! 3. regular and boss spawn timers
//! 4. boss volleys, then boss minion waves
//! 5. per-type animation, integration, wall bounce, knockback friction
//! 6. projectile integration and homing
//! 7. off-screen / dead culling

use glam::Vec2;
use rand::Rng;

use super::boss::{self, BossState, ENRAGE_SPEED, ENRAGE_THRESHOLD, UfoArchetype, boss_health, boss_size};
use super::state::{Enemy, EnemyKind, GameEvent, ProjectilePattern, SimulationState};
use crate::consts::BOSS_SPAWN_INTERVAL_MS;
use crate::direction_to;

/// Distance outside the canvas where regular enemies appear
pub const ENEMY_EDGE_OFFSET: f32 = 60.0;
/// Distance outside the canvas where bosses appear
pub const BOSS_EDGE_OFFSET: f32 = 100.0;
/// Boss approach speed until its AI takes over
pub const BOSS_ENTRY_SPEED: f32 = 30.0;
/// Ninja star spin (radians per ms)
pub const NINJA_SPIN_RATE: f32 = 0.01;
pub const PUSHER_FORCE: f32 = 300.0;
/// Velocity kept after a wall bounce
pub const WALL_BOUNCE: f32 = 0.8;
pub const KNOCKBACK_FRICTION: f32 = 0.98;
/// Speed below which a knocked-back enemy recovers
pub const KNOCKBACK_RECOVER_SPEED: f32 = 20.0;
pub const ENEMY_CULL_MARGIN: f32 = 150.0;
pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;

/// Spawn stats for a regular enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: i32,
    pub size: f32,
    /// Multiplier on the wave base speed
    pub speed: f32,
    pub color: u32,
}

impl EnemyStats {
    const BASIC: Self = Self {
        health: 5,
        size: 22.0,
        speed: 1.0,
        color: 0xffaa44,
    };
}

/// Table stats for a pool type. `None` for bosses, which scale with their
/// index instead (see `spawn_boss`).
pub fn spawn_stats(kind: &EnemyKind) -> Option<EnemyStats> {
    let (health, size, speed, color) = match kind {
        EnemyKind::Boss(_) => return None,
        EnemyKind::Basic => return Some(EnemyStats::BASIC),
        EnemyKind::Weak => (1, 16.0, 0.7, 0x888888),
        EnemyKind::Heavy => (24, 30.0, 0.5, 0xff4444),
        EnemyKind::Fast => (3, 15.0, 1.8, 0x44ff44),
        EnemyKind::Triangle => (8, 25.0, 1.2, 0xff8844),
        EnemyKind::Square => (14, 28.0, 0.8, 0x8844ff),
        EnemyKind::NinjaStar { .. } => (6, 18.0, 1.5, 0x666666),
        EnemyKind::Pusher { .. } => (10, 26.0, 0.9, 0xff6600),
    };
    Some(EnemyStats {
        health,
        size,
        speed,
        color,
    })
}

/// Time between regular spawns; shrinks with the wave down to a floor
pub fn spawn_interval_ms(wave: u32) -> f32 {
    (800.0 - wave as f32 * 80.0).max(300.0)
}

/// Approach speed for regular spawns at this wave
pub fn base_speed(wave: u32) -> f32 {
    40.0 + wave as f32 * 8.0
}

/// Candidate types for one spawn. Duplicates weight the pick.
pub fn type_pool<R: Rng>(wave: u32, rng: &mut R) -> Vec<EnemyKind> {
    let mut pool = vec![EnemyKind::Basic];

    // Weak fodder early on, tapering off
    if wave <= 5 {
        pool.extend([EnemyKind::Weak, EnemyKind::Weak, EnemyKind::Weak]);
    }
    if wave <= 10 {
        pool.extend([EnemyKind::Weak, EnemyKind::Weak]);
    }
    if wave <= 15 {
        pool.push(EnemyKind::Weak);
    }

    if wave >= 3 {
        pool.push(EnemyKind::Heavy);
    }
    if wave >= 5 {
        pool.push(EnemyKind::Fast);
    }
    if wave >= 7 {
        pool.push(EnemyKind::Triangle);
    }
    if wave >= 10 {
        pool.push(EnemyKind::Square);
    }

    if wave >= 8 && rng.random::<f32>() < 0.05 {
        pool.push(EnemyKind::NinjaStar {
            spin_angle: 0.0,
            chain_wrapped: false,
        });
    }
    if wave >= 12 && rng.random::<f32>() < 0.08 {
        pool.push(EnemyKind::Pusher {
            push_force: PUSHER_FORCE,
        });
    }
    pool
}

/// Random point just outside one of the four canvas edges
pub fn edge_point<R: Rng>(rng: &mut R, canvas: Vec2, offset: f32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * canvas.x, -offset),
        1 => Vec2::new(canvas.x + offset, rng.random::<f32>() * canvas.y),
        2 => Vec2::new(rng.random::<f32>() * canvas.x, canvas.y + offset),
        _ => Vec2::new(-offset, rng.random::<f32>() * canvas.y),
    }
}

/// Spawn one regular enemy at an edge, aimed at the player
pub fn spawn_enemy(state: &mut SimulationState) {
    let wave = state.game.wave;
    let canvas = state.canvas();
    let player = state.player;

    let pos = edge_point(&mut state.rng, canvas, ENEMY_EDGE_OFFSET);
    let mut pool = type_pool(wave, &mut state.rng);
    let kind = pool.swap_remove(state.rng.random_range(0..pool.len()));
    let Some(stats) = spawn_stats(&kind) else {
        log::warn!("{} is not a pool type, spawn skipped", kind.name());
        return;
    };
    let vel = direction_to(pos, player) * base_speed(wave) * stats.speed;

    let id = state.next_entity_id();
    log::debug!("spawned {} #{} at ({:.0}, {:.0})", kind.name(), id, pos.x, pos.y);
    state
        .enemies
        .push(Enemy::new(id, kind, pos, vel, stats.health, stats.size, stats.color));
}

/// Spawn the next boss in the archetype order
pub fn spawn_boss(state: &mut SimulationState) -> UfoArchetype {
    let index = state.timers.bosses_spawned;
    let canvas = state.canvas();
    let pos = edge_point(&mut state.rng, canvas, BOSS_EDGE_OFFSET);
    let vel = direction_to(pos, state.player) * BOSS_ENTRY_SPEED;

    let boss = BossState::new(index);
    let archetype = boss.archetype;
    let color = archetype.profile().color;
    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(
        id,
        EnemyKind::Boss(Box::new(boss)),
        pos,
        vel,
        boss_health(index),
        boss_size(index),
        color,
    ));
    state.timers.bosses_spawned += 1;

    log::info!("boss #{} spawned: {}", index + 1, archetype.as_str());
    archetype
}

/// Steer every boss for this tick
fn update_boss_ai(state: &mut SimulationState, dt_secs: f32) {
    let player = state.player;
    let now_ms = state.clock.now_ms;
    let base = boss::ai_base_speed(state.timers.bosses_spawned);

    for enemy in &mut state.enemies {
        let (id, pos, ratio) = (enemy.id, enemy.pos, enemy.health_ratio());
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            boss.animate(dt_secs);
            let speed = base * boss.archetype.profile().speed_factor;
            let mut vel = boss::movement_velocity(boss.movement, id, pos, player, speed, now_ms);
            if ratio < ENRAGE_THRESHOLD {
                vel *= ENRAGE_SPEED;
            }
            enemy.vel = vel;
        }
    }
}

/// Fire every boss whose cooldown has elapsed
fn update_boss_shooting(state: &mut SimulationState) {
    let player = state.player;
    let now_ms = state.clock.now_ms;

    for enemy in &mut state.enemies {
        let (pos, size) = (enemy.pos, enemy.size);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            if boss.shot_ready(now_ms) {
                let volley = boss::fire(boss, pos, size, player, &mut state.rng);
                state.projectiles.extend(volley);
                boss.last_shot_ms = Some(now_ms);
            }
        }
    }
}

/// Call in minion waves for every boss whose cooldown has elapsed
fn update_boss_minions(state: &mut SimulationState) {
    let player = state.player;
    let now_ms = state.clock.now_ms;

    let mut spawns = Vec::new();
    for enemy in &mut state.enemies {
        let (pos, size) = (enemy.pos, enemy.size);
        if let EnemyKind::Boss(boss) = &mut enemy.kind {
            if boss.minions_ready(now_ms) {
                for spot in boss::minion_ring(pos, size, boss.minion_count()) {
                    spawns.push((spot, boss.minion_kind));
                }
                boss.last_minion_ms = Some(now_ms);
            }
        }
    }

    for (pos, minion) in spawns {
        let stats = minion.stats();
        let vel = direction_to(pos, player) * stats.speed;
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(id, minion.enemy_kind(), pos, vel, stats.health, stats.size, stats.color);
        enemy.minion = true;
        state.enemies.push(enemy);
    }
}

/// Move one enemy, bounce it off the walls once it is in play, apply knockback friction
pub fn integrate_enemy(enemy: &mut Enemy, canvas: Vec2, dt_secs: f32) {
    enemy.pos += enemy.vel * dt_secs;

    if !enemy.entered_play_area
        && enemy.pos.x > 0.0
        && enemy.pos.x < canvas.x
        && enemy.pos.y > 0.0
        && enemy.pos.y < canvas.y
    {
        enemy.entered_play_area = true;
    }

    if enemy.entered_play_area {
        let pad = enemy.size;
        if enemy.pos.x <= pad || enemy.pos.x >= canvas.x - pad {
            enemy.vel.x *= -WALL_BOUNCE;
            enemy.pos.x = enemy.pos.x.min(canvas.x - pad).max(pad);
        }
        if enemy.pos.y <= pad || enemy.pos.y >= canvas.y - pad {
            enemy.vel.y *= -WALL_BOUNCE;
            enemy.pos.y = enemy.pos.y.min(canvas.y - pad).max(pad);
        }
    }

    if enemy.knocked_back {
        enemy.vel *= KNOCKBACK_FRICTION;
        if enemy.vel.length() < KNOCKBACK_RECOVER_SPEED {
            enemy.knocked_back = false;
        }
    }
}

fn update_projectiles(state: &mut SimulationState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    let player = state.player;
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
        projectile.life_ms -= dt_ms;
        if projectile.pattern == ProjectilePattern::Homing {
            boss::steer_homing(projectile, player, dt);
        }
    }
}

fn on_field(pos: Vec2, canvas: Vec2, margin: f32) -> bool {
    pos.x > -margin && pos.x < canvas.x + margin && pos.y > -margin && pos.y < canvas.y + margin
}

/// Run the enemy director for one tick
pub fn update_enemies(state: &mut SimulationState, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let dt = dt_ms / 1000.0;

    update_boss_ai(state, dt);
    state.enemies.retain(|e| !e.is_dead());

    state.timers.enemy_ms += dt_ms;
    if state.timers.enemy_ms >= spawn_interval_ms(state.game.wave) {
        spawn_enemy(state);
        state.timers.enemy_ms = 0.0;
    }

    state.timers.boss_ms += dt_ms;
    if state.timers.boss_ms >= BOSS_SPAWN_INTERVAL_MS {
        let archetype = spawn_boss(state);
        events.push(GameEvent::BossSpawned { archetype });
        state.timers.boss_ms = 0.0;
    }

    update_boss_shooting(state);
    update_boss_minions(state);

    let canvas = state.canvas();
    for enemy in &mut state.enemies {
        if let EnemyKind::NinjaStar { spin_angle, .. } = &mut enemy.kind {
            *spin_angle += dt_ms * NINJA_SPIN_RATE;
        }
        integrate_enemy(enemy, canvas, dt);
    }

    update_projectiles(state, dt_ms);

    state
        .enemies
        .retain(|e| !e.is_dead() && on_field(e.pos, canvas, ENEMY_CULL_MARGIN));
    state
        .projectiles
        .retain(|p| p.life_ms > 0.0 && on_field(p.pos, canvas, PROJECTILE_CULL_MARGIN));

    events
}

/// Remove entries by index: highest first, duplicates and stale indices skipped
pub fn remove_indices<T>(items: &mut Vec<T>, indices: impl IntoIterator<Item = usize>) {
    let mut indices: Vec<usize> = indices.into_iter().collect();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for index in indices {
        if index < items.len() {
            items.remove(index);
        }
    }
}
