//! Timed power-up effects
//!
//! At most one entry per effect kind. Picking up the same kind again
//! overwrites the entry (new multipliers, new end time).

use serde::{Deserialize, Serialize};

/// Temporary effect payloads as carried by a power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimedEffect {
    /// Player movement speed multiplier
    SpeedBurst { multiplier: f32 },
    /// Outgoing damage multiplier and incoming damage multiplier
    Berserk { damage: f32, vulnerability: f32 },
    /// Ball hits arc lightning to nearby enemies
    Electrified,
    /// Chains become rigid spinning arms
    HyperSpin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Berserk {
    pub damage_multiplier: f32,
    pub vulnerability_multiplier: f32,
    pub end_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBurst {
    pub speed_multiplier: f32,
    pub end_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timed {
    pub end_ms: f64,
}

/// Currently running temporary effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub berserk: Option<Berserk>,
    pub temp_speed: Option<SpeedBurst>,
    pub electrified: Option<Timed>,
    pub hyper_spin: Option<Timed>,
}

impl ActiveEffects {
    /// Insert or overwrite the entry for this effect kind
    pub fn activate(&mut self, effect: TimedEffect, now_ms: f64, duration_ms: f64) {
        let end_ms = now_ms + duration_ms;
        match effect {
            TimedEffect::SpeedBurst { multiplier } => {
                self.temp_speed = Some(SpeedBurst {
                    speed_multiplier: multiplier,
                    end_ms,
                });
            }
            TimedEffect::Berserk {
                damage,
                vulnerability,
            } => {
                self.berserk = Some(Berserk {
                    damage_multiplier: damage,
                    vulnerability_multiplier: vulnerability,
                    end_ms,
                });
            }
            TimedEffect::Electrified => self.electrified = Some(Timed { end_ms }),
            TimedEffect::HyperSpin => self.hyper_spin = Some(Timed { end_ms }),
        }
    }

    /// Drop every entry whose end time has passed. Returns true if anything changed.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        if self.berserk.is_some_and(|e| e.end_ms <= now_ms) {
            self.berserk = None;
            changed = true;
        }
        if self.temp_speed.is_some_and(|e| e.end_ms <= now_ms) {
            self.temp_speed = None;
            changed = true;
        }
        if self.electrified.is_some_and(|e| e.end_ms <= now_ms) {
            self.electrified = None;
            changed = true;
        }
        if self.hyper_spin.is_some_and(|e| e.end_ms <= now_ms) {
            self.hyper_spin = None;
            changed = true;
        }
        changed
    }

    pub fn hyper_spin_active(&self) -> bool {
        self.hyper_spin.is_some()
    }

    pub fn electrified_active(&self) -> bool {
        self.electrified.is_some()
    }

    /// Outgoing damage multiplier (1.0 without berserk)
    pub fn damage_multiplier(&self) -> f32 {
        self.berserk.map_or(1.0, |b| b.damage_multiplier)
    }

    /// Incoming damage multiplier (1.0 without berserk)
    pub fn vulnerability_multiplier(&self) -> f32 {
        self.berserk.map_or(1.0, |b| b.vulnerability_multiplier)
    }

    /// Player movement multiplier from a speed burst (1.0 without one)
    pub fn speed_multiplier(&self) -> f32 {
        self.temp_speed.map_or(1.0, |s| s.speed_multiplier)
    }

    pub fn is_empty(&self) -> bool {
        self.berserk.is_none()
            && self.temp_speed.is_none()
            && self.electrified.is_none()
            && self.hyper_spin.is_none()
    }
}
