//! Primary chain: verlet rope anchored to the player
//!
//! Segment 0 is pinned to the player every tick. The rest are verlet points
//! kept at the link distance by a few relaxation passes. While the pointer is
//! held the links shorten and the first link tugs the player toward the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit;

/// One verlet point of a chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainSegment {
    pub pos: Vec2,
    pub old_pos: Vec2,
}

impl ChainSegment {
    /// Segment at rest at the given position
    pub fn at(pos: Vec2) -> Self {
        Self { pos, old_pos: pos }
    }

    /// Implicit velocity (per tick)
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.old_pos
    }
}

/// Link distance for the current retract state
#[inline]
pub fn target_distance(segment_distance: f32, retracting: bool) -> f32 {
    if retracting {
        segment_distance * RETRACT_RATIO
    } else {
        segment_distance
    }
}

/// Number of links for the primary chain given the extension upgrades
pub fn chain_links(base_length: usize, extensions: u8) -> usize {
    base_length + extensions as usize * LINKS_PER_EXTENSION
}

/// A chain hanging straight down from the anchor, at rest
pub fn build_chain(anchor: Vec2, links: usize, spacing: f32) -> Vec<ChainSegment> {
    (0..links)
        .map(|i| ChainSegment::at(anchor + Vec2::new(0.0, i as f32 * spacing)))
        .collect()
}

/// Advance the chain one tick.
///
/// `player` may be nudged toward the chain while retracting (the tug).
pub fn update_chain(
    chain: &mut [ChainSegment],
    player: &mut Vec2,
    retracting: bool,
    segment_distance: f32,
) {
    if chain.is_empty() {
        return;
    }
    let target = target_distance(segment_distance, retracting);

    // Anchor follows the player
    chain[0].old_pos = chain[0].pos;
    chain[0].pos = *player;

    // Verlet integrate the free links
    for segment in chain.iter_mut().skip(1) {
        let velocity = segment.velocity() * CHAIN_DAMPING;
        segment.old_pos = segment.pos;
        segment.pos += velocity;
    }

    relax(chain, player, retracting, target);
}

/// Relaxation passes over adjacent pairs, splitting each correction evenly
fn relax(chain: &mut [ChainSegment], player: &mut Vec2, retracting: bool, target: f32) {
    for _ in 0..CONSTRAINT_ITERATIONS {
        for i in 0..chain.len().saturating_sub(1) {
            let current = chain[i].pos;
            let next = chain[i + 1].pos;
            let dist = current.distance(next);

            if (dist - target).abs() <= CONSTRAINT_SLACK || dist <= f32::EPSILON {
                continue;
            }

            let percent = (dist - target) / dist * 0.5;
            let offset = (next - current) * percent;
            chain[i].pos += offset;
            chain[i + 1].pos -= offset;

            if retracting && i == 0 {
                *player += offset * RETRACT_PULL;
            }
        }
    }
}

/// Hyper-spin phase angle at a simulation time
pub fn hyper_spin_angle(now_ms: f64) -> f32 {
    ((now_ms * HYPER_SPIN_RATE) % std::f64::consts::TAU) as f32
}

/// Hyper-spin: the chain becomes a rigid arm at `angle`, always at full link distance
pub fn update_chain_hyper_spin(
    chain: &mut [ChainSegment],
    anchor: Vec2,
    segment_distance: f32,
    angle: f32,
) {
    let dir = unit(angle);
    for (i, segment) in chain.iter_mut().enumerate() {
        segment.old_pos = segment.pos;
        segment.pos = anchor + dir * (i as f32 * segment_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn max_link_error(chain: &[ChainSegment], target: f32) -> f32 {
        chain
            .windows(2)
            .map(|w| (w[0].pos.distance(w[1].pos) - target).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_chain_at_rest_stays_put() {
        let anchor = Vec2::new(400.0, 300.0);
        let mut chain = build_chain(anchor, 10, 35.0);
        let mut player = anchor;
        for _ in 0..10 {
            update_chain(&mut chain, &mut player, false, 35.0);
        }
        assert_eq!(player, anchor);
        assert!(max_link_error(&chain, 35.0) < 1e-3);
        assert_eq!(chain[9].pos, Vec2::new(400.0, 615.0));
    }

    #[test]
    fn test_retract_pulls_player_toward_chain() {
        let anchor = Vec2::new(400.0, 300.0);
        let mut chain = build_chain(anchor, 10, 35.0);
        let mut player = anchor;
        update_chain(&mut chain, &mut player, true, 35.0);
        // Chain hangs below the player, so the tug pulls the player down
        assert!(player.y > anchor.y);
        assert!((player.x - anchor.x).abs() < 1e-4);
    }

    #[test]
    fn test_no_tug_without_retract() {
        let anchor = Vec2::new(400.0, 300.0);
        let mut chain = build_chain(anchor, 10, 40.0);
        let mut player = anchor;
        update_chain(&mut chain, &mut player, false, 35.0);
        assert_eq!(player, anchor);
    }

    #[test]
    fn test_hyper_spin_places_rigid_arm() {
        let anchor = Vec2::new(100.0, 100.0);
        let mut chain = build_chain(anchor, 10, 35.0);
        let angle = hyper_spin_angle(250.0);
        assert!((angle - 2.0).abs() < 1e-6);
        update_chain_hyper_spin(&mut chain, anchor, 35.0, angle);
        assert_eq!(chain[0].pos, anchor);
        assert!(max_link_error(&chain, 35.0) < 1e-3);
        let dir = (chain[9].pos - anchor).normalize();
        assert!((dir.y.atan2(dir.x) - angle).abs() < 1e-4);
    }

    #[test]
    fn test_hyper_spin_full_turn_under_a_second() {
        let turn_ms = std::f64::consts::TAU / HYPER_SPIN_RATE;
        assert!(turn_ms < 1000.0);
    }

    #[test]
    fn test_chain_links_with_extensions() {
        assert_eq!(chain_links(10, 0), 10);
        assert_eq!(chain_links(10, 2), 16);
    }

    fn settle(
        chain: &mut [ChainSegment],
        anchor: Vec2,
        retracting: bool,
        spacing: f32,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            let mut player = anchor;
            update_chain(chain, &mut player, retracting, spacing);
        }
    }

    #[test]
    fn test_settled_chain_within_slack() {
        let anchor = Vec2::new(400.0, 300.0);

        // Retract from a chain resting at full length
        let mut chain = build_chain(anchor, 10, 35.0);
        settle(&mut chain, anchor, true, 35.0, 1200);
        for _ in 0..60 {
            settle(&mut chain, anchor, true, 35.0, 1);
            assert!(max_link_error(&chain, 21.0) <= CONSTRAINT_SLACK + 1e-3);
        }

        // Release from a chain with alternating stretched and squashed links
        let mut chain = build_chain(anchor, 12, 35.0);
        for (i, segment) in chain.iter_mut().enumerate().skip(1) {
            let shift = if i % 2 == 0 { 2.5 } else { -2.5 };
            segment.pos.y += shift;
            segment.old_pos = segment.pos;
        }
        settle(&mut chain, anchor, false, 35.0, 1200);
        for _ in 0..60 {
            settle(&mut chain, anchor, false, 35.0, 1);
            assert!(max_link_error(&chain, 35.0) <= CONSTRAINT_SLACK + 1e-3);
        }
    }

    proptest! {
        #[test]
        fn prop_relaxation_worst_case_within_twice_slack(
            links in 2usize..=16,
            spacing in 10.0f32..50.0,
            retracting in any::<bool>(),
            jitter in prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0), 16),
        ) {
            let anchor = Vec2::new(400.0, 300.0);
            let target = target_distance(spacing, retracting);
            let mut chain = build_chain(anchor, links, target);
            for (segment, (dx, dy)) in chain.iter_mut().skip(1).zip(jitter.iter()) {
                segment.pos += Vec2::new(*dx, *dy);
                segment.old_pos = segment.pos;
            }

            for tick in 0..240 {
                // Hold the anchor still so the tug doesn't walk it away
                let mut player = anchor;
                update_chain(&mut chain, &mut player, retracting, spacing);
                if tick >= 30 {
                    // Ripples from the jitter can leave a link just past the slack band
                    prop_assert!(max_link_error(&chain, target) <= 2.0 * CONSTRAINT_SLACK);
                }
            }
        }
    }
}
