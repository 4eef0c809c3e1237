//! Frame-time accounting
//!
//! Two notions of time:
//! - the physics step, clamped to `max_step_ms` so long frames can't blow up the solver
//! - simulation time (`now_ms`), advanced by the unclamped frame delta and used for
//!   cooldowns, effect expiry and the hyper-spin phase
//!
//! Neither advances while paused. Focus loss starts a debounce that auto-pauses
//! the run unless focus returns first.

use serde::{Deserialize, Serialize};

/// Step used for the first frame after a pause, so the time spent paused is not replayed
pub const RESUME_STEP_MS: f32 = 16.0;

/// Durations for one simulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Clamped step for physics / AI / spawn timers
    pub physics_ms: f32,
    /// Unclamped step for the game timer and simulation time
    pub elapsed_ms: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Simulation time in milliseconds
    pub now_ms: f64,
    /// Next frame follows a pause
    resume_pending: bool,
    /// Time spent unfocused while an auto-pause is pending
    blur_elapsed_ms: Option<f32>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a frame that will be simulated
    pub fn begin_frame(&mut self, frame_ms: f32, max_step_ms: f32) -> FrameStep {
        let elapsed_ms = if self.resume_pending {
            self.resume_pending = false;
            RESUME_STEP_MS
        } else {
            frame_ms.max(0.0)
        };
        self.now_ms += elapsed_ms as f64;
        FrameStep {
            physics_ms: elapsed_ms.min(max_step_ms),
            elapsed_ms,
        }
    }

    /// The run was paused; the next simulated frame uses the resume step
    pub fn mark_paused(&mut self) {
        self.resume_pending = true;
    }

    /// Start the auto-pause debounce (no-op if already pending)
    pub fn focus_lost(&mut self) {
        if self.blur_elapsed_ms.is_none() {
            self.blur_elapsed_ms = Some(0.0);
        }
    }

    /// Cancel any pending auto-pause
    pub fn focus_gained(&mut self) {
        self.blur_elapsed_ms = None;
    }

    pub fn auto_pause_pending(&self) -> bool {
        self.blur_elapsed_ms.is_some()
    }

    /// Advance the debounce by wall-clock frame time. Returns true once when it fires.
    pub fn poll_auto_pause(&mut self, frame_ms: f32, delay_ms: f32) -> bool {
        if let Some(elapsed) = self.blur_elapsed_ms.as_mut() {
            *elapsed += frame_ms.max(0.0);
            if *elapsed >= delay_ms {
                self.blur_elapsed_ms = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_step_clamped_but_time_not() {
        let mut clock = SimulationClock::new();
        let step = clock.begin_frame(50.0, 16.0);
        assert_eq!(step.physics_ms, 16.0);
        assert_eq!(step.elapsed_ms, 50.0);
        assert_eq!(clock.now_ms, 50.0);
    }

    #[test]
    fn test_resume_step_after_pause() {
        let mut clock = SimulationClock::new();
        clock.mark_paused();
        let step = clock.begin_frame(4000.0, 16.0);
        assert_eq!(step.elapsed_ms, RESUME_STEP_MS);
        let step = clock.begin_frame(10.0, 16.0);
        assert_eq!(step.elapsed_ms, 10.0);
    }

    #[test]
    fn test_focus_debounce() {
        let mut clock = SimulationClock::new();
        clock.focus_lost();
        assert!(!clock.poll_auto_pause(1000.0, 3000.0));
        assert!(!clock.poll_auto_pause(1000.0, 3000.0));
        // Focus flicker cancels the pending pause
        clock.focus_gained();
        assert!(!clock.poll_auto_pause(5000.0, 3000.0));

        clock.focus_lost();
        assert!(!clock.poll_auto_pause(2999.0, 3000.0));
        assert!(clock.poll_auto_pause(1.0, 3000.0));
        // Fires once
        assert!(!clock.poll_auto_pause(1000.0, 3000.0));
    }
}
