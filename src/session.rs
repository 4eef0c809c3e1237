//! Run lifecycle
//!
//! Owns the simulation, the logged-in user (if any) and the score hook.

use crate::config::GameConfig;
use crate::sim::{GameEvent, RenderSnapshot, SimulationState, TickInput, tick};
use crate::submit::{ScoreSubmission, ScoreSubmitter};

pub struct GameSession {
    state: SimulationState,
    user_id: Option<String>,
    submitter: Box<dyn ScoreSubmitter>,
    submitted: bool,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64, submitter: Box<dyn ScoreSubmitter>) -> Self {
        log::info!("run started with seed {}", seed);
        Self {
            state: SimulationState::new(config, seed),
            user_id: None,
            submitter,
            submitted: false,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn set_user(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_submitter(&mut self, submitter: Box<dyn ScoreSubmitter>) {
        self.submitter = submitter;
    }

    /// Run one frame and fire the score hook on the transition into game over
    pub fn frame(&mut self, input: &TickInput, frame_ms: f32) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input, frame_ms);
        for event in &events {
            if let GameEvent::GameOver {
                score,
                wave,
                survival_time_secs,
            } = event
            {
                self.submit(*score, *wave, *survival_time_secs);
            }
        }
        events
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    /// Fresh run with a new seed; config, user and submitter are kept
    pub fn restart(&mut self, seed: u64) {
        self.state.restart(seed);
        self.submitted = false;
        log::info!("run restarted with seed {}", seed);
    }

    fn submit(&mut self, score: u64, wave: u32, survival_time_secs: f32) {
        if self.submitted {
            return;
        }
        self.submitted = true;

        let Some(user_id) = self.user_id.clone() else {
            log::debug!("no user logged in, score not submitted");
            return;
        };
        let submission = ScoreSubmission {
            score,
            wave,
            survival_time_secs,
            user_id,
        };
        if let Err(e) = self.submitter.submit(&submission) {
            log::warn!("score submission failed: {}", e);
        }
    }
}
