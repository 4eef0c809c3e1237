//! End-of-run score submission
//!
//! The session fires this once per run when the game ends with a user id set.
//! Failures are the submitter's to report; the session logs and drops them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What gets reported at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u64,
    pub wave: u32,
    pub survival_time_secs: f32,
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("score backend unavailable: {0}")]
    Unavailable(String),
    #[error("score rejected: {0}")]
    Rejected(String),
}

/// Sink for finished runs. Must return promptly; anything slow belongs behind it.
pub trait ScoreSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError>;
}

/// Writes submissions to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogSubmitter;

impl ScoreSubmitter for LogSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
        let json = serde_json::to_string(submission)
            .map_err(|e| SubmitError::Rejected(e.to_string()))?;
        log::info!("score submitted: {}", json);
        Ok(())
    }
}

/// Hands submissions to a JS callback as a JSON string
#[cfg(target_arch = "wasm32")]
pub struct JsSubmitter {
    callback: js_sys::Function,
}

#[cfg(target_arch = "wasm32")]
impl JsSubmitter {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreSubmitter for JsSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
        let json = serde_json::to_string(submission)
            .map_err(|e| SubmitError::Rejected(e.to_string()))?;
        self.callback
            .call1(&wasm_bindgen::JsValue::NULL, &wasm_bindgen::JsValue::from_str(&json))
            .map(|_| ())
            .map_err(|e| SubmitError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_json_fields() {
        let submission = ScoreSubmission {
            score: 1200,
            wave: 6,
            survival_time_secs: 95.5,
            user_id: "player-1".to_string(),
        };
        let json = serde_json::to_string(&submission).unwrap();
        assert!(json.contains("\"score\":1200"));
        assert!(json.contains("\"survival_time_secs\":95.5"));
        assert!(json.contains("\"user_id\":\"player-1\""));
    }

    #[test]
    fn test_log_submitter_accepts() {
        let submission = ScoreSubmission {
            score: 10,
            wave: 1,
            survival_time_secs: 3.0,
            user_id: "u".to_string(),
        };
        assert!(LogSubmitter.submit(&submission).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = SubmitError::Unavailable("offline".to_string());
        assert_eq!(err.to_string(), "score backend unavailable: offline");
    }
}
