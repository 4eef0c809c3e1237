//! Startup configuration
//!
//! Fixed for the lifetime of a process. Loaded from JSON on native builds,
//! passed in from the page on web builds.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration loading / validation failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Chain geometry, entity sizes, canvas and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Primary chain ===
    /// Links in the primary chain (before extensions)
    pub chain_length: usize,
    /// Rest distance between adjacent links
    pub chain_segment_distance: f32,
    /// Ball radius (before growth upgrades)
    pub ball_radius: f32,

    // === Player ===
    pub player_size: f32,

    // === Second chain ===
    pub second_chain_length: usize,
    pub second_chain_distance: f32,
    pub second_ball_radius: f32,

    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Timing ===
    /// Delay before losing focus auto-pauses the run
    pub pause_delay_ms: f32,
    /// Largest physics step a single frame may take
    pub max_step_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            chain_length: 10,
            chain_segment_distance: 35.0,
            ball_radius: 25.0,

            player_size: 18.0,

            second_chain_length: 4,
            second_chain_distance: 25.0,
            second_ball_radius: 18.0,

            canvas_width: 800.0,
            canvas_height: 600.0,

            pause_delay_ms: 3000.0,
            max_step_ms: 16.0,
        }
    }
}

impl GameConfig {
    /// Config with a specific canvas size (everything else default)
    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject geometry the physics can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_length < 2 {
            return Err(ConfigError::Invalid(format!(
                "chain_length must be at least 2 (got {})",
                self.chain_length
            )));
        }
        if self.second_chain_length < 1 {
            return Err(ConfigError::Invalid(
                "second_chain_length must be at least 1".to_string(),
            ));
        }
        let positive = [
            ("chain_segment_distance", self.chain_segment_distance),
            ("ball_radius", self.ball_radius),
            ("player_size", self.player_size),
            ("second_chain_distance", self.second_chain_distance),
            ("second_ball_radius", self.second_ball_radius),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("max_step_ms", self.max_step_ms),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive (got {value})")));
            }
        }
        if self.pause_delay_ms < 0.0 {
            return Err(ConfigError::Invalid("pause_delay_ms must not be negative".to_string()));
        }
        Ok(())
    }

    /// Canvas center point
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuning() {
        let c = GameConfig::default();
        assert_eq!(c.chain_length, 10);
        assert_eq!(c.chain_segment_distance, 35.0);
        assert_eq!(c.ball_radius, 25.0);
        assert_eq!(c.player_size, 18.0);
        assert_eq!(c.pause_delay_ms, 3000.0);
        assert_eq!(c.second_chain_length, 4);
        assert_eq!(c.second_chain_distance, 25.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c = GameConfig::from_json(r#"{ "canvas_width": 1280, "canvas_height": 720 }"#).unwrap();
        assert_eq!(c.canvas_width, 1280.0);
        assert_eq!(c.chain_length, 10);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let err = GameConfig::from_json(r#"{ "chain_length": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_json(r#"{ "chain_segment_distance": -3.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
