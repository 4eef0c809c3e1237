//! Flail Frenzy entry point
//!
//! Native: a headless autopilot run that logs the event stream.
//! Web: a `WebGame` handle driven by the page's animation loop and painter.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use flail_frenzy::sim::{FocusChange, TickInput};
    use flail_frenzy::submit::JsSubmitter;
    use flail_frenzy::{GameConfig, GameSession, LogSubmitter};

    /// Game handle owned by JS
    #[wasm_bindgen]
    pub struct WebGame {
        session: GameSession,
        input: TickInput,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32, config_json: Option<String>) -> Result<WebGame, JsValue> {
            let config = match config_json {
                Some(json) => {
                    let mut config = GameConfig::from_json(&json)
                        .map_err(|e| JsValue::from_str(&e.to_string()))?;
                    config.canvas_width = width;
                    config.canvas_height = height;
                    config
                }
                None => GameConfig::with_canvas(width, height),
            };
            let seed = js_sys::Date::now() as u64;
            Ok(Self {
                session: GameSession::new(config, seed, Box::new(LogSubmitter)),
                input: TickInput::default(),
            })
        }

        pub fn set_pointer(&mut self, x: f32, y: f32) {
            self.input.pointer = Some(Vec2::new(x, y));
        }

        pub fn set_pointer_down(&mut self, down: bool) {
            self.input.pointer_down = down;
        }

        pub fn toggle_pause(&mut self) {
            self.input.toggle_pause = true;
        }

        pub fn toggle_help(&mut self) {
            self.input.toggle_help = true;
        }

        pub fn focus_lost(&mut self) {
            self.input.focus = Some(FocusChange::Lost);
        }

        pub fn focus_gained(&mut self) {
            self.input.focus = Some(FocusChange::Gained);
        }

        pub fn set_user(&mut self, user_id: Option<String>) {
            self.session.set_user(user_id);
        }

        /// `callback(json)` receives the end-of-run submission
        pub fn set_submit_callback(&mut self, callback: js_sys::Function) {
            self.session.set_submitter(Box::new(JsSubmitter::new(callback)));
        }

        /// Run one frame; returns the events as a JSON array
        pub fn frame(&mut self, frame_ms: f32) -> String {
            let events = self.session.frame(&self.input, frame_ms);

            // Key presses and focus changes are one-shot
            self.input.toggle_pause = false;
            self.input.toggle_help = false;
            self.input.focus = None;

            serde_json::to_string(&events).unwrap_or_else(|e| {
                log::warn!("event serialization failed: {}", e);
                "[]".to_string()
            })
        }

        /// Render snapshot as JSON
        pub fn snapshot(&self) -> String {
            self.session.snapshot().to_json().unwrap_or_else(|e| {
                log::warn!("snapshot serialization failed: {}", e);
                "{}".to_string()
            })
        }

        pub fn restart(&mut self) {
            self.session.restart(js_sys::Date::now() as u64);
            self.input = TickInput::default();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // Err only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Flail Frenzy starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flail_frenzy::{GameConfig, GameSession, LogSubmitter};

    env_logger::init();
    log::info!("Flail Frenzy (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("could not load config {}: {}, using defaults", path, e);
                GameConfig::default()
            }
        },
        None => GameConfig::default(),
    };
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);

    let mut session = GameSession::new(config, seed, Box::new(LogSubmitter));
    session.set_user(Some("headless".to_string()));
    autopilot(&mut session);
}

/// Circle the arena, swinging and retracting, until the run ends or time runs out
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(session: &mut flail_frenzy::GameSession) {
    use flail_frenzy::sim::{GameEvent, TickInput};
    use glam::Vec2;

    const FRAME_MS: f32 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    let center = session.state().config.center();
    let radius = center.min_element() * 0.6;

    for frame in 0..MAX_FRAMES {
        let t = frame as f32 * FRAME_MS / 1000.0;
        let input = TickInput {
            pointer: Some(center + Vec2::new(t.cos(), (t * 1.3).sin()) * radius),
            pointer_down: frame % 180 < 30,
            ..Default::default()
        };
        for event in session.frame(&input, FRAME_MS) {
            match event {
                GameEvent::ScoreChanged { .. } | GameEvent::HealthChanged { .. } => {
                    log::debug!("{:?}", event);
                }
                GameEvent::GameOver {
                    score,
                    wave,
                    survival_time_secs,
                } => {
                    println!(
                        "Run over: score {} / wave {} / {:.1}s",
                        score, wave, survival_time_secs
                    );
                    return;
                }
                _ => log::info!("{:?}", event),
            }
        }
    }

    let game = &session.state().game;
    println!(
        "Survived: score {} / wave {} / {:.1}s",
        game.score, game.wave, game.game_time
    );
}
