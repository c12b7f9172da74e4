//! Host-facing game session
//!
//! Owns the game state together with everything around it: held keys, the
//! drag in progress, the score sink and the launch configuration. The host
//! forwards raw input here and calls [`Session::frame`] once per rendered
//! frame.

use crate::config::{GameOptions, LaunchConfig};
use crate::input::{DragTracker, PointerSource, RotationKeys};
use crate::platform;
use crate::score::{GameResult, ScoreSink};
use crate::sim::autopilot;
use crate::sim::{Body, FrameInput, GameEvent, GamePhase, GameState, tick};
use crate::snapshot::RenderSnapshot;

pub struct Session {
    pub state: GameState,
    keys: RotationKeys,
    drag: DragTracker,
    /// Drag rotation gathered since the last frame
    pending_drag: f32,
    sink: Box<dyn ScoreSink>,
    launch: LaunchConfig,
    autopilot: bool,
}

impl Session {
    pub fn new(
        seed: u64,
        options: GameOptions,
        launch: LaunchConfig,
        aspect: f32,
        sink: Box<dyn ScoreSink>,
    ) -> Self {
        let state = GameState::new(seed, options, launch.body.clone(), aspect);
        Self {
            state,
            keys: RotationKeys::new(),
            drag: DragTracker::new(),
            pending_drag: 0.0,
            sink,
            launch,
            autopilot: false,
        }
    }

    /// Let the autopilot steer whenever no key is held
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot {}", if enabled { "on" } else { "off" });
    }

    pub fn key_down(&mut self, key: &str, now_ms: f64) -> bool {
        self.keys.press(key, now_ms)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.keys.release(key)
    }

    /// Window lost focus: drop held keys and any drag
    pub fn blur(&mut self) {
        self.keys.clear();
        self.drag.end();
        self.pending_drag = 0.0;
    }

    pub fn pointer_down(&mut self, x: f32, source: PointerSource) {
        let sensitivity = match source {
            PointerSource::Mouse => self.state.options.mouse_sensitivity,
            PointerSource::Touch => self.state.options.touch_sensitivity,
        };
        self.drag.begin(x, sensitivity);
    }

    /// Movement while the game is over only tracks the pointer, so a drag
    /// held through the reset carries on from where the pointer is
    pub fn pointer_move(&mut self, x: f32) {
        let Some(delta) = self.drag.move_to(x) else {
            return;
        };
        if self.state.phase != GamePhase::GameOver {
            self.pending_drag += delta;
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    pub fn resize(&mut self, aspect: f32) {
        self.state.camera.resize(aspect);
    }

    /// The renderer could not load the character model
    pub fn character_model_failed(&mut self) {
        if let Body::Character(character) = &mut self.state.body {
            character.fall_back_to_procedural();
        }
    }

    /// Run one frame and return what happened
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut rotate = self.keys.direction();
        if rotate == 0.0 && self.autopilot && self.state.phase != GamePhase::GameOver {
            rotate = autopilot::steer(&self.state);
        }
        let input = FrameInput {
            rotate,
            drag: std::mem::take(&mut self.pending_drag),
        };

        tick(&mut self.state, &input, dt);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver {
                score, time_left, ..
            } = event
            {
                self.submit_result(*score, *time_left);
            }
        }
        events
    }

    /// Run one frame and capture the view of it
    pub fn frame_snapshot(&mut self, dt: f32) -> RenderSnapshot {
        let events = self.frame(dt);
        RenderSnapshot::capture(&mut self.state, events)
    }

    fn submit_result(&mut self, score: u32, time_left: f32) {
        let result = GameResult {
            score,
            time_left,
            timestamp: platform::now_ms(),
            game_id: self.launch.game_id.clone(),
            user_id: self.launch.user_id.clone(),
        };
        match self.sink.submit(&result) {
            Ok(()) => log::info!("Score {} submitted", score),
            Err(e) => log::warn!("{}", e),
        }
    }
}
