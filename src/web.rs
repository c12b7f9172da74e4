//! Browser entry points
//!
//! The page owns the canvas, the 3D renderer and the event listeners. It
//! creates one [`HelixFall`], forwards input to it and calls `frame` from
//! its animation loop, drawing whatever snapshot comes back.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::config::{GameOptions, LaunchConfig};
use crate::input::PointerSource;
use crate::score::LogSink;
use crate::session::Session;
use crate::sim::GameEvent;
use crate::snapshot::HudView;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Helix Fall starting...");
}

#[wasm_bindgen]
pub struct HelixFall {
    session: Session,
    audio: AudioManager,
    /// HUD values currently in the DOM
    shown_hud: Option<HudView>,
}

#[wasm_bindgen]
impl HelixFall {
    /// `launch_json` is an optional serialized launch configuration; URL
    /// query parameters override it.
    #[wasm_bindgen(constructor)]
    pub fn new(launch_json: Option<String>, aspect: f32) -> HelixFall {
        let launch = match launch_json.as_deref().map(LaunchConfig::from_json) {
            Some(Ok(launch)) => launch,
            Some(Err(e)) => {
                log::warn!("Ignoring launch configuration: {}", e);
                LaunchConfig::default()
            }
            None => LaunchConfig::default(),
        };
        let params = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
        let launch = launch.with_params(|key| params.as_ref().and_then(|p| p.get(key)));

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, GameOptions::load(), launch, aspect, Box::new(LogSink));

        HelixFall {
            session,
            audio: AudioManager::new(),
            shown_hud: None,
        }
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.audio.resume();
        self.session.key_down(key, js_sys::Date::now())
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.session.key_up(key)
    }

    pub fn blur(&mut self) {
        self.session.blur();
    }

    pub fn pointer_down(&mut self, x: f32, touch: bool) {
        self.audio.resume();
        let source = if touch {
            PointerSource::Touch
        } else {
            PointerSource::Mouse
        };
        self.session.pointer_down(x, source);
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.session.pointer_move(x);
    }

    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    pub fn resize(&mut self, aspect: f32) {
        self.session.resize(aspect);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.session.set_autopilot(enabled);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    pub fn character_model_failed(&mut self) {
        self.session.character_model_failed();
    }

    /// Advance one frame (`dt` in seconds) and return the render snapshot
    /// as JSON
    pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
        let snapshot = self.session.frame_snapshot(dt);

        for cue in snapshot.events.iter().filter_map(GameEvent::cue) {
            self.audio.play(cue);
        }
        self.update_hud(&snapshot.hud);

        snapshot
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl HelixFall {
    /// Write score/timer text and header visibility when they change
    fn update_hud(&mut self, hud: &HudView) {
        if self.shown_hud.as_ref() == Some(hud) {
            return;
        }
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&hud.score_text()));
        }
        if let Some(el) = document.get_element_by_id("timer") {
            el.set_text_content(Some(&hud.timer_text()));
        }
        for id in ["gameheader", "hand"] {
            if let Some(el) = document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hud.header_visible {
                    classes.remove_1("hidden")
                } else {
                    classes.add_1("hidden")
                };
            }
        }

        self.shown_hud = Some(hud.clone());
    }
}
