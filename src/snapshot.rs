//! Per-frame view handed to the renderer
//!
//! The renderer never reads [`GameState`] directly; it gets a serializable
//! snapshot with everything it needs to draw the frame.

use glam::Vec3;
use serde::Serialize;

use crate::camera::CameraRig;
use crate::config::CharacterKind;
use crate::consts::{RETIRE_COLOR, RETIRE_LIFT, RETIRE_SCALE};
use crate::sim::{Body, FallingBody, GameEvent, GamePhase, GameState, Platform, RetiringPlatform};

/// A platform as drawn this frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformView {
    #[serde(flatten)]
    pub platform: Platform,
    pub opacity: f32,
    pub scale: f32,
    /// Extra height above the platform's level
    pub lift: f32,
    /// Override tint; `None` uses the configured platform colors
    pub tint: Option<u32>,
}

impl PlatformView {
    fn active(platform: &Platform) -> Self {
        Self {
            platform: platform.clone(),
            opacity: 1.0,
            scale: 1.0,
            lift: 0.0,
            tint: None,
        }
    }

    fn retiring(retiring: &RetiringPlatform) -> Self {
        let t = retiring.progress();
        Self {
            platform: retiring.platform.clone(),
            opacity: 1.0 - t,
            scale: 1.0 + (RETIRE_SCALE - 1.0) * t,
            lift: RETIRE_LIFT * t,
            tint: Some(RETIRE_COLOR),
        }
    }
}

/// Which body to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum BodyLook {
    Ball,
    Character {
        appearance: CharacterKind,
        model: Option<String>,
        tumble: f32,
        /// Clip to start this frame
        animation: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyView {
    pub position: Vec3,
    pub velocity: f32,
    pub radius: f32,
    pub color: u32,
    pub look: BodyLook,
}

impl BodyView {
    /// Consumes any pending animation request
    fn capture(body: &mut Body, color: u32) -> Self {
        let look = match body {
            Body::Ball(_) => BodyLook::Ball,
            Body::Character(c) => BodyLook::Character {
                appearance: c.appearance,
                model: c.model.clone(),
                tumble: c.tumble,
                animation: c.take_animation(),
            },
        };
        Self {
            position: body.position(),
            velocity: body.velocity(),
            radius: body.radius(),
            color,
            look,
        }
    }
}

/// Score/timer display values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudView {
    /// Empty until the first input of a run
    pub score: Option<u32>,
    /// Whole seconds shown on the timer; empty until the first input
    pub time_left: Option<u32>,
    /// Title header and hand hint
    pub header_visible: bool,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let live = state.phase != GamePhase::Idle;
        Self {
            score: live.then_some(state.score),
            time_left: live.then(|| state.time_left.max(0.0).ceil() as u32),
            header_visible: state.phase == GamePhase::Idle,
        }
    }

    pub fn score_text(&self) -> String {
        self.score.map(|s| s.to_string()).unwrap_or_default()
    }

    pub fn timer_text(&self) -> String {
        self.time_left.map(|t| t.to_string()).unwrap_or_default()
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub platforms: Vec<PlatformView>,
    pub graveyard: Vec<PlatformView>,
    pub tower_rotation: f32,
    pub graveyard_rotation: f32,
    pub column_y: f32,
    pub body: BodyView,
    pub camera: CameraRig,
    pub hud: HudView,
    pub events: Vec<GameEvent>,
}

impl RenderSnapshot {
    pub fn capture(state: &mut GameState, events: Vec<GameEvent>) -> Self {
        let tower = &state.tower;
        Self {
            phase: state.phase,
            platforms: tower.active.iter().map(PlatformView::active).collect(),
            graveyard: tower.graveyard.iter().map(PlatformView::retiring).collect(),
            tower_rotation: tower.rotation,
            graveyard_rotation: tower.graveyard_rotation,
            column_y: tower.column_y,
            hud: HudView::from_state(state),
            camera: state.camera.clone(),
            body: BodyView::capture(&mut state.body, state.body_color),
            events,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
