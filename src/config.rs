//! Gameplay options and launch configuration
//!
//! Options are persisted separately in LocalStorage; launch configuration
//! comes from the embedding page and the URL query string.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tunable gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    // === Tower geometry ===
    /// Radius of the central column
    pub column_radius: f32,
    /// Number of platforms kept in the active tower
    pub total_platforms: usize,
    /// Vertical distance between two consecutive platforms
    pub platform_gap: f32,
    /// Outer radius of a platform ring
    pub platform_radius: f32,
    /// Platform thickness
    pub platform_height: f32,
    /// Minimum solid arc (radians)
    pub min_arc: f32,
    /// Maximum solid arc (radians)
    pub max_arc: f32,
    /// Tower rotation speed from keyboard input (radians per second)
    pub rotation_speed: f32,

    // === Body ===
    pub ball_radius: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity set on bounce (units/s)
    pub bounce_impulse: f32,

    // === Hazards ===
    pub spike_radius: f32,
    pub spike_height: f32,
    /// Chance (0..1) each spike candidate is placed
    pub spike_probability: f32,

    // === Timer ===
    /// Starting time budget (seconds)
    pub time_left: f32,

    // === Drag input ===
    /// Radians per pixel of mouse drag
    pub mouse_sensitivity: f32,
    /// Radians per pixel of touch drag
    pub touch_sensitivity: f32,

    // === Colors (0xRRGGBB) ===
    pub column_color: u32,
    pub gap_color: u32,
    pub ball_color: u32,
    pub spike_color: u32,
    pub platform_color: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            column_radius: 1.0,
            total_platforms: 10,
            platform_gap: 3.0,
            platform_radius: 3.0,
            platform_height: 1.0,
            min_arc: PI * 1.5,
            max_arc: PI * 1.85,
            rotation_speed: 6.0,

            ball_radius: 0.4,
            gravity: 10.0,
            bounce_impulse: 6.0,

            spike_radius: 0.2,
            spike_height: 0.6,
            spike_probability: 0.25,

            time_left: 30.0,

            mouse_sensitivity: 0.01,
            touch_sensitivity: 0.01,

            column_color: 0x090C0F,
            gap_color: 0x10F48B,
            ball_color: 0x10F48B,
            spike_color: 0xEA088B,
            platform_color: 0x1A1F26,
        }
    }
}

impl GameOptions {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "helix_fall_options";

    /// Parse options from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options.validated())
    }

    /// Distance from the column axis to the body centre
    pub fn body_ring_radius(&self) -> f32 {
        self.platform_radius - self.ball_radius
    }

    /// Fix values that would break tower generation
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.total_platforms == 0 {
            log::warn!("total_platforms must be at least 1, using {}", defaults.total_platforms);
            self.total_platforms = defaults.total_platforms;
        }
        if self.platform_gap <= 0.0 {
            log::warn!("platform_gap must be positive, using {}", defaults.platform_gap);
            self.platform_gap = defaults.platform_gap;
        }
        if self.platform_radius <= self.ball_radius {
            log::warn!("platform_radius must exceed ball_radius, using defaults");
            self.platform_radius = defaults.platform_radius;
            self.ball_radius = defaults.ball_radius;
        }
        self.min_arc = self.min_arc.clamp(0.0, 2.0 * PI);
        self.max_arc = self.max_arc.clamp(0.0, 2.0 * PI);
        if self.min_arc > self.max_arc {
            log::warn!(
                "min_arc {} > max_arc {}, swapping",
                self.min_arc,
                self.max_arc
            );
            std::mem::swap(&mut self.min_arc, &mut self.max_arc);
        }
        self.spike_probability = self.spike_probability.clamp(0.0, 1.0);
        if self.time_left <= 0.0 {
            self.time_left = defaults.time_left;
        }

        self
    }

    /// Load options from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::storage_get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(options) => {
                    log::info!("Loaded game options from LocalStorage");
                    options
                }
                Err(e) => {
                    log::warn!("Ignoring stored game options: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default game options");
                Self::default()
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// How a character body is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Gltf,
    Sprite,
    #[default]
    Procedural,
}

impl CharacterKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gltf" | "glb" => Some(CharacterKind::Gltf),
            "sprite" => Some(CharacterKind::Sprite),
            "procedural" => Some(CharacterKind::Procedural),
            _ => None,
        }
    }
}

/// Which falling body variant to spawn
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BodyKind {
    #[default]
    Ball,
    Character {
        kind: CharacterKind,
        model: Option<String>,
    },
}

impl BodyKind {
    /// Resolve the appearance actually used
    ///
    /// Model-based kinds without a model path fall back to procedural.
    pub fn resolved(self) -> Self {
        match self {
            BodyKind::Character {
                kind: CharacterKind::Gltf | CharacterKind::Sprite,
                model: None,
            } => BodyKind::Character {
                kind: CharacterKind::Procedural,
                model: None,
            },
            other => other,
        }
    }
}

/// Configuration supplied by the embedding page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LaunchConfig {
    pub game_id: String,
    pub user_id: Option<String>,
    pub api_endpoint: Option<String>,
    pub body: BodyKind,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            game_id: "helix-fall".to_string(),
            user_id: None,
            api_endpoint: None,
            body: BodyKind::Ball,
        }
    }
}

impl LaunchConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply launch parameters on top of this configuration
    ///
    /// `param` looks up one decoded query value by key. Recognised keys:
    /// `useCharacter`, `characterType`, `characterModel`, `userId`,
    /// `apiEndpoint`; empty values are ignored.
    pub fn with_params<F>(mut self, param: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| param(key).filter(|v| !v.is_empty());

        let use_character = param("useCharacter").map(|v| v == "true");
        let character_kind = param("characterType").and_then(|v| CharacterKind::parse(&v));
        let character_model = non_empty("characterModel");
        if let Some(user_id) = non_empty("userId") {
            self.user_id = Some(user_id);
        }
        if let Some(endpoint) = non_empty("apiEndpoint") {
            self.api_endpoint = Some(endpoint);
        }

        let configured_character = match &self.body {
            BodyKind::Character { kind, model } => Some((*kind, model.clone())),
            BodyKind::Ball => None,
        };

        if use_character.unwrap_or(false) || configured_character.is_some() {
            let (base_kind, base_model) = configured_character.unwrap_or_default();
            self.body = BodyKind::Character {
                kind: character_kind.unwrap_or(base_kind),
                model: character_model.or(base_model),
            };
        }

        self.body = self.body.resolved();
        self
    }

    /// Apply a raw URL query string such as `?useCharacter=true`
    ///
    /// The browser build reads the page query through `URLSearchParams`
    /// instead; this is the native path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_query(self, query: &str) -> Self {
        let pairs: Vec<(&str, String)> = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key, decode_component(value))
            })
            .collect();

        // First occurrence wins, like URLSearchParams::get
        self.with_params(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
    }
}

/// Minimal percent-decoding for query values
#[cfg(not(target_arch = "wasm32"))]
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
