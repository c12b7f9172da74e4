//! Helix Fall - An endless falling-ball helix tower arcade game
//!
//! Core modules:
//! - `sim`: Frame-step simulation (falling body, platforms, tower, score/timer state)
//! - `config`: Tunable gameplay options and launch configuration
//! - `input`: Keyboard tie-break and drag tracking
//! - `camera`: Camera framing and follow
//! - `score`: Final result hand-off to the score delivery collaborator
//! - `session`: Host-facing game session
//! - `snapshot`: Serializable view for the renderer
//! - `platform`: Browser/native platform abstraction

pub mod camera;
pub mod config;
pub mod input;
pub mod platform;
pub mod score;
pub mod session;
pub mod sim;
pub mod snapshot;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{BodyKind, CharacterKind, GameOptions, LaunchConfig};
pub use score::{GameResult, LogSink, MemorySink, ScoreSink, SubmitError};
pub use session::Session;

use glam::Vec3;

/// Game configuration constants that are not player-tunable
pub mod consts {
    use std::f32::consts::PI;

    /// Largest frame delta fed to the simulation (prevents tunneling after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Spawn height of the falling body
    pub const BODY_SPAWN_Y: f32 = 2.0;

    /// Orientation of the hazard-free first platform
    pub const FIRST_PLATFORM_OFFSET: f32 = -PI / 2.0;
    /// Angular distance between spike candidates
    pub const SPIKE_STEP: f32 = PI / 16.0;
    /// Spikes keep this far from both ends of the solid arc
    pub const SPIKE_EDGE_MARGIN: f32 = PI / 60.0;
    /// Maximum spike jitter (±2 degrees)
    pub const SPIKE_JITTER: f32 = 2.0 * PI / 180.0;
    /// Fraction of the body radius a spike tip must come within to hit
    pub const HAZARD_HIT_FRACTION: f32 = 0.9;

    /// Countdown tick interval (seconds)
    pub const COUNTDOWN_INTERVAL: f32 = 1.0;
    /// Delay between game over and full reset (seconds)
    pub const RESET_DELAY: f32 = 3.0;
    /// Game-over camera pull-back duration (seconds)
    pub const GAME_OVER_CAMERA_DURATION: f32 = 2.0;
    /// Camera offset from the body during the pull-back
    pub const GAME_OVER_CAMERA_OFFSET: f32 = 4.0;

    /// Retiring platform fade duration (seconds)
    pub const RETIRE_FADE_DURATION: f32 = 1.0;
    /// Vertical lift of a retiring platform over its fade
    pub const RETIRE_LIFT: f32 = 5.0;
    /// Horizontal scale applied to a retiring platform
    pub const RETIRE_SCALE: f32 = 1.1;

    /// Camera follow lerp factor per frame
    pub const CAMERA_FOLLOW: f32 = 0.03;

    /// Color the body is tinted toward on game over
    pub const GAME_OVER_BODY_COLOR: u32 = 0xFF0000;
    /// Color retiring platforms flash to
    pub const RETIRE_COLOR: u32 = 0xFFFFFF;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap an angle into [-π, π)
#[inline]
pub fn signed_angle(angle: f32) -> f32 {
    use std::f32::consts::PI;
    let wrapped = wrap_angle(angle + PI) - PI;
    if wrapped >= PI { wrapped - std::f32::consts::TAU } else { wrapped }
}

/// Point on a ring around the column, measured from +Z toward +X
///
/// Matches how the tower is laid out: angle 0 faces the camera, where the
/// falling body sits.
#[inline]
pub fn ring_point(radius: f32, angle: f32, y: f32) -> Vec3 {
    Vec3::new(radius * angle.sin(), y, radius * angle.cos())
}
