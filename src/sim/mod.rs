//! Frame-step simulation module
//!
//! All gameplay logic lives here:
//! - Falling body physics
//! - Platform generation and the endless tower
//! - Collision, scoring and the countdown timer
//! - No rendering, audio or DOM dependencies

pub mod autopilot;
pub mod body;
pub mod platform;
pub mod sector;
pub mod state;
pub mod tick;
pub mod timers;
pub mod tower;

pub use body::{Ball, Body, BodyPhysics, Character, FallingBody};
pub use platform::{Hazard, Platform};
pub use sector::Sector;
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, SoundCue};
pub use tick::{FrameInput, clamp_dt, tick};
pub use timers::{Generation, TimerFire, TimerKind, Timers};
pub use tower::{RetiringPlatform, Tower};
