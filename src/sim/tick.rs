//! Per-frame simulation step
//!
//! One call per rendered frame. Runs to completion; the host renders
//! afterwards whatever the phase.

use super::body::FallingBody;
use super::state::{GameOverCause, GamePhase, GameState};
use crate::consts::{HAZARD_HIT_FRACTION, MAX_FRAME_DT};

/// Input gathered since the previous frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Keyboard rotation direction: +1 counter-clockwise, -1 clockwise, 0 none
    pub rotate: f32,
    /// Accumulated drag rotation (radians), applied to the active tower only
    pub drag: f32,
}

/// Clamp a host frame delta into what the simulation accepts
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &FrameInput, dt: f32) {
    let dt = clamp_dt(dt);

    // Delayed actions land at frame boundaries
    state.advance_timers(dt);

    // Frozen until the reset fires
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.tower.update_graveyard(dt);

    if input.drag != 0.0 {
        state.start();
        state.tower.drag(input.drag);
    }

    if input.rotate != 0.0 {
        state.start();
        state
            .tower
            .rotate(input.rotate.signum() * state.options.rotation_speed * dt);
    }

    let Some(top) = state.tower.top() else {
        return;
    };
    state.camera.follow(top.level);

    state.body.advance(dt);

    // Hazards on the top platform, then the clock
    let body_pos = state.body.position();
    let hit_radius = state.body.radius() * HAZARD_HIT_FRACTION;
    let hit_tip = top
        .hazard_tips(state.tower.rotation)
        .find(|tip| tip.distance(body_pos) < hit_radius);

    if let Some(tip) = hit_tip {
        state.trigger_game_over(GameOverCause::Hazard, Some(tip));
        return;
    }
    if state.time_left <= 0.0 {
        state.trigger_game_over(GameOverCause::Timeout, None);
        return;
    }

    // Floor contact only while falling
    if state.body.velocity() >= 0.0 {
        return;
    }
    let floor = top.floor_height(state.body.radius());
    if body_pos.y >= floor {
        return;
    }

    if top.lets_through(state.tower.rotation) {
        state.register_clear();
    } else {
        state.register_bounce(floor);
    }
}
