//! Demo-mode steering
//!
//! Rotates the tower so the top platform's gap swings under the body.

use super::state::GameState;
use crate::signed_angle;

/// Fraction of the gap half-width treated as "lined up"
const ALIGN_TOLERANCE: f32 = 0.5;

/// Pick a keyboard rotation direction for this frame
///
/// Returns +1, -1 or 0 like [`crate::input::RotationKeys::direction`].
pub fn steer(state: &GameState) -> f32 {
    let Some(top) = state.tower.top() else {
        return 0.0;
    };

    let gap_centre = top.world_rotation(state.tower.rotation) + top.gap.start + top.gap.length / 2.0;
    // Rotation needed to bring the gap centre to angle 0
    let error = signed_angle(-gap_centre);
    let tolerance = top.gap.length / 2.0 * ALIGN_TOLERANCE;

    if error.abs() <= tolerance {
        0.0
    } else {
        error.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BodyKind, GameOptions};
    use crate::sim::tick::{FrameInput, tick};
    use crate::sim::GamePhase;

    #[test]
    fn test_steer_aligns_first_gap() {
        let mut state = GameState::new(1, GameOptions::default(), BodyKind::Ball, 1.0);
        assert!(!state.tower.top().unwrap().lets_through(state.tower.rotation));
        // First platform: solid half faces the body, so steering is needed
        assert_ne!(steer(&state), 0.0);

        for _ in 0..120 {
            let rotate = steer(&state);
            if rotate == 0.0 {
                break;
            }
            state.tower.rotate(rotate * 0.1);
        }
        assert_eq!(steer(&state), 0.0);
        let top = state.tower.top().unwrap();
        assert!(top.lets_through(state.tower.rotation));
    }

    #[test]
    fn test_demo_scores() {
        let options = GameOptions {
            spike_probability: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(7, options, BodyKind::Ball, 1.0);
        for _ in 0..60 * 20 {
            let input = FrameInput {
                rotate: steer(&state),
                ..Default::default()
            };
            tick(&mut state, &input, 1.0 / 60.0);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(state.score >= 5, "autopilot scored {}", state.score);
    }
}
