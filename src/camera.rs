//! Camera framing
//!
//! The camera trails the top platform while a run is live and pulls back to
//! the body on game over. The pull-back itself is tweened by the renderer;
//! this only decides where it goes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_FOLLOW, GAME_OVER_CAMERA_DURATION, GAME_OVER_CAMERA_OFFSET};

/// Camera height above the spawn
const CAMERA_START_Y: f32 = 4.0;
/// Initial look-at height
const CAMERA_LOOK_Y: f32 = -2.0;

/// A timed camera move handed to the tween helper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraMove {
    pub target: Vec3,
    /// Point to keep looking at during the move
    pub look_at: Vec3,
    /// Seconds
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Viewport width / height
    pub aspect: f32,
    /// Game-over pull-back in progress
    pub pull_back: Option<CameraMove>,
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl CameraRig {
    pub fn new(aspect: f32) -> Self {
        let mut rig = Self {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            aspect,
            pull_back: None,
        };
        rig.reset();
        rig
    }

    /// Distance that keeps the whole tower in view for this aspect ratio
    pub fn framing_distance(aspect: f32) -> f32 {
        if aspect > 0.5 { 12.0 } else { 16.0 }
    }

    /// Back to the initial framing
    pub fn reset(&mut self) {
        self.position = Vec3::new(0.0, CAMERA_START_Y, Self::framing_distance(self.aspect));
        self.look_at = Vec3::new(0.0, CAMERA_LOOK_Y, 0.0);
        self.pull_back = None;
    }

    /// Viewport changed size
    pub fn resize(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.position.z = Self::framing_distance(aspect);
    }

    /// Ease toward the top platform (once per running frame)
    pub fn follow(&mut self, top_level: f32) {
        let current_y = self.position.y;
        self.position.y = lerp(current_y, top_level + CAMERA_START_Y, CAMERA_FOLLOW);
        self.look_at.y = lerp(current_y - 6.0, top_level + CAMERA_LOOK_Y, CAMERA_FOLLOW);
    }

    /// Plan the game-over pull-back toward the body
    ///
    /// The camera swings to the side the fatal spike tip is on; without a
    /// spike (timeout) it swings left.
    pub fn pull_back_to(&mut self, body: Vec3, hazard_tip: Option<Vec3>) -> CameraMove {
        let side = match hazard_tip {
            Some(tip) if tip.x > 0.0 => 1.0,
            _ => -1.0,
        };
        let camera_move = CameraMove {
            target: Vec3::new(
                body.x + side * GAME_OVER_CAMERA_OFFSET,
                body.y,
                body.z + GAME_OVER_CAMERA_OFFSET,
            ),
            look_at: body,
            duration: GAME_OVER_CAMERA_DURATION,
        };
        self.pull_back = Some(camera_move);
        camera_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_framing() {
        let wide = CameraRig::new(16.0 / 9.0);
        assert_eq!(wide.position, Vec3::new(0.0, 4.0, 12.0));
        assert_eq!(wide.look_at, Vec3::new(0.0, -2.0, 0.0));

        let tall = CameraRig::new(0.45);
        assert_eq!(tall.position.z, 16.0);
    }

    #[test]
    fn test_follow_moves_toward_target() {
        let mut rig = CameraRig::new(1.0);
        rig.follow(-3.0);
        // 4 + (1 - 4) * 0.03
        assert!((rig.position.y - 3.91).abs() < 1e-5);
        assert!(rig.position.y > 1.0);
    }

    #[test]
    fn test_pull_back_side_follows_tip() {
        let mut rig = CameraRig::new(1.0);
        let body = Vec3::new(0.0, -1.0, 2.6);
        let right = rig.pull_back_to(body, Some(Vec3::new(0.2, 0.0, 2.5)));
        assert!((right.target - Vec3::new(4.0, -1.0, 6.6)).length() < 1e-5);
        let left = rig.pull_back_to(body, None);
        assert_eq!(left.target.x, -4.0);
        assert_eq!(left.duration, 2.0);

        rig.reset();
        assert!(rig.pull_back.is_none());
    }

    #[test]
    fn test_resize_changes_distance_only() {
        let mut rig = CameraRig::new(1.0);
        rig.follow(-3.0);
        let y = rig.position.y;
        rig.resize(0.4);
        assert_eq!(rig.position.z, 16.0);
        assert_eq!(rig.position.y, y);
    }
}
