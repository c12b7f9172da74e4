//! Player input tracking
//!
//! Keyboard: `a` turns the tower counter-clockwise, `d` clockwise. If both
//! are held the most recently pressed one wins; with neither held the tower
//! stays put.
//!
//! Drag: horizontal mouse/touch movement turns the tower directly.

use serde::{Deserialize, Serialize};

/// Press timestamps of the two rotation keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationKeys {
    /// `a`: counter-clockwise (+1)
    ccw_since: Option<f64>,
    /// `d`: clockwise (-1)
    cw_since: Option<f64>,
}

impl RotationKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; repeats keep the original timestamp
    ///
    /// Returns whether the key is a rotation key.
    pub fn press(&mut self, key: &str, now_ms: f64) -> bool {
        match Self::slot(&mut self.ccw_since, &mut self.cw_since, key) {
            Some(slot) => {
                slot.get_or_insert(now_ms);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, key: &str) -> bool {
        match Self::slot(&mut self.ccw_since, &mut self.cw_since, key) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Forget all held keys (e.g. window lost focus)
    pub fn clear(&mut self) {
        self.ccw_since = None;
        self.cw_since = None;
    }

    fn slot<'a>(
        ccw: &'a mut Option<f64>,
        cw: &'a mut Option<f64>,
        key: &str,
    ) -> Option<&'a mut Option<f64>> {
        match key.to_lowercase().as_str() {
            "a" => Some(ccw),
            "d" => Some(cw),
            _ => None,
        }
    }

    /// Rotation direction for this frame: +1, -1 or 0
    pub fn direction(&self) -> f32 {
        match (self.ccw_since, self.cw_since) {
            (Some(_), None) => 1.0,
            (None, Some(_)) => -1.0,
            (Some(ccw), Some(cw)) => {
                if ccw > cw {
                    1.0
                } else {
                    -1.0
                }
            }
            (None, None) => 0.0,
        }
    }
}

/// Where a drag comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Horizontal drag in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragTracker {
    /// Radians per pixel for the active drag
    sensitivity: f32,
    previous_x: Option<f32>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, x: f32, sensitivity: f32) {
        self.previous_x = Some(x);
        self.sensitivity = sensitivity;
    }

    /// Pointer moved; returns the rotation to apply, if dragging
    pub fn move_to(&mut self, x: f32) -> Option<f32> {
        let previous = self.previous_x?;
        self.previous_x = Some(x);
        Some((x - previous) * self.sensitivity)
    }

    pub fn end(&mut self) {
        self.previous_x = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.previous_x.is_some()
    }
}
