//! Angular sectors of a platform ring
//!
//! A platform is split into two sectors around the column:
//! - solid: stops the body and carries the spikes
//! - gap: the complement the body has to fall through
//!
//! Angles are measured from +Z toward +X (see [`crate::ring_point`]), so the
//! body always sits at angle 0 in tower space.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::wrap_angle;

/// A sector of a ring, in the ring's own frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Start angle relative to the platform's rotation offset (radians)
    pub start: f32,
    /// Angular length (radians)
    pub length: f32,
}

impl Sector {
    pub fn new(start: f32, length: f32) -> Self {
        Self { start, length }
    }

    /// End angle (unwrapped)
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.length
    }

    /// Start and end in world space, each wrapped into [0, 2π)
    pub fn world_bounds(&self, rotation: f32) -> (f32, f32) {
        let start = wrap_angle(self.start + rotation);
        let end = wrap_angle(start + self.length);
        (start, end)
    }

    /// Whether the sector, once rotated, does not cross the zero reference
    ///
    /// This is the falling-through rule for a solid sector: the body sits at
    /// angle 0, so a solid sector whose wrapped start is below its wrapped
    /// end leaves angle 0 uncovered.
    pub fn clears_reference(&self, rotation: f32) -> bool {
        let (start, end) = self.world_bounds(rotation);
        start < end
    }
}

/// Split a full ring into its solid sector and the gap that completes it
pub fn split_ring(solid_length: f32) -> (Sector, Sector) {
    let solid = Sector::new(0.0, solid_length);
    let gap = Sector::new(solid_length, TAU - solid_length);
    (solid, gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_split_ring_covers_circle() {
        let (solid, gap) = split_ring(1.6 * PI);
        assert_eq!(solid.start, 0.0);
        assert_eq!(gap.start, solid.end());
        assert_eq!(solid.length + gap.length, TAU);
    }

    #[test]
    fn test_clears_reference_without_wrap() {
        // Solid from 0.1 to 0.1 + π: angle 0 is uncovered
        let solid = Sector::new(0.0, PI);
        assert!(solid.clears_reference(0.1));
    }

    #[test]
    fn test_clears_reference_with_wrap() {
        // First-platform layout: offset -π/2, half circle; covers angle 0
        let solid = Sector::new(0.0, PI);
        assert!(!solid.clears_reference(-PI / 2.0));
    }

    #[test]
    fn test_world_bounds_wraps_negative_rotation() {
        let solid = Sector::new(0.0, PI / 2.0);
        let (start, end) = solid.world_bounds(-PI / 4.0);
        assert!((start - 1.75 * PI).abs() < 1e-5);
        assert!((end - 0.25 * PI).abs() < 1e-5);
    }
}
