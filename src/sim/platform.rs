//! Platform rings and their spike hazards

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sector::{Sector, split_ring};
use crate::config::GameOptions;
use crate::consts::{FIRST_PLATFORM_OFFSET, SPIKE_EDGE_MARGIN, SPIKE_JITTER, SPIKE_STEP};
use crate::{ring_point, wrap_angle};

/// A spike standing on a platform's solid sector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Angle within the platform frame, jitter included
    pub angle: f32,
    /// Spike centre in the platform frame
    pub base: Vec3,
    /// Spike tip in the platform frame
    pub tip: Vec3,
}

impl Hazard {
    fn new(angle: f32, options: &GameOptions) -> Self {
        let radius = options.body_ring_radius();
        let centre_y = options.platform_height / 2.0 + options.spike_height / 2.0;
        let base = ring_point(radius, angle, centre_y);
        let tip = base + Vec3::Y * (options.spike_height / 2.0);
        Self { angle, base, tip }
    }
}

/// One ring-shaped platform of the tower
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: u32,
    /// Fixed vertical position
    pub level: f32,
    /// Rotation around the column relative to the tower (radians)
    pub offset: f32,
    pub solid: Sector,
    pub gap: Sector,
    /// Platform thickness
    pub height: f32,
    /// Empty for the first platform of a tower
    pub hazards: Vec<Hazard>,
    pub has_hazards: bool,
}

impl Platform {
    /// Generate a platform at the given level
    ///
    /// Without hazards the platform is the fixed starting shape: half a ring,
    /// oriented so the body lands on solid ground.
    pub fn generate<R: Rng>(
        id: u32,
        level: f32,
        has_hazards: bool,
        options: &GameOptions,
        rng: &mut R,
    ) -> Self {
        let offset = if has_hazards {
            wrap_angle(rng.random::<f32>() * std::f32::consts::TAU)
        } else {
            FIRST_PLATFORM_OFFSET
        };

        let arc_span = if has_hazards {
            let span = options.min_arc + rng.random::<f32>() * (options.max_arc - options.min_arc);
            span.clamp(options.min_arc, options.max_arc)
        } else {
            std::f32::consts::PI
        };

        let (solid, gap) = split_ring(arc_span);

        let mut hazards = Vec::new();
        if has_hazards {
            let mut candidate = SPIKE_EDGE_MARGIN;
            while candidate < arc_span - SPIKE_EDGE_MARGIN {
                if rng.random::<f32>() < options.spike_probability {
                    let jitter = (rng.random::<f32>() * 2.0 - 1.0) * SPIKE_JITTER;
                    hazards.push(Hazard::new(candidate + jitter, options));
                }
                candidate += SPIKE_STEP;
            }
        }

        Self {
            id,
            level,
            offset,
            solid,
            gap,
            height: options.platform_height,
            hazards,
            has_hazards,
        }
    }

    /// Height the body centre rests at when standing on this platform
    pub fn floor_height(&self, body_radius: f32) -> f32 {
        self.level + self.height / 2.0 + body_radius
    }

    /// Total rotation of this platform in world space
    #[inline]
    pub fn world_rotation(&self, tower_rotation: f32) -> f32 {
        self.offset + tower_rotation
    }

    /// Map a point from the platform frame into world space
    pub fn to_world(&self, local: Vec3, tower_rotation: f32) -> Vec3 {
        Quat::from_rotation_y(self.world_rotation(tower_rotation)) * local + Vec3::Y * self.level
    }

    /// World-space spike tips under the given tower rotation
    pub fn hazard_tips(&self, tower_rotation: f32) -> impl Iterator<Item = Vec3> + '_ {
        self.hazards
            .iter()
            .map(move |h| self.to_world(h.tip, tower_rotation))
    }

    /// Whether the body, sitting at angle 0, falls through under this rotation
    pub fn lets_through(&self, tower_rotation: f32) -> bool {
        self.solid.clears_reference(self.world_rotation(tower_rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_arc_invariant_over_many_platforms() {
        let options = GameOptions::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for i in 0..10_000 {
            let p = Platform::generate(i, -3.0, true, &options, &mut rng);
            assert!(p.solid.length >= options.min_arc && p.solid.length <= options.max_arc);
            assert_eq!(p.gap.length, TAU - p.solid.length);
            assert!(p.offset >= 0.0 && p.offset < TAU);
        }
    }

    #[test]
    fn test_first_platform_is_fixed() {
        let options = GameOptions {
            spike_probability: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let p = Platform::generate(0, 0.0, false, &options, &mut rng);
            assert_eq!(p.solid.length, PI);
            assert_eq!(p.offset, FIRST_PLATFORM_OFFSET);
            assert!(p.hazards.is_empty());
            // Always starts with solid ground under the body
            assert!(!p.lets_through(0.0));
        }
    }

    #[test]
    fn test_hazards_strictly_inside_solid_arc() {
        let options = GameOptions {
            spike_probability: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(99);
        for i in 0..500 {
            let p = Platform::generate(i, 0.0, true, &options, &mut rng);
            assert!(!p.hazards.is_empty());
            for h in &p.hazards {
                assert!(h.angle > 0.0 && h.angle < p.solid.length);
            }
        }
    }

    #[test]
    fn test_every_candidate_filled_at_full_probability() {
        let options = GameOptions {
            spike_probability: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let p = Platform::generate(1, 0.0, true, &options, &mut rng);
        let mut expected = 0;
        let mut a = SPIKE_EDGE_MARGIN;
        while a < p.solid.length - SPIKE_EDGE_MARGIN {
            expected += 1;
            a += SPIKE_STEP;
        }
        assert_eq!(p.hazards.len(), expected);
    }

    #[test]
    fn test_no_hazards_at_zero_probability() {
        let options = GameOptions {
            spike_probability: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let p = Platform::generate(1, 0.0, true, &options, &mut rng);
        assert!(p.hazards.is_empty());
    }

    #[test]
    fn test_hazard_tip_world_position() {
        let options = GameOptions::default();
        let mut p = Platform::generate(0, -3.0, false, &options, &mut Pcg32::seed_from_u64(0));
        p.hazards.push(Hazard::new(0.25, &options));
        p.offset = 0.5;

        let tip = p.hazard_tips(0.25).next().unwrap();
        let expected = ring_point(2.6, 1.0, -3.0 + 0.5 + 0.6);
        assert!((tip - expected).length() < 1e-5, "{tip:?} vs {expected:?}");
    }

    #[test]
    fn test_floor_height() {
        let options = GameOptions::default();
        let p = Platform::generate(0, -6.0, false, &options, &mut Pcg32::seed_from_u64(0));
        assert!((p.floor_height(0.4) - (-6.0 + 0.5 + 0.4)).abs() < 1e-6);
    }
}
