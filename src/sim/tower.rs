//! The endless tower: active platforms plus the retiring graveyard

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::config::GameOptions;
use crate::consts::RETIRE_FADE_DURATION;

/// A cleared platform playing its exit animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetiringPlatform {
    pub platform: Platform,
    /// Seconds since the platform was cleared
    pub elapsed: f32,
}

impl RetiringPlatform {
    /// Fade progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / RETIRE_FADE_DURATION).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= RETIRE_FADE_DURATION
    }
}

/// Ordered platform stack around the column
///
/// `active[0]` is always the platform the body has to clear next; levels
/// descend by one platform gap per index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub active: VecDeque<Platform>,
    pub graveyard: Vec<RetiringPlatform>,
    /// Shared rotation of every active platform (radians)
    pub rotation: f32,
    /// Rotation of the graveyard group; follows keyboard rotation only
    pub graveyard_rotation: f32,
    /// Vertical offset of the column, lowered once per clear
    pub column_y: f32,
    next_id: u32,
}

impl Tower {
    /// Build a fresh tower: a hazard-free first platform, then random ones
    pub fn build<R: Rng>(options: &GameOptions, rng: &mut R) -> Self {
        let mut tower = Self {
            active: VecDeque::with_capacity(options.total_platforms),
            graveyard: Vec::new(),
            rotation: 0.0,
            graveyard_rotation: 0.0,
            column_y: 0.0,
            next_id: 1,
        };
        tower.fill(options, rng);
        tower
    }

    /// Discard everything and build again from scratch
    pub fn rebuild<R: Rng>(&mut self, options: &GameOptions, rng: &mut R) {
        self.active.clear();
        self.graveyard.clear();
        self.rotation = 0.0;
        self.graveyard_rotation = 0.0;
        self.column_y = 0.0;
        self.fill(options, rng);
    }

    fn fill<R: Rng>(&mut self, options: &GameOptions, rng: &mut R) {
        for i in 0..options.total_platforms {
            let level = -options.platform_gap * i as f32;
            let id = self.next_platform_id();
            self.active
                .push_back(Platform::generate(id, level, i > 0, options, rng));
        }
        log::debug!("Tower built with {} platforms", self.active.len());
    }

    fn next_platform_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The platform the body has to clear next
    pub fn top(&self) -> Option<&Platform> {
        self.active.front()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Keyboard rotation: spins the active tower and the graveyard together
    pub fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
        self.graveyard_rotation += delta;
    }

    /// Drag rotation: spins only the active tower
    pub fn drag(&mut self, delta: f32) {
        self.rotation += delta;
    }

    /// Retire the top platform and append a new one at the bottom
    ///
    /// Returns the id of the retired platform.
    pub fn clear_top<R: Rng>(&mut self, options: &GameOptions, rng: &mut R) -> Option<u32> {
        let cleared = self.active.pop_front()?;
        let cleared_id = cleared.id;

        let lowest = self
            .active
            .back()
            .map(|p| p.level)
            .unwrap_or(cleared.level);

        self.graveyard.push(RetiringPlatform {
            platform: cleared,
            elapsed: 0.0,
        });
        self.column_y -= options.platform_gap;

        let id = self.next_platform_id();
        let platform = Platform::generate(id, lowest - options.platform_gap, true, options, rng);
        self.active.push_back(platform);

        Some(cleared_id)
    }

    /// Advance graveyard fades and drop finished ones
    pub fn update_graveyard(&mut self, dt: f32) {
        for retiring in &mut self.graveyard {
            retiring.elapsed += dt;
        }
        self.graveyard.retain(|r| !r.is_done());
    }
}
