//! Falling body physics
//!
//! Only the vertical axis is simulated. The body sits at a fixed point in
//! front of the column; the tower rotates around it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{BodyKind, CharacterKind, GameOptions};
use crate::consts::BODY_SPAWN_Y;

/// Shared physics contract for every falling body variant
pub trait FallingBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, pos: Vec3);
    /// Signed vertical speed (units/second, positive is up)
    fn velocity(&self) -> f32;
    fn set_velocity(&mut self, vel: f32);
    fn radius(&self) -> f32;

    /// Explicit Euler step: velocity first, then position
    fn advance(&mut self, dt: f32);

    /// Set the velocity to the bounce impulse regardless of current motion
    fn bounce(&mut self);

    /// Move back to the spawn point at rest
    fn respawn(&mut self, spawn: Vec3) {
        self.set_position(spawn);
        self.set_velocity(0.0);
    }
}

/// Constants every body integrates with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPhysics {
    pub gravity: f32,
    pub bounce_impulse: f32,
}

impl BodyPhysics {
    pub fn from_options(options: &GameOptions) -> Self {
        Self {
            gravity: options.gravity,
            bounce_impulse: options.bounce_impulse,
        }
    }
}

/// Spawn point for the given options
pub fn spawn_point(options: &GameOptions) -> Vec3 {
    Vec3::new(0.0, BODY_SPAWN_Y, options.body_ring_radius())
}

/// Plain sphere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: f32,
    pub radius: f32,
    pub physics: BodyPhysics,
}

impl Ball {
    pub fn new(options: &GameOptions) -> Self {
        Self {
            pos: spawn_point(options),
            vel: 0.0,
            radius: options.ball_radius,
            physics: BodyPhysics::from_options(options),
        }
    }
}

impl FallingBody for Ball {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    fn velocity(&self) -> f32 {
        self.vel
    }

    fn set_velocity(&mut self, vel: f32) {
        self.vel = vel;
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn advance(&mut self, dt: f32) {
        self.vel -= self.physics.gravity * dt;
        self.pos.y += self.vel * dt;
    }

    fn bounce(&mut self) {
        self.vel = self.physics.bounce_impulse;
    }
}

/// Tumble rate while falling (radians per second)
const CHARACTER_TUMBLE_RATE: f32 = 2.0;

/// Animated character standing in for the ball
///
/// Physics are identical to [`Ball`]. The extra fields only feed the
/// renderer: how to draw it, how far it has tumbled, and which clip to play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub pos: Vec3,
    pub vel: f32,
    pub radius: f32,
    pub physics: BodyPhysics,
    pub appearance: CharacterKind,
    pub model: Option<String>,
    /// Accumulated rotation around X while falling
    pub tumble: f32,
    pub bounces: u32,
    /// Animation clip requested since the renderer last looked
    pub pending_animation: Option<String>,
}

impl Character {
    pub const BOUNCE_ANIMATION: &'static str = "bounce";

    pub fn new(options: &GameOptions, appearance: CharacterKind, model: Option<String>) -> Self {
        Self {
            pos: spawn_point(options),
            vel: 0.0,
            radius: options.ball_radius,
            physics: BodyPhysics::from_options(options),
            appearance,
            model,
            tumble: 0.0,
            bounces: 0,
            pending_animation: None,
        }
    }

    /// Hand the requested clip to the renderer
    pub fn take_animation(&mut self) -> Option<String> {
        self.pending_animation.take()
    }

    /// Switch to the procedural look (model failed to load)
    pub fn fall_back_to_procedural(&mut self) {
        log::warn!(
            "Character model {:?} unavailable, using procedural character",
            self.model
        );
        self.appearance = CharacterKind::Procedural;
        self.model = None;
    }
}

impl FallingBody for Character {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    fn velocity(&self) -> f32 {
        self.vel
    }

    fn set_velocity(&mut self, vel: f32) {
        self.vel = vel;
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn advance(&mut self, dt: f32) {
        self.vel -= self.physics.gravity * dt;
        self.pos.y += self.vel * dt;

        if self.vel < 0.0 {
            self.tumble += dt * CHARACTER_TUMBLE_RATE;
        }
    }

    fn bounce(&mut self) {
        self.vel = self.physics.bounce_impulse;
        self.bounces += 1;
        self.pending_animation = Some(Self::BOUNCE_ANIMATION.to_string());
        log::debug!("Character bounced ({} total)", self.bounces);
    }

    fn respawn(&mut self, spawn: Vec3) {
        self.pos = spawn;
        self.vel = 0.0;
        self.tumble = 0.0;
        self.pending_animation = None;
    }
}

/// The body in play, whichever variant was configured
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Body {
    Ball(Ball),
    Character(Character),
}

impl Body {
    pub fn spawn(kind: &BodyKind, options: &GameOptions) -> Self {
        match kind.clone().resolved() {
            BodyKind::Ball => Body::Ball(Ball::new(options)),
            BodyKind::Character { kind, model } => {
                Body::Character(Character::new(options, kind, model))
            }
        }
    }

    fn inner(&self) -> &dyn FallingBody {
        match self {
            Body::Ball(b) => b,
            Body::Character(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FallingBody {
        match self {
            Body::Ball(b) => b,
            Body::Character(c) => c,
        }
    }
}

impl FallingBody for Body {
    fn position(&self) -> Vec3 {
        self.inner().position()
    }

    fn set_position(&mut self, pos: Vec3) {
        self.inner_mut().set_position(pos);
    }

    fn velocity(&self) -> f32 {
        self.inner().velocity()
    }

    fn set_velocity(&mut self, vel: f32) {
        self.inner_mut().set_velocity(vel);
    }

    fn radius(&self) -> f32 {
        self.inner().radius()
    }

    fn advance(&mut self, dt: f32) {
        self.inner_mut().advance(dt);
    }

    fn bounce(&mut self) {
        self.inner_mut().bounce();
    }

    fn respawn(&mut self, spawn: Vec3) {
        self.inner_mut().respawn(spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_bodies() -> Vec<Body> {
        let options = GameOptions::default();
        vec![
            Body::spawn(&BodyKind::Ball, &options),
            Body::spawn(
                &BodyKind::Character {
                    kind: CharacterKind::Procedural,
                    model: None,
                },
                &options,
            ),
        ]
    }

    #[test]
    fn test_spawn_position() {
        for body in test_bodies() {
            let pos = body.position();
            assert_eq!(pos.x, 0.0);
            assert_eq!(pos.y, BODY_SPAWN_Y);
            assert!((pos.z - 2.6).abs() < 1e-6);
            assert_eq!(body.velocity(), 0.0);
        }
    }

    #[test]
    fn test_bounce_sets_exact_impulse() {
        for mut body in test_bodies() {
            body.set_velocity(-13.0);
            body.bounce();
            assert_eq!(body.velocity(), 6.0);
            body.set_velocity(42.0);
            body.bounce();
            assert_eq!(body.velocity(), 6.0);
        }
    }

    #[test]
    fn test_bounce_keeps_horizontal_position() {
        for mut body in test_bodies() {
            let before = body.position();
            body.bounce();
            let after = body.position();
            assert_eq!(before.x, after.x);
            assert_eq!(before.z, after.z);
        }
    }

    #[test]
    fn test_character_tumbles_and_requests_animation() {
        let options = GameOptions::default();
        let mut c = Character::new(&options, CharacterKind::Procedural, None);
        c.advance(0.5);
        assert!(c.tumble > 0.0);
        c.bounce();
        assert_eq!(c.bounces, 1);
        assert_eq!(c.take_animation().as_deref(), Some("bounce"));
        assert_eq!(c.take_animation(), None);

        // Rising: no tumble
        let before = c.tumble;
        c.advance(0.01);
        assert_eq!(c.tumble, before);

        c.respawn(spawn_point(&options));
        assert_eq!(c.tumble, 0.0);
        assert_eq!(c.vel, 0.0);
    }

    #[test]
    fn test_model_kind_without_model_spawns_procedural() {
        let body = Body::spawn(
            &BodyKind::Character {
                kind: CharacterKind::Gltf,
                model: None,
            },
            &GameOptions::default(),
        );
        match body {
            Body::Character(c) => assert_eq!(c.appearance, CharacterKind::Procedural),
            Body::Ball(_) => panic!("expected character"),
        }
    }

    proptest! {
        #[test]
        fn prop_euler_integration_matches_formula(
            v0 in -20.0f32..20.0,
            dts in prop::collection::vec(0.0f32..0.1, 0..40),
        ) {
            let options = GameOptions::default();
            let mut ball = Ball::new(&options);
            ball.vel = v0;

            let mut expected_vel = v0;
            let mut expected_y = ball.pos.y;
            for &dt in &dts {
                ball.advance(dt);
                expected_vel -= options.gravity * dt;
                expected_y += expected_vel * dt;
            }

            let sum: f32 = dts.iter().sum();
            prop_assert!((ball.vel - (v0 - options.gravity * sum)).abs() < 1e-3);
            prop_assert_eq!(ball.vel, expected_vel);
            prop_assert_eq!(ball.pos.y, expected_y);
        }
    }
}
