//! Game state and the score/timer state machine
//!
//! Everything the frame step and the delayed timers mutate lives in one
//! owned [`GameState`]. Phase changes go through the transition methods
//! here, which bump the generation token so stale timers are dropped.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, FallingBody, spawn_point};
use super::timers::{Generation, TimerFire, TimerKind, Timers};
use super::tower::Tower;
use crate::camera::{CameraMove, CameraRig};
use crate::config::{BodyKind, GameOptions};
use crate::consts::GAME_OVER_BODY_COLOR;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first rotation input
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, waiting for the delayed reset
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Hazard,
    Timeout,
}

/// Audio cues the sound player understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Bounce,
    HazardHit,
    PlatformBreak,
}

/// Something that happened during a frame, for the host to present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// First rotation input; timer budget restored
    Started { time_left: f32 },
    /// Body landed on solid floor
    Bounce { audible: bool },
    /// Body fell through the top platform's gap
    PlatformCleared {
        platform_id: u32,
        score: u32,
        bonus: bool,
        time_left: f32,
    },
    /// One countdown second elapsed
    CountdownTick { time_left: f32 },
    GameOver {
        score: u32,
        time_left: f32,
        cause: GameOverCause,
        camera: CameraMove,
        body_color: u32,
    },
    /// Full reset back to idle
    Reset,
}

impl GameEvent {
    /// Sound to play for this event, if any
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Bounce { audible: true } => Some(SoundCue::Bounce),
            GameEvent::PlatformCleared { .. } => Some(SoundCue::PlatformBreak),
            GameEvent::GameOver { .. } => Some(SoundCue::HazardHit),
            _ => None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub options: GameOptions,
    pub body_kind: BodyKind,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Seconds remaining; only decreases while running
    pub time_left: f32,
    /// Previous floor contact was a clear rather than a bounce
    pub just_cleared: bool,
    /// Bumped on every phase transition
    pub generation: Generation,
    pub timers: Timers,
    pub tower: Tower,
    pub body: Body,
    pub body_color: u32,
    pub camera: CameraRig,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, options: GameOptions, body_kind: BodyKind, aspect: f32) -> Self {
        let options = options.validated();
        let mut rng = Pcg32::seed_from_u64(seed);
        let tower = Tower::build(&options, &mut rng);
        let body = Body::spawn(&body_kind, &options);

        log::info!(
            "New game (seed {}): {} platforms, body {:?}",
            seed,
            tower.len(),
            body_kind
        );

        Self {
            seed,
            body_color: options.ball_color,
            time_left: options.time_left,
            options,
            body_kind,
            rng,
            phase: GamePhase::Idle,
            score: 0,
            just_cleared: false,
            generation: 0,
            timers: Timers::new(),
            tower,
            body,
            camera: CameraRig::new(aspect),
            events: Vec::new(),
        }
    }

    /// Take the events produced so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn next_generation(&mut self) -> Generation {
        self.generation += 1;
        self.generation
    }

    /// Idle -> Running on the first rotation input
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        self.next_generation();
        self.timers.cancel_all();
        self.phase = GamePhase::Running;
        self.time_left = self.options.time_left;
        log::info!("Game started ({}s on the clock)", self.time_left);
        self.events.push(GameEvent::Started {
            time_left: self.time_left,
        });
    }

    /// Body fell through the top platform
    pub fn register_clear(&mut self) {
        let Some(platform_id) = self.tower.clear_top(&self.options, &mut self.rng) else {
            return;
        };

        // First clear starts the visible countdown
        if self.score == 0 && self.phase == GamePhase::Running {
            self.timers.start_countdown(self.generation);
        }

        let bonus = self.just_cleared && self.score > 0;
        if bonus {
            self.time_left += 1.0;
        }
        self.just_cleared = true;
        self.score += 1;

        log::info!(
            "Platform {} cleared, score {}{}",
            platform_id,
            self.score,
            if bonus { " (+1s bonus)" } else { "" }
        );
        self.events.push(GameEvent::PlatformCleared {
            platform_id,
            score: self.score,
            bonus,
            time_left: self.time_left,
        });
    }

    /// Body struck solid floor at the given height
    pub fn register_bounce(&mut self, floor: f32) {
        self.just_cleared = false;
        let mut pos = self.body.position();
        pos.y = floor;
        self.body.set_position(pos);
        self.body.bounce();

        let audible = self.score > 0;
        log::debug!("Bounce at y={:.2}", floor);
        self.events.push(GameEvent::Bounce { audible });
    }

    /// Freeze the run and schedule the reset
    pub fn trigger_game_over(&mut self, cause: GameOverCause, hazard_tip: Option<Vec3>) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let token = self.next_generation();
        // Stops the countdown in the same step as the phase change
        self.timers.cancel_all();
        self.timers.schedule_reset(token);
        self.phase = GamePhase::GameOver;

        let camera = self.camera.pull_back_to(self.body.position(), hazard_tip);
        self.body_color = GAME_OVER_BODY_COLOR;

        log::info!(
            "Game over ({:?}): score {}, {}s left",
            cause,
            self.score,
            self.time_left
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            time_left: self.time_left,
            cause,
            camera,
            body_color: GAME_OVER_BODY_COLOR,
        });
    }

    /// Rebuild everything and return to idle
    pub fn reset(&mut self) {
        self.next_generation();
        self.timers.cancel_all();

        self.score = 0;
        self.time_left = self.options.time_left;
        self.just_cleared = false;
        self.body.respawn(spawn_point(&self.options));
        self.body_color = self.options.ball_color;
        self.camera.reset();
        self.tower.rebuild(&self.options, &mut self.rng);
        self.phase = GamePhase::Idle;

        log::info!("Game reset");
        self.events.push(GameEvent::Reset);
    }

    /// Advance delayed actions and apply the ones still valid
    pub fn advance_timers(&mut self, dt: f32) {
        for fire in self.timers.advance(dt) {
            self.on_timer(fire);
        }
    }

    /// Apply one delayed action, ignoring it if its run is over
    pub fn on_timer(&mut self, fire: TimerFire) {
        if fire.token != self.generation {
            log::debug!(
                "Dropping stale {:?} timer (token {}, now {})",
                fire.kind,
                fire.token,
                self.generation
            );
            return;
        }

        match fire.kind {
            TimerKind::Countdown if self.phase == GamePhase::Running => {
                self.time_left -= 1.0;
                self.events.push(GameEvent::CountdownTick {
                    time_left: self.time_left,
                });
            }
            TimerKind::Reset if self.phase == GamePhase::GameOver => self.reset(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> GameState {
        GameState::new(42, GameOptions::default(), BodyKind::Ball, 1.5)
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 30.0);
        assert_eq!(state.tower.len(), 10);
        assert_eq!(state.body.position(), spawn_point(&state.options));
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut state = new_state();
        state.time_left = 3.0;
        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_left, 30.0);
        let generation = state.generation;
        state.start();
        assert_eq!(state.generation, generation);
    }

    #[test]
    fn test_clear_and_bonus_sequence() {
        let mut state = new_state();
        state.start();

        state.register_clear();
        assert_eq!(state.score, 1);
        assert_eq!(state.time_left, 30.0);
        assert!(state.timers.is_active(TimerKind::Countdown));

        // Consecutive clear earns a bonus second
        state.register_clear();
        assert_eq!(state.score, 2);
        assert_eq!(state.time_left, 31.0);

        // A bounce breaks the chain
        state.register_bounce(0.0);
        state.register_clear();
        assert_eq!(state.score, 3);
        assert_eq!(state.time_left, 31.0);
    }

    #[test]
    fn test_countdown_ticks_while_running() {
        let mut state = new_state();
        state.start();
        state.register_clear();
        state.advance_timers(1.0);
        assert_eq!(state.time_left, 29.0);
        assert!(state
            .drain_events()
            .contains(&GameEvent::CountdownTick { time_left: 29.0 }));
    }

    #[test]
    fn test_game_over_cancels_countdown() {
        let mut state = new_state();
        state.start();
        state.register_clear();
        state.trigger_game_over(GameOverCause::Hazard, None);
        assert!(!state.timers.is_active(TimerKind::Countdown));
        assert!(state.timers.is_active(TimerKind::Reset));
        state.advance_timers(2.0);
        assert_eq!(state.time_left, 30.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.body_color, GAME_OVER_BODY_COLOR);
    }

    #[test]
    fn test_stale_countdown_is_dropped() {
        let mut state = new_state();
        state.start();
        state.register_clear();
        let stale = TimerFire {
            kind: TimerKind::Countdown,
            token: state.generation,
        };
        state.trigger_game_over(GameOverCause::Timeout, None);
        state.reset();
        state.on_timer(stale);
        assert_eq!(state.time_left, 30.0);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_reset_after_delay() {
        let mut state = new_state();
        state.start();
        state.tower.rotate(1.0);
        state.register_clear();
        state.register_clear();
        state.trigger_game_over(GameOverCause::Hazard, Some(Vec3::X));
        state.advance_timers(1.5);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.advance_timers(1.6);

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.tower.len(), state.options.total_platforms);
        assert!(state.tower.graveyard.is_empty());
        assert_eq!(state.tower.rotation, 0.0);
        assert_eq!(state.body.velocity(), 0.0);
        assert_eq!(state.body.position(), spawn_point(&state.options));
        assert_eq!(state.body_color, state.options.ball_color);
        assert!(state.camera.pull_back.is_none());
        // Reset never restarts the countdown
        assert!(!state.timers.is_active(TimerKind::Countdown));
        assert!(state.drain_events().contains(&GameEvent::Reset));
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(GameEvent::Bounce { audible: false }.cue(), None);
        assert_eq!(GameEvent::Bounce { audible: true }.cue(), Some(SoundCue::Bounce));
        assert_eq!(GameEvent::Reset.cue(), None);
    }
}
