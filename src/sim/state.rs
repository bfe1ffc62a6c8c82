//! Game state and the READY / RUNNING / GAME_OVER machine
//!
//! Everything that changes during play lives on `Simulation`. Only the
//! methods here and `tick` mutate it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::pipe::PipeField;
use super::rect::Rect;
use crate::settings::PhysicsTuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Ready,
    /// Active gameplay
    Running,
    /// Run ended; only `start` leaves this phase
    GameOver,
}

/// Something the host or UI may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Scored { score: u32 },
    Paused,
    Resumed,
    /// Fired once per RUNNING -> GAME_OVER edge
    GameOver { score: u32 },
}

/// The whole simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(super) phase: GamePhase,
    /// Orthogonal to `phase`; only meaningful while running
    pub(super) paused: bool,
    pub(super) score: u32,
    pub(super) bird: Bird,
    pub(super) pipes: PipeField,
    pub(super) view_width: f32,
    pub(super) view_height: f32,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
    seed: u64,
}

impl Simulation {
    /// Create a simulation in the Ready phase
    pub fn new(tuning: &PhysicsTuning, seed: u64, view_width: f32, view_height: f32) -> Self {
        let view_width = viewport_dim(view_width).unwrap_or(0.0);
        let view_height = viewport_dim(view_height).unwrap_or(0.0);
        let mut bird = Bird::new(tuning);
        bird.reset(view_width, view_height);
        Self {
            phase: GamePhase::Ready,
            paused: false,
            score: 0,
            bird,
            pipes: PipeField::new(tuning),
            view_width,
            view_height,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            seed,
        }
    }

    /// Begin a fresh run (from Ready or GameOver; also restarts a live run)
    pub fn start(&mut self) {
        self.pipes.clear();
        self.pipes.preload_spawn();
        self.score = 0;
        self.bird.reset(self.view_width, self.view_height);
        self.paused = false;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        log::info!(
            "Game started ({}x{} viewport)",
            self.view_width,
            self.view_height
        );
    }

    /// Flap the bird; ignored unless running
    pub fn apply_flap(&mut self) {
        if self.phase != GamePhase::Running {
            log::debug!("Flap ignored in {:?}", self.phase);
            return;
        }
        self.bird.flap();
    }

    /// Freeze physics while running
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running && !self.paused {
            self.paused = true;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Running && self.paused {
            self.paused = false;
            self.events.push(GameEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// New viewport; applies to the ground line and future spawns
    ///
    /// Non-finite sizes are ignored and negative ones clamp to zero.
    pub fn resize(&mut self, view_width: f32, view_height: f32) {
        match (viewport_dim(view_width), viewport_dim(view_height)) {
            (Some(width), Some(height)) => {
                self.view_width = width;
                self.view_height = height;
            }
            _ => log::warn!("Ignoring non-finite viewport {view_width}x{view_height}"),
        }
    }

    /// Advance by `dt` seconds (see `tick`)
    pub fn advance(&mut self, dt: f32) {
        super::tick::tick(self, dt);
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.view_width, self.view_height)
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn actor_bounds(&self) -> Rect {
        self.bird.bounds()
    }

    /// (top, bottom) rectangles of every live pipe
    pub fn obstacle_bounds(&self) -> Vec<(Rect, Rect)> {
        self.pipes.bounds()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn viewport_dim(value: f32) -> Option<f32> {
    value.is_finite().then(|| value.max(0.0))
}
