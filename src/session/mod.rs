//! Host loop
//!
//! The driver thread is the only owner of the `Simulation`. Everything else
//! (UI buttons, the gesture pipeline) talks to it through a command channel,
//! and reads it through events and per-frame snapshots.

pub mod analyzer;
pub mod dispatch;
pub mod latest;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub use analyzer::Analyzer;
pub use dispatch::{Command, apply_command, dispatch_gesture};
pub use latest::LatestFrame;

use crate::clock::{Clock, FrameTimer, MonotonicClock};
use crate::gesture::{FaceSample, GestureDebouncer};
use crate::settings::{DriverSettings, NodAction, Settings};
use crate::sim::{GameEvent, GamePhase, Rect, Simulation};

/// Read-only view of one frame, for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub paused: bool,
    pub score: u32,
    pub bird: Rect,
    pub bird_frame: u32,
    pub pipes: Vec<(Rect, Rect)>,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            phase: sim.phase(),
            paused: sim.is_paused(),
            score: sim.score(),
            bird: sim.actor_bounds(),
            bird_frame: sim.bird().frame_index(),
            pipes: sim.obstacle_bounds(),
        }
    }
}

/// Producer side of the gesture pipeline
///
/// Owns the debouncer, so debouncing runs on whatever thread feeds samples.
/// Gestures are marshalled to the driver as commands.
#[derive(Debug)]
pub struct GestureFeed {
    debouncer: GestureDebouncer,
    commands: Sender<Command>,
    running: Arc<AtomicBool>,
}

impl GestureFeed {
    /// Debounce `sample` and forward its gestures
    ///
    /// Returns false once the session has stopped; the sample is discarded.
    pub fn submit(&mut self, sample: &FaceSample) -> bool {
        if !self.running.load(Ordering::Acquire) {
            return false;
        }
        for gesture in self.debouncer.observe(sample) {
            if self.commands.send(Command::Gesture(gesture)).is_err() {
                return false;
            }
        }
        true
    }

    pub fn is_attached(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// A running game session
pub struct Session {
    settings: Settings,
    commands: Sender<Command>,
    events: Receiver<GameEvent>,
    snapshot: Arc<Mutex<Snapshot>>,
    running: Arc<AtomicBool>,
    driver: Option<JoinHandle<Simulation>>,
}

impl Session {
    /// Spawn the driver using the wall clock
    pub fn spawn(settings: &Settings) -> Self {
        Self::spawn_with_clock(settings, MonotonicClock::new())
    }

    pub fn spawn_with_clock<C: Clock + 'static>(settings: &Settings, clock: C) -> Self {
        let driver_settings = settings.driver;
        let seed = driver_settings.seed.unwrap_or_else(clock_seed);
        let sim = Simulation::new(
            &settings.physics,
            seed,
            driver_settings.viewport_width,
            driver_settings.viewport_height,
        );

        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let snapshot = Arc::new(Mutex::new(Snapshot::capture(&sim)));
        let running = Arc::new(AtomicBool::new(true));

        let driver = Driver {
            sim,
            commands: command_rx,
            events: event_tx,
            snapshot: Arc::clone(&snapshot),
            running: Arc::clone(&running),
            timer: FrameTimer::with_max_dt(driver_settings.max_frame_dt),
            settings: driver_settings,
            nod_action: settings.gesture.nod_action,
        };
        let handle = thread::Builder::new()
            .name("blink-flap-driver".into())
            .spawn(move || driver.run(clock))
            .ok();
        if handle.is_none() {
            log::error!("Failed to spawn driver thread");
            running.store(false, Ordering::Release);
        }

        log::info!("Session started with seed {seed}");
        Self {
            settings: *settings,
            commands: command_tx,
            events: event_rx,
            snapshot,
            running,
            driver: handle,
        }
    }

    /// Queue a command for the driver; false once stopped
    pub fn send(&self, command: Command) -> bool {
        self.is_running() && self.commands.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(Command::Start)
    }

    /// Events emitted by the simulation, in order
    pub fn events(&self) -> &Receiver<GameEvent> {
        &self.events
    }

    /// Latest published frame
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A new gesture producer attached to this session
    pub fn gesture_feed(&self) -> GestureFeed {
        GestureFeed {
            debouncer: GestureDebouncer::new(&self.settings.gesture),
            commands: self.commands.clone(),
            running: Arc::clone(&self.running),
        }
    }

    /// Run `analyze` on a dedicated thread, fed latest-wins
    pub fn spawn_analyzer<F, A>(&self, analyze: A) -> Analyzer<F>
    where
        F: Send + 'static,
        A: FnMut(F) -> Option<FaceSample> + Send + 'static,
    {
        Analyzer::spawn(self.gesture_feed(), analyze)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the driver and detach gesture producers
    ///
    /// Returns the final simulation state the first time it is called.
    pub fn stop(&mut self) -> Option<Simulation> {
        self.running.store(false, Ordering::Release);
        let handle = self.driver.take()?;
        match handle.join() {
            Ok(sim) => {
                log::info!("Session stopped with score {}", sim.score());
                Some(sim)
            }
            Err(_) => {
                log::error!("Driver thread panicked");
                None
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Driver {
    sim: Simulation,
    commands: Receiver<Command>,
    events: Sender<GameEvent>,
    snapshot: Arc<Mutex<Snapshot>>,
    running: Arc<AtomicBool>,
    timer: FrameTimer,
    settings: DriverSettings,
    nod_action: NodAction,
}

impl Driver {
    fn run<C: Clock>(mut self, clock: C) -> Simulation {
        let frame_interval = Duration::from_millis(self.settings.frame_interval_ms);
        while self.running.load(Ordering::Acquire) {
            self.frame(clock.now());
            thread::sleep(frame_interval);
        }
        self.sim
    }

    fn frame(&mut self, now: Duration) {
        loop {
            match self.commands.try_recv() {
                Ok(command) => apply_command(&mut self.sim, command, self.nod_action),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running.store(false, Ordering::Release);
                    return;
                }
            }
        }

        let dt = self.timer.delta_seconds(now);
        self.sim.advance(dt);

        for event in self.sim.drain_events() {
            // Nobody listening is fine
            let _ = self.events.send(event);
        }

        *self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Snapshot::capture(&self.sim);
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
