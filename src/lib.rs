//! Blink Flap - a hands-free side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Simulation (bird physics, pipes, collisions, game state)
//! - `gesture`: Eye-blink / head-nod debouncing
//! - `session`: Host loop, command marshalling and gesture dispatch
//! - `clock`: Monotonic time source and frame deltas
//! - `settings`: Data-driven tuning

pub mod clock;
pub mod gesture;
pub mod session;
pub mod settings;
pub mod sim;

pub use gesture::{FaceSample, Gesture, GestureDebouncer};
pub use session::{Command, Session, Snapshot};
pub use settings::{DriverSettings, GestureTuning, PhysicsTuning, Settings};
pub use sim::{GameEvent, GamePhase, Simulation};

/// Game configuration constants
pub mod consts {
    /// Frame rate the physics constants were tuned against
    pub const TIME_SCALE: f32 = 60.0;

    /// Downward acceleration per reference frame
    pub const GRAVITY: f32 = 0.4;
    /// Vertical velocity set by a flap (negative = up)
    pub const FLAP_VELOCITY: f32 = -9.0;

    /// Bird sprite extents
    pub const BIRD_WIDTH: f32 = 34.0;
    pub const BIRD_HEIGHT: f32 = 24.0;
    /// Reference frames each animation frame is held for
    pub const BIRD_FRAME_DELAY: u32 = 3;
    /// Up-flap, mid-flap, down-flap
    pub const BIRD_FRAME_COUNT: u32 = 3;

    /// Pipe sprite width
    pub const PIPE_WIDTH: f32 = 52.0;
    /// Vertical clearance between top and bottom pipe
    pub const PIPE_GAP: f32 = 400.0;
    /// Horizontal scroll per reference frame
    pub const PIPE_SPEED: f32 = 12.0;
    /// Ticks between pipe spawns (~1s at 60 Hz)
    pub const SPAWN_INTERVAL: u32 = 70;
    /// Pipes appear this far past the right edge
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Smallest span the gap centre is drawn from when the viewport is tight
    pub const MIN_GAP_CENTER_SPAN: f32 = 1.0;

    /// Eye-open probability below which an eye counts as closed
    pub const BLINK_CLOSE_THRESHOLD: f32 = 0.4;
    /// Head pitch (degrees) above which a sample counts as a nod
    pub const NOD_THRESHOLD_DEG: f32 = 15.0;

    /// Driver pacing (~60 fps)
    pub const FRAME_INTERVAL_MS: u64 = 16;
    /// Largest dt fed to the simulation in one frame
    pub const MAX_FRAME_DT: f32 = 0.1;
}
