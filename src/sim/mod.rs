//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (same seed, same pipe layout)
//! - `dt` comes from the host; no clocks are read here
//! - No rendering, camera or platform dependencies

pub mod bird;
pub mod pipe;
pub mod rect;
pub mod state;
pub mod tick;

pub use bird::Bird;
pub use pipe::{Pipe, PipeField, gap_center_range};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, Simulation};
pub use tick::tick;
