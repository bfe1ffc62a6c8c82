//! Mapping commands and gestures onto the simulation
//!
//! A blink means "restart" after a game over and "flap" otherwise; the
//! gesture itself carries no intent, the current phase decides.

use serde::{Deserialize, Serialize};

use crate::gesture::Gesture;
use crate::settings::NodAction;
use crate::sim::{GamePhase, Simulation};

/// A write to the simulation, executed on the driver thread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Flap,
    Pause,
    Resume,
    Resize { width: f32, height: f32 },
    Gesture(Gesture),
}

/// Apply a gesture according to the current phase
pub fn dispatch_gesture(sim: &mut Simulation, gesture: Gesture, nod_action: NodAction) {
    match gesture {
        Gesture::Blink => {
            if sim.phase() == GamePhase::GameOver {
                log::debug!("Blink -> restart");
                sim.start();
            } else {
                log::debug!("Blink -> flap");
                sim.apply_flap();
            }
        }
        Gesture::Nod => match nod_action {
            NodAction::Ignore => {}
            NodAction::TogglePause => sim.toggle_pause(),
        },
    }
}

/// Apply one command
pub fn apply_command(sim: &mut Simulation, command: Command, nod_action: NodAction) {
    match command {
        Command::Start => sim.start(),
        Command::Flap => sim.apply_flap(),
        Command::Pause => sim.pause(),
        Command::Resume => sim.resume(),
        Command::Resize { width, height } => sim.resize(width, height),
        Command::Gesture(gesture) => dispatch_gesture(sim, gesture, nod_action),
    }
}
