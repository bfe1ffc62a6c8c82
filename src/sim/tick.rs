//! Per-frame simulation step
//!
//! Bird first, then pipes (spawn, scroll, score, evict), then the game-over
//! checks against the bird's new position.

use super::state::{GameEvent, GamePhase, Simulation};

/// Advance the simulation by `dt` seconds
///
/// Does nothing outside the Running phase or while paused.
pub fn tick(sim: &mut Simulation, dt: f32) {
    if sim.phase != GamePhase::Running || sim.paused {
        return;
    }

    sim.bird.advance(dt);

    let actor_x = sim.bird.pos.x;
    let scored = sim.pipes.advance(
        dt,
        actor_x,
        sim.view_width,
        sim.view_height,
        &mut sim.rng,
    );
    for _ in 0..scored {
        sim.score += 1;
        sim.events.push(GameEvent::Scored { score: sim.score });
    }

    let bounds = sim.bird.bounds();
    let hit_ground = bounds.bottom() >= sim.view_height;
    if hit_ground || sim.pipes.any_collision(&bounds) {
        sim.phase = GamePhase::GameOver;
        sim.events.push(GameEvent::GameOver { score: sim.score });
        log::info!(
            "Game over ({}) with score {}",
            if hit_ground { "ground" } else { "pipe" },
            sim.score
        );
    }
}
