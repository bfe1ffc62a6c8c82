//! Blink Flap entry point
//!
//! Runs a headless session with a scripted face tracker: the "camera" blinks
//! on a fixed rhythm and the game plays itself for a while.
//!
//! Usage: `blink-flap [seconds]` (settings from `BLINK_FLAP_SETTINGS`)

use std::thread;
use std::time::{Duration, Instant};

use blink_flap::gesture::FaceSample;
use blink_flap::sim::GameEvent;
use blink_flap::{Session, Settings};

/// Camera frame period (~30 fps)
const FRAME_PERIOD: Duration = Duration::from_millis(33);
/// Time between scripted blinks
const BLINK_PERIOD_MS: u128 = 420;
/// How long each scripted blink keeps the eyes closed
const BLINK_CLOSED_MS: u128 = 70;

/// Stand-in for the face tracker: eye openness over time
fn scripted_openness(elapsed: Duration) -> f32 {
    if elapsed.as_millis() % BLINK_PERIOD_MS < BLINK_CLOSED_MS {
        0.05
    } else {
        0.95
    }
}

fn main() {
    env_logger::init();
    log::info!("Blink Flap (headless) starting...");

    let seconds: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let settings = Settings::load();
    let mut session = Session::spawn(&settings);
    let analyzer = session.spawn_analyzer(|frame: (Duration, f32)| {
        let (timestamp, openness) = frame;
        Some(FaceSample::eyes(openness, timestamp).with_pitch(0.0))
    });

    session.start();

    let began = Instant::now();
    let run_for = Duration::from_secs(seconds);
    let mut best = 0;
    let mut games = 0;
    while began.elapsed() < run_for {
        let elapsed = began.elapsed();
        analyzer.offer((elapsed, scripted_openness(elapsed)));

        for event in session.events().try_iter() {
            match event {
                GameEvent::Started => games += 1,
                GameEvent::Scored { score } => log::info!("Score: {score}"),
                GameEvent::GameOver { score } => {
                    best = best.max(score);
                    println!("Game {games} over: {score}");
                }
                GameEvent::Paused | GameEvent::Resumed => {}
            }
        }
        thread::sleep(FRAME_PERIOD);
    }

    let dropped = analyzer.dropped();
    let analyzed = analyzer.stop();
    let final_score = session.stop().map(|sim| sim.score()).unwrap_or(0);
    best = best.max(final_score);

    log::info!("Analyzed {analyzed} frames, {dropped} dropped");
    println!("Games played: {games}, best score: {best}");
}
