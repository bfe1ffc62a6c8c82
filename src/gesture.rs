//! Blink and nod recognition
//!
//! Turns the face tracker's per-frame eye-openness and head-pitch readings
//! into discrete gestures. One physical blink (eyes closed across any number
//! of frames) yields one `Blink`; eyes must be seen open again before the
//! next one can fire.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::settings::GestureTuning;

/// A discrete gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gesture {
    Blink,
    Nod,
}

/// One face-tracker result
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceSample {
    /// Probability the left eye is open (None = not detected)
    pub left_eye_open: Option<f32>,
    pub right_eye_open: Option<f32>,
    /// Head pitch in degrees (None = not detected)
    pub head_pitch_deg: Option<f32>,
    /// Monotonic capture time
    pub timestamp: Duration,
}

impl FaceSample {
    /// Sample with both eyes at the same openness and no pose
    pub fn eyes(open: f32, timestamp: Duration) -> Self {
        Self {
            left_eye_open: Some(open),
            right_eye_open: Some(open),
            head_pitch_deg: None,
            timestamp,
        }
    }

    pub fn with_pitch(mut self, pitch_deg: f32) -> Self {
        self.head_pitch_deg = Some(pitch_deg);
        self
    }
}

/// Unknown eyes read below every threshold
const UNKNOWN_EYE: f32 = -1.0;

/// Blink/nod debouncer
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    tuning: GestureTuning,
    /// A blink may be reported
    blink_armed: bool,
    /// Last time a blink fired
    last_blink: Option<Duration>,
    /// Only consulted when the nod latch is on
    nod_armed: bool,
}

impl GestureDebouncer {
    pub fn new(tuning: &GestureTuning) -> Self {
        Self {
            tuning: *tuning,
            blink_armed: true,
            last_blink: None,
            nod_armed: true,
        }
    }

    pub fn is_blink_armed(&self) -> bool {
        self.blink_armed
    }

    /// Back to the initial armed state
    pub fn reset(&mut self) {
        self.blink_armed = true;
        self.last_blink = None;
        self.nod_armed = true;
    }

    /// Feed one sample, returning any gestures it completes
    pub fn observe(&mut self, sample: &FaceSample) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        if self.observe_blink(sample) {
            gestures.push(Gesture::Blink);
        }
        if self.observe_nod(sample) {
            gestures.push(Gesture::Nod);
        }
        gestures
    }

    fn observe_blink(&mut self, sample: &FaceSample) -> bool {
        let left = sample.left_eye_open.unwrap_or(UNKNOWN_EYE);
        let right = sample.right_eye_open.unwrap_or(UNKNOWN_EYE);
        let close = self.tuning.close_threshold;
        // Either eye is enough; tolerates one eye being occluded
        let closed = left < close || right < close;

        if !closed {
            let reopen = self.tuning.reopen_threshold.max(close);
            if left >= reopen && right >= reopen {
                self.blink_armed = true;
            }
            return false;
        }

        if !self.blink_armed {
            return false;
        }
        self.blink_armed = false;

        let in_cooldown = match self.last_blink {
            Some(last) if self.tuning.blink_cooldown_ms > 0 => {
                sample.timestamp.saturating_sub(last)
                    < Duration::from_millis(self.tuning.blink_cooldown_ms)
            }
            _ => false,
        };
        if in_cooldown {
            log::debug!("Blink swallowed by cooldown at {:?}", sample.timestamp);
            return false;
        }
        self.last_blink = Some(sample.timestamp);
        log::debug!("Blink: left={left:.2} right={right:.2}");
        true
    }

    fn observe_nod(&mut self, sample: &FaceSample) -> bool {
        let Some(pitch) = sample.head_pitch_deg else {
            return false;
        };
        let over = pitch > self.tuning.nod_threshold_deg;

        if !self.tuning.nod_latch {
            return over;
        }
        if !over {
            self.nod_armed = true;
            return false;
        }
        if self.nod_armed {
            self.nod_armed = false;
            log::debug!("Nod: pitch={pitch:.1}");
            return true;
        }
        false
    }
}
