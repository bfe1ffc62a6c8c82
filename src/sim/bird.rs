//! The bird: vertical physics and collision shape
//!
//! x is fixed after `reset`; the scrolling pipes provide horizontal motion.

use glam::Vec2;

use super::rect::Rect;
use crate::settings::PhysicsTuning;

/// The player-controlled bird
#[derive(Debug, Clone)]
pub struct Bird {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    /// Vertical velocity (positive = down), units per reference frame
    pub vel_y: f32,
    pub size: Vec2,
    gravity: f32,
    flap_velocity: f32,
    time_scale: f32,
    /// False until the first `advance` after `reset` has seen the clock
    warmed_up: bool,
    // Animation (cosmetic only)
    frame_ticker: u32,
    frame_index: u32,
    frame_delay: u32,
    frame_count: u32,
}

impl Bird {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel_y: 0.0,
            size: Vec2::new(tuning.bird_width, tuning.bird_height),
            gravity: tuning.gravity,
            flap_velocity: tuning.flap_velocity,
            time_scale: tuning.time_scale,
            warmed_up: false,
            frame_ticker: 0,
            frame_index: 0,
            frame_delay: tuning.bird_frame_delay.max(1),
            frame_count: tuning.bird_frame_count.max(1),
        }
    }

    /// Place the bird for a new session
    pub fn reset(&mut self, view_width: f32, view_height: f32) {
        self.vel_y = 0.0;
        self.frame_ticker = 0;
        self.frame_index = 0;
        self.warmed_up = false;
        self.pos = Vec2::new(view_width / 3.0, view_height / 2.0);
    }

    /// Replace the current velocity with the upward impulse
    pub fn flap(&mut self) {
        self.vel_y = self.flap_velocity;
    }

    /// Integrate gravity over `dt` seconds
    ///
    /// The first call after `reset` only marks the clock as live.
    pub fn advance(&mut self, dt: f32) {
        if !self.warmed_up {
            self.warmed_up = true;
            return;
        }

        let dt = dt.max(0.0);
        let scale = dt * self.time_scale;
        self.vel_y += self.gravity * scale;
        self.pos.y += self.vel_y * scale;

        self.frame_ticker = (self.frame_ticker + 1) % (self.frame_delay * self.frame_count);
        self.frame_index = self.frame_ticker / self.frame_delay;
    }

    /// Current collision rectangle
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Sprite frame to draw (up-flap, mid-flap, down-flap)
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }
}
