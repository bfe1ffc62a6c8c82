//! Game settings and tuning
//!
//! Every section deserializes with defaults, so a settings file only needs to
//! name the values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Environment variable naming a JSON settings file
pub const SETTINGS_ENV: &str = "BLINK_FLAP_SETTINGS";

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How pipes scroll relative to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPolicy {
    /// Fixed distance per tick; speed depends on the achieved frame rate
    PerTick,
    /// Distance scaled by dt the same way bird gravity is
    #[default]
    TimeScaled,
}

impl ScrollPolicy {
    /// Multiplier applied to the per-reference-frame pipe speed
    pub fn factor(&self, dt: f32, time_scale: f32) -> f32 {
        match self {
            ScrollPolicy::PerTick => 1.0,
            ScrollPolicy::TimeScaled => dt * time_scale,
        }
    }
}

/// What a head nod does while a game is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodAction {
    #[default]
    Ignore,
    TogglePause,
}

/// Physics and obstacle tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub flap_velocity: f32,
    pub time_scale: f32,

    pub bird_width: f32,
    pub bird_height: f32,
    pub bird_frame_delay: u32,
    pub bird_frame_count: u32,

    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub pipe_speed: f32,
    pub spawn_interval: u32,
    pub spawn_margin: f32,
    pub scroll: ScrollPolicy,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            time_scale: TIME_SCALE,

            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            bird_frame_delay: BIRD_FRAME_DELAY,
            bird_frame_count: BIRD_FRAME_COUNT,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            spawn_margin: SPAWN_MARGIN,
            scroll: ScrollPolicy::default(),
        }
    }
}

/// Gesture recognition thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Either eye below this counts as closed
    pub close_threshold: f32,
    /// Both eyes must reach this to re-arm blink detection
    pub reopen_threshold: f32,
    pub nod_threshold_deg: f32,
    /// Fire one nod per excursion instead of one per sample
    pub nod_latch: bool,
    /// Minimum time between blinks (0 disables)
    pub blink_cooldown_ms: u64,
    pub nod_action: NodAction,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            close_threshold: BLINK_CLOSE_THRESHOLD,
            reopen_threshold: BLINK_CLOSE_THRESHOLD,
            nod_threshold_deg: NOD_THRESHOLD_DEG,
            nod_latch: false,
            blink_cooldown_ms: 0,
            nod_action: NodAction::Ignore,
        }
    }
}

/// Host loop pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub frame_interval_ms: u64,
    pub max_frame_dt: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// RNG seed for pipe placement (None = derive from the clock)
    pub seed: Option<u64>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: FRAME_INTERVAL_MS,
            max_frame_dt: MAX_FRAME_DT,
            viewport_width: 400.0,
            viewport_height: 800.0,
            seed: None,
        }
    }
}

/// All tunables
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub gesture: GestureTuning,
    pub driver: DriverSettings,
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `BLINK_FLAP_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Path::new(&path).display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
