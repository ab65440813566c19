//! Runtime configuration.
//!
//! Every tuning constant of the pipeline lives here so it can be loaded from
//! JSON. Missing fields fall back to the defaults.
//!
//! ```json
//! { "particle_count": 30000, "color_speed": -0.01, "tracker": { "Replay": { "path": "hand.jsonl", "fps": 30.0, "looped": true } } }
//! ```

use crate::error::ConfigError;
use crate::shape::ShapeSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where observations come from.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum TrackerConfig {
    /// Keyboard and mouse drive a synthetic hand.
    #[default]
    Simulated,
    /// Replay a JSON-lines landmark recording.
    Replay {
        path: PathBuf,
        fps: f32,
        #[serde(default)]
        looped: bool,
    },
}

/// Full pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Number of particles. Fixed for the lifetime of the field.
    pub particle_count: u32,
    /// Rendered point size in world units.
    pub particle_size: f32,
    /// Hue phase advance per tick. May be negative.
    pub color_speed: f32,
    /// Fraction of the remaining distance covered each tick.
    pub lerp_speed: f32,
    /// Initial positions are uniform in a cube of this half-size.
    pub spawn_extent: f32,
    /// Radius of the sphere selected by four or more fingers.
    pub sphere_radius: f32,
    /// Scale of the heart selected by one finger.
    pub heart_scale: f32,
    /// EMA factor applied to the raw pinch scale.
    pub pinch_smoothing: f32,
    /// Per-observation decay of the hand offset while no hand is seen.
    pub offset_decay: f32,
    /// Per-tick decay of roll while Saturn is not selected.
    pub roll_decay: f32,
    /// Roll held while Saturn is selected.
    pub saturn_roll: f32,
    /// Constant yaw added every tick.
    pub idle_yaw: f32,
    /// Yaw/pitch added per tick per unit of hand offset.
    pub hand_rotation_gain: f32,
    /// Horizontal thumb-to-pinky-base distance that counts as an extended thumb.
    pub thumb_threshold: f32,
    /// Multiplier from thumb-index distance to raw pinch scale.
    pub pinch_gain: f32,
    /// Observation source.
    pub tracker: TrackerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 15_000,
            particle_size: 0.15,
            color_speed: 0.005,
            lerp_speed: 0.08,
            spawn_extent: 25.0,
            sphere_radius: 12.0,
            heart_scale: 0.8,
            pinch_smoothing: 0.1,
            offset_decay: 0.95,
            roll_decay: 0.95,
            saturn_roll: 0.3,
            idle_yaw: 0.002,
            hand_rotation_gain: 0.05,
            thumb_threshold: 0.2,
            pinch_gain: 5.0,
            tracker: TrackerConfig::Simulated,
        }
    }
}

impl Config {
    /// Load and validate a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save this config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values that would break the smoothing or sampling math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::Invalid("particle_count must be at least 1".into()));
        }
        if !(self.lerp_speed > 0.0 && self.lerp_speed < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "lerp_speed must be in (0, 1), got {}",
                self.lerp_speed
            )));
        }
        for (name, value) in [
            ("pinch_smoothing", self.pinch_smoothing),
            ("offset_decay", self.offset_decay),
            ("roll_decay", self.roll_decay),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !self.color_speed.is_finite() {
            return Err(ConfigError::Invalid("color_speed must be finite".into()));
        }
        if let TrackerConfig::Replay { fps, .. } = &self.tracker {
            if !(*fps > 0.0) {
                return Err(ConfigError::Invalid(format!("replay fps must be positive, got {}", fps)));
            }
            if Duration::try_from_secs_f32(1.0 / fps).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "replay fps {} gives an unrepresentable frame interval",
                    fps
                )));
            }
        }
        Ok(())
    }

    /// Shape selected by one raised finger.
    pub fn heart(&self) -> ShapeSpec {
        ShapeSpec::Heart(self.heart_scale)
    }

    /// Shape selected by four or more raised fingers, and the startup shape.
    pub fn sphere(&self) -> ShapeSpec {
        ShapeSpec::Sphere(self.sphere_radius)
    }
}
