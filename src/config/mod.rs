use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::models::posture::MirrorMode;

pub const DEFAULT_POSTURE_TOLERANCE: f32 = 0.3;
pub const DEFAULT_GESTURE_TOLERANCE: f32 = 0.5;

/// Analysis settings for one tracked person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub mirror_mode: MirrorMode,

    /// Refresh hip, knee and foot joints
    #[serde(default = "default_true")]
    pub full_body_tracking: bool,

    #[serde(default = "default_true")]
    pub evaluate_posture_and_gesture: bool,

    #[serde(default = "default_true")]
    pub evaluate_statistics: bool,

    /// 0..=1, widens every posture angle bound by tolerance × 20°
    #[serde(default = "default_posture_tolerance")]
    pub posture_tolerance: f32,

    /// 0..=1, widens every gesture angle bound by tolerance × 40°
    #[serde(default = "default_gesture_tolerance")]
    pub gesture_tolerance: f32,

    #[serde(default = "default_push_gesture_max_frames")]
    pub push_gesture_max_frames: u64,

    /// Maximum entries per statistics history buffer, 0 keeps everything
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_posture_tolerance() -> f32 {
    DEFAULT_POSTURE_TOLERANCE
}

fn default_gesture_tolerance() -> f32 {
    DEFAULT_GESTURE_TOLERANCE
}

fn default_push_gesture_max_frames() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    // ten minutes at 30 fps
    18_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mirror_mode: MirrorMode::default(),
            full_body_tracking: default_true(),
            evaluate_posture_and_gesture: default_true(),
            evaluate_statistics: default_true(),
            posture_tolerance: default_posture_tolerance(),
            gesture_tolerance: default_gesture_tolerance(),
            push_gesture_max_frames: default_push_gesture_max_frames(),
            history_capacity: default_history_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(contents).context("Failed to parse analysis config")?;

        Ok(config.sanitized())
    }

    /// Load configuration from a TOML file, defaults when the file is missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml_str(&contents)
    }

    /// Write configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Create configuration from SKELETON_* environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, unset keys use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            mirror_mode: lookup("SKELETON_MIRROR_MODE")
                .map(|name| MirrorMode::from_name(&name))
                .unwrap_or(defaults.mirror_mode),
            full_body_tracking: lookup("SKELETON_FULL_BODY_TRACKING")
                .unwrap_or_else(|| defaults.full_body_tracking.to_string())
                .parse()
                .context("SKELETON_FULL_BODY_TRACKING must be true or false")?,
            evaluate_posture_and_gesture: lookup("SKELETON_EVALUATE_POSTURE")
                .unwrap_or_else(|| defaults.evaluate_posture_and_gesture.to_string())
                .parse()
                .context("SKELETON_EVALUATE_POSTURE must be true or false")?,
            evaluate_statistics: lookup("SKELETON_EVALUATE_STATISTICS")
                .unwrap_or_else(|| defaults.evaluate_statistics.to_string())
                .parse()
                .context("SKELETON_EVALUATE_STATISTICS must be true or false")?,
            posture_tolerance: lookup("SKELETON_POSTURE_TOLERANCE")
                .unwrap_or_else(|| defaults.posture_tolerance.to_string())
                .parse()
                .context("SKELETON_POSTURE_TOLERANCE must be a number")?,
            gesture_tolerance: lookup("SKELETON_GESTURE_TOLERANCE")
                .unwrap_or_else(|| defaults.gesture_tolerance.to_string())
                .parse()
                .context("SKELETON_GESTURE_TOLERANCE must be a number")?,
            push_gesture_max_frames: defaults.push_gesture_max_frames,
            history_capacity: lookup("SKELETON_HISTORY_CAPACITY")
                .unwrap_or_else(|| defaults.history_capacity.to_string())
                .parse()
                .context("SKELETON_HISTORY_CAPACITY must be a non-negative integer")?,
            logging: LoggingConfig {
                level: lookup("SKELETON_LOG_LEVEL").unwrap_or(defaults.logging.level),
            },
        };

        Ok(config.sanitized())
    }

    /// Replace out-of-range tolerances with their defaults
    pub fn sanitized(mut self) -> Self {
        self.posture_tolerance =
            sanitize_tolerance(self.posture_tolerance, DEFAULT_POSTURE_TOLERANCE, "posture");
        self.gesture_tolerance =
            sanitize_tolerance(self.gesture_tolerance, DEFAULT_GESTURE_TOLERANCE, "gesture");
        self
    }

    /// History bound for the statistics tracker, `None` when unbounded
    pub fn history_limit(&self) -> Option<usize> {
        if self.history_capacity == 0 {
            None
        } else {
            Some(self.history_capacity)
        }
    }
}

/// Tolerance in [0, 1], anything else (NaN included) falls back to `default`
pub fn sanitize_tolerance(value: f32, default: f32, name: &str) -> f32 {
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        tracing::debug!("{} tolerance {} out of range, using {}", name, value, default);
        default
    }
}
