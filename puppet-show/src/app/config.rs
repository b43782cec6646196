//! Configuration Management

use crate::capture::ring_buffer::DEFAULT_CAPACITY;
use crate::playback::PlaybackMode;
use crate::recorder::{
    GateThresholds, CONFIDENCE_SCORE_THRESHOLD, MIN_FRAME_INTERVAL_MS, MOTION_SCORE_MIN_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Recorder gate settings
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Recorder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Minimum pose score in [0, 1]
    pub confidence_threshold: f64,
    /// Minimum interval between kept poses of one side (ms)
    pub min_interval_ms: f64,
    /// Minimum summed joint displacement (metres)
    pub motion_threshold: f64,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Nearest keyframe or interpolated
    pub mode: PlaybackMode,
    /// Tick rate of the CLI replay driver (Hz)
    pub tick_rate_hz: u32,
}

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Ring buffer size
    pub ring_buffer_size: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_SCORE_THRESHOLD,
            min_interval_ms: MIN_FRAME_INTERVAL_MS,
            motion_threshold: MOTION_SCORE_MIN_THRESHOLD,
        }
    }
}

impl RecorderConfig {
    pub fn thresholds(&self) -> GateThresholds {
        GateThresholds {
            confidence: self.confidence_threshold,
            min_interval_ms: self.min_interval_ms,
            motion: self.motion_threshold,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::Nearest,
            tick_rate_hz: 60,
        }
    }
}

impl PlaybackConfig {
    /// Milliseconds between ticks
    pub fn tick_interval_ms(&self) -> f64 {
        1_000.0 / self.tick_rate_hz as f64
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ring_buffer_size: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(0.0..=1.0).contains(&self.recorder.confidence_threshold) {
            return Err(crate::Error::Config(format!(
                "confidence_threshold must be in [0, 1], got {}", self.recorder.confidence_threshold
            )));
        }
        if self.recorder.min_interval_ms.is_nan() || self.recorder.min_interval_ms < 0.0 {
            return Err(crate::Error::Config(format!(
                "min_interval_ms must be >= 0, got {}", self.recorder.min_interval_ms
            )));
        }
        if self.recorder.motion_threshold.is_nan() || self.recorder.motion_threshold < 0.0 {
            return Err(crate::Error::Config(format!(
                "motion_threshold must be >= 0, got {}", self.recorder.motion_threshold
            )));
        }
        if self.playback.tick_rate_hz == 0 || self.playback.tick_rate_hz > 1000 {
            return Err(crate::Error::Config(format!(
                "tick_rate_hz must be in (0, 1000], got {}", self.playback.tick_rate_hz
            )));
        }
        if !self.capture.ring_buffer_size.is_power_of_two() {
            return Err(crate::Error::Config(format!(
                "ring_buffer_size must be a power of 2, got {}", self.capture.ring_buffer_size
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".puppet_show").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
