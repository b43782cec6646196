//! Recording Data Structures
//!
//! Defines the keyframe recording and its JSON storage payload:
//!
//! ```json
//! { "leftPuppetPoses": [ ... ], "rightPuppetPoses": [ ... ], "duration": 1234.5 }
//! ```
//!
//! Each keyframe is `{ "handFeatures": { "palmCenter": {"x","y","z"}, ... },
//! "side": "Left", "timestamp": ms }`. An optional `metadata` object is
//! written alongside and defaulted when absent.

use crate::capture::types::HandSide;
use crate::features::HandFeatures;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Current recording format version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// An accepted, feature-extracted recording entry for one hand side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub hand_features: HandFeatures,
    pub side: HandSide,
    /// Milliseconds since recording start
    pub timestamp: f64,
}

/// Recording metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordingMetadata {
    /// Unique recording ID
    pub id: Uuid,
    /// Recording name
    pub name: String,
    /// When the recording session started
    pub recorded_at: Option<DateTime<Utc>>,
    /// Version of the recording format
    pub format_version: String,
}

impl RecordingMetadata {
    pub fn new(name: String) -> Self {
        Self {
            name,
            recorded_at: Some(Utc::now()),
            ..Self::default()
        }
    }
}

impl Default for RecordingMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            recorded_at: None,
            format_version: CURRENT_FORMAT_VERSION.to_string(),
        }
    }
}

/// Two per-side keyframe sequences plus the session duration
///
/// Within each side, timestamps are non-decreasing. This holds by
/// construction for recorder output and is trusted for loaded payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(rename = "leftPuppetPoses")]
    pub left: Vec<Keyframe>,
    #[serde(rename = "rightPuppetPoses")]
    pub right: Vec<Keyframe>,
    /// Session length in milliseconds
    pub duration: f64,
    #[serde(default)]
    pub metadata: RecordingMetadata,
}

impl Recording {
    /// Create a new empty recording
    pub fn new(name: String) -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            duration: 0.0,
            metadata: RecordingMetadata::new(name),
        }
    }

    /// Keyframes for one side
    pub fn keyframes(&self, side: HandSide) -> &[Keyframe] {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    /// Append a keyframe to its side's sequence
    pub(crate) fn push(&mut self, keyframe: Keyframe) {
        match keyframe.side {
            HandSide::Left => self.left.push(keyframe),
            HandSide::Right => self.right.push(keyframe),
        }
    }

    /// Set the final duration
    pub fn finalize(&mut self, duration_ms: f64) {
        self.duration = duration_ms;
    }

    /// Total keyframes across both sides
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Whether there is anything to play back
    pub fn has_recording(&self) -> bool {
        !self.is_empty() && self.duration > 0.0
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a storage payload.
    ///
    /// Logs a warning if the payload was saved with a different format
    /// version but still returns it.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let recording: Recording = serde_json::from_str(json)?;
        if recording.metadata.format_version != CURRENT_FORMAT_VERSION {
            tracing::warn!(
                name = %recording.metadata.name,
                found = %recording.metadata.format_version,
                expected = CURRENT_FORMAT_VERSION,
                "Recording has different format version; some fields may use default values"
            );
        }
        Ok(recording)
    }

    /// Save recording to a file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load recording from a file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
