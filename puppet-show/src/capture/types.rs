//! Core types for pose capture
//!
//! Defines the raw per-hand pose produced by the detection model and the
//! 21-point skeletal landmark convention it follows.

use super::xyz;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

/// Number of landmarks in one detected hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Finger-base knuckles, averaged into the hand center
pub const KNUCKLES: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Finger tips, averaged into the raw finger top
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Which hand a pose belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Both sides, left first
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    /// Slot index for per-side arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandSide::Left => "Left",
            HandSide::Right => "Right",
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One hand's detected landmarks for a single detection cycle
///
/// Positions are world landmarks in metres. The timestamp is in milliseconds
/// on the session clock (see [`crate::time::SessionClock`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPose {
    /// Handedness confidence in [0, 1]
    pub score: f64,
    /// 21 skeletal landmarks
    #[serde(with = "xyz::landmarks")]
    pub positions: [Vector3<f64>; LANDMARK_COUNT],
    /// Detected side
    pub side: HandSide,
    /// Milliseconds since session start
    pub timestamp: f64,
}

impl RawPose {
    pub fn new(
        score: f64,
        positions: [Vector3<f64>; LANDMARK_COUNT],
        side: HandSide,
        timestamp: f64,
    ) -> Self {
        Self {
            score,
            positions,
            side,
            timestamp,
        }
    }

    /// Sum of per-joint Euclidean displacement from `previous`.
    pub fn motion_score(&self, previous: &RawPose) -> f64 {
        self.positions
            .iter()
            .zip(previous.positions.iter())
            .map(|(current, before)| (current - before).norm())
            .sum()
    }

    /// Landmark by index
    #[inline]
    pub fn landmark(&self, index: usize) -> &Vector3<f64> {
        &self.positions[index]
    }
}
