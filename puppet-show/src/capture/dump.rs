//! Detection dumps
//!
//! A dump is JSON Lines: one detection cycle per line, written either as a
//! single pose object or as an array of poses (one per detected hand).
//! Blank lines are skipped.

use super::types::RawPose;
use serde::Deserialize;
use std::io::BufRead;

/// One line of a detection dump
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DetectionCycle {
    Many(Vec<RawPose>),
    One(RawPose),
}

impl DetectionCycle {
    pub fn into_poses(self) -> Vec<RawPose> {
        match self {
            DetectionCycle::Many(poses) => poses,
            DetectionCycle::One(pose) => vec![pose],
        }
    }
}

/// Parse a single dump line. Returns `Ok(None)` for blank lines.
pub fn parse_cycle(line: &str, line_number: usize) -> crate::Result<Option<Vec<RawPose>>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<DetectionCycle>(trimmed)
        .map(|cycle| Some(cycle.into_poses()))
        .map_err(|e| crate::Error::Capture(format!("line {}: {}", line_number, e)))
}

/// Read a whole dump into detection cycles.
pub fn read_detection_dump<R: BufRead>(reader: R) -> crate::Result<Vec<Vec<RawPose>>> {
    let mut cycles = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(poses) = parse_cycle(&line, i + 1)? {
            cycles.push(poses);
        }
    }
    Ok(cycles)
}
