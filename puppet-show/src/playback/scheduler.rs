//! Wall-Clock Playback Scheduler
//!
//! Reconstructs continuous motion from sparse keyframes. Playback is driven by
//! elapsed wall-clock time, not by a frame grid: each call to
//! [`PlaybackScheduler::advance`] looks up where "now" falls in each side's
//! keyframe sequence and emits a feature frame for it.
//!
//! The two sides keep independent cursors, so sequences of different length
//! or cadence never pull each other out of step. Cursors only move forward
//! within a session.

use crate::capture::types::HandSide;
use crate::features::HandFeatures;
use crate::workflow::recording::{Keyframe, Recording};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// How a frame is produced between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Emit the keyframe under the cursor
    #[default]
    Nearest,
    /// Blend the keyframe under the cursor with the next one
    Interpolated,
}

impl PlaybackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackMode::Nearest => "nearest",
            PlaybackMode::Interpolated => "interpolated",
        }
    }
}

/// Consumer of playback output (usually a rig poser)
pub trait PoseSink {
    /// Pose one side
    fn pose(&mut self, side: HandSide, features: &HandFeatures);

    /// Called once per session when playback runs past the recording's end
    fn playback_finished(&mut self) {}
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackTick {
    /// Not playing
    Idle,
    /// Per-side frames for this tick; `None` when that side has nothing to emit
    Frame {
        left: Option<HandFeatures>,
        right: Option<HandFeatures>,
    },
    /// Playback just ran past the end (reported once per session)
    Finished,
}

impl PlaybackTick {
    /// Frame for one side, if this tick carries one
    pub fn side(&self, side: HandSide) -> Option<&HandFeatures> {
        match self {
            PlaybackTick::Frame { left, right } => match side {
                HandSide::Left => left.as_ref(),
                HandSide::Right => right.as_ref(),
            },
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackTick::Finished)
    }
}

/// Per-side cursor playback over a frozen [`Recording`]
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    mode: PlaybackMode,
    recording: Option<Arc<Recording>>,
    start_wall_clock: f64,
    cursors: [usize; 2],
    playing: bool,
}

impl PlaybackScheduler {
    pub fn new(mode: PlaybackMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Start a session at `now_ms`. Calling again restarts from the beginning.
    pub fn play(&mut self, recording: Arc<Recording>, now_ms: f64) {
        info!(
            left = recording.left.len(),
            right = recording.right.len(),
            duration_ms = recording.duration,
            mode = self.mode.as_str(),
            "Playback started"
        );
        self.recording = Some(recording);
        self.start_wall_clock = now_ms;
        self.cursors = [0, 0];
        self.playing = true;
    }

    /// Advance to `now_ms` and produce this tick's frames.
    pub fn advance(&mut self, now_ms: f64) -> PlaybackTick {
        let recording = match &self.recording {
            Some(recording) => Arc::clone(recording),
            None => return PlaybackTick::Idle,
        };

        let elapsed = now_ms - self.start_wall_clock;
        if elapsed > recording.duration {
            if self.playing {
                self.playing = false;
                info!(elapsed_ms = elapsed, "Playback finished");
                return PlaybackTick::Finished;
            }
            return PlaybackTick::Idle;
        }
        if !self.playing {
            return PlaybackTick::Idle;
        }

        let left = self.frame_for(HandSide::Left, &recording.left, elapsed);
        let right = self.frame_for(HandSide::Right, &recording.right, elapsed);
        PlaybackTick::Frame { left, right }
    }

    /// Advance and hand the result to `sink`.
    pub fn drive<S: PoseSink + ?Sized>(&mut self, now_ms: f64, sink: &mut S) -> PlaybackTick {
        let tick = self.advance(now_ms);
        match &tick {
            PlaybackTick::Frame { left, right } => {
                if let Some(features) = left {
                    sink.pose(HandSide::Left, features);
                }
                if let Some(features) = right {
                    sink.pose(HandSide::Right, features);
                }
            }
            PlaybackTick::Finished => sink.playback_finished(),
            PlaybackTick::Idle => {}
        }
        tick
    }

    fn frame_for(&mut self, side: HandSide, sequence: &[Keyframe], elapsed: f64) -> Option<HandFeatures> {
        if sequence.is_empty() {
            return None;
        }

        let cursor = &mut self.cursors[side.index()];
        let before = *cursor;
        while *cursor < sequence.len() - 1 && sequence[*cursor].timestamp < elapsed {
            *cursor += 1;
        }
        let index = *cursor;
        if index != before {
            debug!(side = %side, index, elapsed_ms = elapsed, "Cursor advanced");
        }

        let current = &sequence[index];
        match self.mode {
            PlaybackMode::Nearest => Some(current.hand_features),
            PlaybackMode::Interpolated => {
                let next = sequence.get(index + 1)?;
                let span = next.timestamp - current.timestamp;
                if span <= 0.0 {
                    return Some(current.hand_features);
                }
                let alpha = (elapsed - current.timestamp) / span;
                Some(current.hand_features.lerp(&next.hand_features, alpha))
            }
        }
    }

    /// Fraction of the recording played, in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f64 {
        match &self.recording {
            Some(recording) if self.playing && recording.duration > 0.0 => {
                ((now_ms - self.start_wall_clock) / recording.duration).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Takes effect on the next tick
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    /// Current cursor index for one side
    pub fn cursor(&self, side: HandSide) -> usize {
        self.cursors[side.index()]
    }

    pub fn start_wall_clock(&self) -> f64 {
        self.start_wall_clock
    }

    pub fn recording(&self) -> Option<&Arc<Recording>> {
        self.recording.as_ref()
    }
}
