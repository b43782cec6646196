//! Gated Pose Recorder
//!
//! Consumes raw poses for both hand sides and keeps only the frames worth
//! keeping. Each pose passes through three gates in order:
//!
//! 1. **Confidence**: `score < 0.7` is discarded
//! 2. **Temporal**: less than 16 ms since the side's previous kept pose is discarded
//! 3. **Motion**: summed joint displacement below 0.05 m is discarded
//!
//! The first pose of each side after `start` skips the temporal and motion
//! gates so every recording opens with a defined pose per side.

use crate::capture::types::{HandSide, RawPose};
use crate::features::{extract_features, HandFeatures};
use crate::workflow::recording::{Keyframe, Recording};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Minimum handedness score for a pose to be considered
pub const CONFIDENCE_SCORE_THRESHOLD: f64 = 0.7;

/// Minimum time between kept poses of one side (ms)
pub const MIN_FRAME_INTERVAL_MS: f64 = 16.0;

/// Minimum summed joint displacement for a pose to be kept (metres)
pub const MOTION_SCORE_MIN_THRESHOLD: f64 = 0.05;

/// Gate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateThresholds {
    /// Minimum pose score
    pub confidence: f64,
    /// Minimum interval between kept poses (ms)
    pub min_interval_ms: f64,
    /// Minimum motion score
    pub motion: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            confidence: CONFIDENCE_SCORE_THRESHOLD,
            min_interval_ms: MIN_FRAME_INTERVAL_MS,
            motion: MOTION_SCORE_MIN_THRESHOLD,
        }
    }
}

/// Recorder lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Stopped,
}

/// What happened to a pose handed to [`PoseRecorder::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Appended as a keyframe
    Accepted,
    /// Recorder is not recording
    Inactive,
    /// Below the confidence threshold
    LowConfidence,
    /// Too close in time to the side's previous kept pose
    TooSoon,
    /// Hand effectively static since the previous kept pose
    Static,
}

impl RecordOutcome {
    pub fn is_accepted(self) -> bool {
        self == RecordOutcome::Accepted
    }
}

/// Per-outcome counters for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub accepted: u64,
    pub low_confidence: u64,
    pub too_soon: u64,
    pub static_hand: u64,
}

impl RecorderStats {
    fn count(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Accepted => self.accepted += 1,
            RecordOutcome::LowConfidence => self.low_confidence += 1,
            RecordOutcome::TooSoon => self.too_soon += 1,
            RecordOutcome::Static => self.static_hand += 1,
            RecordOutcome::Inactive => {}
        }
    }

    /// Poses that reached the recorder while it was recording
    pub fn total(&self) -> u64 {
        self.accepted + self.low_confidence + self.too_soon + self.static_hand
    }
}

/// Confidence, time and motion gated keyframe recorder
pub struct PoseRecorder {
    thresholds: GateThresholds,
    state: RecorderState,
    start_time: f64,
    recording: Recording,
    /// Last kept raw pose per side, timestamp rebased to the session start
    previous: [Option<RawPose>; 2],
    stats: RecorderStats,
}

impl PoseRecorder {
    pub fn new(thresholds: GateThresholds) -> Self {
        Self {
            thresholds,
            state: RecorderState::Idle,
            start_time: 0.0,
            recording: Recording::default(),
            previous: [None, None],
            stats: RecorderStats::default(),
        }
    }

    /// Begin a session at `now_ms`, discarding everything recorded before.
    pub fn start(&mut self, now_ms: f64) {
        self.start_time = now_ms;
        self.recording = Recording::new(String::new());
        self.previous = [None, None];
        self.stats = RecorderStats::default();
        self.state = RecorderState::Recording;
        info!(start_ms = now_ms, "Recording started");
    }

    /// End the session at `end_ms`. Ignored unless recording.
    pub fn stop(&mut self, end_ms: f64) {
        if self.state != RecorderState::Recording {
            return;
        }
        self.recording.finalize(end_ms - self.start_time);
        self.state = RecorderState::Stopped;
        info!(
            left = self.recording.left.len(),
            right = self.recording.right.len(),
            duration_ms = self.recording.duration,
            accepted = self.stats.accepted,
            low_confidence = self.stats.low_confidence,
            too_soon = self.stats.too_soon,
            static_hand = self.stats.static_hand,
            "Recording stopped"
        );
    }

    /// Run one pose through the gates, appending a keyframe if it passes.
    pub fn record(&mut self, pose: RawPose) -> RecordOutcome {
        let outcome = self.gate(pose, None);
        self.stats.count(outcome);
        outcome
    }

    /// Like [`record`](Self::record), for callers that already extracted the
    /// pose's features. `features` must come from `extract_features(&pose)`.
    pub fn record_extracted(&mut self, pose: RawPose, features: HandFeatures) -> RecordOutcome {
        let outcome = self.gate(pose, Some(features));
        self.stats.count(outcome);
        outcome
    }

    fn gate(&mut self, mut pose: RawPose, features: Option<HandFeatures>) -> RecordOutcome {
        if self.state != RecorderState::Recording {
            return RecordOutcome::Inactive;
        }

        if pose.score < self.thresholds.confidence {
            trace!(side = %pose.side, score = pose.score, "Low confidence pose dropped");
            return RecordOutcome::LowConfidence;
        }

        let t = pose.timestamp - self.start_time;
        let slot = pose.side.index();

        if let Some(previous) = &self.previous[slot] {
            if (t - previous.timestamp).abs() < self.thresholds.min_interval_ms {
                trace!(side = %pose.side, t, "Pose too soon after previous");
                return RecordOutcome::TooSoon;
            }

            let motion = pose.motion_score(previous);
            if motion < self.thresholds.motion {
                trace!(side = %pose.side, motion, "Static pose dropped");
                return RecordOutcome::Static;
            }
        }

        let hand_features = features.unwrap_or_else(|| extract_features(&pose));
        self.recording.push(Keyframe {
            hand_features,
            side: pose.side,
            timestamp: t,
        });
        debug!(side = %pose.side, t, "Keyframe accepted");

        pose.timestamp = t;
        self.previous[slot] = Some(pose);
        RecordOutcome::Accepted
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn thresholds(&self) -> &GateThresholds {
        &self.thresholds
    }

    /// Session start on the caller's clock (ms)
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Keyframes recorded so far (or the finished recording once stopped)
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Take the recording out, leaving an empty one behind
    pub fn take_recording(&mut self) -> Recording {
        std::mem::take(&mut self.recording)
    }

    pub fn stats(&self) -> RecorderStats {
        self.stats
    }

    /// Keyframes for one side so far
    pub fn keyframes(&self, side: HandSide) -> &[Keyframe] {
        self.recording.keyframes(side)
    }
}

impl Default for PoseRecorder {
    fn default() -> Self {
        Self::new(GateThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::LANDMARK_COUNT;
    use nalgebra::Vector3;

    fn hand(offset: f64) -> [Vector3<f64>; LANDMARK_COUNT] {
        std::array::from_fn(|i| {
            let i = i as f64;
            Vector3::new(0.01 * i + offset, 0.02 * (i % 4.0) + offset, 0.003 * i)
        })
    }

    fn pose(side: HandSide, score: f64, offset: f64, timestamp: f64) -> RawPose {
        RawPose::new(score, hand(offset), side, timestamp)
    }

    fn started(start: f64) -> PoseRecorder {
        let mut recorder = PoseRecorder::default();
        recorder.start(start);
        recorder
    }

    #[test]
    fn test_default_thresholds() {
        let t = GateThresholds::default();
        assert_eq!(t.confidence, 0.7);
        assert_eq!(t.min_interval_ms, 16.0);
        assert_eq!(t.motion, 0.05);
    }

    #[test]
    fn test_record_before_start_is_ignored() {
        let mut recorder = PoseRecorder::default();
        let outcome = recorder.record(pose(HandSide::Left, 0.9, 0.0, 10.0));
        assert_eq!(outcome, RecordOutcome::Inactive);
        assert!(recorder.recording().is_empty());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[test]
    fn test_low_confidence_never_recorded() {
        let mut recorder = started(0.0);
        for (i, score) in [0.0, 0.3, 0.69, 0.699999].iter().enumerate() {
            let outcome = recorder.record(pose(HandSide::Right, *score, i as f64, i as f64 * 100.0));
            assert_eq!(outcome, RecordOutcome::LowConfidence);
        }
        assert!(recorder.recording().is_empty());
        assert_eq!(recorder.stats().low_confidence, 4);
    }

    #[test]
    fn test_threshold_score_is_accepted() {
        let mut recorder = started(0.0);
        assert!(recorder.record(pose(HandSide::Left, 0.7, 0.0, 5.0)).is_accepted());
    }

    #[test]
    fn test_first_pose_accepted_regardless_of_motion() {
        let mut recorder = started(1000.0);
        let outcome = recorder.record(pose(HandSide::Left, 0.8, 0.0, 1003.0));
        assert_eq!(outcome, RecordOutcome::Accepted);

        let keyframes = recorder.keyframes(HandSide::Left);
        assert_eq!(keyframes.len(), 1);
        assert_eq!(keyframes[0].timestamp, 3.0);
        assert_eq!(keyframes[0].side, HandSide::Left);
    }

    #[test]
    fn test_sides_are_gated_independently() {
        let mut recorder = started(0.0);
        assert!(recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0)).is_accepted());
        // Same timestamp, other side: first pose for that side
        assert!(recorder.record(pose(HandSide::Right, 0.9, 0.0, 0.0)).is_accepted());
        assert_eq!(recorder.keyframes(HandSide::Left).len(), 1);
        assert_eq!(recorder.keyframes(HandSide::Right).len(), 1);
    }

    #[test]
    fn test_temporal_gate() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 100.0));

        let outcome = recorder.record(pose(HandSide::Left, 0.9, 1.0, 115.9));
        assert_eq!(outcome, RecordOutcome::TooSoon);

        let outcome = recorder.record(pose(HandSide::Left, 0.9, 1.0, 116.0));
        assert_eq!(outcome, RecordOutcome::Accepted);
    }

    #[test]
    fn test_temporal_gate_rejects_duplicate_timestamp() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Right, 0.9, 0.0, 50.0));
        let outcome = recorder.record(pose(HandSide::Right, 0.9, 1.0, 50.0));
        assert_eq!(outcome, RecordOutcome::TooSoon);
    }

    #[test]
    fn test_temporal_gate_uses_rebased_timestamps() {
        let mut recorder = started(5000.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 5000.0));
        assert_eq!(
            recorder.record(pose(HandSide::Left, 0.9, 1.0, 5010.0)),
            RecordOutcome::TooSoon
        );
        assert_eq!(
            recorder.record(pose(HandSide::Left, 0.9, 1.0, 5020.0)),
            RecordOutcome::Accepted
        );
        assert_eq!(recorder.keyframes(HandSide::Left)[1].timestamp, 20.0);
    }

    #[test]
    fn test_motion_gate_boundary() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));

        // 21 joints shifted by 0.002 along x: 0.042 total
        let mut still = pose(HandSide::Left, 0.9, 0.0, 20.0);
        for p in still.positions.iter_mut() {
            p.x += 0.002;
        }
        assert_eq!(recorder.record(still), RecordOutcome::Static);

        // 0.003 per joint: 0.063 total
        let mut moved = pose(HandSide::Left, 0.9, 0.0, 40.0);
        for p in moved.positions.iter_mut() {
            p.x += 0.003;
        }
        assert_eq!(recorder.record(moved), RecordOutcome::Accepted);
    }

    #[test]
    fn test_motion_measured_against_last_kept_pose() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));

        // Each step moves 0.0015 per joint (0.0315 total), too small on its own
        let mut drifted = 0;
        for step in 1..=3 {
            let mut p = pose(HandSide::Left, 0.9, 0.0, step as f64 * 20.0);
            for joint in p.positions.iter_mut() {
                joint.x += 0.0015 * step as f64;
            }
            if recorder.record(p).is_accepted() {
                drifted = step;
                break;
            }
        }
        // Drops don't move the reference, so cumulative drift is eventually kept
        assert_eq!(drifted, 2);
    }

    #[test]
    fn test_stop_computes_duration() {
        let mut recorder = started(1234.5);
        recorder.record(pose(HandSide::Right, 0.9, 0.0, 1300.0));
        recorder.stop(4321.25);

        assert_eq!(recorder.state(), RecorderState::Stopped);
        assert_eq!(recorder.recording().duration, 4321.25 - 1234.5);
        assert!(recorder.recording().has_recording());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut recorder = PoseRecorder::default();
        recorder.stop(500.0);
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.recording().duration, 0.0);
    }

    #[test]
    fn test_record_after_stop_is_ignored() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));
        recorder.stop(100.0);

        assert_eq!(
            recorder.record(pose(HandSide::Left, 0.9, 5.0, 200.0)),
            RecordOutcome::Inactive
        );
        assert_eq!(recorder.keyframes(HandSide::Left).len(), 1);
    }

    #[test]
    fn test_restart_clears_session() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));
        recorder.record(pose(HandSide::Left, 0.5, 0.0, 30.0));
        recorder.stop(100.0);

        recorder.start(1000.0);
        assert!(recorder.is_recording());
        assert!(recorder.recording().is_empty());
        assert_eq!(recorder.stats(), RecorderStats::default());

        // Previous-pose memory was cleared too: identical pose is a first frame again
        assert!(recorder.record(pose(HandSide::Left, 0.9, 0.0, 1000.0)).is_accepted());
    }

    #[test]
    fn test_stats_counts_outcomes() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));
        recorder.record(pose(HandSide::Left, 0.1, 1.0, 40.0));
        recorder.record(pose(HandSide::Left, 0.9, 1.0, 5.0));
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 40.0));
        recorder.record(pose(HandSide::Left, 0.9, 1.0, 80.0));

        let stats = recorder.stats();
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.low_confidence, 1);
        assert_eq!(stats.too_soon, 1);
        assert_eq!(stats.static_hand, 1);
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_keyframe_features_match_extractor() {
        let mut recorder = started(0.0);
        let p = pose(HandSide::Right, 0.95, 0.2, 0.0);
        let expected = extract_features(&p);
        recorder.record(p);
        assert_eq!(recorder.keyframes(HandSide::Right)[0].hand_features, expected);
    }

    #[test]
    fn test_record_extracted_uses_given_features() {
        let mut recorder = started(0.0);
        let p = pose(HandSide::Left, 0.95, 0.2, 0.0);
        let features = extract_features(&p);
        assert_eq!(recorder.record_extracted(p.clone(), features), RecordOutcome::Accepted);
        assert_eq!(recorder.keyframes(HandSide::Left)[0].hand_features, features);

        // Gates still apply: same pose again is too soon
        assert_eq!(recorder.record_extracted(p, features), RecordOutcome::TooSoon);
        assert_eq!(recorder.stats().too_soon, 1);
        assert_eq!(recorder.keyframes(HandSide::Left).len(), 1);
    }

    #[test]
    fn test_take_recording() {
        let mut recorder = started(0.0);
        recorder.record(pose(HandSide::Left, 0.9, 0.0, 0.0));
        recorder.stop(50.0);

        let recording = recorder.take_recording();
        assert_eq!(recording.left.len(), 1);
        assert!(recorder.recording().is_empty());
    }
}
