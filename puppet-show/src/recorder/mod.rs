//! Keyframe recorder
//!
//! Turns a raw pose stream into a sparse per-side keyframe [`Recording`](crate::workflow::Recording).

pub mod pose_recorder;

pub use pose_recorder::{
    GateThresholds, PoseRecorder, RecordOutcome, RecorderState, RecorderStats,
    CONFIDENCE_SCORE_THRESHOLD, MIN_FRAME_INTERVAL_MS, MOTION_SCORE_MIN_THRESHOLD,
};
