//! Puppet Show Facade
//!
//! Owns one recorder, one scheduler and the current recording. The host
//! application drives it through two reactive entry points:
//!
//! - [`PuppetShow::on_raw_poses`] from the detection callback
//! - [`PuppetShow::on_tick`] from the render callback
//!
//! The facade holds no loop or timer of its own; every call carries its own
//! timestamp.
//!
//! A recording is frozen into an `Arc` when the recorder stops or a payload is
//! loaded. Playback shares that `Arc` read-only, so a later recording session
//! builds a fresh `Recording` rather than mutating the one being played.

use super::recording::Recording;
use crate::app::config::Config;
use crate::capture::types::{HandSide, RawPose};
use crate::features::{extract_features, HandFeatures};
use crate::playback::{PlaybackMode, PlaybackScheduler, PlaybackTick, PoseSink};
use crate::recorder::{GateThresholds, PoseRecorder, RecordOutcome};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Recording and playback session for one pair of hands
pub struct PuppetShow {
    recorder: PoseRecorder,
    scheduler: PlaybackScheduler,
    recording: Option<Arc<Recording>>,
}

impl PuppetShow {
    pub fn new(thresholds: GateThresholds, mode: PlaybackMode) -> Self {
        Self {
            recorder: PoseRecorder::new(thresholds),
            scheduler: PlaybackScheduler::new(mode),
            recording: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.recorder.thresholds(), config.playback.mode)
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Start a recording session at `now_ms`
    pub fn start_recording(&mut self, now_ms: f64) {
        self.recorder.start(now_ms);
    }

    /// Stop the session at `now_ms` and make its recording current.
    /// Ignored when no session is active.
    pub fn stop_recording(&mut self, now_ms: f64) {
        if !self.recorder.is_recording() {
            return;
        }
        self.recorder.stop(now_ms);
        let recording = self.recorder.take_recording();
        self.recording = Some(Arc::new(recording));
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Feed one detection cycle.
    ///
    /// Returns the extracted features of every pose in the cycle for live
    /// preview, whether or not the recorder kept it.
    pub fn on_raw_poses<I>(&mut self, poses: I) -> Vec<(HandSide, HandFeatures)>
    where
        I: IntoIterator<Item = RawPose>,
    {
        poses
            .into_iter()
            .map(|pose| {
                let side = pose.side;
                let features = extract_features(&pose);
                self.recorder.record_extracted(pose, features);
                (side, features)
            })
            .collect()
    }

    /// Feed a single pose to the recorder
    pub fn on_raw_pose(&mut self, pose: RawPose) -> RecordOutcome {
        self.recorder.record(pose)
    }

    pub fn recorder(&self) -> &PoseRecorder {
        &self.recorder
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Start playing the current recording at `now_ms`.
    ///
    /// Returns false, changing nothing, while a recording session is active
    /// or when there is nothing playable.
    pub fn play(&mut self, now_ms: f64) -> bool {
        if self.recorder.is_recording() {
            debug!("Play refused while recording");
            return false;
        }
        match &self.recording {
            Some(recording) if recording.has_recording() => {
                self.scheduler.play(Arc::clone(recording), now_ms);
                true
            }
            _ => {
                debug!("Play refused: no playable recording");
                false
            }
        }
    }

    /// Advance playback to `now_ms`, posing `sink`
    pub fn on_tick<S: PoseSink + ?Sized>(&mut self, now_ms: f64, sink: &mut S) -> PlaybackTick {
        self.scheduler.drive(now_ms, sink)
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        self.scheduler.progress(now_ms)
    }

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.scheduler.set_mode(mode);
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    // ------------------------------------------------------------------
    // Current recording
    // ------------------------------------------------------------------

    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_deref()
    }

    pub fn has_recording(&self) -> bool {
        self.recording.as_ref().is_some_and(|r| r.has_recording())
    }

    /// Replace the current recording wholesale
    pub fn load_recording(&mut self, recording: Recording) {
        info!(
            name = %recording.metadata.name,
            left = recording.left.len(),
            right = recording.right.len(),
            duration_ms = recording.duration,
            "Recording loaded"
        );
        self.recording = Some(Arc::new(recording));
    }

    /// Parse and load a storage payload. On error the current recording is kept.
    pub fn load_recording_json(&mut self, json: &str) -> crate::Result<()> {
        let recording = Recording::from_json(json)?;
        self.load_recording(recording);
        Ok(())
    }

    /// Load a recording file. On error the current recording is kept.
    pub fn load_recording_file(&mut self, path: &Path) -> crate::Result<()> {
        let recording = Recording::load(path)?;
        self.load_recording(recording);
        Ok(())
    }

    /// Storage payload for the current recording
    pub fn recording_json(&self) -> crate::Result<Option<String>> {
        self.recording.as_ref().map(|r| r.to_json()).transpose()
    }
}

impl Default for PuppetShow {
    fn default() -> Self {
        Self::new(GateThresholds::default(), PlaybackMode::default())
    }
}
