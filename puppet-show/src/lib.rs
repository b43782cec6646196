//! # Puppet Show
//!
//! Captures a stream of hand poses from a landmark-detection model, keeps only
//! the frames worth keeping as a compact keyframe recording, and replays that
//! recording later with time-accurate interpolation, one hand side at a time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use puppet_show::{PlaybackMode, PuppetShow, RawPose};
//! use puppet_show::recorder::GateThresholds;
//! use puppet_show::rig::PuppetRig;
//!
//! let mut show = PuppetShow::new(GateThresholds::default(), PlaybackMode::Interpolated);
//!
//! // Detection callback: feed each detection cycle's poses
//! show.start_recording(0.0);
//! let poses: Vec<RawPose> = Vec::new(); // ... from the detection model ...
//! show.on_raw_poses(poses);
//! show.stop_recording(2_000.0);
//!
//! // Render callback: advance playback and pose the rig
//! let mut rig = PuppetRig::default();
//! if show.play(2_100.0) {
//!     show.on_tick(2_116.0, &mut rig);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`capture`]: Raw poses, landmark indices and the detection hand-off buffer
//! - [`features`]: 21 landmarks → 6-point hand feature frame
//! - [`recorder`]: Confidence / time / motion gated keyframe recorder
//! - [`playback`]: Wall-clock driven per-side playback scheduler
//! - [`rig`]: Reference rig poser consuming hand features
//! - [`time`]: Millisecond session clocks
//! - [`workflow`]: Recording format and the `PuppetShow` facade
//! - [`app`]: CLI and configuration management
//!
//! ## Pose Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Detection  │───▶│ Ring Buffer │───▶│    Pose     │───▶│  Recording  │
//! │  (RawPose)  │    │ (lock-free) │    │  Recorder   │    │ (keyframes) │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//!                    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!                    │  Rig Poser  │◀───│  Playback   │◀───│ JSON load / │
//!                    │ (PoseSink)  │    │  Scheduler  │    │    save     │
//!                    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod capture;
pub mod features;
pub mod recorder;
pub mod playback;
pub mod rig;
pub mod app;
pub mod workflow;

// Re-export commonly used types
pub use capture::types::{HandSide, RawPose, LANDMARK_COUNT};
pub use capture::ring_buffer::PoseRingBuffer;
pub use features::{extract_features, HandFeatures};
pub use recorder::{PoseRecorder, RecordOutcome};
pub use playback::{PlaybackMode, PlaybackScheduler, PlaybackTick, PoseSink};
pub use time::clock::{Clock, ManualClock, SessionClock};
pub use workflow::{Keyframe, PuppetShow, Recording};

/// Result type alias for puppet show operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for puppet show
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
