//! Keyframe playback
//!
//! Drives a frozen recording on a wall-clock timeline and hands per-side
//! feature frames to a [`PoseSink`].

pub mod scheduler;

pub use scheduler::{PlaybackMode, PlaybackScheduler, PlaybackTick, PoseSink};
