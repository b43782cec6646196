//! Workflow Module
//!
//! Ties recorder, recording storage and playback together behind the two
//! entry points a host application drives: one per detection cycle and one
//! per render tick.

pub mod recording;
pub mod show;

pub use recording::{Keyframe, Recording, RecordingMetadata, CURRENT_FORMAT_VERSION};
pub use show::PuppetShow;
