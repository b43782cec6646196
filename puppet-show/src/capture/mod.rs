//! Pose capture module
//!
//! Raw per-hand poses as the detection model produces them, the landmark
//! convention they follow, and a lock-free hand-off buffer so a detection
//! callback never blocks on the recorder.

pub mod types;
pub mod xyz;
pub mod dump;
pub mod ring_buffer;

pub use types::*;
pub use dump::{read_detection_dump, DetectionCycle};
pub use ring_buffer::{PoseConsumer, PoseProducer, PoseRingBuffer, PoseSlot, RingBufferStats};
