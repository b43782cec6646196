//! Millisecond timing
//!
//! Raw poses, recorder sessions and playback sessions all speak the same
//! unit: floating-point milliseconds since a process-wide origin.
//! - Monotonic (never goes backward)
//! - Injectable, so the core can be driven with synthetic timestamps

pub mod clock;

pub use clock::{Clock, ManualClock, SessionClock};
