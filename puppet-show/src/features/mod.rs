//! Hand feature extraction
//!
//! Turns 21 raw skeletal landmarks into a stable 6-point orientation frame
//! using hand-plane projection.

pub mod hand_features;
pub mod extractor;

pub use hand_features::HandFeatures;
pub use extractor::{centroid, extract_features, extract_from_landmarks, HandPlane};
