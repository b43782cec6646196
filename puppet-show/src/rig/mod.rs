//! Rig posing

pub mod puppet;

pub use puppet::{HandRig, PartTransform, PuppetRig};
