//! Three-Box Hand Rig
//!
//! Reference rig poser driven by [`HandFeatures`]. Each hand is three rigid
//! parts:
//!
//! | Part    | Pivot         | Up axis points at         |
//! |---------|---------------|---------------------------|
//! | palm    | `palm_center` | `hand_center − wrist`     |
//! | fingers | `hand_center` | `finger_top − hand_center`|
//! | thumb   | `wrist`       | `thumb − wrist`           |
//!
//! After aligning its local +Y with the up direction, every part is turned
//! so its local +X meets `right_palm_direction`. Both rotations are
//! shortest-arc and compose onto the part's previous orientation, so the rig
//! moves smoothly frame to frame.

use crate::capture::types::HandSide;
use crate::capture::xyz;
use crate::features::HandFeatures;
use crate::playback::PoseSink;
use nalgebra::{UnitQuaternion, Vector3};
use serde::Serialize;

/// Position and orientation of one rigid part
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartTransform {
    #[serde(with = "xyz")]
    pub position: Vector3<f64>,
    /// `[i, j, k, w]`
    pub orientation: UnitQuaternion<f64>,
}

impl Default for PartTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

impl PartTransform {
    /// Local +Y in world space
    pub fn up(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    /// Local +X in world space
    pub fn right(&self) -> Vector3<f64> {
        self.orientation * Vector3::x()
    }

    /// Move to `position`, then swing up toward `up_direction` and right
    /// toward `right_direction`.
    fn orient(&mut self, position: Vector3<f64>, up_direction: &Vector3<f64>, right_direction: &Vector3<f64>) {
        self.position = position;
        self.rotate_axis_toward(Vector3::y(), up_direction);
        self.rotate_axis_toward(Vector3::x(), right_direction);
    }

    /// Shortest-arc turn taking local `axis` onto `target`. Zero-length or
    /// exactly opposite targets leave the orientation as is.
    fn rotate_axis_toward(&mut self, axis: Vector3<f64>, target: &Vector3<f64>) {
        let current = self.orientation * axis;
        if let Some(rotation) = UnitQuaternion::rotation_between(&current, target) {
            self.orientation = rotation * self.orientation;
        }
    }
}

/// Palm, finger and thumb parts of one hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HandRig {
    pub palm: PartTransform,
    pub fingers: PartTransform,
    pub thumb: PartTransform,
}

impl HandRig {
    /// Pose all three parts from one feature frame
    pub fn update(&mut self, features: &HandFeatures) {
        let right = &features.right_palm_direction;
        self.palm.orient(
            features.palm_center,
            &(features.hand_center - features.wrist),
            right,
        );
        self.fingers.orient(
            features.hand_center,
            &(features.finger_top - features.hand_center),
            right,
        );
        self.thumb.orient(features.wrist, &(features.thumb - features.wrist), right);
    }
}

/// Two-handed rig implementing [`PoseSink`]
#[derive(Debug, Clone, Default)]
pub struct PuppetRig {
    hands: [HandRig; 2],
    updates: [u64; 2],
    finished: bool,
}

impl PuppetRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self, side: HandSide) -> &HandRig {
        &self.hands[side.index()]
    }

    /// Number of frames applied to one side
    pub fn updates(&self, side: HandSide) -> u64 {
        self.updates[side.index()]
    }

    /// Whether the last playback session has reported its end
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Back to the rest pose
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl PoseSink for PuppetRig {
    fn pose(&mut self, side: HandSide, features: &HandFeatures) {
        self.hands[side.index()].update(features);
        self.updates[side.index()] += 1;
        self.finished = false;
    }

    fn playback_finished(&mut self) {
        self.finished = true;
    }
}
