//! Hand feature frame
//!
//! Six points/directions that are enough to drive a three-box hand rig
//! (palm, fingers, thumb).

use crate::capture::xyz;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Compact orientation frame for one hand
///
/// `right_palm_direction` is unit length when produced by
/// [`extract_features`](super::extract_features); `finger_top`, `thumb` and
/// `wrist` lie on the plane through `hand_center` with that normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandFeatures {
    /// Midpoint of hand center and projected wrist
    #[serde(with = "xyz")]
    pub palm_center: Vector3<f64>,
    /// Mean of the four finger-base knuckles
    #[serde(with = "xyz")]
    pub hand_center: Vector3<f64>,
    /// Mean finger tip, projected onto the hand plane
    #[serde(with = "xyz")]
    pub finger_top: Vector3<f64>,
    /// Thumb tip, projected onto the hand plane
    #[serde(with = "xyz")]
    pub thumb: Vector3<f64>,
    /// Wrist, projected onto the hand plane
    #[serde(with = "xyz")]
    pub wrist: Vector3<f64>,
    /// Hand plane normal, pointing from the pinky knuckle toward the hand center
    #[serde(with = "xyz")]
    pub right_palm_direction: Vector3<f64>,
}

impl HandFeatures {
    /// Componentwise linear interpolation toward `next`.
    ///
    /// `alpha = 0` returns `self` exactly and `alpha = 1` returns `next`
    /// exactly. The direction is interpolated as a plain vector and is not
    /// re-normalized.
    pub fn lerp(&self, next: &HandFeatures, alpha: f64) -> HandFeatures {
        HandFeatures {
            palm_center: self.palm_center.lerp(&next.palm_center, alpha),
            hand_center: self.hand_center.lerp(&next.hand_center, alpha),
            finger_top: self.finger_top.lerp(&next.finger_top, alpha),
            thumb: self.thumb.lerp(&next.thumb, alpha),
            wrist: self.wrist.lerp(&next.wrist, alpha),
            right_palm_direction: self
                .right_palm_direction
                .lerp(&next.right_palm_direction, alpha),
        }
    }

    /// The six vectors in declaration order
    pub fn vectors(&self) -> [&Vector3<f64>; 6] {
        [
            &self.palm_center,
            &self.hand_center,
            &self.finger_top,
            &self.thumb,
            &self.wrist,
            &self.right_palm_direction,
        ]
    }
}
