//! Geometric Feature Extraction
//!
//! Reduces a 21-point skeleton to a [`HandFeatures`] frame. Raw landmarks
//! are noisy and not coplanar; projecting the finger top, thumb and wrist
//! onto the palm's hinge plane removes twist jitter along the view axis and
//! keeps only the degrees of freedom the rig uses (palm tilt, finger curl
//! axis, thumb spread).
//!
//! Algorithm:
//! 1. hand center = mean of knuckles {5, 9, 13, 17}
//! 2. raw finger top = mean of tips {8, 12, 16, 20}
//! 3. right palm direction = normalize(hand center − pinky knuckle)
//! 4. project raw finger top, thumb tip (4) and wrist (0) onto the plane
//!    through the hand center with that normal
//! 5. palm center = midpoint of hand center and projected wrist

use super::hand_features::HandFeatures;
use crate::capture::types::{RawPose, FINGER_TIPS, KNUCKLES, LANDMARK_COUNT, PINKY_MCP, THUMB_TIP, WRIST};
use nalgebra::Vector3;

/// Plane given by a coplanar point and a normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPlane {
    pub point: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl HandPlane {
    pub fn new(point: Vector3<f64>, normal: Vector3<f64>) -> Self {
        Self { point, normal }
    }

    /// Signed distance of `p` along the normal (normal assumed unit length)
    #[inline]
    pub fn distance_to(&self, p: &Vector3<f64>) -> f64 {
        (p - self.point).dot(&self.normal)
    }

    /// Orthogonal projection of `p` onto the plane
    #[inline]
    pub fn project(&self, p: &Vector3<f64>) -> Vector3<f64> {
        p - self.normal * self.distance_to(p)
    }
}

/// Arithmetic mean of `points`
pub fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc: Vector3<f64>, p| acc + p);
    sum / points.len() as f64
}

/// Unit vector, or zero when the input has no usable length
#[inline]
fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Extract the feature frame from a raw pose.
pub fn extract_features(pose: &RawPose) -> HandFeatures {
    extract_from_landmarks(&pose.positions)
}

/// Extract the feature frame from 21 landmarks.
pub fn extract_from_landmarks(positions: &[Vector3<f64>; LANDMARK_COUNT]) -> HandFeatures {
    let hand_center = centroid(&KNUCKLES.map(|i| positions[i]));
    let finger_top_raw = centroid(&FINGER_TIPS.map(|i| positions[i]));
    let right_palm_direction = normalize_or_zero(&(hand_center - positions[PINKY_MCP]));

    let hinge = HandPlane::new(hand_center, right_palm_direction);
    let finger_top = hinge.project(&finger_top_raw);
    let thumb = hinge.project(&positions[THUMB_TIP]);
    let wrist = hinge.project(&positions[WRIST]);
    let palm_center = centroid(&[hand_center, wrist]);

    HandFeatures {
        palm_center,
        hand_center,
        finger_top,
        thumb,
        wrist,
        right_palm_direction,
    }
}
