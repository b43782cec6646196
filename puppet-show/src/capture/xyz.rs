//! `{ "x": .., "y": .., "z": .. }` object form for vectors.
//!
//! Detection models and the recording payload both spell points as objects,
//! not the `[x, y, z]` arrays nalgebra writes by default. Use with
//! `#[serde(with = "xyz")]` on a `Vector3<f64>` field, or
//! `#[serde(with = "xyz::landmarks")]` on a full 21-point skeleton.

use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct Xyz {
    x: f64,
    y: f64,
    z: f64,
}

impl From<&Vector3<f64>> for Xyz {
    fn from(v: &Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Xyz> for Vector3<f64> {
    fn from(p: Xyz) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}

pub fn serialize<S: Serializer>(v: &Vector3<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    Xyz::from(v).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector3<f64>, D::Error> {
    Xyz::deserialize(deserializer).map(Vector3::from)
}

pub mod landmarks {
    use super::Xyz;
    use crate::capture::types::LANDMARK_COUNT;
    use nalgebra::Vector3;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        points: &[Vector3<f64>; LANDMARK_COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(points.iter().map(Xyz::from))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[Vector3<f64>; LANDMARK_COUNT], D::Error> {
        let points = Vec::<Xyz>::deserialize(deserializer)?;
        let len = points.len();
        let points: Vec<Vector3<f64>> = points.into_iter().map(Vector3::from).collect();
        points
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"21 landmarks"))
    }
}
