//! Raw pose estimator output.
//!
//! This is what an estimator hands back before any validation: landmark
//! names as strings, coordinate lists of any length, and holes where the
//! estimator failed to produce a number.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::landmark::LandmarkSet;

/// One landmark as reported by the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLandmark {
    /// Expected `[x, y, z]`; `null` marks a coordinate the estimator could
    /// not produce. Non-numeric entries read as `null`, and anything other
    /// than a list reads as an empty list.
    #[serde(default, deserialize_with = "lenient_coords")]
    pub coords: Vec<Option<f64>>,

    /// Visibility/confidence in `[0.0, 1.0]`, if reported. Non-numeric
    /// values read as unreported.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility: Option<f64>,
}

fn lenient_coords<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(Value::as_f64).collect(),
        _ => Vec::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

impl RawLandmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: Option<f64>) -> Self {
        Self {
            coords: vec![Some(x), Some(y), Some(z)],
            visibility,
        }
    }
}

/// A detected pose: named landmarks for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDetection {
    pub landmarks: BTreeMap<String, RawLandmark>,
}

impl PoseDetection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, landmark: RawLandmark) {
        self.landmarks.insert(name.into(), landmark);
    }

    pub fn get(&self, name: &str) -> Option<&RawLandmark> {
        self.landmarks.get(name)
    }

    /// Raw form of a complete landmark set with uniform visibility.
    pub fn from_landmarks(set: &LandmarkSet, visibility: f64) -> Self {
        let landmarks = set
            .iter()
            .map(|(landmark, p)| {
                (
                    landmark.name().to_string(),
                    RawLandmark::new(p.x, p.y, p.z, Some(visibility)),
                )
            })
            .collect();
        Self { landmarks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, Point3};

    #[test]
    fn test_from_landmarks_names_every_point() {
        let set = LandmarkSet::uniform(Point3::new(0.4, 0.5, 0.0));
        let detection = PoseDetection::from_landmarks(&set, 0.9);
        assert_eq!(detection.landmarks.len(), Landmark::COUNT);
        let nose = detection.get("nose").unwrap();
        assert_eq!(nose.coords, vec![Some(0.4), Some(0.5), Some(0.0)]);
        assert_eq!(nose.visibility, Some(0.9));
    }

    #[test]
    fn test_null_coordinates_parse() {
        let raw: RawLandmark = serde_json::from_str(r#"{"coords":[0.1,null,0.0]}"#).unwrap();
        assert_eq!(raw.coords, vec![Some(0.1), None, Some(0.0)]);
        assert_eq!(raw.visibility, None);
    }

    #[test]
    fn test_non_numeric_output_degrades() {
        let raw: RawLandmark =
            serde_json::from_str(r#"{"coords":["bad",0.2,{"z":0}],"visibility":"high"}"#).unwrap();
        assert_eq!(raw.coords, vec![None, Some(0.2), None]);
        assert_eq!(raw.visibility, None);

        let raw: RawLandmark = serde_json::from_str(r#"{"coords":"0.1,0.2,0.0"}"#).unwrap();
        assert!(raw.coords.is_empty());
    }
}
