//! Named body landmarks and per-frame landmark sets.
//!
//! A [`LandmarkFrame`] always carries all 13 landmarks. Frames with missing
//! or malformed estimator data are rejected before one is ever built, so
//! downstream code never sees a partially populated frame.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// The 13 anatomical points tracked for swing analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    /// Number of tracked landmarks.
    pub const COUNT: usize = 13;

    /// All landmarks in slot order.
    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Snake-case name used in serialized data.
    pub fn name(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftElbow => "left_elbow",
            Landmark::RightElbow => "right_elbow",
            Landmark::LeftWrist => "left_wrist",
            Landmark::RightWrist => "right_wrist",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    /// Index of this landmark in the 33-point BlazePose topology.
    pub fn blazepose_index(self) -> usize {
        match self {
            Landmark::Nose => 0,
            Landmark::LeftShoulder => 11,
            Landmark::RightShoulder => 12,
            Landmark::LeftElbow => 13,
            Landmark::RightElbow => 14,
            Landmark::LeftWrist => 15,
            Landmark::RightWrist => 16,
            Landmark::LeftHip => 23,
            Landmark::RightHip => 24,
            Landmark::LeftKnee => 25,
            Landmark::RightKnee => 26,
            Landmark::LeftAnkle => 27,
            Landmark::RightAnkle => 28,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 3D point. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ZERO: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point in the image plane (`z = 0`).
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Projection onto the image plane.
    pub fn xy(self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn midpoint(self, other: Point3) -> Point3 {
        (self + other) * 0.5
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Why a frame's pose data could not become a [`LandmarkFrame`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkError {
    #[error("Estimator reported no pose")]
    NoPose,

    #[error("Missing landmark: {0}")]
    Missing(Landmark),

    #[error("Malformed landmark {landmark}: expected 3 coordinates, got {len}")]
    Malformed { landmark: Landmark, len: usize },
}

/// Positions for all 13 landmarks. Serialized as a name-keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Landmark, Point3>",
    into = "BTreeMap<Landmark, Point3>"
)]
pub struct LandmarkSet {
    points: [Point3; Landmark::COUNT],
}

impl LandmarkSet {
    /// Build a set by evaluating `f` for every landmark.
    pub fn from_fn(mut f: impl FnMut(Landmark) -> Point3) -> Self {
        let mut points = [Point3::ZERO; Landmark::COUNT];
        for landmark in Landmark::ALL {
            points[landmark.slot()] = f(landmark);
        }
        Self { points }
    }

    /// Every landmark at the same position.
    pub fn uniform(point: Point3) -> Self {
        Self::from_fn(|_| point)
    }

    pub fn get(&self, landmark: Landmark) -> Point3 {
        self.points[landmark.slot()]
    }

    /// Replace one landmark's position.
    pub fn set(&mut self, landmark: Landmark, point: Point3) {
        self.points[landmark.slot()] = point;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, Point3)> + '_ {
        Landmark::ALL.into_iter().map(|l| (l, self.get(l)))
    }
}

impl TryFrom<BTreeMap<Landmark, Point3>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(map: BTreeMap<Landmark, Point3>) -> Result<Self, Self::Error> {
        if let Some(missing) = Landmark::ALL.into_iter().find(|l| !map.contains_key(l)) {
            return Err(LandmarkError::Missing(missing));
        }
        Ok(Self::from_fn(|l| map[&l]))
    }
}

impl From<LandmarkSet> for BTreeMap<Landmark, Point3> {
    fn from(set: LandmarkSet) -> Self {
        set.iter().collect()
    }
}

/// One video frame's validated landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Index of the decoded frame in the source video.
    pub frame_index: usize,

    /// Positions of all 13 landmarks.
    pub landmarks: LandmarkSet,

    /// Mean estimator confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl LandmarkFrame {
    /// Create a frame, clamping confidence to `[0.0, 1.0]`.
    pub fn new(frame_index: usize, landmarks: LandmarkSet, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            frame_index,
            landmarks,
            confidence,
        }
    }

    pub fn point(&self, landmark: Landmark) -> Point3 {
        self.landmarks.get(landmark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_names_roundtrip() {
        for landmark in Landmark::ALL {
            assert_eq!(Landmark::from_name(landmark.name()), Some(landmark));
        }
        assert_eq!(Landmark::from_name("left_ear"), None);
    }

    #[test]
    fn test_blazepose_indices_are_unique() {
        let mut indices: Vec<usize> = Landmark::ALL.iter().map(|l| l.blazepose_index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), Landmark::COUNT);
    }

    #[test]
    fn test_point_serializes_as_triple() {
        let json = serde_json::to_string(&Point3::new(0.5, 0.25, -0.1)).unwrap();
        assert_eq!(json, "[0.5,0.25,-0.1]");
    }

    #[test]
    fn test_landmark_set_serializes_as_named_map() {
        let set = LandmarkSet::uniform(Point3::new(0.1, 0.2, 0.3));
        let json = serde_json::to_value(set).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), Landmark::COUNT);
        assert!(map.contains_key("right_shoulder"));
        assert_eq!(map["nose"], serde_json::json!([0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_landmark_set_rejects_missing_entry() {
        let mut value = serde_json::to_value(LandmarkSet::uniform(Point3::ZERO)).unwrap();
        value.as_object_mut().unwrap().remove("left_knee");
        let err = serde_json::from_value::<LandmarkSet>(value).unwrap_err();
        assert!(err.to_string().contains("left_knee"));
    }

    #[test]
    fn test_landmark_set_rejects_wrong_arity() {
        let mut value = serde_json::to_value(LandmarkSet::uniform(Point3::ZERO)).unwrap();
        value["nose"] = serde_json::json!([0.1, 0.2]);
        assert!(serde_json::from_value::<LandmarkSet>(value).is_err());
    }

    #[test]
    fn test_frame_confidence_is_clamped() {
        let set = LandmarkSet::uniform(Point3::ZERO);
        assert_eq!(LandmarkFrame::new(0, set, 1.7).confidence, 1.0);
        assert_eq!(LandmarkFrame::new(0, set, -0.2).confidence, 0.0);
        assert_eq!(LandmarkFrame::new(0, set, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(3.0, 2.0, 1.0);
        assert_eq!(a.midpoint(b), Point3::new(2.0, 2.0, 2.0));
        assert_eq!((b - a).norm(), 8.0_f64.sqrt());
        assert_eq!(a.dot(b), 10.0);
    }
}
