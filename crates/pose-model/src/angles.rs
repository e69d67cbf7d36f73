//! Derived per-frame angles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named angle derived from one frame's landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleKind {
    /// Right elbow angle (shoulder-elbow-wrist), degrees in `[0, 180]`.
    RightArm,
    /// Left elbow angle (shoulder-elbow-wrist), degrees in `[0, 180]`.
    LeftArm,
    /// Right knee angle (hip-knee-ankle), degrees in `[0, 180]`.
    #[serde(rename = "right_knee_angle")]
    RightKnee,
    /// Left knee angle (hip-knee-ankle), degrees in `[0, 180]`.
    #[serde(rename = "left_knee_angle")]
    LeftKnee,
    /// Arctangent of the left-to-right shoulder line, degrees in `(-180, 180]`.
    ShoulderRotation,
    /// Arctangent of the left-to-right hip line, degrees in `(-180, 180]`.
    HipRotation,
    /// Forward tilt of the trunk from image vertical, degrees in `[0, 180]`.
    SpineAngle,
}

impl AngleKind {
    pub const ALL: [AngleKind; 7] = [
        AngleKind::RightArm,
        AngleKind::LeftArm,
        AngleKind::RightKnee,
        AngleKind::LeftKnee,
        AngleKind::ShoulderRotation,
        AngleKind::HipRotation,
        AngleKind::SpineAngle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AngleKind::RightArm => "right_arm",
            AngleKind::LeftArm => "left_arm",
            AngleKind::RightKnee => "right_knee_angle",
            AngleKind::LeftKnee => "left_knee_angle",
            AngleKind::ShoulderRotation => "shoulder_rotation",
            AngleKind::HipRotation => "hip_rotation",
            AngleKind::SpineAngle => "spine_angle",
        }
    }

    /// Whether the value is an unbounded arctangent proxy rather than
    /// an angle between two vectors.
    pub fn is_rotation_proxy(self) -> bool {
        matches!(self, AngleKind::ShoulderRotation | AngleKind::HipRotation)
    }
}

impl fmt::Display for AngleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All derived angles for one frame, in degrees.
///
/// Computed once from a single landmark frame; a new frame produces a new set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSet {
    pub right_arm: f64,
    pub left_arm: f64,
    pub right_knee_angle: f64,
    pub left_knee_angle: f64,
    pub shoulder_rotation: f64,
    pub hip_rotation: f64,
    pub spine_angle: f64,
}

impl AngleSet {
    pub fn get(&self, kind: AngleKind) -> f64 {
        match kind {
            AngleKind::RightArm => self.right_arm,
            AngleKind::LeftArm => self.left_arm,
            AngleKind::RightKnee => self.right_knee_angle,
            AngleKind::LeftKnee => self.left_knee_angle,
            AngleKind::ShoulderRotation => self.shoulder_rotation,
            AngleKind::HipRotation => self.hip_rotation,
            AngleKind::SpineAngle => self.spine_angle,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngleKind, f64)> + '_ {
        AngleKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_matches_fields() {
        let set = AngleSet {
            right_arm: 1.0,
            left_arm: 2.0,
            right_knee_angle: 3.0,
            left_knee_angle: 4.0,
            shoulder_rotation: 5.0,
            hip_rotation: 6.0,
            spine_angle: 7.0,
        };
        let values: Vec<f64> = set.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_serialized_field_names_match_kind_names() {
        let json = serde_json::to_value(AngleSet::default()).unwrap();
        for kind in AngleKind::ALL {
            assert!(json.get(kind.name()).is_some(), "missing {kind}");
            let via_serde = serde_json::to_value(kind).unwrap();
            assert_eq!(via_serde, serde_json::json!(kind.name()));
        }
    }

    #[test]
    fn test_rotation_proxies() {
        assert!(AngleKind::ShoulderRotation.is_rotation_proxy());
        assert!(!AngleKind::SpineAngle.is_rotation_proxy());
    }
}
