//! Landmark extraction: raw estimator output → validated frame record.
//!
//! The adapter is a pure transform. It rejects a frame when the estimator
//! found no pose, when any of the 13 landmarks is missing, or when a
//! landmark does not carry exactly three coordinates. A landmark whose
//! coordinates are present but unusable (`null`, NaN, infinite) is degraded
//! to the zero vector instead; the geometry helpers turn the resulting
//! degenerate angles into `0.0`.

use swingscope_pose_model::{
    AngleSet, FrameRecord, Landmark, LandmarkError, LandmarkFrame, LandmarkSet, Point3,
    PoseDetection, RawLandmark,
};

use crate::geometry::{angle_between, rotation_degrees, tilt_from_vertical};

/// Build a validated [`LandmarkFrame`] from one frame's estimator output.
pub fn extract_landmarks(
    frame_index: usize,
    detection: Option<&PoseDetection>,
) -> Result<LandmarkFrame, LandmarkError> {
    let detection = detection.ok_or(LandmarkError::NoPose)?;

    let mut landmarks = LandmarkSet::uniform(Point3::ZERO);
    let mut visibilities = Vec::with_capacity(Landmark::COUNT);

    for landmark in Landmark::ALL {
        let raw = detection
            .get(landmark.name())
            .ok_or(LandmarkError::Missing(landmark))?;

        if raw.coords.len() != 3 {
            return Err(LandmarkError::Malformed {
                landmark,
                len: raw.coords.len(),
            });
        }

        let point = coordinates(raw).unwrap_or_else(|| {
            tracing::debug!(
                frame = frame_index,
                %landmark,
                "Unusable coordinates, using zero vector"
            );
            Point3::ZERO
        });
        landmarks.set(landmark, point);

        if let Some(v) = raw.visibility.filter(|v| v.is_finite()) {
            visibilities.push(v);
        }
    }

    let confidence = if visibilities.is_empty() {
        1.0
    } else {
        visibilities.iter().sum::<f64>() / visibilities.len() as f64
    };

    Ok(LandmarkFrame::new(frame_index, landmarks, confidence))
}

fn coordinates(raw: &RawLandmark) -> Option<Point3> {
    match raw.coords.as_slice() {
        [Some(x), Some(y), Some(z)] => {
            let p = Point3::new(*x, *y, *z);
            p.is_finite().then_some(p)
        }
        _ => None,
    }
}

/// Derive every angle of [`AngleSet`] from one frame.
pub fn compute_angles(frame: &LandmarkFrame) -> AngleSet {
    let p = |l: Landmark| frame.point(l);

    let hip_center = p(Landmark::LeftHip).midpoint(p(Landmark::RightHip));
    let shoulder_center = p(Landmark::LeftShoulder).midpoint(p(Landmark::RightShoulder));

    AngleSet {
        right_arm: angle_between(
            p(Landmark::RightShoulder),
            p(Landmark::RightElbow),
            p(Landmark::RightWrist),
        ),
        left_arm: angle_between(
            p(Landmark::LeftShoulder),
            p(Landmark::LeftElbow),
            p(Landmark::LeftWrist),
        ),
        right_knee_angle: angle_between(
            p(Landmark::RightHip),
            p(Landmark::RightKnee),
            p(Landmark::RightAnkle),
        ),
        left_knee_angle: angle_between(
            p(Landmark::LeftHip),
            p(Landmark::LeftKnee),
            p(Landmark::LeftAnkle),
        ),
        shoulder_rotation: rotation_degrees(p(Landmark::LeftShoulder), p(Landmark::RightShoulder)),
        hip_rotation: rotation_degrees(p(Landmark::LeftHip), p(Landmark::RightHip)),
        spine_angle: tilt_from_vertical(hip_center, shoulder_center),
    }
}

/// Extract landmarks and derive angles in one step.
pub fn extract_record(
    frame_index: usize,
    detection: Option<&PoseDetection>,
) -> Result<FrameRecord, LandmarkError> {
    let landmarks = extract_landmarks(frame_index, detection)?;
    let angles = compute_angles(&landmarks);
    Ok(FrameRecord::new(landmarks, angles))
}
