//! Deterministic parametric golf swing.
//!
//! Produces a face-on swing with known phase timing over a normalized
//! timeline `t ∈ [0, 1]`:
//!
//! | Stage | `t` | Shoulder turn | Right arm |
//! |-------|-----|---------------|-----------|
//! | address hold | `< 0.2` | 0° | 172° |
//! | backswing | `0.2 – 0.5` | 0° → 90° | 172° → 90° |
//! | downswing | `0.5 – 0.7` | 90° → 0° | 90° → 172° |
//! | follow-through | `0.7 – 1.0` | 0° → −60° | 172° → 100° |
//!
//! Hips turn half as far as the shoulders on the way back and a little less
//! on the way through. The trail knee flexes from 165° to 140° during the
//! follow-through, and the spine keeps a 35° forward tilt throughout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use swingscope_common::SwingResult;
use swingscope_pose_model::{Landmark, LandmarkSet, Point3, PoseDetection, TrackFrame, VideoInfo};

use crate::replay::TrackWriter;

const HIP_CENTER: (f64, f64) = (0.5, 0.6);
const SPINE_TILT: f64 = 35.0;
const TORSO: f64 = 0.25;
const SHOULDER_HALF_WIDTH: f64 = 0.1;
const HIP_HALF_WIDTH: f64 = 0.08;
const ARM_SEGMENT: f64 = 0.12;
const LEG_SEGMENT: f64 = 0.15;
const HEAD_HEIGHT: f64 = 0.12;
const LEAD_ARM: f64 = 175.0;
const LEAD_KNEE: f64 = 165.0;

/// Parameters of a generated swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSwing {
    pub frames: usize,
    pub fps: f64,
    pub width: u32,
    pub height: u32,

    /// Peak side-to-side nose drift (normalized units).
    pub head_sway: f64,

    /// Estimator visibility reported for every landmark.
    pub visibility: f64,

    /// Drop the pose on every n-th frame (`0` keeps every pose).
    pub dropout_every: usize,
}

impl Default for SyntheticSwing {
    fn default() -> Self {
        Self {
            frames: 100,
            fps: 30.0,
            width: 1280,
            height: 720,
            head_sway: 0.0,
            visibility: 0.95,
            dropout_every: 0,
        }
    }
}

/// Body configuration at one instant, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stance {
    shoulder_turn: f64,
    hip_turn: f64,
    right_arm: f64,
    right_knee: f64,
}

fn stance(t: f64) -> Stance {
    let address = Stance {
        shoulder_turn: 0.0,
        hip_turn: 0.0,
        right_arm: 172.0,
        right_knee: LEAD_KNEE,
    };
    if t < 0.2 {
        address
    } else if t < 0.5 {
        let p = (t - 0.2) / 0.3;
        Stance {
            shoulder_turn: 90.0 * p,
            hip_turn: 45.0 * p,
            right_arm: 172.0 - 82.0 * p,
            ..address
        }
    } else if t < 0.7 {
        let p = (t - 0.5) / 0.2;
        Stance {
            shoulder_turn: 90.0 * (1.0 - p),
            hip_turn: 45.0 * (1.0 - p),
            right_arm: 90.0 + 82.0 * p,
            ..address
        }
    } else {
        let p = ((t - 0.7) / 0.3).min(1.0);
        Stance {
            shoulder_turn: -60.0 * p,
            hip_turn: -25.0 * p,
            right_arm: 172.0 - 72.0 * (2.0 * p).min(1.0),
            right_knee: LEAD_KNEE - 25.0 * p,
        }
    }
}

/// Rotate a 2D vector counter-clockwise (in image coordinates) by `degrees`.
fn rotate(v: (f64, f64), degrees: f64) -> (f64, f64) {
    let (s, c) = degrees.to_radians().sin_cos();
    (c * v.0 - s * v.1, s * v.0 + c * v.1)
}

fn offset(p: Point3, v: (f64, f64), length: f64) -> Point3 {
    Point3::planar(p.x + v.0 * length, p.y + v.1 * length)
}

/// Elbow and wrist for a shoulder hanging straight down with angle `elbow_angle`.
fn arm(shoulder: Point3, elbow_angle: f64) -> (Point3, Point3) {
    let elbow = offset(shoulder, (0.0, 1.0), ARM_SEGMENT);
    let wrist = offset(elbow, rotate((0.0, -1.0), elbow_angle), ARM_SEGMENT);
    (elbow, wrist)
}

/// Knee and ankle below a hip with angle `knee_angle`.
fn leg(hip: Point3, knee_angle: f64) -> (Point3, Point3) {
    let knee = offset(hip, (0.0, 1.0), LEG_SEGMENT);
    let ankle = offset(knee, rotate((0.0, -1.0), knee_angle), LEG_SEGMENT);
    (knee, ankle)
}

impl SyntheticSwing {
    pub fn with_frames(frames: usize) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    pub fn info(&self) -> VideoInfo {
        VideoInfo {
            frame_count: self.frames,
            fps: self.fps,
            width: self.width,
            height: self.height,
        }
    }

    /// Timeline position of frame `index`.
    pub fn time_of(&self, index: usize) -> f64 {
        if self.frames <= 1 {
            0.0
        } else {
            index as f64 / (self.frames - 1) as f64
        }
    }

    /// Landmarks at timeline position `t`.
    pub fn pose_at(&self, t: f64) -> LandmarkSet {
        let s = stance(t);
        let hips = Point3::planar(HIP_CENTER.0, HIP_CENTER.1);
        let chest = offset(hips, rotate((0.0, -1.0), SPINE_TILT), TORSO);

        let across = rotate((1.0, 0.0), s.shoulder_turn);
        let right_shoulder = offset(chest, across, SHOULDER_HALF_WIDTH);
        let left_shoulder = offset(chest, across, -SHOULDER_HALF_WIDTH);

        let across = rotate((1.0, 0.0), s.hip_turn);
        let right_hip = offset(hips, across, HIP_HALF_WIDTH);
        let left_hip = offset(hips, across, -HIP_HALF_WIDTH);

        let (right_elbow, right_wrist) = arm(right_shoulder, s.right_arm);
        let (left_elbow, left_wrist) = arm(left_shoulder, LEAD_ARM);
        let (right_knee, right_ankle) = leg(right_hip, s.right_knee);
        let (left_knee, left_ankle) = leg(left_hip, LEAD_KNEE);

        let sway = self.head_sway * (std::f64::consts::TAU * t).sin();
        let nose = Point3::planar(chest.x + sway, chest.y - HEAD_HEIGHT);

        LandmarkSet::from_fn(|landmark| match landmark {
            Landmark::Nose => nose,
            Landmark::LeftShoulder => left_shoulder,
            Landmark::RightShoulder => right_shoulder,
            Landmark::LeftElbow => left_elbow,
            Landmark::RightElbow => right_elbow,
            Landmark::LeftWrist => left_wrist,
            Landmark::RightWrist => right_wrist,
            Landmark::LeftHip => left_hip,
            Landmark::RightHip => right_hip,
            Landmark::LeftKnee => left_knee,
            Landmark::RightKnee => right_knee,
            Landmark::LeftAnkle => left_ankle,
            Landmark::RightAnkle => right_ankle,
        })
    }

    /// Estimator output for every frame, with dropouts applied.
    pub fn track_frames(&self) -> Vec<TrackFrame> {
        (0..self.frames)
            .map(|i| {
                let dropped = self.dropout_every > 0 && i % self.dropout_every == self.dropout_every - 1;
                let pose = (!dropped).then(|| {
                    PoseDetection::from_landmarks(&self.pose_at(self.time_of(i)), self.visibility)
                });
                TrackFrame::new(i, pose)
            })
            .collect()
    }

    /// Write the swing as a pose track.
    pub fn write_track(&self, path: PathBuf) -> SwingResult<usize> {
        let mut writer = TrackWriter::create(path, &self.info())?;
        for frame in self.track_frames() {
            writer.write_frame(&frame)?;
        }
        writer.flush()?;
        Ok(writer.frames_written())
    }
}
