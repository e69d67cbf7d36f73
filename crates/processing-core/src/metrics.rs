//! Scalar swing metrics derived from a segmented sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swingscope_pose_model::{
    AngleKind, AngleSet, KeyFrameMap, Landmark, SwingPhase, SwingSequence,
};

use crate::geometry::{planar_distance, safe_divide};
use crate::stats::{filter_outliers, planar_spread, range};

/// Swing metrics. `None` marks a value that could not be derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Range of the outlier-filtered shoulder rotation proxy (degrees).
    pub shoulder_rotation: f64,

    /// Range of the outlier-filtered hip rotation proxy (degrees).
    pub hip_rotation: f64,

    /// 2D standard deviation of the nose position (normalized units).
    pub head_movement: f64,

    /// Largest 2D distance of the nose from its first-frame position.
    pub head_max_displacement: f64,

    /// Backswing frames over downswing frames.
    pub tempo_ratio: Option<f64>,

    /// Right-arm angle at top.
    pub backswing_angle: Option<f64>,

    /// Right-arm angle at impact.
    pub impact_angle: Option<f64>,

    /// Right-arm angle at finish.
    pub follow_through_angle: Option<f64>,

    /// Full angle snapshot at every valid key frame.
    pub phase_angles: BTreeMap<SwingPhase, AngleSet>,
}

impl MetricsResult {
    pub fn phase_angle(&self, phase: SwingPhase, kind: AngleKind) -> Option<f64> {
        self.phase_angles.get(&phase).map(|a| a.get(kind))
    }
}

/// Computes [`MetricsResult`] for one sequence.
pub struct MetricsCalculator {
    outlier_z_threshold: f64,
}

impl MetricsCalculator {
    pub fn new(outlier_z_threshold: f64) -> Self {
        Self {
            outlier_z_threshold,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(2.0)
    }

    pub fn compute(&self, sequence: &SwingSequence, key_frames: &KeyFrameMap) -> MetricsResult {
        let phase_angles: BTreeMap<SwingPhase, AngleSet> = key_frames
            .located()
            .filter_map(|(phase, index)| sequence.get(index).map(|f| (phase, f.angles)))
            .collect();
        let right_arm_at = |phase: SwingPhase| phase_angles.get(&phase).map(|a| a.right_arm);

        MetricsResult {
            shoulder_rotation: self.rotation_range(sequence, AngleKind::ShoulderRotation),
            hip_rotation: self.rotation_range(sequence, AngleKind::HipRotation),
            head_movement: head_movement(sequence),
            head_max_displacement: head_max_displacement(sequence),
            tempo_ratio: tempo_ratio(key_frames),
            backswing_angle: right_arm_at(SwingPhase::Top),
            impact_angle: right_arm_at(SwingPhase::Impact),
            follow_through_angle: right_arm_at(SwingPhase::Finish),
            phase_angles,
        }
    }

    fn rotation_range(&self, sequence: &SwingSequence, kind: AngleKind) -> f64 {
        let series = sequence.series(kind);
        let filtered = filter_outliers(&series, self.outlier_z_threshold);
        if filtered.len() < series.len() {
            tracing::debug!(
                angle = %kind,
                removed = series.len() - filtered.len(),
                "Filtered rotation outliers"
            );
        }
        range(&filtered)
    }
}

fn nose_track(sequence: &SwingSequence) -> Vec<(f64, f64)> {
    sequence
        .trajectory(Landmark::Nose)
        .into_iter()
        .filter(|p| p.is_finite())
        .map(|p| p.xy())
        .collect()
}

/// Spread of the nose around its mean position; `0.0` for one sample.
pub fn head_movement(sequence: &SwingSequence) -> f64 {
    planar_spread(&nose_track(sequence))
}

/// Furthest the nose strays from where it started.
pub fn head_max_displacement(sequence: &SwingSequence) -> f64 {
    let nose = sequence.trajectory(Landmark::Nose);
    let Some(first) = nose.first().copied() else {
        return 0.0;
    };
    nose.iter()
        .map(|p| planar_distance(first, *p))
        .fold(0.0, f64::max)
}

/// `(top - address) / (impact - top)`, `1.0` when the downswing is zero
/// frames long. Unavailable if any of the three phases is missing.
pub fn tempo_ratio(key_frames: &KeyFrameMap) -> Option<f64> {
    let address = key_frames.get(SwingPhase::Address)? as f64;
    let top = key_frames.get(SwingPhase::Top)? as f64;
    let impact = key_frames.get(SwingPhase::Impact)? as f64;
    Some(safe_divide(top - address, impact - top, 1.0))
}
