//! Per-phase pass/fail checks and the aggregate score.
//!
//! | Phase | Checks |
//! |-------|--------|
//! | address | right arm within the arm range, spine angle ≥ minimum |
//! | backswing | none |
//! | top | shoulder rotation ≥ minimum, head movement ≤ maximum |
//! | impact | right arm within the arm range, hip rotation ≥ minimum |
//! | follow-through, finish | right arm ≤ follow-through maximum, right knee ≤ balance maximum |
//!
//! A phase that cannot be evaluated is left out and logged; the rest of the
//! evaluation carries on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use swingscope_pose_model::{AngleKind, AngleSet, KeyFrameMap, SwingPhase, SwingSequence};

use crate::config::Thresholds;
use crate::metrics::MetricsResult;

/// A named pass/fail judgment. Serialized by its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Check {
    #[serde(rename = "Arm Angle Straight")]
    ArmAngleStraight,
    #[serde(rename = "Posture Stable")]
    PostureStable,
    #[serde(rename = "Shoulder Rotation Good")]
    ShoulderRotationGood,
    #[serde(rename = "Head Stable")]
    HeadStable,
    #[serde(rename = "Arm Straight")]
    ArmStraight,
    #[serde(rename = "Hip Rotation Good")]
    HipRotationGood,
    #[serde(rename = "Follow Through Complete")]
    FollowThroughComplete,
    #[serde(rename = "Balance Maintained")]
    BalanceMaintained,
}

impl Check {
    pub fn label(self) -> &'static str {
        match self {
            Check::ArmAngleStraight => "Arm Angle Straight",
            Check::PostureStable => "Posture Stable",
            Check::ShoulderRotationGood => "Shoulder Rotation Good",
            Check::HeadStable => "Head Stable",
            Check::ArmStraight => "Arm Straight",
            Check::HipRotationGood => "Hip Rotation Good",
            Check::FollowThroughComplete => "Follow Through Complete",
            Check::BalanceMaintained => "Balance Maintained",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why one phase was left out of the evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhaseEvaluationError {
    #[error("{phase} key frame {index} is outside the sequence (length {len})")]
    IndexOutOfRange {
        phase: SwingPhase,
        index: usize,
        len: usize,
    },

    #[error("{phase} has a non-finite {angle}")]
    NonFiniteAngle { phase: SwingPhase, angle: AngleKind },

    #[error("{phase} needs {metric}, which is unavailable")]
    MetricUnavailable {
        phase: SwingPhase,
        metric: &'static str,
    },
}

pub type PhaseChecks = BTreeMap<Check, bool>;

/// Check outcomes per phase plus the aggregate score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub phases: BTreeMap<SwingPhase, PhaseChecks>,

    /// `100 * passed / total`, `0.0` when there are no checks.
    pub score: f64,

    pub total_checks: usize,
    pub passed_checks: usize,

    /// Set only when evaluation fell back to an empty result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn from_phases(phases: BTreeMap<SwingPhase, PhaseChecks>) -> Self {
        let total_checks = phases.values().map(BTreeMap::len).sum();
        let passed_checks = phases
            .values()
            .flat_map(|checks| checks.values())
            .filter(|passed| **passed)
            .count();
        let score = if total_checks == 0 {
            0.0
        } else {
            100.0 * passed_checks as f64 / total_checks as f64
        };
        Self {
            phases,
            score,
            total_checks,
            passed_checks,
            error: None,
        }
    }

    /// Empty result annotated with what went wrong upstream.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn phase(&self, phase: SwingPhase) -> Option<&PhaseChecks> {
        self.phases.get(&phase)
    }

    pub fn check(&self, phase: SwingPhase, check: Check) -> Option<bool> {
        self.phase(phase).and_then(|c| c.get(&check).copied())
    }

    /// Every check outcome in phase order.
    pub fn outcomes(&self) -> impl Iterator<Item = (SwingPhase, Check, bool)> + '_ {
        self.phases
            .iter()
            .flat_map(|(phase, checks)| checks.iter().map(move |(c, ok)| (*phase, *c, *ok)))
    }
}

/// Judges phases against [`Thresholds`].
pub struct SwingEvaluator {
    thresholds: Thresholds,
}

impl SwingEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_defaults() -> Self {
        Self::new(Thresholds::default())
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate every located phase. Never fails; see [`EvaluationResult::error`].
    pub fn evaluate(
        &self,
        sequence: &SwingSequence,
        key_frames: &KeyFrameMap,
        metrics: &MetricsResult,
    ) -> EvaluationResult {
        if sequence.is_empty() {
            tracing::warn!("Evaluation skipped: sequence has no frames");
            return EvaluationResult::degraded("no frames to evaluate");
        }

        let mut phases = BTreeMap::new();
        for (phase, index) in key_frames.located() {
            match self.evaluate_phase(sequence, phase, index, metrics) {
                Ok(checks) => {
                    phases.insert(phase, checks);
                }
                Err(err) => tracing::warn!(%phase, error = %err, "Phase omitted from evaluation"),
            }
        }
        EvaluationResult::from_phases(phases)
    }

    /// Checks for one phase at sequence index `index`.
    pub fn evaluate_phase(
        &self,
        sequence: &SwingSequence,
        phase: SwingPhase,
        index: usize,
        metrics: &MetricsResult,
    ) -> Result<PhaseChecks, PhaseEvaluationError> {
        let frame = sequence
            .get(index)
            .ok_or(PhaseEvaluationError::IndexOutOfRange {
                phase,
                index,
                len: sequence.len(),
            })?;
        let angles = &frame.angles;
        let t = &self.thresholds;

        let checks = match phase {
            SwingPhase::Address => {
                let arm = finite_angle(phase, angles, AngleKind::RightArm)?;
                let spine = finite_angle(phase, angles, AngleKind::SpineAngle)?;
                BTreeMap::from([
                    (Check::ArmAngleStraight, t.arm_range().contains(arm)),
                    (Check::PostureStable, spine.abs() >= t.spine_angle_min),
                ])
            }
            SwingPhase::Backswing => BTreeMap::new(),
            SwingPhase::Top => {
                let rotation = finite_metric(phase, "shoulder_rotation", metrics.shoulder_rotation)?;
                let head = finite_metric(phase, "head_movement", metrics.head_movement)?;
                BTreeMap::from([
                    (Check::ShoulderRotationGood, rotation >= t.shoulder_rotation_min),
                    (Check::HeadStable, head <= t.head_movement_max),
                ])
            }
            SwingPhase::Impact => {
                let arm = finite_angle(phase, angles, AngleKind::RightArm)?;
                let hips = finite_metric(phase, "hip_rotation", metrics.hip_rotation)?;
                BTreeMap::from([
                    (Check::ArmStraight, t.arm_range().contains(arm)),
                    (Check::HipRotationGood, hips >= t.hip_rotation_min),
                ])
            }
            SwingPhase::FollowThrough | SwingPhase::Finish => {
                let arm = finite_angle(phase, angles, AngleKind::RightArm)?;
                let knee = finite_angle(phase, angles, AngleKind::RightKnee)?;
                BTreeMap::from([
                    (Check::FollowThroughComplete, arm <= t.follow_through_max),
                    (Check::BalanceMaintained, knee <= t.balance_knee_max),
                ])
            }
        };
        Ok(checks)
    }
}

fn finite_angle(
    phase: SwingPhase,
    angles: &AngleSet,
    kind: AngleKind,
) -> Result<f64, PhaseEvaluationError> {
    let value = angles.get(kind);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PhaseEvaluationError::NonFiniteAngle { phase, angle: kind })
    }
}

fn finite_metric(
    phase: SwingPhase,
    metric: &'static str,
    value: f64,
) -> Result<f64, PhaseEvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PhaseEvaluationError::MetricUnavailable { phase, metric })
    }
}
