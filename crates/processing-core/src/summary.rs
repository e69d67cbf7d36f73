//! Human-oriented digest of an evaluation.

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationResult;
use crate::metrics::MetricsResult;

/// How many strengths and improvement areas a summary lists.
pub const HIGHLIGHT_LIMIT: usize = 3;

/// Headline metrics repeated in the summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub shoulder_rotation: f64,
    pub hip_rotation: f64,
    pub head_stability: f64,
    pub impact_angle: Option<f64>,
    pub tempo_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Aggregate score rounded to one decimal.
    pub overall_score: f64,
    pub total_frames: usize,
    pub total_checks: usize,
    pub passed_checks: usize,
    pub key_metrics: KeyMetrics,

    /// Passed checks as `"<phase>: <check>"`, in phase order.
    pub strengths: Vec<String>,

    /// Failed checks as `"<phase>: <check>"`, in phase order.
    pub areas_for_improvement: Vec<String>,
}

impl AnalysisSummary {
    pub fn build(total_frames: usize, metrics: &MetricsResult, evaluation: &EvaluationResult) -> Self {
        let mut strengths = vec![];
        let mut areas_for_improvement = vec![];
        for (phase, check, passed) in evaluation.outcomes() {
            let bucket = if passed {
                &mut strengths
            } else {
                &mut areas_for_improvement
            };
            if bucket.len() < HIGHLIGHT_LIMIT {
                bucket.push(format!("{phase}: {check}"));
            }
        }

        Self {
            overall_score: (evaluation.score * 10.0).round() / 10.0,
            total_frames,
            total_checks: evaluation.total_checks,
            passed_checks: evaluation.passed_checks,
            key_metrics: KeyMetrics {
                shoulder_rotation: metrics.shoulder_rotation,
                hip_rotation: metrics.hip_rotation,
                head_stability: metrics.head_movement,
                impact_angle: metrics.impact_angle,
                tempo_ratio: metrics.tempo_ratio,
            },
            strengths,
            areas_for_improvement,
        }
    }
}
