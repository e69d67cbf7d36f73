//! Sequence analysis: key frames → metrics → evaluation → summary.

use serde::{Deserialize, Serialize};
use swingscope_pose_model::{KeyFrameMap, SwingSequence};

use crate::config::{AnalysisConfig, StrategyKind};
use crate::evaluation::{EvaluationResult, SwingEvaluator};
use crate::keyframes::{KeyFrameDetector, KeyFrameStrategy};
use crate::metrics::{MetricsCalculator, MetricsResult};
use crate::summary::AnalysisSummary;

/// Everything derived from one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceAnalysis {
    pub strategy: StrategyKind,
    pub key_frames: KeyFrameMap,
    pub metrics: MetricsResult,
    pub evaluation: EvaluationResult,
    pub summary: AnalysisSummary,

    /// Non-fatal problems: unlocated or out-of-range phases.
    pub warnings: Vec<String>,
}

/// Runs the pure analysis stages with one configuration.
pub struct SwingAnalyzer {
    detector: KeyFrameDetector,
    metrics: MetricsCalculator,
    evaluator: SwingEvaluator,
}

impl SwingAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            detector: KeyFrameDetector::new(KeyFrameStrategy::from_config(config)),
            metrics: MetricsCalculator::new(config.outlier_z_threshold),
            evaluator: SwingEvaluator::new(config.thresholds.clone()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&AnalysisConfig::default())
    }

    pub fn strategy(&self) -> StrategyKind {
        self.detector.strategy().kind()
    }

    pub fn analyze(&self, sequence: &SwingSequence) -> SequenceAnalysis {
        let mut warnings = vec![];

        let (key_frames, dropped) = self.detector.detect(sequence).validated(sequence.len());
        for phase in &dropped {
            warnings.push(format!("{phase} key frame was outside the sequence"));
        }
        let missing: Vec<_> = key_frames
            .missing()
            .into_iter()
            .filter(|p| !dropped.contains(p))
            .collect();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|p| p.name()).collect();
            tracing::warn!(phases = ?names, "Key-frame map is partial");
            warnings.push(format!("phases not located: {}", names.join(", ")));
        }
        if !key_frames.is_monotonic() {
            tracing::warn!("Key frames are out of canonical phase order");
            warnings.push("key frames are out of canonical phase order".to_string());
        }

        let metrics = self.metrics.compute(sequence, &key_frames);
        let evaluation = self.evaluator.evaluate(sequence, &key_frames, &metrics);
        let summary = AnalysisSummary::build(sequence.len(), &metrics, &evaluation);

        SequenceAnalysis {
            strategy: self.strategy(),
            key_frames,
            metrics,
            evaluation,
            summary,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swingscope_pose_model::{
        AngleSet, FrameRecord, LandmarkFrame, LandmarkSet, Point3, SwingPhase,
    };

    fn frozen(len: usize) -> SwingSequence {
        SwingSequence::new(
            (0..len)
                .map(|i| {
                    FrameRecord::new(
                        LandmarkFrame::new(i, LandmarkSet::uniform(Point3::planar(0.5, 0.5)), 1.0),
                        AngleSet {
                            right_arm: 170.0,
                            spine_angle: 35.0,
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_ratio_analysis_has_no_warnings() {
        let analysis = SwingAnalyzer::with_defaults().analyze(&frozen(20));
        assert_eq!(analysis.strategy, StrategyKind::Ratio);
        assert!(analysis.warnings.is_empty());
        assert_eq!(analysis.key_frames.get(SwingPhase::Finish), Some(19));
        assert_eq!(analysis.summary.total_frames, 20);
    }

    #[test]
    fn test_empty_sequence_degrades() {
        let analysis = SwingAnalyzer::with_defaults().analyze(&SwingSequence::default());
        assert_eq!(analysis.evaluation.score, 0.0);
        assert!(analysis.evaluation.error.is_some());
        assert!(!analysis.warnings.is_empty());
    }

    #[test]
    fn test_extremum_partial_map_is_reported() {
        let config = AnalysisConfig {
            strategy: StrategyKind::Extremum,
            ..Default::default()
        };
        let mut frames = frozen(3).into_frames();
        for f in &mut frames {
            f.angles.right_arm = f64::NAN;
        }
        let analysis = SwingAnalyzer::new(&config).analyze(&SwingSequence::new(frames));
        assert!(analysis.key_frames.is_partial());
        assert!(analysis.warnings[0].contains("top"));
        assert_eq!(analysis.metrics.tempo_ratio, None);
    }
}
