//! The serialized result of one analysis request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swingscope_common::SwingResult;
use swingscope_pose_model::{KeyFrameMap, SwingSequence, VideoInfo};
use swingscope_processing_core::{
    AnalysisSummary, EvaluationResult, MetricsResult, SequenceAnalysis, StrategyKind,
};

use crate::collector::Collected;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Where the frames came from.
    pub source: String,
    pub video: VideoInfo,

    /// Valid frames in the analyzed sequence.
    pub frame_count: usize,
    pub frames_read: usize,
    pub frames_rejected: usize,

    pub strategy: StrategyKind,
    pub key_frames: KeyFrameMap,
    pub metrics: MetricsResult,
    pub evaluation: EvaluationResult,
    pub summary: AnalysisSummary,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Per-frame records, only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<SwingSequence>,

    pub analyzed_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    pub fn new(
        source: impl Into<String>,
        collected: Collected,
        analysis: SequenceAnalysis,
        include_frames: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        let finished = Utc::now();
        let elapsed_ms = (finished - started_at).num_milliseconds().max(0) as u64;
        Self {
            source: source.into(),
            video: collected.info,
            frame_count: collected.sequence.len(),
            frames_read: collected.frames_read,
            frames_rejected: collected.frames_rejected,
            strategy: analysis.strategy,
            key_frames: analysis.key_frames,
            metrics: analysis.metrics,
            evaluation: analysis.evaluation,
            summary: analysis.summary,
            warnings: analysis.warnings,
            frames: include_frames.then_some(collected.sequence),
            analyzed_at: started_at,
            elapsed_ms,
        }
    }

    pub fn to_json(&self, pretty: bool) -> SwingResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
