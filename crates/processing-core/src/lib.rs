//! SwingScope Processing Core
//!
//! Turns per-frame pose data into a judged golf swing:
//! - **Geometry:** Degenerate-safe angle, distance, and division helpers
//! - **Extraction:** Raw estimator output → validated landmarks and angles
//! - **Key Frames:** Ratio and stability/extremum phase detection
//! - **Metrics:** Rotation ranges, head movement, tempo, phase angles
//! - **Evaluation:** Threshold checks per phase and an aggregate score
//!
//! This crate is pure computation — no I/O, no video, no estimator.
//! All inputs are data; all outputs are data.

pub mod analyzer;
pub mod config;
pub mod evaluation;
pub mod extract;
pub mod geometry;
pub mod keyframes;
pub mod metrics;
pub mod stats;
pub mod summary;

pub use analyzer::{SequenceAnalysis, SwingAnalyzer};
pub use config::{AnalysisConfig, StrategyKind, Thresholds};
pub use evaluation::{Check, EvaluationResult, SwingEvaluator};
pub use keyframes::{KeyFrameDetector, KeyFrameStrategy};
pub use metrics::{MetricsCalculator, MetricsResult};
pub use summary::AnalysisSummary;
