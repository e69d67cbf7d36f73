//! SwingScope Analysis Engine
//!
//! Drives an analysis request from input file to report:
//! - **Source:** Video source, pose estimator, and backend contracts
//! - **Collector:** Skip-sampled pose collection into a swing sequence
//! - **Replay:** JSONL pose tracks as a source/estimator backend
//! - **Synthetic:** A parametric swing for demos and tests
//! - **Service:** Input validation and the end-to-end facade
//!
//! The pure analysis stages live in `swingscope-processing-core`; this crate
//! adds the I/O and orchestration around them.

pub mod collector;
pub mod replay;
pub mod report;
pub mod service;
pub mod settings;
pub mod source;
pub mod synthetic;

pub use collector::{Collected, FrameCollector};
pub use replay::{ReplayBackend, ReplayEstimator, ReplaySource, TrackWriter};
pub use report::AnalysisReport;
pub use service::{validate_video_file, AnalysisService, InputFile};
pub use settings::Settings;
pub use source::{EstimatorLease, PoseEstimator, VideoBackend, VideoSource};
pub use synthetic::SyntheticSwing;
