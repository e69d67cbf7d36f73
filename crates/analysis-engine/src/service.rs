//! Analysis service facade: validate → collect → analyze → report.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use swingscope_common::{SwingError, SwingResult, VideoSettings};
use swingscope_processing_core::SwingAnalyzer;

use crate::collector::{ensure_frames, Collected, FrameCollector};
use crate::report::AnalysisReport;
use crate::settings::Settings;
use crate::source::{VideoBackend, VideoSource};

/// What input validation found out about a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    pub extension: String,
    pub size_bytes: u64,
}

/// Check that `path` exists, has an accepted extension, and fits the size limit.
pub fn validate_video_file(path: &Path, video: &VideoSettings) -> SwingResult<InputFile> {
    validate_with_formats(path, video, &[])
}

fn validate_with_formats(
    path: &Path,
    video: &VideoSettings,
    extra_formats: &[&str],
) -> SwingResult<InputFile> {
    if !path.exists() {
        return Err(SwingError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(SwingError::invalid_input(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let accepted = video.is_supported_extension(&extension)
        || extra_formats.iter().any(|f| f.eq_ignore_ascii_case(&extension));
    if !accepted {
        return Err(SwingError::invalid_input(format!(
            "unsupported file format '{extension}' (supported: {})",
            video.supported_formats.join(", ")
        )));
    }

    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > video.max_file_size_bytes() {
        return Err(SwingError::invalid_input(format!(
            "file is {:.1} MB, limit is {} MB",
            size_bytes as f64 / (1024.0 * 1024.0),
            video.max_file_size_mb
        )));
    }

    Ok(InputFile {
        path: path.to_path_buf(),
        extension,
        size_bytes,
    })
}

/// Runs whole analyses with one configuration and backend.
///
/// Each call acquires its own estimator, so concurrent calls on a shared
/// service do not interfere.
pub struct AnalysisService<B: VideoBackend> {
    settings: Settings,
    backend: B,
    analyzer: SwingAnalyzer,
}

impl<B: VideoBackend> AnalysisService<B> {
    pub fn new(settings: Settings, backend: B) -> SwingResult<Self> {
        settings.validate()?;
        let analyzer = SwingAnalyzer::new(&settings.analysis);
        Ok(Self {
            settings,
            backend,
            analyzer,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate against the configured formats plus those the backend reads.
    pub fn validate_input(&self, path: &Path) -> SwingResult<InputFile> {
        validate_with_formats(path, &self.settings.video, self.backend.formats())
    }

    /// Analyze a file end to end.
    pub async fn analyze_file(&self, path: &Path) -> SwingResult<AnalysisReport> {
        let input = self.validate_input(path)?;
        tracing::info!(
            path = %input.path.display(),
            size_bytes = input.size_bytes,
            "Starting analysis"
        );
        let source = self.backend.open_source(path)?;
        self.analyze_source(source).await
    }

    /// Analyze an already opened source, yielding cooperatively while collecting.
    pub async fn analyze_source(&self, mut source: B::Source) -> SwingResult<AnalysisReport> {
        let started_at = Utc::now();
        ensure_frames(&source)?;
        let collected = {
            let mut estimator = self.backend.acquire_estimator(&self.settings.pose)?;
            FrameCollector::new(&self.settings.video)
                .collect_cooperative(&mut source, &mut *estimator)
                .await?
        };
        Ok(self.report(source.origin(), collected, started_at))
    }

    /// Blocking variant of [`AnalysisService::analyze_source`].
    pub fn analyze_source_blocking(&self, mut source: B::Source) -> SwingResult<AnalysisReport> {
        let started_at = Utc::now();
        ensure_frames(&source)?;
        let collected = {
            let mut estimator = self.backend.acquire_estimator(&self.settings.pose)?;
            FrameCollector::new(&self.settings.video).collect(&mut source, &mut *estimator)?
        };
        Ok(self.report(source.origin(), collected, started_at))
    }

    fn report(
        &self,
        origin: &str,
        collected: Collected,
        started_at: chrono::DateTime<Utc>,
    ) -> AnalysisReport {
        let analysis = self.analyzer.analyze(&collected.sequence);
        for warning in &analysis.warnings {
            tracing::warn!(origin, "{warning}");
        }

        let report = AnalysisReport::new(
            origin,
            collected,
            analysis,
            self.settings.analysis.include_frames,
            started_at,
        );
        tracing::info!(
            origin,
            frames = report.frame_count,
            score = report.summary.overall_score,
            strategy = %report.strategy,
            elapsed_ms = report.elapsed_ms,
            "Analysis complete"
        );
        report
    }
}
