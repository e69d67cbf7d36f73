//! Complete application settings.
//!
//! Stored as JSON at [`config_file_path`]. Every section falls back to its
//! defaults when absent, so a file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use swingscope_common::{
    config_file_path, load_or_default, load_strict, save_json, LoggingConfig, PoseSettings,
    SwingResult, VideoSettings,
};
use swingscope_processing_core::AnalysisConfig;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub video: VideoSettings,
    pub pose: PoseSettings,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load from the standard location, using defaults if it is missing or
    /// unreadable.
    pub fn load() -> Self {
        load_or_default(&config_file_path())
    }

    /// Load from an explicit path. Missing or malformed files are errors.
    pub fn load_from(path: &Path) -> SwingResult<Self> {
        let settings: Self = load_strict(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> SwingResult<()> {
        save_json(self, path)?;
        Ok(())
    }

    /// Save to the standard location.
    pub fn save(&self) -> SwingResult<()> {
        self.save_to(&config_file_path())
    }

    pub fn validate(&self) -> SwingResult<()> {
        self.video.validate()?;
        self.pose.validate()?;
        self.analysis.validate()
    }
}
