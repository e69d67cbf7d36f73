//! Configuration sections shared by the analysis engine and the CLI.
//!
//! Analysis tuning (ratios, thresholds, stability windows) is owned by
//! `swingscope-processing-core`; this module holds the sections that do not
//! depend on the pose data model.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SwingError, SwingResult};

/// Video input settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoSettings {
    /// Maximum number of valid pose frames kept per analysis.
    pub max_frames: usize,

    /// Accepted container extensions, lowercase and without the dot.
    pub supported_formats: Vec<String>,

    /// Largest accepted input file in megabytes.
    pub max_file_size_mb: u64,

    /// Frames processed between cooperative yields in async collection.
    pub yield_every: usize,
}

/// Pose estimator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseSettings {
    /// Minimum confidence for the estimator to report a detected person.
    pub min_detection_confidence: f64,

    /// Minimum confidence for the estimator to keep tracking between frames.
    pub min_tracking_confidence: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "swingscope=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            max_frames: 300,
            supported_formats: vec!["mp4".to_string(), "avi".to_string(), "mov".to_string()],
            max_file_size_mb: 500,
            yield_every: 10,
        }
    }
}

impl Default for PoseSettings {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl VideoSettings {
    pub fn validate(&self) -> SwingResult<()> {
        if self.max_frames == 0 {
            return Err(SwingError::config("video.max_frames must be at least 1"));
        }
        if self.yield_every == 0 {
            return Err(SwingError::config("video.yield_every must be at least 1"));
        }
        Ok(())
    }

    /// Check a file extension (with or without leading dot, any case).
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.supported_formats
            .iter()
            .any(|f| f.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }

    /// Maximum file size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl PoseSettings {
    pub fn validate(&self) -> SwingResult<()> {
        validate_confidence("pose.min_detection_confidence", self.min_detection_confidence)?;
        validate_confidence("pose.min_tracking_confidence", self.min_tracking_confidence)
    }
}

fn validate_confidence(name: &str, value: f64) -> SwingResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SwingError::config(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("swingscope").join("config.json")
}

/// Load a JSON config file, falling back to defaults when it is missing
/// or unreadable.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, e);
            }
        }
    }
    T::default()
}

/// Load a JSON config file, failing on any read or parse error.
pub fn load_strict<T: DeserializeOwned>(path: &Path) -> SwingResult<T> {
    if !path.exists() {
        return Err(SwingError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save a JSON config file, creating parent directories.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_defaults() {
        let video = VideoSettings::default();
        assert_eq!(video.max_frames, 300);
        assert!(video.is_supported_extension("MP4"));
        assert!(video.is_supported_extension(".mov"));
        assert!(!video.is_supported_extension("mkv"));
        assert_eq!(video.max_file_size_bytes(), 500 * 1024 * 1024);
        assert!(video.validate().is_ok());
    }

    #[test]
    fn test_zero_max_frames_rejected() {
        let video = VideoSettings {
            max_frames: 0,
            ..Default::default()
        };
        assert!(matches!(video.validate(), Err(SwingError::Config { .. })));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let pose = PoseSettings {
            min_detection_confidence: 1.5,
            ..Default::default()
        };
        assert!(pose.validate().is_err());
        assert!(PoseSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let video: VideoSettings = serde_json::from_str(r#"{"max_frames": 120}"#).unwrap();
        assert_eq!(video.max_frames, 120);
        assert_eq!(video.yield_every, 10);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let path = std::env::temp_dir().join("swingscope-missing-config-test.json");
        let _ = std::fs::remove_file(&path);
        let logging: LoggingConfig = load_or_default(&path);
        assert_eq!(logging, LoggingConfig::default());
    }

    #[test]
    fn test_save_then_load_strict() {
        let dir = std::env::temp_dir().join(format!("swingscope-config-{}", std::process::id()));
        let path = dir.join("nested").join("pose.json");
        let pose = PoseSettings {
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.6,
        };
        save_json(&pose, &path).unwrap();
        let loaded: PoseSettings = load_strict(&path).unwrap();
        assert_eq!(loaded, pose);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_strict_missing_file() {
        let path = std::env::temp_dir().join("swingscope-definitely-missing.json");
        let result: SwingResult<PoseSettings> = load_strict(&path);
        assert!(matches!(result, Err(SwingError::FileNotFound { .. })));
    }
}
