//! Error types shared across SwingScope crates.
//!
//! Only request-fatal failures live here. Per-frame and per-phase problems
//! are recovered where they happen and never reach this type.

use std::path::PathBuf;

/// Top-level error type for SwingScope operations.
#[derive(Debug, thiserror::Error)]
pub enum SwingError {
    /// The video source could not be opened or reports no frames.
    #[error("Cannot open video source {origin}: {message}")]
    SourceOpen { origin: String, message: String },

    /// Not a single pose-bearing frame was collected.
    #[error("No valid pose frames collected ({frames_read} frames read)")]
    EmptySequence { frames_read: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Pose estimator error: {message}")]
    Estimator { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SwingError.
pub type SwingResult<T> = Result<T, SwingError>;

impl SwingError {
    pub fn source_open(origin: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceOpen {
            origin: origin.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn estimator(msg: impl Into<String>) -> Self {
        Self::Estimator {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }
}
