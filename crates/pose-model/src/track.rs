//! Pose-track format: pre-extracted estimator output stored as JSONL.
//!
//! The first line is a header comment carrying the source video's
//! properties, followed by one line per decoded frame:
//!
//! ```text
//! # {"frame_count":120,"fps":30.0,"width":1280,"height":720}
//! {"frame":0,"pose":{"landmarks":{"nose":{"coords":[0.5,0.2,0.0],"visibility":0.98}, ...}}}
//! {"frame":1,"pose":null}
//! ```
//!
//! `"pose": null` records a frame in which the estimator found nobody.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::detection::PoseDetection;

/// Properties of a decoded video source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Total decodable frames.
    pub frame_count: usize,

    /// Frames per second; `0.0` when unknown.
    pub fps: f64,

    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub height: u32,
}

impl VideoInfo {
    /// Duration in seconds, `0.0` when the frame rate is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.fps > 0.0 {
            self.frame_count as f64 / self.fps
        } else {
            0.0
        }
    }
}

/// One decoded frame's estimator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    /// Decoded frame index.
    pub frame: usize,

    /// A pose that is not a landmark map reads as no pose.
    #[serde(default, deserialize_with = "lenient_pose")]
    pub pose: Option<PoseDetection>,
}

fn lenient_pose<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PoseDetection>, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

impl TrackFrame {
    pub fn new(frame: usize, pose: Option<PoseDetection>) -> Self {
        Self { frame, pose }
    }
}

/// Prefix marking the header line.
pub const HEADER_PREFIX: &str = "# ";

/// Render the header line for `info`, without the trailing newline.
pub fn track_header_line(info: &VideoInfo) -> Result<String, serde_json::Error> {
    Ok(format!("{HEADER_PREFIX}{}", serde_json::to_string(info)?))
}

/// Parse the header line, if the text starts with one.
pub fn parse_track_header(jsonl: &str) -> Result<Option<VideoInfo>, serde_json::Error> {
    let Some(first) = jsonl.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Ok(None);
    };
    match first.strip_prefix('#') {
        Some(header) => serde_json::from_str(header.trim()).map(Some),
        None => Ok(None),
    }
}

/// Parse one frame line; `None` for comments and blank lines.
pub fn parse_track_frame(line: &str) -> Result<Option<TrackFrame>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}
