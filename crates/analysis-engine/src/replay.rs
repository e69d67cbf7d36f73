//! Pose-track replay: feed pre-extracted estimator output through the
//! ordinary collection pipeline.
//!
//! A track file stands in for both the video and the estimator. The source
//! yields one [`TrackFrame`] per decoded frame; the estimator hands back the
//! pose stored in it, subject to the configured detection confidence.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use swingscope_common::{PoseSettings, SwingError, SwingResult};
use swingscope_pose_model::{
    parse_track_frame, parse_track_header, track_header_line, PoseDetection, TrackFrame, VideoInfo,
};

use crate::source::{PoseEstimator, VideoBackend, VideoSource};

/// Streams frames from a JSONL pose track.
pub struct ReplaySource {
    origin: String,
    info: VideoInfo,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl ReplaySource {
    /// Open a track and read its header. A track reporting zero frames
    /// cannot be opened.
    pub fn open(path: &Path) -> SwingResult<Self> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| SwingError::source_open(&origin, e.to_string()))?;
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Err(SwingError::source_open(&origin, e.to_string())),
            None => return Err(SwingError::source_open(&origin, "track is empty")),
        };
        let info = parse_track_header(&header)
            .map_err(|e| SwingError::source_open(&origin, format!("invalid track header: {e}")))?
            .ok_or_else(|| SwingError::source_open(&origin, "missing track header line"))?;
        if info.frame_count == 0 {
            return Err(SwingError::source_open(&origin, "track reports zero frames"));
        }

        tracing::debug!(
            origin = %origin,
            frames = info.frame_count,
            fps = info.fps,
            "Opened pose track"
        );

        Ok(Self {
            origin,
            info,
            lines,
            line_number: 1,
        })
    }
}

impl VideoSource for ReplaySource {
    type Frame = TrackFrame;

    fn origin(&self) -> &str {
        &self.origin
    }

    fn info(&self) -> VideoInfo {
        self.info
    }

    fn next_frame(&mut self) -> SwingResult<Option<TrackFrame>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let parsed = parse_track_frame(&line?).map_err(|e| {
                SwingError::processing(format!(
                    "{}:{}: malformed track frame: {e}",
                    self.origin, self.line_number
                ))
            })?;
            if parsed.is_some() {
                return Ok(parsed);
            }
        }
        Ok(None)
    }
}

/// Replays the pose recorded in each track frame.
pub struct ReplayEstimator {
    min_detection_confidence: f64,
    released: bool,
}

impl ReplayEstimator {
    pub fn new(settings: &PoseSettings) -> Self {
        Self {
            min_detection_confidence: settings.min_detection_confidence,
            released: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl PoseEstimator for ReplayEstimator {
    type Frame = TrackFrame;

    fn detect(&mut self, frame: &TrackFrame) -> SwingResult<Option<PoseDetection>> {
        if self.released {
            return Err(SwingError::estimator("replay estimator used after release"));
        }
        let Some(pose) = &frame.pose else {
            return Ok(None);
        };
        if mean_visibility(pose).is_some_and(|v| v < self.min_detection_confidence) {
            tracing::trace!(frame = frame.frame, "Pose below detection confidence");
            return Ok(None);
        }
        Ok(Some(pose.clone()))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn mean_visibility(pose: &PoseDetection) -> Option<f64> {
    let visible: Vec<f64> = pose
        .landmarks
        .values()
        .filter_map(|l| l.visibility)
        .filter(|v| v.is_finite())
        .collect();
    if visible.is_empty() {
        return None;
    }
    Some(visible.iter().sum::<f64>() / visible.len() as f64)
}

/// Backend for `.jsonl` pose tracks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayBackend;

impl VideoBackend for ReplayBackend {
    type Frame = TrackFrame;
    type Source = ReplaySource;
    type Estimator = ReplayEstimator;

    fn formats(&self) -> &[&str] {
        &["jsonl"]
    }

    fn open_source(&self, path: &Path) -> SwingResult<ReplaySource> {
        ReplaySource::open(path)
    }

    fn create_estimator(&self, settings: &PoseSettings) -> SwingResult<ReplayEstimator> {
        Ok(ReplayEstimator::new(settings))
    }
}

/// Writes a pose track, header first.
pub struct TrackWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: usize,
}

impl TrackWriter {
    /// Create (or truncate) a track file and write its header line.
    pub fn create(path: PathBuf, info: &VideoInfo) -> SwingResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", track_header_line(info)?)?;

        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &TrackFrame) -> SwingResult<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> SwingResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TrackWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swingscope_pose_model::{LandmarkSet, Point3, RawLandmark};

    fn temp_track(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("swingscope_test_replay_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("track.jsonl")
    }

    fn info(frame_count: usize) -> VideoInfo {
        VideoInfo {
            frame_count,
            fps: 30.0,
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_writer_then_source() {
        let path = temp_track("roundtrip");
        let pose = PoseDetection::from_landmarks(&LandmarkSet::uniform(Point3::planar(0.5, 0.5)), 0.9);
        {
            let mut writer = TrackWriter::create(path.clone(), &info(2)).unwrap();
            writer.write_frame(&TrackFrame::new(0, Some(pose.clone()))).unwrap();
            writer.write_frame(&TrackFrame::new(1, None)).unwrap();
            assert_eq!(writer.frames_written(), 2);
        }

        let mut source = ReplaySource::open(&path).unwrap();
        assert_eq!(source.info(), info(2));
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.pose, Some(pose));
        assert!(source.next_frame().unwrap().unwrap().pose.is_none());
        assert!(source.next_frame().unwrap().is_none());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_missing_file_is_source_open() {
        let err = ReplaySource::open(Path::new("/nonexistent/swing.jsonl")).err().unwrap();
        assert!(matches!(err, SwingError::SourceOpen { .. }));
    }

    #[test]
    fn test_headerless_track_is_source_open() {
        let path = temp_track("headerless");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{\"frame\":0,\"pose\":null}\n").unwrap();
        let err = ReplaySource::open(&path).err().unwrap();
        assert!(err.to_string().contains("header"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let path = temp_track("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# {\"frame_count\":2,\"fps\":30.0}\n{\"frame\":0,\"pose\":null}\nnot json\n")
            .unwrap();
        let mut source = ReplaySource::open(&path).unwrap();
        assert!(source.next_frame().unwrap().is_some());
        let err = source.next_frame().unwrap_err();
        assert!(err.to_string().contains(":3:"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_zero_frame_track_is_source_open() {
        let path = temp_track("zero");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "# {\"frame_count\":0,\"fps\":30.0}\n{\"frame\":0,\"pose\":null}\n")
            .unwrap();
        let err = ReplaySource::open(&path).err().unwrap();
        assert!(matches!(err, SwingError::SourceOpen { .. }));
        assert!(err.to_string().contains("zero frames"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_corrupt_coordinate_does_not_stop_replay() {
        let path = temp_track("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            concat!(
                "# {\"frame_count\":2,\"fps\":30.0}\n",
                "{\"frame\":0,\"pose\":{\"landmarks\":{\"nose\":{\"coords\":[\"bad\",0.2,0.0]}}}}\n",
                "{\"frame\":1,\"pose\":\"garbage\"}\n",
            ),
        )
        .unwrap();
        let mut source = ReplaySource::open(&path).unwrap();
        let first = source.next_frame().unwrap().unwrap();
        let nose = first.pose.as_ref().unwrap().get("nose").unwrap();
        assert_eq!(nose.coords, vec![None, Some(0.2), Some(0.0)]);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.frame, 1);
        assert!(second.pose.is_none());
        assert!(source.next_frame().unwrap().is_none());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_estimator_applies_detection_confidence() {
        let mut estimator = ReplayEstimator::new(&PoseSettings::default());
        let mut faint = PoseDetection::new();
        faint.insert("nose", RawLandmark::new(0.5, 0.2, 0.0, Some(0.2)));
        let frame = TrackFrame::new(0, Some(faint.clone()));
        assert_eq!(estimator.detect(&frame).unwrap(), None);

        faint.insert("nose", RawLandmark::new(0.5, 0.2, 0.0, None));
        let frame = TrackFrame::new(0, Some(faint));
        assert!(estimator.detect(&frame).unwrap().is_some());
    }

    #[test]
    fn test_estimator_refuses_after_release() {
        let mut estimator = ReplayEstimator::new(&PoseSettings::default());
        estimator.release();
        assert!(estimator.is_released());
        assert!(estimator.detect(&TrackFrame::new(0, None)).is_err());
    }
}
