//! Frame collection: decoded video → swing sequence.
//!
//! With `T` decodable frames and a limit of `M` kept frames, every
//! `max(1, T / M)`-th frame is handed to the pose estimator. Frames without
//! a usable pose are dropped without counting toward `M`. Collection stops
//! at `M` valid frames or when the source runs dry.

use swingscope_common::{SwingError, SwingResult, VideoSettings};
use swingscope_pose_model::{FrameRecord, SwingSequence, VideoInfo};
use swingscope_processing_core::extract::extract_record;

use crate::source::{PoseEstimator, VideoSource};

/// Outcome of one collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    pub sequence: SwingSequence,
    pub info: VideoInfo,

    /// Frames decoded from the source.
    pub frames_read: usize,

    /// Sampled frames that yielded no valid pose.
    pub frames_rejected: usize,

    pub skip: usize,
}

/// Collects pose frames from a video source.
pub struct FrameCollector {
    max_frames: usize,
    yield_every: usize,
}

impl FrameCollector {
    pub fn new(settings: &VideoSettings) -> Self {
        Self::with_limits(settings.max_frames, settings.yield_every)
    }

    pub fn with_limits(max_frames: usize, yield_every: usize) -> Self {
        Self {
            max_frames: max_frames.max(1),
            yield_every: yield_every.max(1),
        }
    }

    /// Sampling stride for `total` frames.
    pub fn skip_ratio(total: usize, max_frames: usize) -> usize {
        (total / max_frames.max(1)).max(1)
    }

    /// Collect synchronously.
    pub fn collect<S, E>(&self, source: &mut S, estimator: &mut E) -> SwingResult<Collected>
    where
        S: VideoSource,
        E: PoseEstimator<Frame = S::Frame>,
    {
        let mut run = self.begin(source)?;
        while let Some(frame) = source.next_frame()? {
            if run.step(&frame, estimator) {
                break;
            }
        }
        run.finish(source.origin())
    }

    /// Collect, yielding to the tokio scheduler every `yield_every` frames.
    pub async fn collect_cooperative<S, E>(
        &self,
        source: &mut S,
        estimator: &mut E,
    ) -> SwingResult<Collected>
    where
        S: VideoSource,
        E: PoseEstimator<Frame = S::Frame>,
    {
        let mut run = self.begin(source)?;
        while let Some(frame) = source.next_frame()? {
            if run.step(&frame, estimator) {
                break;
            }
            if run.frames_read % self.yield_every == 0 {
                tokio::task::yield_now().await;
            }
        }
        run.finish(source.origin())
    }

    fn begin<S: VideoSource>(&self, source: &S) -> SwingResult<CollectionRun> {
        let info = ensure_frames(source)?;

        let skip = Self::skip_ratio(info.frame_count, self.max_frames);
        tracing::debug!(
            origin = source.origin(),
            total = info.frame_count,
            max = self.max_frames,
            skip,
            "Starting frame collection"
        );

        Ok(CollectionRun {
            info,
            skip,
            max_frames: self.max_frames,
            frames_read: 0,
            frames_rejected: 0,
            records: Vec::with_capacity(self.max_frames.min(info.frame_count)),
        })
    }
}

struct CollectionRun {
    info: VideoInfo,
    skip: usize,
    max_frames: usize,
    frames_read: usize,
    frames_rejected: usize,
    records: Vec<FrameRecord>,
}

impl CollectionRun {
    /// Process one decoded frame. Returns `true` once the limit is reached.
    fn step<F, E>(&mut self, frame: &F, estimator: &mut E) -> bool
    where
        E: PoseEstimator<Frame = F>,
    {
        let frame_index = self.frames_read;
        self.frames_read += 1;
        if frame_index % self.skip != 0 {
            return false;
        }

        let detection = match estimator.detect(frame) {
            Ok(detection) => detection,
            Err(e) => {
                tracing::warn!(frame = frame_index, error = %e, "Pose estimator failed on frame");
                self.frames_rejected += 1;
                return false;
            }
        };

        match extract_record(frame_index, detection.as_ref()) {
            Ok(record) => self.records.push(record),
            Err(e) => {
                tracing::debug!(frame = frame_index, reason = %e, "Skipping frame");
                self.frames_rejected += 1;
            }
        }
        self.records.len() >= self.max_frames
    }

    fn finish(self, origin: &str) -> SwingResult<Collected> {
        tracing::info!(
            origin,
            valid = self.records.len(),
            read = self.frames_read,
            rejected = self.frames_rejected,
            "Collected {} valid frames from {} read",
            self.records.len(),
            self.frames_read
        );

        if self.records.is_empty() {
            return Err(SwingError::EmptySequence {
                frames_read: self.frames_read,
            });
        }

        Ok(Collected {
            sequence: SwingSequence::new(self.records),
            info: self.info,
            frames_read: self.frames_read,
            frames_rejected: self.frames_rejected,
            skip: self.skip,
        })
    }
}

/// Source properties, or `SwingError::SourceOpen` when it reports no frames.
pub(crate) fn ensure_frames<S: VideoSource>(source: &S) -> SwingResult<VideoInfo> {
    let info = source.info();
    if info.frame_count == 0 {
        return Err(SwingError::source_open(
            source.origin(),
            "source reports zero frames",
        ));
    }
    Ok(info)
}
