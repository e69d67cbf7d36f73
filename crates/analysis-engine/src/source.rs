//! Collaborator contracts: where frames come from and who finds the pose.
//!
//! Decoding and pose estimation are outside this workspace. A backend
//! bundles one kind of source with the estimator that understands its
//! frames; the collector and service are written against these traits only.

use std::path::Path;

use swingscope_common::{PoseSettings, SwingResult};
use swingscope_pose_model::{PoseDetection, VideoInfo};

/// Ordered decoded frames plus the properties of the video they came from.
pub trait VideoSource {
    type Frame;

    /// Human-readable origin used in errors and logs (usually a path).
    fn origin(&self) -> &str;

    /// Frame count, frame rate, and dimensions as reported at open time.
    fn info(&self) -> VideoInfo;

    /// Next decoded frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> SwingResult<Option<Self::Frame>>;
}

/// Finds a pose in one decoded frame.
///
/// Instances are not shared between concurrent analyses.
pub trait PoseEstimator {
    type Frame;

    /// `Ok(None)` when no person was found in the frame.
    fn detect(&mut self, frame: &Self::Frame) -> SwingResult<Option<PoseDetection>>;

    /// Free whatever the estimator holds. Called once, by [`EstimatorLease`].
    fn release(&mut self) {}
}

/// A pose estimator held for the duration of one analysis.
///
/// The estimator is released when the lease is dropped, on success and
/// error paths alike.
pub struct EstimatorLease<E: PoseEstimator> {
    estimator: E,
}

impl<E: PoseEstimator> EstimatorLease<E> {
    pub fn new(estimator: E) -> Self {
        tracing::debug!("Pose estimator acquired");
        Self { estimator }
    }
}

impl<E: PoseEstimator> std::ops::Deref for EstimatorLease<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.estimator
    }
}

impl<E: PoseEstimator> std::ops::DerefMut for EstimatorLease<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.estimator
    }
}

impl<E: PoseEstimator> Drop for EstimatorLease<E> {
    fn drop(&mut self) {
        self.estimator.release();
        tracing::debug!("Pose estimator released");
    }
}

/// A decoder and pose estimator that agree on a frame type.
pub trait VideoBackend {
    type Frame;
    type Source: VideoSource<Frame = Self::Frame>;
    type Estimator: PoseEstimator<Frame = Self::Frame>;

    /// Lowercase file extensions this backend can open.
    fn formats(&self) -> &[&str];

    /// Open a source, failing with `SwingError::SourceOpen` if it cannot be read.
    fn open_source(&self, path: &Path) -> SwingResult<Self::Source>;

    fn create_estimator(&self, settings: &PoseSettings) -> SwingResult<Self::Estimator>;

    /// Create an estimator bound to a lease that releases it on drop.
    fn acquire_estimator(
        &self,
        settings: &PoseSettings,
    ) -> SwingResult<EstimatorLease<Self::Estimator>> {
        Ok(EstimatorLease::new(self.create_estimator(settings)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe {
        released: Rc<Cell<u32>>,
    }

    impl PoseEstimator for Probe {
        type Frame = ();

        fn detect(&mut self, _frame: &()) -> SwingResult<Option<PoseDetection>> {
            Ok(None)
        }

        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn fails_midway(lease: EstimatorLease<Probe>) -> SwingResult<()> {
        let _lease = lease;
        Err(swingscope_common::SwingError::processing("decoder gave up"))
    }

    #[test]
    fn test_lease_releases_once_on_drop() {
        let released = Rc::new(Cell::new(0));
        {
            let mut lease = EstimatorLease::new(Probe {
                released: released.clone(),
            });
            assert!(lease.detect(&()).unwrap().is_none());
            assert_eq!(released.get(), 0);
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_lease_releases_on_error_path() {
        let released = Rc::new(Cell::new(0));
        let lease = EstimatorLease::new(Probe {
            released: released.clone(),
        });
        assert!(fails_midway(lease).is_err());
        assert_eq!(released.get(), 1);
    }
}
