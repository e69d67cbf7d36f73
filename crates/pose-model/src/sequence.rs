//! The ordered per-frame records of one analyzed video.

use serde::{Deserialize, Serialize};

use crate::angles::{AngleKind, AngleSet};
use crate::landmark::{Landmark, LandmarkFrame, Point3};

/// A validated frame and the angles derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub landmarks: LandmarkFrame,
    pub angles: AngleSet,
}

impl FrameRecord {
    pub fn new(landmarks: LandmarkFrame, angles: AngleSet) -> Self {
        Self { landmarks, angles }
    }

    /// Index of the decoded source frame this record came from.
    pub fn frame_index(&self) -> usize {
        self.landmarks.frame_index
    }
}

/// Time-ordered frame records for one video.
///
/// Built once by the collector and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwingSequence {
    frames: Vec<FrameRecord>,
}

impl SwingSequence {
    /// Wrap records that are already in temporal order.
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FrameRecord> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameRecord> {
        self.frames.iter()
    }

    /// One angle across every frame.
    pub fn series(&self, kind: AngleKind) -> Vec<f64> {
        self.frames.iter().map(|f| f.angles.get(kind)).collect()
    }

    /// One landmark's position across every frame.
    pub fn trajectory(&self, landmark: Landmark) -> Vec<Point3> {
        self.frames.iter().map(|f| f.landmarks.point(landmark)).collect()
    }

    /// Whether source frame indices strictly increase.
    pub fn is_time_ordered(&self) -> bool {
        self.frames
            .windows(2)
            .all(|w| w[0].frame_index() < w[1].frame_index())
    }

    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a SwingSequence {
    type Item = &'a FrameRecord;
    type IntoIter = std::slice::Iter<'a, FrameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::LandmarkSet;

    fn record(frame_index: usize, arm: f64, nose_x: f64) -> FrameRecord {
        let mut set = LandmarkSet::uniform(Point3::ZERO);
        set.set(Landmark::Nose, Point3::planar(nose_x, 0.2));
        FrameRecord::new(
            LandmarkFrame::new(frame_index, set, 1.0),
            AngleSet {
                right_arm: arm,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_series_and_trajectory() {
        let seq = SwingSequence::new(vec![record(0, 170.0, 0.5), record(2, 120.0, 0.52)]);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.series(AngleKind::RightArm), vec![170.0, 120.0]);
        let nose = seq.trajectory(Landmark::Nose);
        assert_eq!(nose[1].x, 0.52);
    }

    #[test]
    fn test_time_ordering() {
        let ordered = SwingSequence::new(vec![record(0, 1.0, 0.0), record(3, 1.0, 0.0)]);
        assert!(ordered.is_time_ordered());
        let unordered = SwingSequence::new(vec![record(3, 1.0, 0.0), record(1, 1.0, 0.0)]);
        assert!(!unordered.is_time_ordered());
    }

    #[test]
    fn test_sequence_serializes_as_list() {
        let seq = SwingSequence::new(vec![record(0, 170.0, 0.5)]);
        let json = serde_json::to_value(&seq).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["landmarks"]["frame_index"], serde_json::json!(0));
        assert_eq!(json[0]["angles"]["right_arm"], serde_json::json!(170.0));
    }
}
