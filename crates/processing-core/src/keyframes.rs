//! Key-frame detection: segment a swing sequence into named phases.
//!
//! # Strategies
//!
//! - **Ratio:** each configured phase sits at a fixed fraction of the
//!   sequence, `min(round(r * (N - 1)), N - 1)`. Always complete, monotonic
//!   whenever the ratio table is.
//! - **Extremum:** find a stable address posture, then follow the running
//!   maximum of shoulder rotation (backswing) and the running minimum of the
//!   right-arm angle (top). The span after top is cut into thirds for
//!   impact and follow-through; finish is the last frame. The resulting map
//!   can be partial or out of canonical order.
//!
//! Both strategies return indices inside `0..N` only. An empty sequence
//! yields a map with every covered phase unlocated.

use serde::{Deserialize, Serialize};
use swingscope_pose_model::{
    AngleKind, FrameRecord, KeyFrameMap, Landmark, SwingPhase, SwingSequence,
};

use crate::config::{AnalysisConfig, RatioTable, StabilityConfig, StrategyKind};
use crate::geometry::distance;

/// Detection algorithm together with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum KeyFrameStrategy {
    Ratio(RatioTable),
    Extremum(StabilityConfig),
}

impl KeyFrameStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            KeyFrameStrategy::Ratio(_) => StrategyKind::Ratio,
            KeyFrameStrategy::Extremum(_) => StrategyKind::Extremum,
        }
    }

    /// Pick the configured strategy and its parameter table.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        match config.strategy {
            StrategyKind::Ratio => KeyFrameStrategy::Ratio(config.ratios.clone()),
            StrategyKind::Extremum => KeyFrameStrategy::Extremum(config.stability.clone()),
        }
    }
}

impl Default for KeyFrameStrategy {
    fn default() -> Self {
        KeyFrameStrategy::Ratio(RatioTable::default())
    }
}

/// The key-frame detector.
pub struct KeyFrameDetector {
    strategy: KeyFrameStrategy,
}

impl KeyFrameDetector {
    pub fn new(strategy: KeyFrameStrategy) -> Self {
        Self { strategy }
    }

    /// Ratio strategy with the default table.
    pub fn with_defaults() -> Self {
        Self::new(KeyFrameStrategy::default())
    }

    pub fn strategy(&self) -> &KeyFrameStrategy {
        &self.strategy
    }

    pub fn detect(&self, sequence: &SwingSequence) -> KeyFrameMap {
        let map = match &self.strategy {
            KeyFrameStrategy::Ratio(table) => detect_by_ratio(sequence.len(), table),
            KeyFrameStrategy::Extremum(stability) => detect_by_extremum(sequence, stability),
        };
        tracing::debug!(
            strategy = %self.strategy.kind(),
            frames = sequence.len(),
            located = map.located().count(),
            "Detected key frames"
        );
        map
    }
}

/// Ratio strategy over a sequence of `len` frames.
pub fn detect_by_ratio(len: usize, table: &RatioTable) -> KeyFrameMap {
    let mut map = KeyFrameMap::with_phases(table.phases());
    if len == 0 {
        return map;
    }

    let last = len - 1;
    for (phase, ratio) in table.iter() {
        // NaN and negative products saturate to 0.
        let index = (ratio * last as f64).round() as usize;
        map.set(phase, Some(index.min(last)));
    }
    map
}

/// Stability/extremum strategy. Covers all six phases.
pub fn detect_by_extremum(sequence: &SwingSequence, stability: &StabilityConfig) -> KeyFrameMap {
    let mut map = KeyFrameMap::with_phases(SwingPhase::ALL);
    let len = sequence.len();
    if len == 0 {
        return map;
    }

    let address = find_address(sequence, stability).unwrap_or_else(|| {
        tracing::debug!("No stable address window found, using frame 0");
        0
    });
    map.set(SwingPhase::Address, Some(address));

    let frames = &sequence.frames()[address..];
    let backswing = running_extreme(frames, AngleKind::ShoulderRotation, |v, best| v > best);
    let top = running_extreme(frames, AngleKind::RightArm, |v, best| v < best);

    map.set(SwingPhase::Backswing, backswing.map(|i| address + i));

    let Some(top) = top.map(|i| address + i) else {
        tracing::debug!("Right arm angle never finite, top not located");
        return map;
    };
    map.set(SwingPhase::Top, Some(top));

    let last = len - 1;
    let third = (len - top) / 3;
    let impact = (top + third).min(last);
    let follow_through = (impact + third).min(last);
    map.set(SwingPhase::Impact, Some(impact));
    map.set(SwingPhase::FollowThrough, Some(follow_through));
    map.set(SwingPhase::Finish, Some(last));
    map
}

/// First frame of the earliest run of `window_size` stable transitions in
/// which every frame holds the address posture.
pub fn find_address(sequence: &SwingSequence, stability: &StabilityConfig) -> Option<usize> {
    let window = stability.window_size.max(1);
    let in_posture = |f: &FrameRecord| {
        stability.address_arm.contains(f.angles.right_arm)
            && stability.address_spine.contains(f.angles.spine_angle)
    };

    let mut run = 0usize;
    let mut run_start = 0usize;
    for (i, pair) in sequence.frames().windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        if is_stable(prev, cur, stability) && in_posture(prev) && in_posture(cur) {
            if run == 0 {
                run_start = i;
            }
            run += 1;
            if run >= window {
                return Some(run_start);
            }
        } else {
            run = 0;
        }
    }
    None
}

const STABILITY_ANGLES: [AngleKind; 3] =
    [AngleKind::RightArm, AngleKind::LeftArm, AngleKind::SpineAngle];

const STABILITY_LANDMARKS: [Landmark; 4] = [
    Landmark::RightShoulder,
    Landmark::LeftShoulder,
    Landmark::RightHip,
    Landmark::LeftHip,
];

fn is_stable(prev: &FrameRecord, cur: &FrameRecord, stability: &StabilityConfig) -> bool {
    let angles_still = STABILITY_ANGLES.iter().all(|&kind| {
        (cur.angles.get(kind) - prev.angles.get(kind)).abs() <= stability.angle_threshold
    });
    angles_still
        && STABILITY_LANDMARKS.iter().all(|&landmark| {
            distance(cur.landmarks.point(landmark), prev.landmarks.point(landmark))
                <= stability.position_threshold
        })
}

/// Index of the first value that `better` prefers over every earlier one.
/// Non-finite samples are skipped.
fn running_extreme(
    frames: &[FrameRecord],
    kind: AngleKind,
    better: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, frame) in frames.iter().enumerate() {
        let value = frame.angles.get(kind);
        if !value.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if !better(value, b) => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swingscope_pose_model::{AngleSet, LandmarkFrame, LandmarkSet, Point3};

    fn frame(index: usize, angles: AngleSet) -> FrameRecord {
        FrameRecord::new(
            LandmarkFrame::new(index, LandmarkSet::uniform(Point3::planar(0.5, 0.5)), 1.0),
            angles,
        )
    }

    fn address_angles() -> AngleSet {
        AngleSet {
            right_arm: 170.0,
            left_arm: 170.0,
            spine_angle: 35.0,
            ..Default::default()
        }
    }

    fn frozen(len: usize) -> SwingSequence {
        SwingSequence::new((0..len).map(|i| frame(i, address_angles())).collect())
    }

    #[test]
    fn test_ratio_default_table() {
        let map = detect_by_ratio(101, &RatioTable::default());
        assert_eq!(map.get(SwingPhase::Address), Some(0));
        assert_eq!(map.get(SwingPhase::Backswing), Some(30));
        assert_eq!(map.get(SwingPhase::Top), Some(50));
        assert_eq!(map.get(SwingPhase::Impact), Some(70));
        assert_eq!(map.get(SwingPhase::FollowThrough), Some(85));
        assert_eq!(map.get(SwingPhase::Finish), Some(100));
    }

    #[test]
    fn test_ratio_covers_only_configured_phases() {
        let table = RatioTable::new([(SwingPhase::Address, 0.0), (SwingPhase::Finish, 1.0)]);
        let map = detect_by_ratio(10, &table);
        assert_eq!(map.len(), 2);
        assert!(!map.covers(SwingPhase::Top));
        assert_eq!(map.get(SwingPhase::Finish), Some(9));
    }

    #[test]
    fn test_ratio_empty_sequence_is_unlocated() {
        let map = detect_by_ratio(0, &RatioTable::default());
        assert_eq!(map.located().count(), 0);
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_single_frame_collapses_to_zero() {
        let seq = frozen(1);
        for strategy in [
            KeyFrameStrategy::Ratio(RatioTable::default()),
            KeyFrameStrategy::Extremum(StabilityConfig::default()),
        ] {
            let map = KeyFrameDetector::new(strategy).detect(&seq);
            assert!(map.iter().all(|(_, i)| i == Some(0)), "{map:?}");
        }
    }

    #[test]
    fn test_frozen_sequence_address_is_zero() {
        let seq = frozen(100);
        assert_eq!(find_address(&seq, &StabilityConfig::default()), Some(0));
    }

    #[test]
    fn test_address_requires_posture() {
        let mut frames: Vec<FrameRecord> = (0..3)
            .map(|i| {
                frame(
                    i,
                    AngleSet {
                        right_arm: 120.0,
                        ..address_angles()
                    },
                )
            })
            .collect();
        frames.extend((3..10).map(|i| frame(i, address_angles())));
        let seq = SwingSequence::new(frames);
        assert_eq!(find_address(&seq, &StabilityConfig::default()), Some(3));
    }

    #[test]
    fn test_address_run_broken_by_movement() {
        let mut angles: Vec<AngleSet> = vec![address_angles(); 12];
        angles[3].left_arm = 150.0;
        let seq = SwingSequence::new(
            angles
                .into_iter()
                .enumerate()
                .map(|(i, a)| frame(i, a))
                .collect(),
        );
        // Transitions 2→3 and 3→4 are unstable; the first full run starts at 4.
        assert_eq!(find_address(&seq, &StabilityConfig::default()), Some(4));
    }

    #[test]
    fn test_extremum_locates_phases() {
        // Address hold, then rotation climbs while the arm folds, then unwinds.
        let mut angles = vec![address_angles(); 6];
        for step in 1..=4 {
            angles.push(AngleSet {
                right_arm: 170.0 - 20.0 * step as f64,
                shoulder_rotation: 20.0 * step as f64,
                ..address_angles()
            });
        }
        for step in 1..=8 {
            angles.push(AngleSet {
                right_arm: 90.0 + 10.0 * step as f64,
                shoulder_rotation: 80.0 - 10.0 * step as f64,
                ..address_angles()
            });
        }
        let seq = SwingSequence::new(
            angles
                .into_iter()
                .enumerate()
                .map(|(i, a)| frame(i, a))
                .collect(),
        );
        let map = detect_by_extremum(&seq, &StabilityConfig::default());
        assert_eq!(map.get(SwingPhase::Address), Some(0));
        assert_eq!(map.get(SwingPhase::Backswing), Some(9));
        assert_eq!(map.get(SwingPhase::Top), Some(9));
        // 18 frames, 9 remain after top: thirds of 3.
        assert_eq!(map.get(SwingPhase::Impact), Some(12));
        assert_eq!(map.get(SwingPhase::FollowThrough), Some(15));
        assert_eq!(map.get(SwingPhase::Finish), Some(17));
        assert!(!map.is_partial());
    }

    #[test]
    fn test_extremum_without_finite_arm_is_partial() {
        let seq = SwingSequence::new(
            (0..4)
                .map(|i| {
                    frame(
                        i,
                        AngleSet {
                            right_arm: f64::NAN,
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        );
        let map = detect_by_extremum(&seq, &StabilityConfig::default());
        assert_eq!(map.get(SwingPhase::Address), Some(0));
        assert_eq!(
            map.missing(),
            vec![
                SwingPhase::Top,
                SwingPhase::Impact,
                SwingPhase::FollowThrough,
                SwingPhase::Finish
            ]
        );
    }

    #[test]
    fn test_strategy_from_config() {
        let config = AnalysisConfig {
            strategy: StrategyKind::Extremum,
            ..Default::default()
        };
        let strategy = KeyFrameStrategy::from_config(&config);
        assert_eq!(strategy.kind(), StrategyKind::Extremum);
        assert!(matches!(strategy, KeyFrameStrategy::Extremum(ref s) if s.window_size == 5));
    }

    proptest! {
        #[test]
        fn prop_ratio_monotonic_and_in_range(
            len in 1usize..500,
            mut ratios in proptest::collection::vec(0.0..=1.0f64, 6),
        ) {
            ratios.sort_by(|a, b| a.total_cmp(b));
            let table = RatioTable::new(SwingPhase::ALL.into_iter().zip(ratios));
            let map = detect_by_ratio(len, &table);
            prop_assert!(map.is_monotonic());
            prop_assert!(!map.is_partial());
            for (_, index) in map.located() {
                prop_assert!(index < len);
            }
        }

        #[test]
        fn prop_extremum_indices_in_range(
            arms in proptest::collection::vec(0.0..180.0f64, 1..60),
        ) {
            let seq = SwingSequence::new(
                arms.iter()
                    .enumerate()
                    .map(|(i, arm)| frame(i, AngleSet {
                        right_arm: *arm,
                        shoulder_rotation: 180.0 - arm,
                        ..Default::default()
                    }))
                    .collect(),
            );
            let map = detect_by_extremum(&seq, &StabilityConfig::default());
            for (_, index) in map.located() {
                prop_assert!(index < arms.len());
            }
        }
    }
}
