//! Analysis configuration: key-frame strategy, ratio table, stability
//! window, and evaluation thresholds.
//!
//! Every table is an explicit value handed to the detector and evaluator at
//! construction, so differently configured analyses can run side by side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swingscope_common::{SwingError, SwingResult};
use swingscope_pose_model::SwingPhase;

/// Which key-frame detection algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Phase boundaries at fixed fractions of the sequence length.
    #[default]
    Ratio,
    /// Stable address window, then running extrema of rotation and arm angle.
    Extremum,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Ratio => "ratio",
            StrategyKind::Extremum => "extremum",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = SwingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ratio" => Ok(StrategyKind::Ratio),
            "extremum" => Ok(StrategyKind::Extremum),
            other => Err(SwingError::config(format!(
                "unknown key-frame strategy '{other}' (expected 'ratio' or 'extremum')"
            ))),
        }
    }
}

/// Fraction of the sequence at which each configured phase sits.
///
/// Serialized as `{"address": 0.0, "top": 0.5, ...}`. Phases left out of
/// the table are not detected by the ratio strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioTable {
    ratios: BTreeMap<SwingPhase, f64>,
}

impl RatioTable {
    pub fn new(ratios: impl IntoIterator<Item = (SwingPhase, f64)>) -> Self {
        Self {
            ratios: ratios.into_iter().collect(),
        }
    }

    pub fn get(&self, phase: SwingPhase) -> Option<f64> {
        self.ratios.get(&phase).copied()
    }

    /// Configured phases in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SwingPhase, f64)> + '_ {
        self.ratios.iter().map(|(p, r)| (*p, *r))
    }

    pub fn phases(&self) -> impl Iterator<Item = SwingPhase> + '_ {
        self.ratios.keys().copied()
    }

    pub fn validate(&self) -> SwingResult<()> {
        let mut previous: Option<(SwingPhase, f64)> = None;
        for (phase, ratio) in self.iter() {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(SwingError::config(format!(
                    "ratio for {phase} must be within [0, 1], got {ratio}"
                )));
            }
            if let Some((prev_phase, prev_ratio)) = previous {
                if ratio < prev_ratio {
                    return Err(SwingError::config(format!(
                        "ratio for {phase} ({ratio}) is below the ratio for {prev_phase} ({prev_ratio})"
                    )));
                }
            }
            previous = Some((phase, ratio));
        }
        Ok(())
    }
}

impl Default for RatioTable {
    fn default() -> Self {
        Self::new([
            (SwingPhase::Address, 0.0),
            (SwingPhase::Backswing, 0.3),
            (SwingPhase::Top, 0.5),
            (SwingPhase::Impact, 0.7),
            (SwingPhase::FollowThrough, 0.85),
            (SwingPhase::Finish, 1.0),
        ])
    }
}

/// Inclusive `[min, max]` bound in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f64,
    pub max: f64,
}

impl AngleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Parameters of the stability/extremum key-frame strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Consecutive stable frame-to-frame transitions required for address.
    pub window_size: usize,

    /// Maximum change of arm and spine angles between frames (degrees).
    pub angle_threshold: f64,

    /// Maximum movement of shoulders and hips between frames (normalized units).
    pub position_threshold: f64,

    /// Right-arm angle expected at address.
    pub address_arm: AngleRange,

    /// Spine angle expected at address.
    pub address_spine: AngleRange,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            angle_threshold: 5.0,
            position_threshold: 0.05,
            address_arm: AngleRange::new(160.0, 180.0),
            address_spine: AngleRange::new(20.0, 45.0),
        }
    }
}

impl StabilityConfig {
    pub fn validate(&self) -> SwingResult<()> {
        if self.window_size == 0 {
            return Err(SwingError::config("stability window_size must be at least 1"));
        }
        if !(self.angle_threshold >= 0.0 && self.position_threshold >= 0.0) {
            return Err(SwingError::config(
                "stability thresholds must be non-negative",
            ));
        }
        check_range("address_arm", self.address_arm)?;
        check_range("address_spine", self.address_spine)
    }
}

/// Numeric bounds the evaluator compares phase angles and metrics against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub arm_angle_min: f64,
    pub arm_angle_max: f64,
    pub shoulder_rotation_min: f64,
    pub hip_rotation_min: f64,
    pub spine_angle_min: f64,
    pub head_movement_max: f64,
    pub follow_through_max: f64,
    pub balance_knee_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            arm_angle_min: 165.0,
            arm_angle_max: 180.0,
            shoulder_rotation_min: 80.0,
            hip_rotation_min: 45.0,
            spine_angle_min: 30.0,
            head_movement_max: 0.1,
            follow_through_max: 120.0,
            balance_knee_max: 160.0,
        }
    }
}

impl Thresholds {
    /// Arm angle bound used at address and impact.
    pub fn arm_range(&self) -> AngleRange {
        AngleRange::new(self.arm_angle_min, self.arm_angle_max)
    }

    pub fn validate(&self) -> SwingResult<()> {
        check_range("arm_angle", self.arm_range())?;
        let all = [
            self.shoulder_rotation_min,
            self.hip_rotation_min,
            self.spine_angle_min,
            self.head_movement_max,
            self.follow_through_max,
            self.balance_knee_max,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(SwingError::config("thresholds must be finite numbers"));
        }
        Ok(())
    }
}

/// Everything the pure analysis stages need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub strategy: StrategyKind,
    pub ratios: RatioTable,
    pub stability: StabilityConfig,
    pub thresholds: Thresholds,

    /// z-score above which rotation samples are treated as tracking jitter.
    pub outlier_z_threshold: f64,

    /// Keep per-frame records in the final report.
    pub include_frames: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            ratios: RatioTable::default(),
            stability: StabilityConfig::default(),
            thresholds: Thresholds::default(),
            outlier_z_threshold: 2.0,
            include_frames: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> SwingResult<()> {
        self.ratios.validate()?;
        self.stability.validate()?;
        self.thresholds.validate()?;
        if !(self.outlier_z_threshold.is_finite() && self.outlier_z_threshold > 0.0) {
            return Err(SwingError::config(format!(
                "outlier_z_threshold must be positive, got {}",
                self.outlier_z_threshold
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, range: AngleRange) -> SwingResult<()> {
    if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
        return Err(SwingError::config(format!(
            "{name} range is invalid: min {} > max {}",
            range.min, range.max
        )));
    }
    Ok(())
}
