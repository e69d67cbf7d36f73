//! Small statistics helpers over angle and position series.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice.
///
/// Samples are taken relative to the first one, so a constant series is
/// exactly `0.0`.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let origin = *values.first()?;
    let shifted: Vec<f64> = values.iter().map(|v| v - origin).collect();
    let m = mean(&shifted)?;
    let variance = shifted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// `max - min`, or `0.0` for an empty slice.
pub fn range(values: &[f64]) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max - min
}

/// Drop values whose z-score exceeds `threshold`.
///
/// Non-finite values are always dropped. The z-score pass is skipped for
/// fewer than 3 samples or zero variance, and if it would remove every
/// sample the finite input is returned unchanged.
pub fn filter_outliers(values: &[f64], threshold: f64) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 3 {
        return finite;
    }

    let (Some(m), Some(std)) = (mean(&finite), population_std(&finite)) else {
        return finite;
    };
    if std == 0.0 {
        return finite;
    }

    let kept: Vec<f64> = finite
        .iter()
        .copied()
        .filter(|v| ((v - m) / std).abs() <= threshold)
        .collect();

    if kept.is_empty() {
        finite
    } else {
        kept
    }
}

/// Root-mean-square distance of 2D points from their centroid.
///
/// This is the population standard deviation of a 2D point cloud: `0.0`
/// for one point or for points that never move. Points are measured from
/// the first one before averaging.
pub fn planar_spread(points: &[(f64, f64)]) -> f64 {
    let Some(&(ox, oy)) = points.first() else {
        return 0.0;
    };
    if points.len() < 2 {
        return 0.0;
    }
    let offsets: Vec<(f64, f64)> = points.iter().map(|(x, y)| (x - ox, y - oy)).collect();
    let n = points.len() as f64;
    let cx = offsets.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = offsets.iter().map(|p| p.1).sum::<f64>() / n;
    let mean_sq = offsets
        .iter()
        .map(|(x, y)| (x - cx).powi(2) + (y - cy).powi(2))
        .sum::<f64>()
        / n;
    mean_sq.sqrt()
}
