//! Geometry helpers for landmark math.
//!
//! None of these functions fail. Degenerate input (coincident points,
//! zero-length vectors, non-finite coordinates) yields a defined default,
//! so a single bad landmark can never interrupt a video.

use swingscope_pose_model::{LandmarkSet, Point3};

/// Vectors shorter than this are treated as zero-length.
pub const EPSILON: f64 = 1e-10;

/// Why an angle could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DegenerateGeometry {
    #[error("point has non-finite coordinates")]
    NonFinite,
    #[error("vector length below epsilon")]
    ZeroLength,
}

/// Divide, returning `default` when either operand is NaN or the
/// denominator is within [`EPSILON`] of zero.
pub fn safe_divide(numerator: f64, denominator: f64, default: f64) -> f64 {
    if numerator.is_nan() || denominator.is_nan() || denominator.abs() < EPSILON {
        return default;
    }
    numerator / denominator
}

/// [`safe_divide`] for operands that may be absent.
pub fn safe_divide_opt(numerator: Option<f64>, denominator: Option<f64>, default: f64) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) => safe_divide(n, d, default),
        _ => default,
    }
}

/// Angle at vertex `p2` formed by `p1` and `p3`, in degrees `[0, 180]`.
pub fn try_angle_between(p1: Point3, p2: Point3, p3: Point3) -> Result<f64, DegenerateGeometry> {
    if !(p1.is_finite() && p2.is_finite() && p3.is_finite()) {
        return Err(DegenerateGeometry::NonFinite);
    }

    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 < EPSILON || n2 < EPSILON {
        return Err(DegenerateGeometry::ZeroLength);
    }

    // Rounding can push the cosine just outside [-1, 1].
    let cos = (v1.dot(v2) / (n1 * n2)).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

/// [`try_angle_between`], with `0.0` for degenerate input.
pub fn angle_between(p1: Point3, p2: Point3, p3: Point3) -> f64 {
    try_angle_between(p1, p2, p3).unwrap_or(0.0)
}

/// Euclidean distance; `0.0` if either point is non-finite.
pub fn distance(p1: Point3, p2: Point3) -> f64 {
    if !(p1.is_finite() && p2.is_finite()) {
        return 0.0;
    }
    (p1 - p2).norm()
}

/// Distance in the image plane, ignoring depth.
pub fn planar_distance(p1: Point3, p2: Point3) -> f64 {
    distance(Point3::planar(p1.x, p1.y), Point3::planar(p2.x, p2.y))
}

/// Direction of the image-plane vector `from → to`, in degrees `(-180, 180]`.
pub fn rotation_degrees(from: Point3, to: Point3) -> f64 {
    if !(from.is_finite() && to.is_finite()) {
        return 0.0;
    }
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

/// Angle between the image-plane vector `base → tip` and image-up `(0, -1)`.
pub fn tilt_from_vertical(base: Point3, tip: Point3) -> f64 {
    let base = Point3::planar(base.x, base.y);
    let tip = Point3::planar(tip.x, tip.y);
    angle_between(tip, base, base + Point3::planar(0.0, -1.0))
}

/// Map any angle into `[0, 360)`. Non-finite input maps to `0.0`.
pub fn normalize_angle_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // Tiny negative inputs round up to exactly 360.0.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Display form with one decimal, e.g. `172.4°`.
pub fn format_angle(angle: f64) -> String {
    format!("{angle:.1}°")
}

/// Rescale landmark x/y to the set's own bounding box; z is kept.
///
/// A zero-width or zero-height box collapses that axis to `0.0`.
pub fn normalize_coordinates(set: &LandmarkSet) -> LandmarkSet {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (_, p) in set.iter().filter(|(_, p)| p.is_finite()) {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    LandmarkSet::from_fn(|landmark| {
        let p = set.get(landmark);
        Point3::new(
            safe_divide(p.x - min_x, max_x - min_x, 0.0),
            safe_divide(p.y - min_y, max_y - min_y, 0.0),
            p.z,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swingscope_pose_model::Landmark;

    fn point() -> impl Strategy<Value = Point3> {
        (-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64).prop_map(|(x, y, z)| Point3::new(x, y, z))
    }

    #[test]
    fn test_right_angle() {
        let a = angle_between(
            Point3::planar(1.0, 0.0),
            Point3::ZERO,
            Point3::planar(0.0, 1.0),
        );
        assert!((a - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_is_180() {
        let a = angle_between(
            Point3::planar(-1.0, 0.0),
            Point3::ZERO,
            Point3::planar(3.0, 0.0),
        );
        assert!((a - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Point3::new(0.3, 0.3, 0.3);
        assert_eq!(
            try_angle_between(p, p, Point3::ZERO),
            Err(DegenerateGeometry::ZeroLength)
        );
        assert_eq!(angle_between(p, p, Point3::ZERO), 0.0);
    }

    #[test]
    fn test_non_finite_points_are_degenerate() {
        let nan = Point3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(
            try_angle_between(nan, Point3::ZERO, Point3::planar(1.0, 0.0)),
            Err(DegenerateGeometry::NonFinite)
        );
        assert_eq!(distance(nan, Point3::ZERO), 0.0);
    }

    #[test]
    fn test_safe_divide_defaults() {
        assert_eq!(safe_divide(1.0, 0.0, 7.0), 7.0);
        assert_eq!(safe_divide(1.0, 1e-11, 7.0), 7.0);
        assert_eq!(safe_divide(f64::NAN, 2.0, 7.0), 7.0);
        assert_eq!(safe_divide(6.0, 3.0, 7.0), 2.0);
        assert_eq!(safe_divide_opt(None, Some(2.0), 0.0), 0.0);
        assert_eq!(safe_divide_opt(Some(6.0), None, -1.0), -1.0);
    }

    #[test]
    fn test_tempo_of_zero_frames_is_neutral() {
        let backswing_frames = 0.0;
        let downswing_frames = 0.0;
        assert_eq!(safe_divide(backswing_frames, downswing_frames, 1.0), 1.0);
    }

    #[test]
    fn test_rotation_degrees() {
        let left = Point3::planar(0.4, 0.5);
        assert!((rotation_degrees(left, Point3::planar(0.6, 0.5)) - 0.0).abs() < 1e-9);
        assert!((rotation_degrees(left, Point3::planar(0.4, 0.7)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_from_vertical() {
        let hip = Point3::planar(0.5, 0.6);
        assert!(tilt_from_vertical(hip, Point3::planar(0.5, 0.3)).abs() < 1e-9);
        let tilt = 35f64.to_radians();
        let leaning = Point3::planar(0.5 + 0.3 * tilt.sin(), 0.6 - 0.3 * tilt.cos());
        assert!((tilt_from_vertical(hip, leaning) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_angle_examples() {
        assert_eq!(normalize_angle_degrees(370.0), 10.0);
        assert_eq!(normalize_angle_degrees(-90.0), 270.0);
        assert_eq!(normalize_angle_degrees(360.0), 0.0);
        assert_eq!(normalize_angle_degrees(-1e-20), 0.0);
        assert_eq!(normalize_angle_degrees(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(172.44), "172.4°");
    }

    #[test]
    fn test_normalize_coordinates_to_bounding_box() {
        let mut set = LandmarkSet::uniform(Point3::new(0.5, 0.5, 0.2));
        set.set(Landmark::Nose, Point3::new(0.25, 0.25, 0.2));
        set.set(Landmark::RightAnkle, Point3::new(0.75, 0.75, -0.3));
        let normalized = normalize_coordinates(&set);
        assert_eq!(normalized.get(Landmark::Nose), Point3::new(0.0, 0.0, 0.2));
        assert_eq!(normalized.get(Landmark::RightAnkle), Point3::new(1.0, 1.0, -0.3));
        assert_eq!(normalized.get(Landmark::LeftHip), Point3::new(0.5, 0.5, 0.2));
    }

    #[test]
    fn test_normalize_coordinates_degenerate_box() {
        let set = LandmarkSet::uniform(Point3::new(0.5, 0.5, 0.0));
        let normalized = normalize_coordinates(&set);
        assert_eq!(normalized.get(Landmark::Nose), Point3::ZERO);
    }

    proptest! {
        #[test]
        fn prop_angle_symmetric_and_bounded(p1 in point(), p2 in point(), p3 in point()) {
            let a = angle_between(p1, p2, p3);
            let b = angle_between(p3, p2, p1);
            prop_assert_eq!(a, b);
            prop_assert!((0.0..=180.0).contains(&a));
        }

        #[test]
        fn prop_degenerate_vector_gives_zero(p1 in point(), p2 in point()) {
            prop_assert_eq!(angle_between(p2, p2, p1), 0.0);
            prop_assert_eq!(angle_between(p1, p2, p2), 0.0);
        }

        #[test]
        fn prop_safe_divide_by_zero_is_default(x in -1e6..1e6f64, d in -1e6..1e6f64) {
            prop_assert_eq!(safe_divide(x, 0.0, d), d);
            prop_assert_eq!(safe_divide_opt(None, Some(x), d), d);
        }

        #[test]
        fn prop_normalize_angle_bounded_and_idempotent(a in -1e7..1e7f64) {
            let once = normalize_angle_degrees(a);
            prop_assert!((0.0..360.0).contains(&once));
            prop_assert_eq!(normalize_angle_degrees(once), once);
        }
    }
}
