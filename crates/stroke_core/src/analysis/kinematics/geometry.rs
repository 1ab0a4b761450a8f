//! Angle and speed primitives on `nalgebra` vectors.
//!
//! All functions return `NaN` instead of dividing by a zero-length segment.

use nalgebra::Vector3;

/// Segments shorter than this are treated as zero length.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Angle at vertex `v` between `v -> a` and `v -> b`, degrees in [0, 180].
pub fn joint_angle(a: &Vector3<f64>, v: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    angle_between(&(a - v), &(b - v))
}

/// Unsigned angle between two direction vectors, degrees in [0, 180].
pub fn angle_between(u: &Vector3<f64>, w: &Vector3<f64>) -> f64 {
    let nu = u.norm();
    let nw = w.norm();
    if nu < MIN_SEGMENT_LENGTH || nw < MIN_SEGMENT_LENGTH {
        return f64::NAN;
    }
    // Rounding can push the cosine just outside [-1, 1]
    let cos = (u.dot(w) / (nu * nw)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Orientation of the `from -> to` line in the image plane, degrees in
/// (-180, 180].
pub fn line_roll(from: &Vector3<f64>, to: &Vector3<f64>) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.hypot(dy) < MIN_SEGMENT_LENGTH {
        return f64::NAN;
    }
    let deg = dy.atan2(dx).to_degrees();
    if deg <= -180.0 {
        180.0
    } else {
        deg
    }
}

/// Deviation of a line with orientation `roll` from the horizontal,
/// degrees in [0, 90].
pub fn tilt_from_horizontal(roll: f64) -> f64 {
    let r = roll.abs();
    r.min(180.0 - r)
}

/// Speed between two samples `frame_gap` frames apart at `fps`.
pub fn speed(prev: &Vector3<f64>, cur: &Vector3<f64>, fps: f64, frame_gap: u64) -> f64 {
    if frame_gap == 0 {
        return f64::NAN;
    }
    (cur - prev).norm() * fps / frame_gap as f64
}

/// Midpoint of two points.
pub fn midpoint(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (a + b) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Vector3<f64> {
        Vector3::new(x, y, 0.0)
    }

    #[test]
    fn test_right_angle_elbow() {
        let shoulder = p(0.0, 0.0);
        let elbow = p(1.0, 0.0);
        let wrist = p(1.0, 1.0);
        let angle = joint_angle(&shoulder, &elbow, &wrist);
        assert!((angle - 90.0).abs() < 0.01, "{angle}");
    }

    #[test]
    fn test_straight_and_folded() {
        assert!((joint_angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!(joint_angle(&p(2.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_segment_is_nan() {
        assert!(joint_angle(&p(1.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)).is_nan());
        assert!(line_roll(&p(0.5, 0.5), &p(0.5, 0.5)).is_nan());
    }

    #[test]
    fn test_roll_range() {
        assert_eq!(line_roll(&p(0.0, 0.0), &p(1.0, 0.0)), 0.0);
        assert!((line_roll(&p(0.0, 0.0), &p(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert_eq!(line_roll(&p(0.0, 0.0), &p(-1.0, -0.0)), 180.0);
        assert!((tilt_from_horizontal(170.0) - 10.0).abs() < 1e-9);
        assert!((tilt_from_horizontal(-30.0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_scales_with_frame_gap() {
        let a = p(0.0, 0.0);
        let b = p(0.3, 0.4);
        assert!((speed(&a, &b, 30.0, 1) - 15.0).abs() < 1e-9);
        assert!((speed(&a, &b, 30.0, 3) - 5.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_joint_angle_in_range(
            ax in -1.0f64..1.0, ay in -1.0f64..1.0, az in -1.0f64..1.0,
            vx in -1.0f64..1.0, vy in -1.0f64..1.0, vz in -1.0f64..1.0,
            bx in -1.0f64..1.0, by in -1.0f64..1.0, bz in -1.0f64..1.0,
        ) {
            let angle = joint_angle(
                &Vector3::new(ax, ay, az),
                &Vector3::new(vx, vy, vz),
                &Vector3::new(bx, by, bz),
            );
            prop_assert!(angle.is_nan() || (0.0..=180.0).contains(&angle));
        }
    }
}
