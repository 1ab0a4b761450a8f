//! # Kinematic Feature Extractor
//!
//! Landmark frames -> per-frame metric series.
//!
//! ## Algorithm
//! 1. Gate each landmark by visibility into a fixed-slot [`Skeleton`]
//! 2. Build per-point tracks, interpolating short gaps
//! 3. Left and right limbs in parallel: elbow, shoulder, knee angles and
//!    hand/ankle speeds
//! 4. Torso: average/max hand speed, body roll, body alignment
//!
//! Every metric needing an absent point is `NaN` for that frame.

use tracing::debug;

use super::geometry::{angle_between, joint_angle, line_roll, speed};
use super::tracks::Tracks;
use crate::config::LandmarkConfig;
use crate::models::{BodyPoint, BodySide, LandmarkFrame, Metric, MetricSeries, Skeleton};

/// Extractor output: the metric series plus the tracks later stages read.
#[derive(Debug, Clone)]
pub struct Kinematics {
    pub series: MetricSeries,
    pub tracks: Tracks,
    /// Frames with no landmark above the visibility threshold
    pub occluded_frames: usize,
}

/// Extract all per-frame metrics.
///
/// `frames` must already be validated (strictly increasing indices, `fps > 0`).
pub fn extract(frames: &[LandmarkFrame], fps: f64, config: &LandmarkConfig) -> Kinematics {
    let frame_indices: Vec<u64> = frames.iter().map(|f| f.frame_index).collect();
    let skeletons: Vec<Skeleton> = frames
        .iter()
        .map(|f| {
            Skeleton::from_frame(f, config.model, config.visibility_threshold, config.angle_space)
        })
        .collect();
    let occluded_frames = frames
        .iter()
        .filter(|f| !f.has_visible_landmark(config.visibility_threshold))
        .count();

    let tracks = Tracks::build(&frame_indices, &skeletons, config.max_interpolation_gap);

    let (left, right) = rayon::join(
        || side_metrics(&tracks, BodySide::Left, fps),
        || side_metrics(&tracks, BodySide::Right, fps),
    );

    let mut series = MetricSeries::new(frame_indices);
    for (metric, samples) in left.into_iter().chain(right) {
        series.insert(metric, samples);
    }

    let (avg, max) = combined_hand_speed(
        series.get(Metric::HandLeftVelocity).unwrap_or(&[]),
        series.get(Metric::HandRightVelocity).unwrap_or(&[]),
    );
    series.insert(Metric::AvgVelocity, avg);
    series.insert(Metric::MaxVelocity, max);

    series.insert(
        Metric::BodyRoll,
        tracks.map_frames([BodyPoint::LeftShoulder, BodyPoint::RightShoulder], |[l, r]| {
            line_roll(&l, &r)
        }),
    );
    series.insert(
        Metric::BodyAlignment,
        tracks.map_frames(
            [
                BodyPoint::LeftShoulder,
                BodyPoint::RightShoulder,
                BodyPoint::LeftHip,
                BodyPoint::RightHip,
            ],
            |[ls, rs, lh, rh]| angle_between(&(rs - ls), &(rh - lh)),
        ),
    );

    debug!(
        frames = series.len(),
        metrics = series.metric_count(),
        occluded_frames,
        interpolated = tracks.interpolated_samples(),
        "kinematics extracted"
    );

    Kinematics {
        series,
        tracks,
        occluded_frames,
    }
}

fn side_metrics(tracks: &Tracks, side: BodySide, fps: f64) -> Vec<(Metric, Vec<f64>)> {
    let angle = |a: BodyPoint, v: BodyPoint, b: BodyPoint| {
        tracks.map_frames([a, v, b], |[a, v, b]| joint_angle(&a, &v, &b))
    };

    vec![
        (
            Metric::elbow(side),
            angle(side.shoulder(), side.elbow(), side.wrist()),
        ),
        (
            Metric::shoulder(side),
            angle(side.hip(), side.shoulder(), side.elbow()),
        ),
        (Metric::knee(side), angle(side.hip(), side.knee(), side.ankle())),
        (
            Metric::hand_velocity(side),
            point_speed(tracks, side.wrist(), fps),
        ),
        (
            Metric::ankle_velocity(side),
            point_speed(tracks, side.ankle(), fps),
        ),
    ]
}

/// Speed of `point` between consecutive processed frames; the first is `NaN`.
pub fn point_speed(tracks: &Tracks, point: BodyPoint, fps: f64) -> Vec<f64> {
    let frames = tracks.frame_indices();
    (0..tracks.len())
        .map(|i| {
            if i == 0 {
                return f64::NAN;
            }
            match (tracks.get(point, i - 1), tracks.get(point, i)) {
                (Some(prev), Some(cur)) => speed(&prev, &cur, fps, frames[i] - frames[i - 1]),
                _ => f64::NAN,
            }
        })
        .collect()
}

/// Mean and max of the two hand speeds; `NaN` unless both are defined.
fn combined_hand_speed(left: &[f64], right: &[f64]) -> (Vec<f64>, Vec<f64>) {
    left.iter()
        .zip(right)
        .map(|(&l, &r)| {
            if l.is_finite() && r.is_finite() {
                ((l + r) / 2.0, l.max(r))
            } else {
                (f64::NAN, f64::NAN)
            }
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Landmark, LandmarkModel};

    fn frame(index: u64, points: &[(BodyPoint, f64, f64)]) -> LandmarkFrame {
        let model = LandmarkModel::MediapipePose;
        let mut landmarks = vec![Landmark::new(0.0, 0.0, 0.0, 0.0); model.point_count()];
        for &(point, x, y) in points {
            landmarks[model.index_of(point)] = Landmark::new(x, y, 0.0, 1.0);
        }
        LandmarkFrame::new(index, landmarks)
    }

    fn arm(index: u64, wrist_x: f64) -> LandmarkFrame {
        frame(
            index,
            &[
                (BodyPoint::LeftShoulder, 0.0, 0.0),
                (BodyPoint::LeftElbow, 1.0, 0.0),
                (BodyPoint::LeftWrist, wrist_x, 1.0),
            ],
        )
    }

    #[test]
    fn test_elbow_right_angle_scenario() {
        let frames = vec![arm(0, 1.0), arm(1, 1.0), arm(2, 1.0)];
        let k = extract(&frames, 30.0, &LandmarkConfig::default());
        let elbow = k.series.get(Metric::ElbowLeft).unwrap();
        assert_eq!(elbow.len(), 3);
        for angle in elbow {
            assert!((angle - 90.0).abs() < 0.01);
        }
        // Right arm never visible
        assert!(k.series.get(Metric::ElbowRight).unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_velocity_uses_fps_and_frame_gap() {
        let frames = vec![arm(0, 1.0), arm(1, 1.1), arm(3, 1.3)];
        let k = extract(&frames, 30.0, &LandmarkConfig::default());
        let v = k.series.get(Metric::HandLeftVelocity).unwrap();
        assert!(v[0].is_nan());
        assert!((v[1] - 3.0).abs() < 1e-9);
        assert!((v[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_series_have_frame_count_length() {
        let frames: Vec<LandmarkFrame> = (0..7).map(|i| arm(i, 1.0 + i as f64 * 0.01)).collect();
        let k = extract(&frames, 25.0, &LandmarkConfig::default());
        assert_eq!(k.series.metric_count(), 14);
        for (_, samples) in k.series.iter() {
            assert_eq!(samples.len(), 7);
        }
    }

    #[test]
    fn test_roll_and_alignment() {
        let torso = frame(
            0,
            &[
                (BodyPoint::LeftShoulder, 0.0, 0.0),
                (BodyPoint::RightShoulder, 1.0, 1.0),
                (BodyPoint::LeftHip, 0.0, 1.0),
                (BodyPoint::RightHip, 1.0, 1.0),
            ],
        );
        let k = extract(&[torso.clone(), torso], 30.0, &LandmarkConfig::default());
        assert!((k.series.get(Metric::BodyRoll).unwrap()[0] - 45.0).abs() < 1e-9);
        assert!((k.series.get(Metric::BodyAlignment).unwrap()[0] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_occluded_frames_counted() {
        let frames = vec![arm(0, 1.0), frame(1, &[]), arm(2, 1.0)];
        let k = extract(&frames, 30.0, &LandmarkConfig::default());
        assert_eq!(k.occluded_frames, 1);
        // The single-frame hole is bridged
        assert!((k.series.get(Metric::ElbowLeft).unwrap()[1] - 90.0).abs() < 0.01);
    }
}
