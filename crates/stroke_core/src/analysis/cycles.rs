//! # Stroke Cycle Detector
//!
//! Finds periodic stroke cycles as intervals between consecutive peaks of a
//! reference signal.
//!
//! ## Algorithm
//! 1. Build the reference signal ([`CycleSignal`], default mean hand height)
//! 2. [`find_peaks`] with the configured prominence; peaks closer than
//!    `min_cycle_seconds` (converted at the frame rate) are merged
//! 3. Cycle k spans `[frame(peak_k), frame(peak_k+1) - 1]`
//! 4. Stroke rate = cycles / seconds spanned by the peaks * 60
//! 5. Stroke length = mean horizontal travel of the reference point per cycle
//!
//! Fewer than two peaks is not an error: rate 0, length `NaN`, no cycles.

use nalgebra::Vector3;
use tracing::{debug, warn};

use super::geometry::midpoint;
use super::kinematics::Kinematics;
use super::signal::{find_peaks, nan_mean, Peak};
use crate::config::{CycleConfig, CycleSignal, LengthReference};
use crate::models::{BodyPoint, Metric};

/// Cycle boundaries before phase segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleBounds {
    pub cycle_id: u32,
    /// First processed sample of the cycle
    pub start_pos: usize,
    /// Last processed sample of the cycle (inclusive)
    pub end_pos: usize,
    pub start_frame: u64,
    /// Inclusive; the frame before the next cycle's first frame
    pub end_frame: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleDetection {
    pub peaks: Vec<Peak>,
    pub cycles: Vec<CycleBounds>,
    /// Strokes per minute; 0 with fewer than two peaks
    pub stroke_rate: f64,
    /// Mean per-cycle forward travel; `NaN` when unmeasurable
    pub stroke_length: f64,
}

impl CycleDetection {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Reference signal whose peaks bound cycles.
pub fn cycle_signal(kinematics: &Kinematics, signal: CycleSignal) -> Vec<f64> {
    let tracks = &kinematics.tracks;
    match signal {
        CycleSignal::HandHeight => tracks.map_frames(
            [BodyPoint::LeftWrist, BodyPoint::RightWrist],
            // Image y grows downward
            |[l, r]| -(l.y + r.y) / 2.0,
        ),
        CycleSignal::LeftWristHeight => tracks.map_frames([BodyPoint::LeftWrist], |[w]| -w.y),
        CycleSignal::RightWristHeight => tracks.map_frames([BodyPoint::RightWrist], |[w]| -w.y),
        CycleSignal::HandSpeed => kinematics
            .series
            .get(Metric::AvgVelocity)
            .map(<[f64]>::to_vec)
            .unwrap_or_else(|| vec![f64::NAN; kinematics.series.len()]),
    }
}

/// Detect cycles on `signal`, aligned with `kinematics`' processed frames.
pub fn detect_cycles(
    signal: &[f64],
    kinematics: &Kinematics,
    fps: f64,
    config: &CycleConfig,
) -> CycleDetection {
    let frames = kinematics.series.frame_indices();
    let peaks = find_peaks(signal, &config.peaks_at(fps));

    if peaks.len() < 2 {
        warn!(peaks = peaks.len(), "no stroke cycles detected");
        return CycleDetection {
            peaks,
            cycles: Vec::new(),
            stroke_rate: 0.0,
            stroke_length: f64::NAN,
        };
    }

    let cycles: Vec<CycleBounds> = peaks
        .windows(2)
        .enumerate()
        .map(|(k, pair)| CycleBounds {
            cycle_id: k as u32,
            start_pos: pair[0].index,
            end_pos: pair[1].index - 1,
            start_frame: frames[pair[0].index],
            end_frame: frames[pair[1].index] - 1,
        })
        .collect();

    let first = frames[peaks[0].index];
    let last = frames[peaks[peaks.len() - 1].index];
    let seconds = (last - first) as f64 / fps;
    let stroke_rate = cycles.len() as f64 / seconds * 60.0;

    let reference = reference_positions(kinematics, config.length_reference);
    let stroke_length = nan_mean(peaks.windows(2).map(|pair| {
        match (reference[pair[0].index], reference[pair[1].index]) {
            (Some(a), Some(b)) => (b.x - a.x).abs(),
            _ => f64::NAN,
        }
    }));

    debug!(
        peaks = peaks.len(),
        cycles = cycles.len(),
        stroke_rate,
        stroke_length,
        "stroke cycles detected"
    );

    CycleDetection {
        peaks,
        cycles,
        stroke_rate,
        stroke_length,
    }
}

fn reference_positions(kinematics: &Kinematics, reference: LengthReference) -> Vec<Option<Vector3<f64>>> {
    let tracks = &kinematics.tracks;
    let pair = |a: BodyPoint, b: BodyPoint| -> Vec<Option<Vector3<f64>>> {
        (0..tracks.len())
            .map(|i| Some(midpoint(&tracks.get(a, i)?, &tracks.get(b, i)?)))
            .collect()
    };
    match reference {
        LengthReference::HipCenter => pair(BodyPoint::LeftHip, BodyPoint::RightHip),
        LengthReference::ShoulderCenter => pair(BodyPoint::LeftShoulder, BodyPoint::RightShoulder),
        LengthReference::Nose => tracks.track(BodyPoint::Nose).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::kinematics::extract;
    use crate::config::LandmarkConfig;
    use crate::models::{Landmark, LandmarkFrame, LandmarkModel};
    use std::f64::consts::PI;

    /// Wrists oscillate vertically with period `period_s`; hips drift forward.
    fn swimmer(period_s: f64, fps: f64, seconds: f64) -> Vec<LandmarkFrame> {
        let model = LandmarkModel::MediapipePose;
        let n = (seconds * fps) as u64;
        (0..n)
            .map(|i| {
                let t = i as f64 / fps;
                let y = 0.5 + 0.1 * (2.0 * PI * t / period_s).sin();
                let hip_x = 0.1 + 0.01 * t;
                let mut lms = vec![Landmark::new(0.0, 0.0, 0.0, 0.0); model.point_count()];
                let mut put = |p: BodyPoint, x: f64, y: f64| {
                    lms[model.index_of(p)] = Landmark::new(x, y, 0.0, 1.0);
                };
                put(BodyPoint::LeftWrist, 0.4, y);
                put(BodyPoint::RightWrist, 0.6, y);
                put(BodyPoint::LeftHip, hip_x, 0.5);
                put(BodyPoint::RightHip, hip_x, 0.6);
                LandmarkFrame::new(i, lms)
            })
            .collect()
    }

    fn detect(frames: &[LandmarkFrame], fps: f64) -> CycleDetection {
        let cfg = CycleConfig::default();
        let kin = extract(frames, fps, &LandmarkConfig::default());
        let signal = cycle_signal(&kin, cfg.signal);
        detect_cycles(&signal, &kin, fps, &cfg)
    }

    #[test]
    fn test_sinusoid_stroke_rate_within_tolerance() {
        for fps in [30.0, 60.0] {
            for period in [3.0, 2.0, 1.5, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4] {
                let det = detect(&swimmer(period, fps, 10.0), fps);
                let expected = 60.0 / period;
                let err = (det.stroke_rate - expected).abs() / expected;
                assert!(
                    err < 0.05,
                    "period {period} @ {fps} fps: rate {} vs {expected}",
                    det.stroke_rate
                );
            }
        }
    }

    #[test]
    fn test_cycles_are_contiguous() {
        let det = detect(&swimmer(2.0, 30.0, 10.0), 30.0);
        assert_eq!(det.cycles.len(), det.peaks.len() - 1);
        for pair in det.cycles.windows(2) {
            assert_eq!(pair[0].end_frame + 1, pair[1].start_frame);
        }
    }

    #[test]
    fn test_stroke_length_from_hip_travel() {
        let det = detect(&swimmer(2.0, 30.0, 10.0), 30.0);
        // 0.01 units/s over a 2 s cycle
        assert!((det.stroke_length - 0.02).abs() < 1e-6, "{}", det.stroke_length);
    }

    #[test]
    fn test_flat_signal_gives_zero_rate() {
        let frames = swimmer(f64::INFINITY, 30.0, 5.0);
        let det = detect(&frames, 30.0);
        assert!(!det.has_cycles());
        assert_eq!(det.stroke_rate, 0.0);
        assert!(det.stroke_length.is_nan());
    }
}
