//! Per-point position tracks with bounded gap filling.
//!
//! A point absent for a short run between two observed samples is linearly
//! interpolated by frame index. Runs longer than the configured gap, or runs
//! touching either end of the sequence, stay absent so downstream metrics
//! are `NaN` for the whole run.

use nalgebra::Vector3;
use strum::{EnumCount, IntoEnumIterator};

use crate::models::{BodyPoint, Skeleton};

/// Positions of every [`BodyPoint`] over the processed frames.
#[derive(Debug, Clone)]
pub struct Tracks {
    frame_indices: Vec<u64>,
    points: Vec<Vec<Option<Vector3<f64>>>>,
    interpolated: usize,
}

impl Tracks {
    /// Build tracks from per-frame skeletons and fill short gaps.
    pub fn build(frame_indices: &[u64], skeletons: &[Skeleton], max_gap: u64) -> Self {
        debug_assert_eq!(frame_indices.len(), skeletons.len());

        let mut points = Vec::with_capacity(BodyPoint::COUNT);
        let mut interpolated = 0;
        for point in BodyPoint::iter() {
            let mut track: Vec<Option<Vector3<f64>>> =
                skeletons.iter().map(|s| s.get(point)).collect();
            interpolated += fill_gaps(&mut track, frame_indices, max_gap);
            points.push(track);
        }

        Self {
            frame_indices: frame_indices.to_vec(),
            points,
            interpolated,
        }
    }

    pub fn track(&self, point: BodyPoint) -> &[Option<Vector3<f64>>] {
        &self.points[point.slot()]
    }

    #[inline]
    pub fn get(&self, point: BodyPoint, position: usize) -> Option<Vector3<f64>> {
        self.points[point.slot()].get(position).copied().flatten()
    }

    pub fn frame_indices(&self) -> &[u64] {
        &self.frame_indices
    }

    pub(crate) fn len(&self) -> usize {
        self.frame_indices.len()
    }

    /// Point samples filled by interpolation.
    pub fn interpolated_samples(&self) -> usize {
        self.interpolated
    }

    /// Per-frame value of `f` over the listed points; `NaN` where any is absent.
    pub fn map_frames<const N: usize>(
        &self,
        points: [BodyPoint; N],
        f: impl Fn([Vector3<f64>; N]) -> f64,
    ) -> Vec<f64> {
        (0..self.len())
            .map(|i| {
                let mut found = [Vector3::zeros(); N];
                for (slot, point) in found.iter_mut().zip(points) {
                    match self.get(point, i) {
                        Some(v) => *slot = v,
                        None => return f64::NAN,
                    }
                }
                f(found)
            })
            .collect()
    }
}

/// Fill interior gaps of at most `max_gap` missing frame indices.
/// Returns the number of samples filled.
fn fill_gaps(track: &mut [Option<Vector3<f64>>], frame_indices: &[u64], max_gap: u64) -> usize {
    if max_gap == 0 {
        return 0;
    }

    let mut filled = 0;
    let mut last_seen: Option<usize> = None;
    for i in 0..track.len() {
        let Some(end) = track[i] else {
            continue;
        };
        if let Some(p) = last_seen {
            let missing = frame_indices[i] - frame_indices[p] - 1;
            if i > p + 1 && missing <= max_gap {
                if let Some(start) = track[p] {
                    let span = (frame_indices[i] - frame_indices[p]) as f64;
                    for k in p + 1..i {
                        let t = (frame_indices[k] - frame_indices[p]) as f64 / span;
                        track[k] = Some(start.lerp(&end, t));
                        filled += 1;
                    }
                }
            }
        }
        last_seen = Some(i);
    }
    filled
}
