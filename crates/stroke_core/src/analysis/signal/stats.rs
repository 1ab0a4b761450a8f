//! NaN-aware statistics over sample slices.

use crate::models::SeriesStats;

/// Mean, extrema and population std over the finite samples only.
///
/// An all-`NaN` (or empty) slice gives [`SeriesStats::undefined`].
pub fn series_stats(samples: &[f64]) -> SeriesStats {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &v in samples.iter().filter(|v| v.is_finite()) {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return SeriesStats::undefined();
    }

    let mean = sum / count as f64;
    let var = samples
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    SeriesStats {
        mean,
        min,
        max,
        std: var.sqrt(),
        valid_samples: count,
    }
}

/// Mean of the finite samples, `NaN` when there are none.
pub fn nan_mean(samples: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = samples
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Max of the finite samples, `NaN` when there are none.
pub fn nan_max(samples: impl IntoIterator<Item = f64>) -> f64 {
    samples
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

/// Rescale finite samples to [0, 1]; `NaN` stays `NaN`.
///
/// A constant slice maps to all zeros.
pub fn min_max_normalize(samples: &[f64]) -> Vec<f64> {
    let stats = series_stats(samples);
    if !stats.is_defined() {
        return samples.to_vec();
    }
    let range = stats.max - stats.min;
    samples
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                f64::NAN
            } else if range <= f64::EPSILON {
                0.0
            } else {
                (v - stats.min) / range
            }
        })
        .collect()
}
