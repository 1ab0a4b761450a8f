//! # Peak Detection
//!
//! Local maxima with minimum prominence and minimum spacing.
//!
//! ## Algorithm
//! 1. Candidates: a strict rise followed, after an optional plateau, by a
//!    strict fall. A plateau resolves to its first sample. Edge samples and
//!    samples next to `NaN` are never candidates.
//! 2. Prominence: height above the higher of the two bases, where each base
//!    is the lowest sample between the peak and the nearest strictly higher
//!    sample on that side (or the signal end). `NaN` samples are skipped.
//! 3. Drop candidates below `min_prominence`.
//! 4. Spacing: visit survivors by height (descending, earlier index first on
//!    ties) and remove any later-visited peak closer than `min_distance`
//!    samples to a kept one.

use crate::config::PeakConfig;

/// A detected local maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Position in the processed sample sequence
    pub index: usize,
    pub height: f64,
    pub prominence: f64,
}

/// Detect peaks in `signal`. Output is sorted by index.
pub fn find_peaks(signal: &[f64], config: &PeakConfig) -> Vec<Peak> {
    let candidates: Vec<Peak> = local_maxima(signal)
        .into_iter()
        .map(|index| Peak {
            index,
            height: signal[index],
            prominence: prominence(signal, index),
        })
        .filter(|p| p.prominence >= config.min_prominence)
        .collect();

    enforce_distance(candidates, config.min_distance)
}

fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let n = signal.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }

    let mut i = 1;
    while i < n - 1 {
        let prev = signal[i - 1];
        let cur = signal[i];
        if !(prev.is_finite() && cur.is_finite() && prev < cur) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < n && signal[j] == cur {
            j += 1;
        }
        if j < n && signal[j].is_finite() && signal[j] < cur {
            out.push(i);
        }
        i = j;
    }
    out
}

fn prominence(signal: &[f64], index: usize) -> f64 {
    let height = signal[index];

    let mut left_base = height;
    for &v in signal[..index].iter().rev() {
        if !v.is_finite() {
            continue;
        }
        if v > height {
            break;
        }
        left_base = left_base.min(v);
    }

    let mut right_base = height;
    for &v in &signal[index + 1..] {
        if !v.is_finite() {
            continue;
        }
        if v > height {
            break;
        }
        right_base = right_base.min(v);
    }

    height - left_base.max(right_base)
}

fn enforce_distance(peaks: Vec<Peak>, min_distance: usize) -> Vec<Peak> {
    if min_distance <= 1 || peaks.len() < 2 {
        return peaks;
    }

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        peaks[b]
            .height
            .total_cmp(&peaks[a].height)
            .then(peaks[a].index.cmp(&peaks[b].index))
    });

    let mut removed = vec![false; peaks.len()];
    for &k in &order {
        if removed[k] {
            continue;
        }
        let center = peaks[k].index;
        for (other, peak) in peaks.iter().enumerate() {
            if other != k && !removed[other] && peak.index.abs_diff(center) < min_distance {
                removed[other] = true;
            }
        }
    }

    peaks
        .into_iter()
        .zip(removed)
        .filter_map(|(peak, gone)| (!gone).then_some(peak))
        .collect()
}
