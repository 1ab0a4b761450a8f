//! # Symmetry & Aggregate Statistics
//!
//! Bilateral Pearson correlation per left/right pair, and NaN-skipping
//! aggregates for every series.
//!
//! `index = (rho + 1) / 2`. A pair with fewer paired samples than the
//! configured minimum, or with a constant side that differs from the other,
//! is reported as `NaN` with a status instead of a misleading value.

use std::collections::BTreeMap;

use tracing::warn;

use super::signal::series_stats;
use crate::config::SymmetryConfig;
use crate::models::{Metric, MetricSeries, SeriesStats, SymmetryStat, SymmetryStatus};

/// Symmetry for one pair of equally long series.
pub fn symmetry_stat(
    pair: (Metric, Metric),
    left: &[f64],
    right: &[f64],
    min_paired_samples: usize,
) -> SymmetryStat {
    let paired: Vec<(f64, f64)> = left
        .iter()
        .zip(right)
        .filter(|(l, r)| l.is_finite() && r.is_finite())
        .map(|(&l, &r)| (l, r))
        .collect();
    let n = paired.len();

    let unavailable = |status| SymmetryStat {
        metric_pair: pair,
        correlation: f64::NAN,
        index: f64::NAN,
        paired_samples: n,
        status,
    };

    if n < min_paired_samples.max(2) {
        return unavailable(SymmetryStatus::InsufficientPairedSamples);
    }

    let available = |correlation: f64| SymmetryStat {
        metric_pair: pair,
        correlation,
        index: ((correlation + 1.0) / 2.0).clamp(0.0, 1.0),
        paired_samples: n,
        status: SymmetryStatus::Ok,
    };

    if paired.iter().all(|(l, r)| l == r) {
        return available(1.0);
    }

    let mean_l = paired.iter().map(|(l, _)| l).sum::<f64>() / n as f64;
    let mean_r = paired.iter().map(|(_, r)| r).sum::<f64>() / n as f64;
    let (mut cov, mut var_l, mut var_r) = (0.0, 0.0, 0.0);
    for (l, r) in &paired {
        let dl = l - mean_l;
        let dr = r - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    if var_l <= f64::EPSILON || var_r <= f64::EPSILON {
        return unavailable(SymmetryStatus::ZeroVariance);
    }

    available((cov / (var_l.sqrt() * var_r.sqrt())).clamp(-1.0, 1.0))
}

/// Symmetry for every configured pair, in configuration order.
pub fn compute_symmetry(series: &MetricSeries, config: &SymmetryConfig) -> Vec<SymmetryStat> {
    let empty = vec![f64::NAN; series.len()];
    config
        .pairs
        .iter()
        .map(|&(l, r)| {
            let stat = symmetry_stat(
                (l, r),
                series.get(l).unwrap_or(&empty),
                series.get(r).unwrap_or(&empty),
                config.min_paired_samples,
            );
            if !stat.is_available() {
                warn!(
                    left = l.name(),
                    right = r.name(),
                    paired = stat.paired_samples,
                    status = ?stat.status,
                    "symmetry unavailable"
                );
            }
            stat
        })
        .collect()
}

/// Aggregate statistics for every series.
pub fn aggregate(series: &MetricSeries) -> BTreeMap<Metric, SeriesStats> {
    series
        .iter()
        .map(|(metric, samples)| (metric, series_stats(samples)))
        .collect()
}
