//! Signal primitives shared by the detectors.

pub mod peaks;
pub mod stats;

pub use peaks::{find_peaks, Peak};
pub use stats::{min_max_normalize, nan_max, nan_mean, series_stats};
