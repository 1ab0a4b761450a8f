//! Kinematic feature extraction: geometry, gap-filled tracks, metric series.

pub mod extractor;
pub mod geometry;
pub mod tracks;

pub use extractor::{extract, point_speed, Kinematics};
pub use tracks::Tracks;
