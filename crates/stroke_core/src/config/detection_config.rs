//! Detection Configuration
//!
//! Tunables for the signal side of the pipeline: landmark gating, peak
//! detection, phase thresholds, event detection and symmetry pairing.
//!
//! | Concern | Struct | Key defaults |
//! |---------|--------|--------------|
//! | Landmarks | [`LandmarkConfig`] | visibility 0.5, max gap 3 frames |
//! | Cycles | [`CycleConfig`] | cycles of at least 0.4 s (up to 150 strokes/min), prominence 0.02 |
//! | Phases | [`PhaseConfig`] | 0.2 / 0.6, hysteresis 0.05 |
//! | Breath | [`EventConfig::breath`] | distance 30 frames, prominence 0.01 |
//! | Kick | [`EventConfig::kick`] | distance 8 frames, prominence 0.05 |
//! | Symmetry | [`SymmetryConfig`] | 10 paired samples |

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::{Validate, ValidationError};

use crate::models::{AngleSpace, LandmarkModel, Metric};

/// Landmark gating and gap policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Upstream landmark numbering
    pub model: LandmarkModel,
    /// Landmarks below this visibility are treated as absent
    #[validate(range(min = 0.0, max = 1.0))]
    pub visibility_threshold: f64,
    /// Longest absence (in frame-index units) bridged by interpolation
    #[validate(range(max = 120))]
    pub max_interpolation_gap: u64,
    pub angle_space: AngleSpace,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            model: LandmarkModel::MediapipePose,
            visibility_threshold: 0.5,
            max_interpolation_gap: 3,
            angle_space: AngleSpace::Planar,
        }
    }
}

/// Peak detection parameters.
///
/// `min_distance` is counted in processed samples; `min_prominence` is in the
/// detection signal's own units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PeakConfig {
    #[validate(range(min = 1))]
    pub min_distance: usize,
    #[validate(range(min = 0.0))]
    pub min_prominence: f64,
}

impl PeakConfig {
    pub const fn new(min_distance: usize, min_prominence: f64) -> Self {
        Self {
            min_distance,
            min_prominence,
        }
    }
}

/// Signal whose peaks bound stroke cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSignal {
    /// Mean image height of both wrists
    #[default]
    HandHeight,
    LeftWristHeight,
    RightWristHeight,
    /// Mean hand speed
    HandSpeed,
}

/// Point whose forward travel gives stroke length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthReference {
    #[default]
    HipCenter,
    ShoulderCenter,
    Nose,
}

/// Cycle detection on the reference signal.
///
/// Peak spacing is the larger of `peaks.min_distance` (samples) and
/// `min_cycle_seconds` converted at the sequence frame rate, so the
/// supported tempo range does not depend on fps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CycleConfig {
    pub signal: CycleSignal,
    #[validate]
    pub peaks: PeakConfig,
    /// Shortest accepted stroke cycle
    #[validate(range(min = 0.05, max = 10.0))]
    pub min_cycle_seconds: f64,
    pub length_reference: LengthReference,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            signal: CycleSignal::HandHeight,
            peaks: PeakConfig::new(1, 0.02),
            min_cycle_seconds: 0.4,
            length_reference: LengthReference::HipCenter,
        }
    }
}

impl CycleConfig {
    /// Peak parameters at `fps`.
    pub fn peaks_at(&self, fps: f64) -> PeakConfig {
        let cycle_frames = (self.min_cycle_seconds * fps).round() as usize;
        PeakConfig {
            min_distance: self.peaks.min_distance.max(cycle_frames),
            ..self.peaks
        }
    }
}

/// Phase state machine thresholds on the cycle-normalized hand speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_phase_thresholds"))]
pub struct PhaseConfig {
    /// catch -> pull
    #[validate(range(min = 0.0, max = 1.0))]
    pub catch_to_pull: f64,
    /// pull -> push
    #[validate(range(min = 0.0, max = 1.0))]
    pub pull_to_push: f64,
    /// Drop below a threshold needed before moving to a lower-speed phase
    #[validate(range(min = 0.0, max = 0.5))]
    pub hysteresis: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            catch_to_pull: 0.2,
            pull_to_push: 0.6,
            hysteresis: 0.05,
        }
    }
}

fn validate_phase_thresholds(cfg: &PhaseConfig) -> Result<(), ValidationError> {
    if cfg.catch_to_pull.partial_cmp(&cfg.pull_to_push) != Some(Ordering::Less) {
        return Err(ValidationError::new("phase_thresholds_not_ascending"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EventConfig {
    /// Head-rise detection
    #[validate]
    pub breath: PeakConfig,
    /// Ankle-speed peak detection, per leg
    #[validate]
    pub kick: PeakConfig,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            breath: PeakConfig::new(30, 0.01),
            kick: PeakConfig::new(8, 0.05),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SymmetryConfig {
    /// Fewer paired samples than this reports the pair as unavailable
    #[validate(range(min = 2))]
    pub min_paired_samples: usize,
    /// Left/right pairs; the first one feeds the summary symmetry index
    pub pairs: Vec<(Metric, Metric)>,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            min_paired_samples: 10,
            pairs: vec![
                (Metric::ElbowLeft, Metric::ElbowRight),
                (Metric::ShoulderLeft, Metric::ShoulderRight),
                (Metric::KneeLeft, Metric::KneeRight),
                (Metric::HandLeftVelocity, Metric::HandRightVelocity),
            ],
        }
    }
}
