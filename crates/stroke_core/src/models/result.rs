//! # Analysis Result
//!
//! The single value handed to persistence, reporting and display.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::feedback::FeedbackBundle;
use super::series::{Metric, MetricSeries, SeriesStats};
use super::stroke::{Event, PhaseShare, StrokeCycle, SymmetryStat};
use crate::error::AnalysisError;

/// Scalar stroke summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrokeSummary {
    /// Strokes per minute; 0 when fewer than two reference peaks were found
    pub stroke_rate: f64,
    /// Mean forward displacement per cycle (normalized units)
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub stroke_length: f64,
    pub cycle_count: usize,
    /// Mean hand speed over all frames
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub avg_velocity: f64,
    /// Peak hand speed over all frames
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub max_velocity: f64,
    /// Elbow pair symmetry index
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub symmetry_index: f64,
    pub breath_count: usize,
    /// Breaths per minute over the processed span
    pub breathing_rate: f64,
    pub kick_count: usize,
}

/// Local degradations that did not abort the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisFlags {
    /// Fewer than two reference peaks: no cycles, no phases, rate 0
    pub no_cycles_detected: bool,
    /// Frames with no landmark above the visibility threshold
    pub occluded_frames: usize,
    /// Point samples filled by gap interpolation
    pub interpolated_samples: usize,
    /// Symmetry pairs reported as `NaN`
    pub unavailable_symmetry_pairs: usize,
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub schema_version: u8,
    #[serde(default)]
    pub label: Option<String>,
    pub fps: f64,
    pub frame_count: usize,
    pub series: MetricSeries,
    pub aggregates: BTreeMap<Metric, SeriesStats>,
    pub summary: StrokeSummary,
    pub cycles: Vec<StrokeCycle>,
    pub phase_breakdown: Vec<PhaseShare>,
    pub events: Vec<Event>,
    pub symmetry: Vec<SymmetryStat>,
    pub feedback: FeedbackBundle,
    pub flags: AnalysisFlags,
}

impl AnalysisResult {
    /// SHA-256 of the JSON encoding, hex encoded.
    ///
    /// Identical input and configuration give identical fingerprints.
    pub fn fingerprint(&self) -> Result<String, AnalysisError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// JSON schema of [`AnalysisResult`].
pub fn result_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(AnalysisResult)
}
